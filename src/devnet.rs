// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! In-memory chain running `CounterContract` and its payment token.
//!
//! Every settled transaction becomes one block. Calls of a transaction run
//! against a scratch copy of the ledger, which replaces the real one only if
//! all of them succeed.

use std::collections::BTreeMap;

use alloy_primitives::keccak256;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::TokenAmount;
use crate::call::{CallPlan, ContractCall};
use crate::chain::{ChainError, ChainReader, EventHistory, TransactionSubmitter, TxHash, TxReceipt};
use crate::config::Deployment;
use crate::events::{ChangeReason, RawCounterChanged};

/// Contract storage of the counter and the token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Ledger {
    owner: Address,
    counter: u64,
    #[serde(default)]
    balances: BTreeMap<Address, TokenAmount>,
    /// Token owner to spender to allowance.
    #[serde(default)]
    allowances: BTreeMap<Address, BTreeMap<Address, TokenAmount>>,
}

/// An event emitted during execution, before it has a block.
struct Emitted {
    caller: Address,
    old_value: u64,
    new_value: u64,
    reason: ChangeReason,
}

fn revert(entrypoint: &'static str, reason: impl Into<String>) -> ChainError {
    ChainError::Reverted {
        entrypoint,
        reason: reason.into(),
    }
}

impl Ledger {
    fn balance(&self, account: &Address) -> TokenAmount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or_default()
    }

    /// Moves `amount` from `from` to `to` on behalf of `spender`.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), ChainError> {
        let entrypoint = "transfer_from";

        let allowance = self
            .allowance(from, spender)
            .checked_sub(amount)
            .ok_or_else(|| revert(entrypoint, "insufficient allowance"))?;
        let from_balance = self
            .balance(from)
            .checked_sub(amount)
            .ok_or_else(|| revert(entrypoint, "insufficient balance"))?;

        self.allowances
            .entry(*from)
            .or_default()
            .insert(*spender, allowance);
        self.balances.insert(*from, from_balance);
        let to_balance = self
            .balance(to)
            .checked_add(amount)
            .ok_or_else(|| revert(entrypoint, "balance overflow"))?;
        self.balances.insert(*to, to_balance);
        Ok(())
    }

    fn apply(
        &mut self,
        deployment: &Deployment,
        sender: &Address,
        call: &ContractCall,
    ) -> Result<Option<Emitted>, ChainError> {
        let entrypoint = call.entrypoint();
        let old_value = self.counter;

        let (new_value, reason) = match call {
            ContractCall::IncreaseCounter => (
                old_value
                    .checked_add(1)
                    .ok_or_else(|| revert(entrypoint, "counter overflow"))?,
                ChangeReason::Increase,
            ),
            ContractCall::DecreaseCounter => (
                old_value
                    .checked_sub(1)
                    .ok_or_else(|| revert(entrypoint, "counter is already 0"))?,
                ChangeReason::Decrease,
            ),
            ContractCall::ResetCounter => {
                if *sender != self.owner {
                    let owner = self.owner;
                    self.transfer_from(
                        &deployment.counter_address,
                        sender,
                        &owner,
                        deployment.payment,
                    )
                    .map_err(|err| match err {
                        ChainError::Reverted { reason, .. } => {
                            revert(entrypoint, format!("payment failed: {reason}"))
                        }
                        other => other,
                    })?;
                }
                (0, ChangeReason::Reset)
            }
            ContractCall::SetCounter { value } => {
                if *sender != self.owner {
                    return Err(revert(entrypoint, "caller is not the owner"));
                }
                (*value, ChangeReason::Set)
            }
            ContractCall::Approve { spender, amount } => {
                self.allowances
                    .entry(*sender)
                    .or_default()
                    .insert(*spender, *amount);
                return Ok(None);
            }
        };

        self.counter = new_value;
        Ok(Some(Emitted {
            caller: *sender,
            old_value,
            new_value,
            reason,
        }))
    }
}

#[derive(Debug, Clone)]
struct PendingTx {
    sender: Address,
    plan: CallPlan,
}

/// A single-node chain held in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Devnet {
    deployment: Deployment,
    #[serde(default)]
    block_number: u64,
    #[serde(default)]
    nonce: u64,
    ledger: Ledger,
    #[serde(default)]
    events: Vec<RawCounterChanged>,
    #[serde(skip)]
    pending: BTreeMap<TxHash, PendingTx>,
}

impl Devnet {
    /// A fresh chain with `owner` owning a counter at zero.
    #[must_use]
    pub fn new(deployment: Deployment, owner: Address) -> Self {
        Self {
            deployment,
            block_number: 0,
            nonce: 0,
            ledger: Ledger {
                owner,
                ..Ledger::default()
            },
            events: Vec::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Starts the counter at `value` instead of zero.
    #[must_use]
    pub fn with_counter(mut self, value: u64) -> Self {
        self.ledger.counter = value;
        self
    }

    /// Credits `amount` tokens to `account` and returns the new balance.
    ///
    /// # Errors
    ///
    /// Reverts without touching the balance if the credit overflows.
    pub fn mint(&mut self, account: Address, amount: TokenAmount) -> Result<TokenAmount, ChainError> {
        let credited = self
            .ledger
            .balance(&account)
            .checked_add(amount)
            .ok_or_else(|| revert("mint", "balance overflow"))?;
        self.ledger.balances.insert(account, credited);
        tracing::debug!(%account, %amount, "minted");
        Ok(credited)
    }

    /// The deployed contracts.
    #[must_use]
    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    /// Height of the last block.
    #[must_use]
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    /// Allowance `owner` granted to `spender`.
    #[must_use]
    pub fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        self.ledger.allowance(owner, spender)
    }

    /// All events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RawCounterChanged] {
        &self.events
    }

    /// Submits and settles `plan` in one go.
    ///
    /// # Errors
    ///
    /// Returns the revert of the first failing call.
    pub fn execute(&mut self, sender: &Address, plan: &CallPlan) -> Result<TxReceipt, ChainError> {
        let tx = self.submit(sender, plan)?;
        self.settle(&tx)
    }

    fn next_hash(&mut self, sender: &Address) -> TxHash {
        self.nonce += 1;
        let mut preimage = Vec::with_capacity(40);
        preimage.extend_from_slice(&sender.as_u256().to_be_bytes::<32>());
        preimage.extend_from_slice(&self.nonce.to_be_bytes());
        keccak256(preimage)
    }
}

impl ChainReader for Devnet {
    fn get_counter(&self) -> Result<u64, ChainError> {
        Ok(self.ledger.counter)
    }

    fn owner(&self) -> Result<Address, ChainError> {
        Ok(self.ledger.owner)
    }

    fn balance_of(&self, account: &Address) -> Result<TokenAmount, ChainError> {
        Ok(self.ledger.balance(account))
    }
}

impl TransactionSubmitter for Devnet {
    fn submit(&mut self, sender: &Address, plan: &CallPlan) -> Result<TxHash, ChainError> {
        if plan.is_empty() {
            return Err(ChainError::Unavailable(
                "refusing to submit an empty call bundle".to_string(),
            ));
        }

        let hash = self.next_hash(sender);
        self.pending.insert(
            hash,
            PendingTx {
                sender: *sender,
                plan: plan.clone(),
            },
        );
        tracing::debug!(%hash, %sender, %plan, "transaction queued");
        Ok(hash)
    }

    fn settle(&mut self, tx: &TxHash) -> Result<TxReceipt, ChainError> {
        let PendingTx { sender, plan } = self
            .pending
            .remove(tx)
            .ok_or(ChainError::UnknownTransaction(*tx))?;

        let mut scratch = self.ledger.clone();
        let mut emitted = Vec::new();
        for call in &plan {
            match scratch.apply(&self.deployment, &sender, call) {
                Ok(event) => emitted.extend(event),
                Err(err) => {
                    tracing::debug!(hash = %tx, "transaction reverted: {err}");
                    return Err(err);
                }
            }
        }

        self.ledger = scratch;
        self.block_number += 1;
        let block_number = self.block_number;
        self.events
            .extend(emitted.into_iter().map(|event| RawCounterChanged {
                block_number,
                caller: event.caller,
                old_value: event.old_value,
                new_value: event.new_value,
                reason: event.reason.into(),
            }));

        tracing::debug!(hash = %tx, block_number, counter = self.ledger.counter, "transaction settled");
        Ok(TxReceipt {
            hash: *tx,
            block_number,
            calls: plan.len(),
            counter: self.ledger.counter,
        })
    }
}

impl EventHistory for Devnet {
    fn counter_changed_events(&self, from_block: u64) -> Result<Vec<RawCounterChanged>, ChainError> {
        Ok(self
            .events
            .iter()
            .filter(|event| event.block_number >= from_block)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: u64 = 0x1;
    const ALICE: u64 = 0xa;

    fn devnet(counter: u64) -> Devnet {
        Devnet::new(
            Deployment::new(Address::from(0xc0), Address::from(0x57)),
            Address::from(OWNER),
        )
        .with_counter(counter)
    }

    fn approve(devnet: &Devnet) -> ContractCall {
        ContractCall::Approve {
            spender: devnet.deployment().counter_address,
            amount: devnet.deployment().payment,
        }
    }

    #[test]
    fn settled_transaction_emits_events_in_one_block() {
        let mut chain = devnet(0);
        let plan = CallPlan::from([ContractCall::IncreaseCounter, ContractCall::IncreaseCounter]);

        let receipt = chain.execute(&Address::from(ALICE), &plan).expect("settles");

        assert_eq!(receipt.block_number, 1);
        assert_eq!(receipt.calls, 2);
        assert_eq!(receipt.counter, 2);
        assert_eq!(chain.events().len(), 2);
        assert!(chain.events().iter().all(|event| event.block_number == 1));
    }

    #[test]
    fn failing_call_rolls_back_the_whole_bundle() {
        let mut chain = devnet(1);
        let alice = Address::from(ALICE);
        let plan = CallPlan::from([
            ContractCall::DecreaseCounter,
            approve(&chain),
            ContractCall::ResetCounter,
        ]);

        let err = chain.execute(&alice, &plan).expect_err("alice has no tokens");

        assert_eq!(
            err,
            ChainError::Reverted {
                entrypoint: "reset_counter",
                reason: "payment failed: insufficient balance".to_string(),
            }
        );
        assert_eq!(chain.get_counter(), Ok(1));
        assert_eq!(chain.allowance(&alice, &chain.deployment().counter_address), TokenAmount::ZERO);
        assert!(chain.events().is_empty());
        assert_eq!(chain.block_number(), 0);
    }

    #[test]
    fn paid_reset_moves_tokens_to_the_owner() {
        let mut chain = devnet(5);
        let alice = Address::from(ALICE);
        chain.mint(alice, TokenAmount::from_tokens(3)).expect("mint");

        chain
            .execute(&alice, &CallPlan::from([approve(&chain), ContractCall::ResetCounter]))
            .expect("paid reset");

        assert_eq!(chain.get_counter(), Ok(0));
        assert_eq!(chain.balance_of(&alice), Ok(TokenAmount::from_tokens(2)));
        assert_eq!(
            chain.balance_of(&Address::from(OWNER)),
            Ok(TokenAmount::from_tokens(1))
        );
        let resets: Vec<_> = chain
            .events()
            .iter()
            .map(|event| event.reason.resolve().expect("valid reason"))
            .collect();
        assert_eq!(resets, [ChangeReason::Reset]);
    }

    #[test]
    fn reset_without_allowance_reverts() {
        let mut chain = devnet(5);
        let alice = Address::from(ALICE);
        chain.mint(alice, TokenAmount::from_tokens(3)).expect("mint");

        let err = chain
            .execute(&alice, &CallPlan::single(ContractCall::ResetCounter))
            .expect_err("no approval");
        assert!(err.to_string().contains("insufficient allowance"));
    }

    #[test]
    fn only_owner_may_set() {
        let mut chain = devnet(0);
        let plan = CallPlan::single(ContractCall::SetCounter { value: 42 });

        let err = chain
            .execute(&Address::from(ALICE), &plan)
            .expect_err("alice is not owner");
        assert_eq!(err.to_string(), "set_counter reverted: caller is not the owner");

        chain.execute(&Address::from(OWNER), &plan).expect("owner sets");
        assert_eq!(chain.get_counter(), Ok(42));
    }

    #[test]
    fn settle_rejects_unknown_hashes_and_empty_plans() {
        let mut chain = devnet(0);
        let hash = TxHash::ZERO;
        assert_eq!(chain.settle(&hash), Err(ChainError::UnknownTransaction(hash)));
        assert!(chain.submit(&Address::from(OWNER), &CallPlan::empty()).is_err());
    }

    #[test]
    fn transaction_hashes_are_unique_per_submission() {
        let mut chain = devnet(0);
        let plan = CallPlan::single(ContractCall::IncreaseCounter);
        let first = chain.submit(&Address::from(OWNER), &plan).expect("queued");
        let second = chain.submit(&Address::from(OWNER), &plan).expect("queued");
        assert_ne!(first, second);
    }

    #[test]
    fn snapshot_survives_json() {
        let mut chain = devnet(3);
        chain.mint(Address::from(ALICE), TokenAmount::from_tokens(2)).expect("mint");
        chain
            .execute(&Address::from(OWNER), &CallPlan::single(ContractCall::DecreaseCounter))
            .expect("owner decreases");

        let json = serde_json::to_string(&chain).expect("serialize");
        let restored: Devnet = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(restored.get_counter(), Ok(2));
        assert_eq!(restored.block_number(), 1);
        assert_eq!(restored.events(), chain.events());
        assert_eq!(
            restored.balance_of(&Address::from(ALICE)),
            Ok(TokenAmount::from_tokens(2))
        );
        assert_eq!(
            restored.counter_changed_events(2).expect("history"),
            Vec::new()
        );
    }

    #[test]
    fn overflowing_mint_leaves_the_balance_alone() {
        let mut chain = devnet(0);
        let alice = Address::from(ALICE);
        chain.mint(alice, TokenAmount::from_tokens(1)).expect("mint");

        let err = chain
            .mint(alice, TokenAmount::from_base_units(alloy_primitives::U256::MAX))
            .expect_err("overflow");

        assert_eq!(
            err,
            ChainError::Reverted {
                entrypoint: "mint",
                reason: "balance overflow".to_string(),
            }
        );
        assert_eq!(chain.balance_of(&alice), Ok(TokenAmount::from_tokens(1)));
    }
}
