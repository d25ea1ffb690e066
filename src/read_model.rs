// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Read-only mirror of the on-chain values the policy needs.

use serde::Serialize;

use crate::address::Address;
use crate::amount::TokenAmount;
use crate::chain::ChainReader;
use crate::policy::PolicyContext;

/// Where the counter read stands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum LoadState {
    /// Nothing read yet.
    #[default]
    Loading,
    /// The last refresh succeeded.
    Ready,
    /// The last counter read failed with this message.
    Failed(String),
}

/// Values read from the chain, refreshed explicitly by the caller.
///
/// The counter itself is never mutated locally; only a refresh after a
/// confirmed transaction moves it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CounterReadModel {
    caller: Option<Address>,
    counter: Option<u64>,
    owner: Option<Address>,
    balance: Option<TokenAmount>,
    state: LoadState,
}

impl CounterReadModel {
    /// A model for `caller`, with nothing loaded yet.
    #[must_use]
    pub fn new(caller: Option<Address>) -> Self {
        Self {
            caller,
            ..Self::default()
        }
    }

    /// Connected account.
    #[must_use]
    pub fn caller(&self) -> Option<Address> {
        self.caller
    }

    /// Switches account. The cached balance belongs to the previous one and
    /// is dropped.
    pub fn set_caller(&mut self, caller: Option<Address>) {
        if self.caller != caller {
            self.caller = caller;
            self.balance = None;
        }
    }

    /// Last counter value read, `None` before the first successful read.
    #[must_use]
    pub fn counter(&self) -> Option<u64> {
        self.counter
    }

    /// Contract owner, once read.
    #[must_use]
    pub fn owner(&self) -> Option<Address> {
        self.owner
    }

    /// Caller balance, once read.
    #[must_use]
    pub fn balance(&self) -> Option<TokenAmount> {
        self.balance
    }

    /// Load state of the counter read.
    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Pulls counter, owner and caller balance from `reader`.
    ///
    /// Each value is read independently. A failed owner or balance read
    /// leaves that value unknown, which the policy treats as non-owner and
    /// balance-loading respectively.
    pub fn refresh<R: ChainReader + ?Sized>(&mut self, reader: &R) {
        match reader.get_counter() {
            Ok(counter) => {
                self.counter = Some(counter);
                self.state = LoadState::Ready;
            }
            Err(err) => {
                tracing::warn!("failed to read counter: {err}");
                self.state = LoadState::Failed(err.to_string());
            }
        }

        self.owner = reader
            .owner()
            .map_err(|err| tracing::warn!("failed to read owner: {err}"))
            .ok();

        self.balance = self.caller.and_then(|caller| {
            reader
                .balance_of(&caller)
                .map_err(|err| tracing::warn!(%caller, "failed to read balance: {err}"))
                .ok()
        });

        tracing::debug!(
            counter = ?self.counter,
            owner = ?self.owner,
            balance = ?self.balance,
            "read model refreshed"
        );
    }

    /// Snapshot handed to the policy. An unread counter counts as zero.
    #[must_use]
    pub fn context(&self) -> PolicyContext {
        PolicyContext {
            caller: self.caller,
            owner: self.owner,
            counter: self.counter.unwrap_or(0),
            balance: self.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainError;

    struct Flaky {
        counter: Result<u64, ChainError>,
    }

    impl ChainReader for Flaky {
        fn get_counter(&self) -> Result<u64, ChainError> {
            self.counter.clone()
        }

        fn owner(&self) -> Result<Address, ChainError> {
            Err(ChainError::Unavailable("owner".to_string()))
        }

        fn balance_of(&self, _account: &Address) -> Result<TokenAmount, ChainError> {
            Ok(TokenAmount::from_tokens(3))
        }
    }

    #[test]
    fn starts_loading_and_defaults_counter_to_zero() {
        let model = CounterReadModel::new(Some(Address::from(1)));
        assert_eq!(model.state(), &LoadState::Loading);
        assert_eq!(model.context().counter, 0);
        assert_eq!(model.context().balance, None);
    }

    #[test]
    fn failed_reads_are_recorded() {
        let mut model = CounterReadModel::new(Some(Address::from(1)));
        model.refresh(&Flaky { counter: Ok(4) });
        assert_eq!(model.state(), &LoadState::Ready);
        assert_eq!(model.counter(), Some(4));
        assert_eq!(model.owner(), None);
        assert_eq!(model.balance(), Some(TokenAmount::from_tokens(3)));

        model.refresh(&Flaky {
            counter: Err(ChainError::Unavailable("rpc down".to_string())),
        });
        assert_eq!(
            model.state(),
            &LoadState::Failed("chain unavailable: rpc down".to_string())
        );
        // The last good value is kept for display.
        assert_eq!(model.counter(), Some(4));
    }

    #[test]
    fn switching_caller_drops_the_balance() {
        let mut model = CounterReadModel::new(Some(Address::from(1)));
        model.refresh(&Flaky { counter: Ok(0) });
        assert!(model.balance().is_some());

        model.set_caller(Some(Address::from(2)));
        assert_eq!(model.balance(), None);
    }
}
