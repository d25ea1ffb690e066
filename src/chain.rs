// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Seams to the chain client.
//!
//! Reading contract state, submitting transactions and fetching event
//! history belong to whatever client the front-end is wired to. The rest of
//! the crate only sees these traits.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;
use crate::amount::TokenAmount;
use crate::call::CallPlan;
use crate::events::RawCounterChanged;

/// Hash identifying a submitted transaction.
pub type TxHash = B256;

/// Failures reported by a chain collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// A call in the bundle reverted, so none of it was applied.
    #[error("{entrypoint} reverted: {reason}")]
    Reverted {
        /// Entrypoint that failed.
        entrypoint: &'static str,
        /// Revert reason.
        reason: String,
    },

    /// The hash does not name a pending transaction.
    #[error("unknown transaction {0}")]
    UnknownTransaction(TxHash),

    /// The client could not reach the chain or refused the request.
    #[error("chain unavailable: {0}")]
    Unavailable(String),
}

/// Settled transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash.
    pub hash: TxHash,
    /// Block the transaction was included in.
    pub block_number: u64,
    /// Number of calls executed.
    pub calls: usize,
    /// Counter value after the transaction.
    pub counter: u64,
}

/// Read access to contract state.
pub trait ChainReader {
    /// `CounterContract::get_counter()`.
    ///
    /// # Errors
    ///
    /// Fails when the chain cannot be read.
    fn get_counter(&self) -> Result<u64, ChainError>;

    /// `CounterContract::owner()`.
    ///
    /// # Errors
    ///
    /// Fails when the chain cannot be read.
    fn owner(&self) -> Result<Address, ChainError>;

    /// Payment-token balance of `account`.
    ///
    /// # Errors
    ///
    /// Fails when the chain cannot be read.
    fn balance_of(&self, account: &Address) -> Result<TokenAmount, ChainError>;
}

/// Submission of call plans as single transactions.
///
/// All calls of a plan succeed together or the whole transaction fails.
pub trait TransactionSubmitter {
    /// Signs and sends `plan` on behalf of `sender`, returning a pending
    /// handle.
    ///
    /// # Errors
    ///
    /// Fails when the transaction cannot be sent.
    fn submit(&mut self, sender: &Address, plan: &CallPlan) -> Result<TxHash, ChainError>;

    /// Waits for a pending transaction to settle.
    ///
    /// # Errors
    ///
    /// Returns the structured failure if the transaction reverted.
    fn settle(&mut self, tx: &TxHash) -> Result<TxReceipt, ChainError>;
}

/// Access to past `CounterChanged` events.
pub trait EventHistory {
    /// Events emitted at or after `from_block`, oldest first.
    ///
    /// # Errors
    ///
    /// Fails when the history cannot be fetched.
    fn counter_changed_events(&self, from_block: u64) -> Result<Vec<RawCounterChanged>, ChainError>;
}
