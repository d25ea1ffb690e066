// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use thiserror::Error;

use crate::amount::TokenAmount;
use crate::chain::ChainError;
use crate::policy::ActionKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the policy, the controller and the value parsers.
#[derive(Debug, Error)]
pub enum Error {
    /// User input could not be turned into a valid request.
    #[error("invalid input '{input}': {reason}")]
    InvalidInput {
        /// The rejected input text.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The caller is not allowed to perform the action.
    #[error("only the contract owner can {action}")]
    NotAuthorized {
        /// The refused action.
        action: ActionKind,
    },

    /// The caller cannot cover the payment the plan requires.
    #[error("insufficient balance: {required} required, {available} available")]
    InsufficientBalance {
        /// Amount the plan approves.
        required: TokenAmount,
        /// Caller balance at evaluation time.
        available: TokenAmount,
    },

    /// The caller balance has not been loaded yet.
    #[error("balance is still loading")]
    BalanceUnavailable,

    /// The counter is already at zero.
    #[error("counter is already at 0, nothing to {action}")]
    NothingToChange {
        /// The refused action.
        action: ActionKind,
    },

    /// A submission for this action is already in flight.
    #[error("a {action} transaction is already pending")]
    AlreadyPending {
        /// The busy action.
        action: ActionKind,
    },

    /// The chain rejected or failed the submission.
    #[error("transaction failed: {0}")]
    SubmissionFailed(#[from] ChainError),

    /// An address could not be parsed.
    #[error("invalid address '{input}': {reason}")]
    InvalidAddress {
        /// The rejected text.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A token amount could not be parsed.
    #[error("invalid token amount '{input}': {reason}")]
    InvalidAmount {
        /// The rejected text.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A sum of token amounts does not fit in a `u256`.
    #[error("token amount overflows a u256")]
    AmountOverflow,

    /// A change event names a reason outside the known set.
    #[error("unknown change reason '{0}'")]
    UnknownReason(String),

    /// A change event has more than one active reason tag.
    #[error("ambiguous change reason: {} are all active", .0.join(", "))]
    AmbiguousReason(Vec<String>),

    /// A change event has no reason tag at all.
    #[error("change event carries no reason")]
    MissingReason,
}
