// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Owner and payment rules for mutating the counter.
//!
//! The owner may decrease, reset and set the counter for free. Anyone else
//! can decrease it for free unless it sits at 1, in which case the decrease
//! is bundled with a paid reset; a reset by anyone else always costs the
//! configured payment, approved to the counter contract in the same
//! transaction. Only the owner may set an arbitrary value.
//!
//! Nothing here performs I/O: [`CounterActionPolicy::decide`] is a pure
//! function of the request and a [`PolicyContext`] snapshot.

use core::fmt;

use serde::Serialize;

use crate::address::Address;
use crate::amount::TokenAmount;
use crate::call::{CallPlan, ContractCall};
use crate::config::Deployment;
use crate::error::Error;

/// The four user actions, independent of their arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Add one.
    Increase,
    /// Subtract one.
    Decrease,
    /// Return to zero.
    Reset,
    /// Jump to a chosen value.
    Set,
}

impl ActionKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 4] = [Self::Increase, Self::Decrease, Self::Set, Self::Reset];
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Reset => "reset",
            Self::Set => "set",
        })
    }
}

/// A user action, built per click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    /// Increase the counter by one.
    Increase,
    /// Decrease the counter by one.
    Decrease,
    /// Reset the counter to zero.
    Reset,
    /// Set the counter to the value typed by the user. The text is validated
    /// by the policy.
    SetTo(String),
}

impl ActionRequest {
    /// Convenience constructor for [`ActionRequest::SetTo`].
    #[must_use]
    pub fn set_to(input: impl Into<String>) -> Self {
        Self::SetTo(input.into())
    }

    /// The action kind.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Increase => ActionKind::Increase,
            Self::Decrease => ActionKind::Decrease,
            Self::Reset => ActionKind::Reset,
            Self::SetTo(_) => ActionKind::Set,
        }
    }
}

/// Everything the policy looks at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PolicyContext {
    /// Connected account, `None` while no wallet is connected.
    pub caller: Option<Address>,
    /// Contract owner, `None` until it has been read.
    pub owner: Option<Address>,
    /// Current counter value.
    pub counter: u64,
    /// Caller's payment-token balance, `None` while loading.
    pub balance: Option<TokenAmount>,
}

impl PolicyContext {
    /// Whether the caller is the contract owner.
    ///
    /// Unknown values on either side never match.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        matches!((self.caller, self.owner), (Some(caller), Some(owner)) if caller == owner)
    }
}

/// Why an action cannot be triggered right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Blocker {
    /// The counter is at zero.
    NothingToChange,
    /// The set value is not a non-negative integer.
    InvalidInput {
        /// Text the user entered.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Only the owner may do this.
    NotAuthorized,
    /// The caller cannot cover the payment.
    InsufficientBalance {
        /// Amount the plan approves.
        required: TokenAmount,
        /// Caller's balance.
        available: TokenAmount,
    },
    /// The caller's balance has not been read yet.
    BalanceUnavailable,
}

impl Blocker {
    /// Converts into the crate error for `action`.
    #[must_use]
    pub fn into_error(self, action: ActionKind) -> Error {
        match self {
            Self::NothingToChange => Error::NothingToChange { action },
            Self::InvalidInput { input, reason } => Error::InvalidInput { input, reason },
            Self::NotAuthorized => Error::NotAuthorized { action },
            Self::InsufficientBalance {
                required,
                available,
            } => Error::InsufficientBalance {
                required,
                available,
            },
            Self::BalanceUnavailable => Error::BalanceUnavailable,
        }
    }
}

/// The outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// The evaluated action.
    pub action: ActionKind,
    /// Whether the caller may perform the action without paying.
    pub authorized: bool,
    /// Calls to submit, in order. Empty when no plan could be built.
    pub plan: CallPlan,
    /// Whether the trigger should be enabled.
    pub enabled: bool,
    /// Why the policy disabled the action, if it did.
    pub blocker: Option<Blocker>,
    /// One-line description of what the action will do.
    pub explanation: String,
    /// Caption for the trigger.
    pub label: String,
}

impl Decision {
    /// Whether the plan moves tokens.
    #[must_use]
    pub fn requires_payment(&self) -> bool {
        self.plan.approves_tokens()
    }

    /// Returns the plan if the action may be triggered.
    ///
    /// # Errors
    ///
    /// Returns the blocker as an [`Error`] when the action is disabled.
    pub fn into_plan(self) -> Result<CallPlan, Error> {
        match self.blocker {
            None => Ok(self.plan),
            Some(blocker) => Err(blocker.into_error(self.action)),
        }
    }
}

/// Parses the text typed into the set field.
///
/// Accepts surrounding whitespace and nothing else: no signs, no fractions,
/// no trailing garbage.
///
/// # Errors
///
/// Returns [`Blocker::InvalidInput`] for anything but a non-negative
/// integer that fits in `u64`.
pub fn parse_counter_value(input: &str) -> Result<u64, Blocker> {
    let invalid = |reason| Blocker::InvalidInput {
        input: input.to_string(),
        reason,
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid("enter a number"));
    }
    if let Some(rest) = trimmed.strip_prefix('-') {
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("value must not be negative"));
        }
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("value must be a whole number"));
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| invalid("value is too large"))
}

/// Computes call plans and trigger state for counter actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterActionPolicy {
    counter_address: Address,
    payment: TokenAmount,
    symbol: String,
}

impl CounterActionPolicy {
    /// Builds the policy for a deployment.
    #[must_use]
    pub fn new(deployment: &Deployment) -> Self {
        Self {
            counter_address: deployment.counter_address,
            payment: deployment.payment,
            symbol: deployment.token_symbol.clone(),
        }
    }

    /// Evaluates `request` against `ctx`.
    #[must_use]
    pub fn decide(&self, request: &ActionRequest, ctx: &PolicyContext) -> Decision {
        match request {
            ActionRequest::Increase => Self::increase(),
            ActionRequest::Decrease => self.decrease(ctx),
            ActionRequest::Reset => self.reset(ctx),
            ActionRequest::SetTo(input) => Self::set(input, ctx),
        }
    }

    /// Evaluates every action, with `set_input` as the set field's text.
    #[must_use]
    pub fn decide_all(&self, set_input: &str, ctx: &PolicyContext) -> Vec<Decision> {
        ActionKind::ALL
            .iter()
            .map(|kind| {
                let request = match kind {
                    ActionKind::Increase => ActionRequest::Increase,
                    ActionKind::Decrease => ActionRequest::Decrease,
                    ActionKind::Reset => ActionRequest::Reset,
                    ActionKind::Set => ActionRequest::set_to(set_input),
                };
                self.decide(&request, ctx)
            })
            .collect()
    }

    fn increase() -> Decision {
        Decision {
            action: ActionKind::Increase,
            authorized: true,
            plan: CallPlan::single(ContractCall::IncreaseCounter),
            enabled: true,
            blocker: None,
            explanation: "increase the counter by 1".to_string(),
            label: "Increase Counter".to_string(),
        }
    }

    fn decrease(&self, ctx: &PolicyContext) -> Decision {
        let is_owner = ctx.is_owner();

        if ctx.counter == 0 {
            return Decision {
                action: ActionKind::Decrease,
                authorized: true,
                plan: CallPlan::empty(),
                enabled: false,
                blocker: Some(Blocker::NothingToChange),
                explanation: "counter is already at 0".to_string(),
                label: "Decrease Counter".to_string(),
            };
        }

        if is_owner {
            return Decision {
                action: ActionKind::Decrease,
                authorized: true,
                plan: CallPlan::single(ContractCall::DecreaseCounter),
                enabled: true,
                blocker: None,
                explanation: "decrease the counter by 1 (free for owner)".to_string(),
                label: "Decrease Counter (Free)".to_string(),
            };
        }

        if ctx.counter == 1 {
            // Going from 1 to 0 as a non-owner also pays for the reset.
            let plan = CallPlan::from([
                ContractCall::DecreaseCounter,
                self.approve(),
                ContractCall::ResetCounter,
            ]);
            let blocker = self.payment_blocker(ctx);
            return Decision {
                action: ActionKind::Decrease,
                authorized: false,
                plan,
                enabled: blocker.is_none(),
                blocker,
                explanation: format!(
                    "decreasing from 1 resets the counter to 0 and costs {} {}",
                    self.payment, self.symbol
                ),
                label: format!(
                    "Decrease Counter (Reset + {} {})",
                    self.payment, self.symbol
                ),
            };
        }

        Decision {
            action: ActionKind::Decrease,
            authorized: true,
            plan: CallPlan::single(ContractCall::DecreaseCounter),
            enabled: true,
            blocker: None,
            explanation: "decrease the counter by 1 (no payment required)".to_string(),
            label: "Decrease Counter".to_string(),
        }
    }

    fn reset(&self, ctx: &PolicyContext) -> Decision {
        let is_owner = ctx.is_owner();

        let (plan, blocker, explanation, label) = if is_owner {
            (
                CallPlan::single(ContractCall::ResetCounter),
                None,
                "reset the counter to 0 (free for owner)".to_string(),
                "Reset Counter (Free)".to_string(),
            )
        } else {
            (
                CallPlan::from([self.approve(), ContractCall::ResetCounter]),
                self.payment_blocker(ctx),
                format!(
                    "reset the counter to 0 (requires {} {} payment)",
                    self.payment, self.symbol
                ),
                format!("Reset Counter ({} {})", self.payment, self.symbol),
            )
        };

        // A zero counter outranks any payment problem.
        let blocker = if ctx.counter == 0 {
            Some(Blocker::NothingToChange)
        } else {
            blocker
        };

        Decision {
            action: ActionKind::Reset,
            authorized: is_owner,
            plan,
            enabled: blocker.is_none(),
            blocker,
            explanation,
            label,
        }
    }

    fn set(input: &str, ctx: &PolicyContext) -> Decision {
        let is_owner = ctx.is_owner();
        let rejected = |blocker, explanation: &str| Decision {
            action: ActionKind::Set,
            authorized: is_owner,
            plan: CallPlan::empty(),
            enabled: false,
            blocker: Some(blocker),
            explanation: explanation.to_string(),
            label: "Set Counter".to_string(),
        };

        let value = match parse_counter_value(input) {
            Ok(value) => value,
            Err(blocker) => {
                return rejected(blocker, "please enter a valid non-negative number");
            }
        };

        if !is_owner {
            return rejected(
                Blocker::NotAuthorized,
                "only the owner can set the counter value",
            );
        }

        Decision {
            action: ActionKind::Set,
            authorized: true,
            plan: CallPlan::single(ContractCall::SetCounter { value }),
            enabled: true,
            blocker: None,
            explanation: format!("set the counter to {value}"),
            label: "Set Counter".to_string(),
        }
    }

    fn approve(&self) -> ContractCall {
        ContractCall::Approve {
            spender: self.counter_address,
            amount: self.payment,
        }
    }

    fn payment_blocker(&self, ctx: &PolicyContext) -> Option<Blocker> {
        match ctx.balance {
            None => Some(Blocker::BalanceUnavailable),
            Some(balance) if balance < self.payment => Some(Blocker::InsufficientBalance {
                required: self.payment,
                available: balance,
            }),
            Some(_) => None,
        }
    }
}
