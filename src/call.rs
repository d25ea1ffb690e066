// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Contract calls and the ordered plans that bundle them into one
//! transaction.

use core::fmt;

use serde::Serialize;

use crate::address::Address;
use crate::amount::TokenAmount;
use crate::error::Error;

/// Which deployed contract a call is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The counter contract.
    Counter,
    /// The ERC-20 style payment token.
    PaymentToken,
}

impl Target {
    /// Contract name as registered with the deployment.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Counter => "CounterContract",
            Self::PaymentToken => "Strk",
        }
    }
}

/// A single entrypoint invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractCall {
    /// `CounterContract::increase_counter()`.
    IncreaseCounter,
    /// `CounterContract::decrease_counter()`.
    DecreaseCounter,
    /// `CounterContract::reset_counter()`.
    ResetCounter,
    /// `CounterContract::set_counter(value)`.
    SetCounter {
        /// New counter value.
        value: u64,
    },
    /// `Strk::approve(spender, amount)`.
    Approve {
        /// Account allowed to pull the tokens.
        spender: Address,
        /// Allowance granted.
        amount: TokenAmount,
    },
}

impl ContractCall {
    /// The contract this call goes to.
    #[must_use]
    pub fn target(&self) -> Target {
        match self {
            Self::Approve { .. } => Target::PaymentToken,
            _ => Target::Counter,
        }
    }

    /// The entrypoint name.
    #[must_use]
    pub fn entrypoint(&self) -> &'static str {
        match self {
            Self::IncreaseCounter => "increase_counter",
            Self::DecreaseCounter => "decrease_counter",
            Self::ResetCounter => "reset_counter",
            Self::SetCounter { .. } => "set_counter",
            Self::Approve { .. } => "approve",
        }
    }

    /// Flattened calldata, each element a decimal felt.
    ///
    /// `u256` amounts take two felts, low word first.
    #[must_use]
    pub fn calldata(&self) -> Vec<String> {
        match self {
            Self::IncreaseCounter | Self::DecreaseCounter | Self::ResetCounter => Vec::new(),
            Self::SetCounter { value } => vec![value.to_string()],
            Self::Approve { spender, amount } => {
                let (low, high) = amount.to_u256_words();
                vec![spender.to_decimal_string(), low.to_string(), high.to_string()]
            }
        }
    }
}

impl fmt::Display for ContractCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetCounter { value } => write!(f, "set_counter({value})"),
            Self::Approve { spender, amount } => write!(f, "approve({spender}, {amount})"),
            other => write!(f, "{}", other.entrypoint()),
        }
    }
}

impl Serialize for ContractCall {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire {
            contract: &'static str,
            entrypoint: &'static str,
            calldata: Vec<String>,
        }

        Wire {
            contract: self.target().name(),
            entrypoint: self.entrypoint(),
            calldata: self.calldata(),
        }
        .serialize(serializer)
    }
}

/// An ordered list of calls submitted as one atomic transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CallPlan(Vec<ContractCall>);

impl CallPlan {
    /// A plan with no calls.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// A plan with exactly one call.
    #[must_use]
    pub fn single(call: ContractCall) -> Self {
        Self(vec![call])
    }

    /// Number of calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the plan has no calls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entrypoint names, in submission order.
    #[must_use]
    pub fn entrypoints(&self) -> Vec<&'static str> {
        self.0.iter().map(ContractCall::entrypoint).collect()
    }

    /// Whether any call moves tokens.
    #[must_use]
    pub fn approves_tokens(&self) -> bool {
        self.0
            .iter()
            .any(|call| matches!(call, ContractCall::Approve { .. }))
    }

    /// Total allowance the plan grants through `approve` calls, `None` when
    /// it grants none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmountOverflow`] if the approved amounts do not fit
    /// in a `u256`.
    pub fn payment(&self) -> Result<Option<TokenAmount>, Error> {
        self.0
            .iter()
            .filter_map(|call| match call {
                ContractCall::Approve { amount, .. } => Some(*amount),
                _ => None,
            })
            .try_fold(None, |total: Option<TokenAmount>, amount| match total {
                None => Ok(Some(amount)),
                Some(total) => total
                    .checked_add(amount)
                    .map(Some)
                    .ok_or(Error::AmountOverflow),
            })
    }
}

impl<const N: usize> From<[ContractCall; N]> for CallPlan {
    fn from(calls: [ContractCall; N]) -> Self {
        Self(calls.into())
    }
}

impl<'a> IntoIterator for &'a CallPlan {
    type Item = &'a ContractCall;
    type IntoIter = core::slice::Iter<'a, ContractCall>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for CallPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(none)");
        }
        let rendered = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approve_calldata_splits_u256() {
        let call = ContractCall::Approve {
            spender: Address::from(0x42),
            amount: TokenAmount::from_tokens(1),
        };

        assert_eq!(call.target(), Target::PaymentToken);
        assert_eq!(
            call.calldata(),
            vec!["66", "1000000000000000000", "0"]
        );
    }

    #[test]
    fn plan_reports_payment_and_order() {
        let plan = CallPlan::from([
            ContractCall::DecreaseCounter,
            ContractCall::Approve {
                spender: Address::from(7),
                amount: TokenAmount::from_tokens(1),
            },
            ContractCall::ResetCounter,
        ]);

        assert_eq!(
            plan.entrypoints(),
            ["decrease_counter", "approve", "reset_counter"]
        );
        assert!(plan.approves_tokens());
        assert_eq!(
            plan.payment().expect("fits"),
            Some(TokenAmount::from_tokens(1))
        );
        assert_eq!(
            plan.to_string(),
            "decrease_counter -> approve(0x7, 1) -> reset_counter"
        );
        let free = CallPlan::single(ContractCall::IncreaseCounter);
        assert!(!free.approves_tokens());
        assert_eq!(free.payment().expect("fits"), None);
    }

    #[test]
    fn overflowing_approvals_are_an_error() {
        let huge = ContractCall::Approve {
            spender: Address::from(7),
            amount: TokenAmount::from_base_units(alloy_primitives::U256::MAX),
        };
        let plan = CallPlan::from([huge, huge]);

        assert!(matches!(plan.payment(), Err(Error::AmountOverflow)));
    }

    #[test]
    fn serializes_as_wire_calls() {
        let plan = CallPlan::single(ContractCall::SetCounter { value: 9 });
        let json = serde_json::to_value(&plan).expect("serialize");

        assert_eq!(
            json,
            serde_json::json!([{
                "contract": "CounterContract",
                "entrypoint": "set_counter",
                "calldata": ["9"],
            }])
        );
    }
}
