// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::{TokenAmount, DECIMALS};
use crate::error::Error;

fn default_symbol() -> String {
    "STRK".to_string()
}

fn default_decimals() -> u8 {
    DECIMALS
}

fn default_payment() -> TokenAmount {
    TokenAmount::from_tokens(1)
}

/// Where the counter and payment token contracts live, and what a paid
/// action costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Deployment {
    /// Address of `CounterContract`.
    pub counter_address: Address,
    /// Address of the payment token.
    pub token_address: Address,
    /// Ticker shown to users.
    #[serde(default = "default_symbol")]
    pub token_symbol: String,
    /// Token precision. Only 18 is supported.
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Amount approved to the counter contract by a paid action.
    #[serde(default = "default_payment")]
    pub payment: TokenAmount,
}

impl Deployment {
    /// A deployment charging one whole token per paid action.
    #[must_use]
    pub fn new(counter_address: Address, token_address: Address) -> Self {
        Self {
            counter_address,
            token_address,
            token_symbol: default_symbol(),
            decimals: DECIMALS,
            payment: default_payment(),
        }
    }

    /// Checks the values that cannot be expressed in the type.
    ///
    /// # Errors
    ///
    /// Fails on unsupported precision, a zero payment, or a counter contract
    /// sharing the token's address.
    pub fn validate(&self) -> Result<(), Error> {
        if self.decimals != DECIMALS {
            return Err(Error::InvalidInput {
                input: self.decimals.to_string(),
                reason: "only 18-decimal payment tokens are supported",
            });
        }
        if self.payment.is_zero() {
            return Err(Error::InvalidAmount {
                input: self.payment.to_string(),
                reason: "payment must be greater than zero",
            });
        }
        if self.counter_address == self.token_address {
            return Err(Error::InvalidAddress {
                input: self.counter_address.to_string(),
                reason: "counter and token contracts must differ",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let deployment: Deployment = serde_json::from_value(serde_json::json!({
            "counter_address": "0x10",
            "token_address": "0x20",
        }))
        .expect("valid deployment");

        assert_eq!(deployment, Deployment::new(Address::from(16), Address::from(32)));
        deployment.validate().expect("defaults are valid");
    }

    #[test]
    fn rejects_other_precisions() {
        let mut deployment = Deployment::new(Address::from(1), Address::from(2));
        deployment.decimals = 6;
        let err = deployment.validate().expect_err("6 decimals unsupported");
        assert!(err.to_string().contains("18-decimal"));
    }
}
