// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Account addresses.
//!
//! Addresses are field elements. Wallets hand them out as zero-padded hex,
//! contract reads return them as decimal strings, so equality is defined on
//! the underlying integer rather than on the text.

use core::fmt;
use core::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// An account or contract address, normalized to its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(U256);

/// The Stark field prime `2^251 + 17 * 2^192 + 1`.
fn field_prime() -> U256 {
    (U256::from(1u8) << 251) + (U256::from(17u8) << 192) + U256::from(1u8)
}

impl Address {
    /// Builds an address from its integer value.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a valid field element.
    pub fn from_u256(value: U256) -> Result<Self, Error> {
        if value >= field_prime() {
            return Err(Error::InvalidAddress {
                input: value.to_string(),
                reason: "value exceeds the field prime",
            });
        }
        Ok(Self(value))
    }

    /// Returns the underlying integer.
    #[must_use]
    pub const fn as_u256(&self) -> U256 {
        self.0
    }

    /// Returns the decimal form used for owner comparisons.
    #[must_use]
    pub fn to_decimal_string(&self) -> String {
        self.0.to_string()
    }

    /// Returns the address as lowercase hex, zero-padded to 64 digits.
    #[must_use]
    pub fn to_padded_hex(&self) -> String {
        format!("0x{:0>64}", format!("{:x}", self.0))
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidAddress {
                input: s.to_string(),
                reason: "address is empty",
            });
        }

        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some("") => {
                return Err(Error::InvalidAddress {
                    input: s.to_string(),
                    reason: "missing hex digits after 0x",
                })
            }
            Some(hex) if hex.chars().all(|c| c.is_ascii_hexdigit()) => {
                U256::from_str_radix(hex, 16).ok()
            }
            None if trimmed.chars().all(|c| c.is_ascii_digit()) => {
                U256::from_str_radix(trimmed, 10).ok()
            }
            _ => None,
        };

        let value = parsed.ok_or_else(|| Error::InvalidAddress {
            input: s.to_string(),
            reason: "expected 0x-prefixed hex or decimal digits",
        })?;

        Self::from_u256(value).map_err(|_| Error::InvalidAddress {
            input: s.to_string(),
            reason: "value exceeds the field prime",
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_decimal_forms_are_equal() {
        let hex: Address = "0x1f".parse().expect("hex parses");
        let padded: Address = "0x000000000000001F".parse().expect("padded hex parses");
        let decimal: Address = "31".parse().expect("decimal parses");

        assert_eq!(hex, padded);
        assert_eq!(hex, decimal);
        assert_eq!(hex.to_decimal_string(), "31");
        assert_eq!(hex.to_string(), "0x1f");
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "   ", "0x", "0xzz", "12ab", "-1", "0x_1", "1_0", "+5"] {
            let err = input.parse::<Address>().expect_err("should be invalid");
            assert!(err.to_string().contains("invalid address"), "{input}: {err}");
        }
    }

    #[test]
    fn rejects_values_outside_the_field() {
        let err = Address::from_u256(field_prime()).expect_err("prime is out of range");
        assert!(err.to_string().contains("field prime"));

        let max = Address::from_u256(field_prime() - U256::from(1u8)).expect("p - 1 is valid");
        assert_eq!(max.to_padded_hex().len(), 66);
    }

    #[test]
    fn serde_uses_hex_text() {
        let address = Address::from(255);
        let json = serde_json::to_string(&address).expect("serialize");
        assert_eq!(json, "\"0xff\"");

        let back: Address = serde_json::from_str("\"255\"").expect("deserialize decimal");
        assert_eq!(back, address);
    }
}
