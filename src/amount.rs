// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Fixed-point token amounts with 18 fractional digits.

use core::fmt;
use core::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Number of fractional decimal digits of the payment token.
pub const DECIMALS: u8 = 18;

/// A non-negative token quantity, stored in base units (`10^-18` tokens).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenAmount(U256);

fn scale() -> U256 {
    U256::from(10u8).pow(U256::from(DECIMALS))
}

impl TokenAmount {
    /// No tokens.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wraps a raw base-unit value.
    #[must_use]
    pub const fn from_base_units(units: U256) -> Self {
        Self(units)
    }

    /// `tokens * 10^18` base units.
    #[must_use]
    pub fn from_tokens(tokens: u64) -> Self {
        Self(U256::from(tokens) * scale())
    }

    /// Raw base units.
    #[must_use]
    pub const fn base_units(&self) -> U256 {
        self.0
    }

    /// Splits the base units into the `(low, high)` 128-bit halves of a
    /// Cairo `u256`.
    #[must_use]
    pub fn to_u256_words(&self) -> (u128, u128) {
        let limbs = self.0.as_limbs();
        let low = u128::from(limbs[0]) | (u128::from(limbs[1]) << 64);
        let high = u128::from(limbs[2]) | (u128::from(limbs[3]) << 64);
        (low, high)
    }

    /// Adds two amounts, `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Subtracts two amounts, `None` if `rhs` is larger.
    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Whether this amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for TokenAmount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| Error::InvalidAmount {
            input: s.to_string(),
            reason,
        };

        let trimmed = s.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("amount is empty"));
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected decimal digits with an optional '.'"));
        }
        if fraction.len() > usize::from(DECIMALS) {
            return Err(invalid("more than 18 fractional digits"));
        }

        let whole = if whole.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(whole, 10).map_err(|_| invalid("amount is too large"))?
        };
        let padded = format!("{fraction:0<width$}", width = usize::from(DECIMALS));
        let fraction =
            U256::from_str_radix(&padded, 10).map_err(|_| invalid("amount is too large"))?;

        whole
            .checked_mul(scale())
            .and_then(|units| units.checked_add(fraction))
            .map(Self)
            .ok_or_else(|| invalid("amount is too large"))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, fraction) = self.0.div_rem(scale());
        if fraction.is_zero() {
            return write!(f, "{whole}");
        }
        let digits = format!("{:0>width$}", fraction.to_string(), width = usize::from(DECIMALS));
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
