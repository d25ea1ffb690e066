// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! `CounterChanged` events.
//!
//! Event decoders hand the Cairo `reason` enum over as a map from every
//! variant name to a payload, with inactive variants left empty. Exactly one
//! variant is expected to be active.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::Address;
use crate::error::Error;

/// Why the counter changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeReason {
    /// `increase_counter`.
    Increase,
    /// `decrease_counter`.
    Decrease,
    /// `reset_counter`.
    Reset,
    /// `set_counter`.
    Set,
}

impl ChangeReason {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 4] = [Self::Increase, Self::Decrease, Self::Reset, Self::Set];

    /// Variant name as emitted by the contract.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Increase => "Increase",
            Self::Decrease => "Decrease",
            Self::Reset => "Reset",
            Self::Set => "Set",
        }
    }

    fn from_name(name: &str) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|reason| reason.name() == name)
            .ok_or_else(|| Error::UnknownReason(name.to_string()))
    }
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded `reason` field, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawReason {
    /// Variant name to payload. Inactive variants map to `null`.
    pub variant: BTreeMap<String, Value>,
}

fn is_active(payload: &Value) -> bool {
    !matches!(payload, Value::Null | Value::Bool(false))
}

impl RawReason {
    /// Resolves the single active variant.
    ///
    /// A lone key is taken as active whatever its payload.
    ///
    /// # Errors
    ///
    /// [`Error::MissingReason`] when nothing is active,
    /// [`Error::AmbiguousReason`] when several variants are, and
    /// [`Error::UnknownReason`] for a name outside [`ChangeReason`].
    pub fn resolve(&self) -> Result<ChangeReason, Error> {
        let active: Vec<&str> = self
            .variant
            .iter()
            .filter(|(_, payload)| is_active(payload))
            .map(|(name, _)| name.as_str())
            .collect();

        match active.as_slice() {
            [name] => ChangeReason::from_name(name),
            [] if self.variant.len() == 1 => {
                let name = self.variant.keys().next().map_or("", String::as_str);
                ChangeReason::from_name(name)
            }
            [] => Err(Error::MissingReason),
            many => Err(Error::AmbiguousReason(
                many.iter().map(ToString::to_string).collect(),
            )),
        }
    }
}

impl From<ChangeReason> for RawReason {
    fn from(reason: ChangeReason) -> Self {
        let variant = ChangeReason::ALL
            .into_iter()
            .map(|candidate| {
                let payload = if candidate == reason {
                    Value::Object(serde_json::Map::new())
                } else {
                    Value::Null
                };
                (candidate.name().to_string(), payload)
            })
            .collect();
        Self { variant }
    }
}

/// A `CounterChanged` event as returned by the event history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCounterChanged {
    /// Block that emitted the event.
    pub block_number: u64,
    /// Account that triggered the change.
    pub caller: Address,
    /// Value before the change.
    pub old_value: u64,
    /// Value after the change.
    pub new_value: u64,
    /// Tagged reason.
    pub reason: RawReason,
}

/// One row of the rendered history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Block that emitted the event.
    pub block_number: u64,
    /// Account that triggered the change.
    pub caller: Address,
    /// Value before the change.
    pub old_value: u64,
    /// Value after the change.
    pub new_value: u64,
    /// Resolved reason, `None` if the payload was inconsistent.
    pub reason: Option<ChangeReason>,
}

impl HistoryEntry {
    /// Reason text for display.
    #[must_use]
    pub fn reason_label(&self) -> &'static str {
        self.reason.map_or("unknown", ChangeReason::name)
    }
}

/// Resolves every event, logging the ones whose reason is inconsistent
/// instead of guessing.
#[must_use]
pub fn history(events: &[RawCounterChanged]) -> Vec<HistoryEntry> {
    events
        .iter()
        .map(|event| {
            let reason = match event.reason.resolve() {
                Ok(reason) => Some(reason),
                Err(err) => {
                    tracing::warn!(
                        block = event.block_number,
                        caller = %event.caller,
                        "counter change event with inconsistent reason: {err}"
                    );
                    None
                }
            };
            HistoryEntry {
                block_number: event.block_number,
                caller: event.caller,
                old_value: event.old_value,
                new_value: event.new_value,
                reason,
            }
        })
        .collect()
}
