// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Client-side toolkit for the `CounterContract` dApp.
//!
//! The heart of the crate is [`policy::CounterActionPolicy`], a pure function
//! of the caller, the contract owner, the counter value and the caller's
//! token balance that decides which contract calls a user action turns into
//! and whether the action may be triggered at all. Everything that talks to a
//! chain sits behind the traits in [`chain`]; [`devnet`] provides an
//! in-memory implementation of them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unused_must_use)]
#![deny(unused_extern_crates)]
#![deny(clippy::pedantic)]
#![warn(missing_debug_implementations, unreachable_pub, rustdoc::all)]

/// Account addresses.
pub mod address;
/// Fixed-point token amounts.
pub mod amount;
/// Contract calls and call plans.
pub mod call;
/// Chain collaborator traits.
pub mod chain;
/// Deployment configuration.
pub mod config;
/// Per-action submission state.
pub mod controller;
/// In-memory chain.
pub mod devnet;
/// Crate error types.
pub mod error;
/// Counter change events.
pub mod events;
/// Owner and payment rules for counter actions.
pub mod policy;
/// Read-only mirror of on-chain state.
pub mod read_model;

pub use address::Address;
pub use amount::TokenAmount;
pub use call::{CallPlan, ContractCall, Target};
pub use error::{Error, Result};
pub use policy::{ActionKind, ActionRequest, CounterActionPolicy, Decision, PolicyContext};
