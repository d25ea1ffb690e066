// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Per-action submission state.
//!
//! Each action kind has its own pending flag: while a submission is
//! outstanding that action cannot be triggered again, but the other actions
//! are unaffected. Failures are kept verbatim for display and are never
//! retried.

use std::collections::BTreeMap;

use crate::address::Address;
use crate::call::CallPlan;
use crate::chain::{TransactionSubmitter, TxReceipt};
use crate::error::{Error, Result};
use crate::policy::{ActionKind, ActionRequest, CounterActionPolicy, Decision, PolicyContext};

#[derive(Debug, Clone, Default)]
struct ActionSlot {
    pending: bool,
    last_error: Option<String>,
}

/// Proof that an action was started. Hand it back to
/// [`ActionController::finish`].
#[derive(Debug)]
#[must_use = "a started action stays pending until it is finished"]
pub struct Submission {
    action: ActionKind,
    plan: CallPlan,
}

impl Submission {
    /// The started action.
    #[must_use]
    pub fn action(&self) -> ActionKind {
        self.action
    }

    /// The plan to submit.
    #[must_use]
    pub fn plan(&self) -> &CallPlan {
        &self.plan
    }
}

/// Drives the idle → submitting → idle cycle of every action.
#[derive(Debug, Clone)]
pub struct ActionController {
    policy: CounterActionPolicy,
    slots: BTreeMap<ActionKind, ActionSlot>,
}

impl ActionController {
    /// A controller with every action idle.
    #[must_use]
    pub fn new(policy: CounterActionPolicy) -> Self {
        Self {
            policy,
            slots: BTreeMap::new(),
        }
    }

    /// Whether `action` has a submission outstanding.
    #[must_use]
    pub fn is_pending(&self, action: ActionKind) -> bool {
        self.slots.get(&action).is_some_and(|slot| slot.pending)
    }

    /// Failure message of the last settled submission of `action`.
    #[must_use]
    pub fn last_error(&self, action: ActionKind) -> Option<&str> {
        self.slots
            .get(&action)
            .and_then(|slot| slot.last_error.as_deref())
    }

    /// The policy decision, additionally disabled while the action is
    /// pending.
    #[must_use]
    pub fn evaluate(&self, request: &ActionRequest, ctx: &PolicyContext) -> Decision {
        let mut decision = self.policy.decide(request, ctx);
        if self.is_pending(decision.action) {
            decision.enabled = false;
            decision.label = format!("{}...", pending_label(decision.action));
        }
        decision
    }

    /// Marks `request` as submitting and returns the plan to send.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyPending`] while the same action is in flight, or the
    /// policy's blocker when the action is disabled.
    pub fn start(&mut self, request: &ActionRequest, ctx: &PolicyContext) -> Result<Submission> {
        let action = request.kind();
        if self.is_pending(action) {
            return Err(Error::AlreadyPending { action });
        }

        let plan = self.policy.decide(request, ctx).into_plan()?;
        let slot = self.slots.entry(action).or_default();
        slot.pending = true;
        slot.last_error = None;

        tracing::debug!(%action, %plan, "submission started");
        Ok(Submission { action, plan })
    }

    /// Returns the action to idle, recording the outcome.
    pub fn finish<T>(&mut self, submission: Submission, outcome: &Result<T>) {
        let Submission { action, plan } = submission;
        let slot = self.slots.entry(action).or_default();
        slot.pending = false;
        slot.last_error = outcome.as_ref().err().map(ToString::to_string);

        if let Some(err) = &slot.last_error {
            tracing::debug!(%action, %plan, "submission failed: {err}");
        }
    }

    /// Starts `request`, submits its plan as `sender`, waits for it to
    /// settle and finishes it.
    ///
    /// # Errors
    ///
    /// Everything [`ActionController::start`] rejects, plus
    /// [`Error::SubmissionFailed`] with the chain's failure.
    pub fn run<S: TransactionSubmitter + ?Sized>(
        &mut self,
        chain: &mut S,
        sender: &Address,
        request: &ActionRequest,
        ctx: &PolicyContext,
    ) -> Result<TxReceipt> {
        let submission = self.start(request, ctx)?;

        let outcome = chain
            .submit(sender, submission.plan())
            .and_then(|tx| chain.settle(&tx))
            .map_err(Error::from);

        self.finish(submission, &outcome);
        outcome
    }
}

fn pending_label(action: ActionKind) -> &'static str {
    match action {
        ActionKind::Increase => "Increasing",
        ActionKind::Decrease => "Decreasing",
        ActionKind::Reset => "Resetting",
        ActionKind::Set => "Setting",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ChainError, TxHash};
    use crate::config::Deployment;

    struct Rejecting;

    impl TransactionSubmitter for Rejecting {
        fn submit(&mut self, _sender: &Address, _plan: &CallPlan) -> std::result::Result<TxHash, ChainError> {
            Err(ChainError::Unavailable("signature rejected".to_string()))
        }

        fn settle(&mut self, tx: &TxHash) -> std::result::Result<TxReceipt, ChainError> {
            Err(ChainError::UnknownTransaction(*tx))
        }
    }

    fn controller() -> ActionController {
        ActionController::new(CounterActionPolicy::new(&Deployment::new(
            Address::from(0xc0),
            Address::from(0x57),
        )))
    }

    fn owner_ctx() -> PolicyContext {
        PolicyContext {
            caller: Some(Address::from(1)),
            owner: Some(Address::from(1)),
            counter: 3,
            balance: None,
        }
    }

    #[test]
    fn pending_action_cannot_start_twice() {
        let mut controller = controller();
        let ctx = owner_ctx();

        let submission = controller
            .start(&ActionRequest::Increase, &ctx)
            .expect("idle action starts");
        assert!(controller.is_pending(ActionKind::Increase));

        let decision = controller.evaluate(&ActionRequest::Increase, &ctx);
        assert!(!decision.enabled);
        assert_eq!(decision.label, "Increasing...");

        let err = controller
            .start(&ActionRequest::Increase, &ctx)
            .expect_err("second start refused");
        assert!(matches!(
            err,
            Error::AlreadyPending {
                action: ActionKind::Increase
            }
        ));

        // Other buttons are independent.
        let other = controller
            .start(&ActionRequest::Decrease, &ctx)
            .expect("decrease is idle");
        controller.finish(other, &Ok(()));

        controller.finish(submission, &Ok(()));
        assert!(!controller.is_pending(ActionKind::Increase));
        assert!(controller.evaluate(&ActionRequest::Increase, &ctx).enabled);
    }

    #[test]
    fn blocked_actions_never_become_pending() {
        let mut controller = controller();
        let ctx = PolicyContext {
            counter: 0,
            ..owner_ctx()
        };

        let err = controller
            .start(&ActionRequest::Reset, &ctx)
            .expect_err("nothing to reset");
        assert!(matches!(err, Error::NothingToChange { .. }));
        assert!(!controller.is_pending(ActionKind::Reset));
    }

    #[test]
    fn failures_are_kept_verbatim_and_release_the_action() {
        let mut controller = controller();
        let ctx = owner_ctx();

        let err = controller
            .run(&mut Rejecting, &Address::from(1), &ActionRequest::Reset, &ctx)
            .expect_err("submission rejected");
        assert!(matches!(err, Error::SubmissionFailed(_)));
        assert!(!controller.is_pending(ActionKind::Reset));
        assert_eq!(
            controller.last_error(ActionKind::Reset),
            Some("transaction failed: chain unavailable: signature rejected")
        );
    }
}
