// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Read model, controller and devnet wired together the way a front-end
//! uses them.

use counter_dapp::chain::{ChainReader, EventHistory};
use counter_dapp::config::Deployment;
use counter_dapp::controller::ActionController;
use counter_dapp::devnet::Devnet;
use counter_dapp::events::{history, ChangeReason};
use counter_dapp::read_model::CounterReadModel;
use counter_dapp::{ActionRequest, Address, CounterActionPolicy, Error, TokenAmount};

const OWNER: u64 = 0x1;
const ALICE: u64 = 0xa11ce;

struct Harness {
    chain: Devnet,
    controller: ActionController,
}

fn harness() -> Harness {
    let deployment = Deployment::new(Address::from(0xc0), Address::from(0x57));
    let controller = ActionController::new(CounterActionPolicy::new(&deployment));
    let mut chain = Devnet::new(deployment, Address::from(OWNER));
    chain.mint(Address::from(ALICE), TokenAmount::from_tokens(2)).expect("mint");
    Harness { chain, controller }
}

impl Harness {
    fn act(&mut self, caller: u64, request: ActionRequest) -> Result<u64, Error> {
        let caller = Address::from(caller);
        let mut model = CounterReadModel::new(Some(caller));
        model.refresh(&self.chain);

        let receipt = self
            .controller
            .run(&mut self.chain, &caller, &request, &model.context())?;
        Ok(receipt.counter)
    }
}

#[test]
fn non_owner_walks_the_counter_down_and_pays_at_one() {
    let mut h = harness();

    assert_eq!(h.act(ALICE, ActionRequest::Increase).expect("increase"), 1);
    assert_eq!(h.act(ALICE, ActionRequest::Increase).expect("increase"), 2);
    assert_eq!(h.act(ALICE, ActionRequest::Decrease).expect("free decrease"), 1);
    assert_eq!(h.act(ALICE, ActionRequest::Decrease).expect("paid decrease"), 0);

    assert_eq!(
        h.chain.balance_of(&Address::from(ALICE)),
        Ok(TokenAmount::from_tokens(1))
    );
    assert_eq!(
        h.chain.balance_of(&Address::from(OWNER)),
        Ok(TokenAmount::from_tokens(1))
    );

    let reasons: Vec<_> = history(&h.chain.counter_changed_events(0).expect("history"))
        .into_iter()
        .map(|entry| entry.reason.expect("consistent reason"))
        .collect();
    assert_eq!(
        reasons,
        [
            ChangeReason::Increase,
            ChangeReason::Increase,
            ChangeReason::Decrease,
            ChangeReason::Decrease,
            ChangeReason::Reset,
        ]
    );
}

#[test]
fn broke_caller_is_stopped_before_submission() {
    let mut h = harness();
    h.act(OWNER, ActionRequest::set_to("1")).expect("owner sets");
    let blocks = h.chain.block_number();

    let err = h
        .act(0xb0b, ActionRequest::Decrease)
        .expect_err("bob holds no tokens");

    assert!(matches!(err, Error::InsufficientBalance { .. }));
    assert_eq!(h.chain.block_number(), blocks);
    assert_eq!(h.chain.get_counter(), Ok(1));
}

#[test]
fn owner_actions_are_free() {
    let mut h = harness();
    h.act(OWNER, ActionRequest::set_to("7")).expect("set");
    h.act(OWNER, ActionRequest::Decrease).expect("decrease");
    assert_eq!(h.act(OWNER, ActionRequest::Reset).expect("reset"), 0);

    assert_eq!(h.chain.balance_of(&Address::from(OWNER)), Ok(TokenAmount::ZERO));
    assert_eq!(h.chain.block_number(), 3);
}

#[test]
fn non_owner_set_is_refused_locally() {
    let mut h = harness();
    let err = h
        .act(ALICE, ActionRequest::set_to("9"))
        .expect_err("alice is not owner");

    assert_eq!(err.to_string(), "only the contract owner can set");
    assert_eq!(h.chain.block_number(), 0);
}
