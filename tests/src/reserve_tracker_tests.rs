//! Reserve tracker: pair registration and share-side reserve aggregation.

use odra::casper_types::U256;
use odra::host::{Deployer, HostRef};
use odra::prelude::Addressable;
use pretty_assertions::assert_eq;

use cspr_synth_contracts::errors::SynthError;
use cspr_synth_contracts::mocks::{MockPair, MockPairInitArgs};
use cspr_synth_contracts::reserve_tracker::{ReserveTracker, ReserveTrackerInitArgs, SharePairAdded};

use crate::common::{d18, deploy_token, wei, HALF};

struct Fixture {
    env: odra::host::HostEnv,
    owner: odra::prelude::Address,
    stranger: odra::prelude::Address,
    tracker: cspr_synth_contracts::reserve_tracker::ReserveTrackerHostRef,
    pair_share_usdc: cspr_synth_contracts::mocks::MockPairHostRef,
    pair_busd_share: cspr_synth_contracts::mocks::MockPairHostRef,
}

fn setup() -> Fixture {
    let env = odra_test::env();
    let owner = env.get_account(0);
    let stranger = env.get_account(1);

    env.set_caller(owner);
    let share = deploy_token(&env, "SHARE", d18(1_000_000));
    let usdc = deploy_token(&env, "USDC", d18(1_000_000));
    let busd = deploy_token(&env, "BUSD", d18(1_000_000));

    // Share on opposite sides of the two pairs
    let pair_share_usdc = MockPair::deploy(
        &env,
        MockPairInitArgs {
            token0: share.address(),
            token1: usdc.address(),
            reserve0: d18(1),
            reserve1: wei(HALF),
        },
    );
    let pair_busd_share = MockPair::deploy(
        &env,
        MockPairInitArgs {
            token0: busd.address(),
            token1: share.address(),
            reserve0: wei(HALF),
            reserve1: d18(1),
        },
    );

    let tracker = ReserveTracker::deploy(
        &env,
        ReserveTrackerInitArgs {
            share_token: share.address(),
        },
    );

    Fixture {
        env,
        owner,
        stranger,
        tracker,
        pair_share_usdc,
        pair_busd_share,
    }
}

#[test]
fn starts_with_zero_reserves() {
    let f = setup();
    assert_eq!(f.tracker.get_share_reserves(), U256::zero());
}

#[test]
fn only_maintainer_manages_pairs() {
    let mut f = setup();
    f.env.set_caller(f.stranger);

    assert_eq!(
        f.tracker.try_add_share_pair(f.pair_share_usdc.address()),
        Err(SynthError::NotMaintainer.into())
    );
    assert_eq!(
        f.tracker.try_remove_share_pair(f.pair_share_usdc.address()),
        Err(SynthError::NotMaintainer.into())
    );
}

#[test]
fn sums_the_share_side_of_each_pair() {
    let mut f = setup();
    f.env.set_caller(f.owner);

    f.tracker.add_share_pair(f.pair_share_usdc.address());
    assert_eq!(f.tracker.share_pair_at(0), Some(f.pair_share_usdc.address()));
    assert!(f.tracker.is_share_pair(f.pair_share_usdc.address()));
    assert_eq!(f.tracker.get_share_reserves(), d18(1));
    assert!(f
        .env
        .emitted_event(&f.tracker.address(), SharePairAdded {
            pair: f.pair_share_usdc.address(),
        }));

    f.tracker.add_share_pair(f.pair_busd_share.address());
    assert_eq!(f.tracker.share_pair_at(1), Some(f.pair_busd_share.address()));
    assert_eq!(f.tracker.get_share_reserves(), d18(2));
}

#[test]
fn rejects_duplicate_and_unknown_pairs() {
    let mut f = setup();
    f.env.set_caller(f.owner);

    f.tracker.add_share_pair(f.pair_share_usdc.address());
    assert_eq!(
        f.tracker.try_add_share_pair(f.pair_share_usdc.address()),
        Err(SynthError::DuplicateEntry.into())
    );
    assert_eq!(
        f.tracker.try_remove_share_pair(f.pair_busd_share.address()),
        Err(SynthError::UnknownEntry.into())
    );
}

#[test]
fn removal_clears_the_slot_without_compacting() {
    let mut f = setup();
    f.env.set_caller(f.owner);

    f.tracker.add_share_pair(f.pair_share_usdc.address());
    f.tracker.add_share_pair(f.pair_busd_share.address());
    f.tracker.remove_share_pair(f.pair_busd_share.address());

    assert!(!f.tracker.is_share_pair(f.pair_busd_share.address()));
    assert_eq!(f.tracker.share_pair_at(0), Some(f.pair_share_usdc.address()));
    assert_eq!(f.tracker.share_pair_at(1), None);
    assert_eq!(f.tracker.get_share_reserves(), d18(1));
}

#[test]
fn tracks_reserve_updates() {
    let mut f = setup();
    f.env.set_caller(f.owner);

    f.tracker.add_share_pair(f.pair_share_usdc.address());
    f.pair_share_usdc.set_reserves(d18(10_000), d18(5_000));
    assert_eq!(f.tracker.get_share_reserves(), d18(10_000));
}
