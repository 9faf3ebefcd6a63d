//! Synth pool: ratio-gated minting and redeeming, fees, action delay,
//! and profit/penalty settlement against the mint basis.

use odra::casper_types::U256;
use odra::host::HostRef;
use odra::prelude::Addressable;
use pretty_assertions::assert_eq;

use cspr_synth_contracts::errors::SynthError;
use cspr_synth_contracts::synth_pool::{Minted, Profited, Redeemed};

use crate::common::{d18, one, setup, tick, wei, HALF};

const PCT_1: u128 = 10_000_000_000_000_000;

#[test]
fn starts_with_zero_fees_and_a_minimal_delay() {
    let p = setup();
    assert_eq!(p.pool.minting_fee(), U256::zero());
    assert_eq!(p.pool.redemption_fee(), U256::zero());
    assert_eq!(p.pool.action_delay(), 1);
    assert!(!p.pool.mint_paused());
    assert!(!p.pool.redeem_paused());
}

#[test]
fn mint_1t1_swaps_collateral_for_synth_at_par() {
    let mut p = setup();
    p.env.set_caller(p.owner);
    p.usdc.transfer(p.user, d18(100));

    p.env.set_caller(p.user);
    p.usdc.approve(p.pool.address(), d18(100));
    tick(&p.env);
    let out = p.pool.mint_1t1(d18(100), d18(100));

    assert_eq!(out, d18(100));
    assert_eq!(p.synth.balance_of(p.user), d18(100));
    assert_eq!(p.usdc.balance_of(p.reserve.address()), d18(100));
    assert_eq!(p.pool.basis_price(p.user), one());
    assert_eq!(p.pool.basis_amount(p.user), d18(100));
    assert!(p.env.emitted_event(
        &p.pool.address(),
        Minted {
            caller: p.user,
            collateral_in: d18(100),
            share_in: U256::zero(),
            synth_out: d18(100),
        }
    ));
}

#[test]
fn mint_1t1_requires_full_collateralization_target() {
    let mut p = setup();
    p.force_tcr(wei(HALF));
    p.env.set_caller(p.user);
    tick(&p.env);
    assert_eq!(
        p.pool.try_mint_1t1(d18(100), U256::zero()),
        Err(SynthError::RatioNotOne.into())
    );
}

#[test]
fn actions_are_paused_zero_and_delay_checked() {
    let mut p = setup();
    p.env.set_caller(p.owner);
    p.usdc.transfer(p.user, d18(100));
    p.pool.toggle_minting();

    p.env.set_caller(p.user);
    tick(&p.env);
    assert_eq!(
        p.pool.try_mint_1t1(d18(100), U256::zero()),
        Err(SynthError::MintingPaused.into())
    );

    p.env.set_caller(p.owner);
    p.pool.toggle_minting();

    p.env.set_caller(p.user);
    assert_eq!(
        p.pool.try_mint_1t1(U256::zero(), U256::zero()),
        Err(SynthError::ZeroAmount.into())
    );

    p.usdc.approve(p.pool.address(), d18(100));
    p.pool.mint_1t1(d18(50), U256::zero());
    // Second action in the same block trips the per-user delay
    assert_eq!(
        p.pool.try_mint_1t1(d18(50), U256::zero()),
        Err(SynthError::ActionDelayNotPassed.into())
    );
    tick(&p.env);
    p.pool.mint_1t1(d18(50), U256::zero());
}

#[test]
fn minting_fee_accrues_in_the_pool_until_swept() {
    let mut p = setup();
    p.env.set_caller(p.owner);
    p.pool.set_minting_fee(wei(PCT_1));
    p.usdc.transfer(p.user, d18(100));

    p.env.set_caller(p.user);
    p.usdc.approve(p.pool.address(), d18(100));
    tick(&p.env);
    let out = p.pool.mint_1t1(d18(100), U256::zero());

    assert_eq!(out, d18(99));
    assert_eq!(p.usdc.balance_of(p.reserve.address()), d18(99));
    assert_eq!(p.usdc.balance_of(p.pool.address()), d18(1));

    let before = p.usdc.balance_of(p.owner);
    p.env.set_caller(p.owner);
    p.pool.withdraw_fee();
    assert_eq!(p.usdc.balance_of(p.owner), before + d18(1));
    assert_eq!(p.usdc.balance_of(p.pool.address()), U256::zero());
}

#[test]
fn round_trip_at_nonzero_fees_returns_the_net_of_both() {
    let mut p = setup();
    p.env.set_caller(p.owner);
    p.pool.set_minting_fee(wei(PCT_1));
    p.pool.set_redemption_fee(wei(PCT_1));
    p.usdc.transfer(p.user, d18(100));

    p.env.set_caller(p.user);
    p.usdc.approve(p.pool.address(), d18(100));
    tick(&p.env);
    let out = p.pool.mint_1t1(d18(100), U256::zero());

    // 1 of the 100 stays in the pool; 99 backs 99 synth at par
    assert_eq!(out, d18(99));
    assert_eq!(p.usdc.balance_of(p.reserve.address()), d18(99));
    assert_eq!(p.reserve.get_ecr(), one());

    tick(&p.env);
    p.pool.redeem_1t1(d18(99), U256::zero());

    // 99 gross, 0.99 of it routed to the pool
    assert_eq!(p.usdc.balance_of(p.user), wei(98_010_000_000_000_000_000));
    assert_eq!(p.synth.balance_of(p.user), U256::zero());
    assert_eq!(
        p.usdc.balance_of(p.pool.address()),
        wei(1_990_000_000_000_000_000)
    );
    assert_eq!(p.usdc.balance_of(p.reserve.address()), U256::zero());

    p.env.set_caller(p.owner);
    let before = p.usdc.balance_of(p.owner);
    p.pool.withdraw_fee();
    assert_eq!(
        p.usdc.balance_of(p.owner),
        before + wei(1_990_000_000_000_000_000)
    );
}

#[test]
fn share_redemption_fee_is_minted_to_the_pool() {
    let mut p = setup();
    p.env.set_caller(p.owner);
    p.pool.set_redemption_fee(wei(PCT_1));
    p.synth.mint(p.user, d18(5));

    p.env.set_caller(p.user);
    tick(&p.env);
    p.pool.redeem_algorithmic(d18(1), U256::zero());

    assert_eq!(p.share.balance_of(p.user), wei(990_000_000_000_000_000));
    assert_eq!(
        p.share.balance_of(p.pool.address()),
        wei(10_000_000_000_000_000)
    );
}

#[test]
fn mint_1t1_honors_the_slippage_floor() {
    let mut p = setup();
    p.env.set_caller(p.owner);
    p.usdc.transfer(p.user, d18(100));

    p.env.set_caller(p.user);
    p.usdc.approve(p.pool.address(), d18(100));
    tick(&p.env);
    assert_eq!(
        p.pool.try_mint_1t1(d18(100), d18(101)),
        Err(SynthError::SlippageLimitReached.into())
    );
}

#[test]
fn mint_algorithmic_burns_share_for_synth() {
    let mut p = setup();
    p.force_tcr(U256::zero());
    p.env.set_caller(p.owner);
    p.synth_oracle.set_price(p.synth.address(), d18(2));
    p.share.transfer(p.user, d18(10));

    let supply_before = p.share.total_supply();
    p.env.set_caller(p.user);
    tick(&p.env);
    let out = p.pool.mint_algorithmic(d18(2), d18(1));

    // $2 of share buys one synth at $2
    assert_eq!(out, d18(1));
    assert_eq!(p.synth.balance_of(p.user), d18(1));
    assert_eq!(p.share.total_supply(), supply_before - d18(2));
    assert_eq!(p.pool.basis_price(p.user), d18(2));

    tick(&p.env);
    assert_eq!(
        p.pool.try_mint_1t1(d18(1), U256::zero()),
        Err(SynthError::RatioNotOne.into())
    );
}

#[test]
fn mint_algorithmic_requires_a_zero_target() {
    let mut p = setup();
    p.env.set_caller(p.user);
    tick(&p.env);
    assert_eq!(
        p.pool.try_mint_algorithmic(d18(1), U256::zero()),
        Err(SynthError::RatioNotZero.into())
    );
}

#[test]
fn mint_fractional_takes_the_exact_collateral_share_mix() {
    let mut p = setup();
    p.force_tcr(wei(HALF));
    p.env.set_caller(p.owner);
    p.share_oracle.set_price(p.share.address(), wei(HALF));
    p.usdc.transfer(p.user, d18(10));
    p.share.transfer(p.user, d18(10));

    p.env.set_caller(p.user);
    p.usdc.approve(p.pool.address(), d18(10));
    tick(&p.env);

    // $0.50 of collateral at TCR 0.5 demands $0.50 of share: one
    // share at $0.50, nothing else accepted.
    assert_eq!(
        p.pool.try_mint_fractional(wei(HALF), d18(2), U256::zero()),
        Err(SynthError::CollateralMixMismatch.into())
    );

    let out = p.pool.mint_fractional(wei(HALF), d18(1), d18(1));
    assert_eq!(out, d18(1));
    assert_eq!(p.synth.balance_of(p.user), d18(1));
    assert_eq!(p.usdc.balance_of(p.reserve.address()), wei(HALF));
    assert_eq!(p.share.balance_of(p.user), d18(9));
}

#[test]
fn mint_fractional_rejects_the_ratio_extremes() {
    let mut p = setup();
    p.env.set_caller(p.user);
    tick(&p.env);
    assert_eq!(
        p.pool.try_mint_fractional(d18(1), d18(1), U256::zero()),
        Err(SynthError::RatioNotFractional.into())
    );

    p.force_tcr(U256::zero());
    p.env.set_caller(p.user);
    tick(&p.env);
    assert_eq!(
        p.pool.try_mint_fractional(d18(1), d18(1), U256::zero()),
        Err(SynthError::RatioNotFractional.into())
    );
}

#[test]
fn redeem_1t1_returns_collateral_at_par() {
    let mut p = setup();
    p.env.set_caller(p.owner);
    p.usdc.transfer(p.user, d18(100));

    p.env.set_caller(p.user);
    p.usdc.approve(p.pool.address(), d18(100));
    tick(&p.env);
    p.pool.mint_1t1(d18(100), U256::zero());

    // ECR is exactly 1 after the mint
    assert_eq!(p.reserve.get_ecr(), one());

    tick(&p.env);
    let (profit, penalty) = p.pool.redeem_1t1(d18(50), d18(50));
    assert_eq!((profit, penalty), (U256::zero(), U256::zero()));
    assert_eq!(p.usdc.balance_of(p.user), d18(50));
    assert_eq!(p.synth.balance_of(p.user), d18(50));
    assert_eq!(p.pool.basis_amount(p.user), d18(50));
    assert!(p.env.emitted_event(
        &p.pool.address(),
        Redeemed {
            caller: p.user,
            synth_in: d18(50),
            collateral_out: d18(50),
            share_out: U256::zero(),
        }
    ));
}

#[test]
fn redeem_1t1_requires_a_fully_backed_supply() {
    let mut p = setup();
    p.fund(d18(50), d18(100));
    p.env.set_caller(p.user);
    tick(&p.env);
    assert_eq!(
        p.pool.try_redeem_1t1(d18(1), U256::zero()),
        Err(SynthError::RatioNotOne.into())
    );
}

#[test]
fn redeem_algorithmic_mints_share_for_unbacked_synth() {
    let mut p = setup();
    p.env.set_caller(p.owner);
    p.synth.mint(p.user, d18(5));
    p.synth_oracle.set_price(p.synth.address(), d18(2));

    // No collateral at all: ECR 0
    assert_eq!(p.reserve.get_ecr(), U256::zero());

    p.env.set_caller(p.user);
    tick(&p.env);
    p.pool.redeem_algorithmic(d18(1), d18(2));

    assert_eq!(p.synth.balance_of(p.user), d18(4));
    assert_eq!(p.share.balance_of(p.user), d18(2));
}

#[test]
fn redeem_fractional_splits_by_the_effective_ratio() {
    let mut p = setup();
    p.fund(d18(50), d18(100));
    p.env.set_caller(p.owner);
    p.synth.transfer(p.user, d18(10));

    assert_eq!(p.reserve.get_ecr(), wei(HALF));

    p.env.set_caller(p.user);
    tick(&p.env);
    p.pool.redeem_fractional(d18(10), d18(5), d18(5));

    // Half the value in collateral, half in freshly minted share
    assert_eq!(p.usdc.balance_of(p.user), d18(5));
    assert_eq!(p.share.balance_of(p.user), d18(5));
    assert_eq!(p.synth.balance_of(p.user), U256::zero());
    // GCV 45 over a supply of 90: the ratio is undisturbed
    assert_eq!(p.reserve.get_ecr(), wei(HALF));
}

#[test]
fn redeeming_can_be_paused() {
    let mut p = setup();
    p.env.set_caller(p.owner);
    p.pool.toggle_redeeming();

    p.env.set_caller(p.user);
    tick(&p.env);
    assert_eq!(
        p.pool.try_redeem_1t1(d18(1), U256::zero()),
        Err(SynthError::RedeemingPaused.into())
    );
}

#[test]
fn settlement_realizes_profit_and_penalty_against_the_basis() {
    let mut p = setup();
    p.force_tcr(U256::zero());
    p.env.set_caller(p.owner);
    p.synth_oracle.set_price(p.synth.address(), d18(2));
    p.share.transfer(p.user, d18(10));

    p.env.set_caller(p.user);
    tick(&p.env);
    p.pool.mint_algorithmic(d18(4), U256::zero());
    assert_eq!(p.pool.basis_amount(p.user), d18(2));

    // Price up $1 since the mint: $1 profit per synth
    p.env.set_caller(p.owner);
    p.synth_oracle.set_price(p.synth.address(), d18(3));
    p.env.set_caller(p.user);
    tick(&p.env);
    let (profit, penalty) = p.pool.redeem_algorithmic(d18(1), U256::zero());
    assert_eq!((profit, penalty), (d18(1), U256::zero()));
    assert_eq!(p.pool.basis_amount(p.user), d18(1));
    assert!(p.env.emitted_event(
        &p.pool.address(),
        Profited {
            caller: p.user,
            profit: d18(1),
            penalty: U256::zero(),
        }
    ));

    // Price below the basis on the rest
    p.env.set_caller(p.owner);
    p.synth_oracle.set_price(p.synth.address(), d18(1));
    p.env.set_caller(p.user);
    tick(&p.env);
    let (profit, penalty) = p.pool.redeem_algorithmic(d18(1), U256::zero());
    assert_eq!((profit, penalty), (U256::zero(), d18(1)));
    assert_eq!(p.pool.basis_amount(p.user), U256::zero());
}

#[test]
fn admin_surface_is_gated_and_bounded() {
    let mut p = setup();
    p.env.set_caller(p.owner);
    assert_eq!(
        p.pool.try_set_minting_fee(wei(60_000_000_000_000_000)),
        Err(SynthError::FeeTooHigh.into())
    );
    assert_eq!(
        p.pool.try_set_action_delay(0),
        Err(SynthError::DelayTooShort.into())
    );

    p.env.set_caller(p.user);
    assert_eq!(
        p.pool.try_toggle_minting(),
        Err(SynthError::NotPauser.into())
    );
    assert_eq!(
        p.pool.try_set_redemption_fee(U256::zero()),
        Err(SynthError::NotMaintainer.into())
    );
    assert_eq!(
        p.pool.try_withdraw_fee(),
        Err(SynthError::NotMaintainer.into())
    );
}
