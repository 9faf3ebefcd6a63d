//! Peg-Aware Stability Controller
//!
//! Layers a synth price-band signal over the growth-ratio feedback loop.
//! The peg signal wins: a price above the upper band steps the TCR down,
//! a price at or below the lower band steps it up, and only a price
//! strictly inside the bands lets the growth-ratio signal run. A single
//! refresh moves the TCR by at most one step.
//!
//! Band boundaries are deliberately asymmetric: the upper band is
//! exclusive, the lower band inclusive.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::errors::SynthError;
use crate::interfaces::{OracleClient, ReserveClient, TrackerClient};
use crate::pid_controller::{GrowthSignal, DEFAULT_GR_BAND};
use crate::ONE;

/// Default upper peg band ($1.01)
pub const DEFAULT_SYNTH_TOP_BAND: u128 = 1_010_000_000_000_000_000;

/// Default lower peg band ($0.99)
pub const DEFAULT_SYNTH_BOTTOM_BAND: u128 = 990_000_000_000_000_000;

#[odra::event]
pub struct CollateralRatioRefreshed {
    pub synth_price: U256,
    pub growth_ratio: U256,
}

/// Peg-aware feedback controller
#[odra::module(events = [CollateralRatioRefreshed])]
pub struct StablePidController {
    owner: Var<Address>,
    collateral_reserve: Var<Address>,
    share_token: Var<Address>,
    reserve_tracker: Var<Address>,
    /// Oracle consulted for the share price
    price_feed: Var<Address>,
    synth_token: Var<Address>,
    synth_oracle: Var<Address>,

    is_active: Var<bool>,
    /// Whether the growth-ratio signal runs at all
    use_growth_ratio: Var<bool>,
    growth: SubModule<GrowthSignal>,
    /// Peg bands: price > top steps down, price <= bottom steps up
    synth_top_band: Var<U256>,
    synth_bottom_band: Var<U256>,
    internal_cooldown: Var<u64>,
    last_update: Var<u64>,
}

#[odra::module]
impl StablePidController {
    pub fn init(
        &mut self,
        collateral_reserve: Address,
        share_token: Address,
        reserve_tracker: Address,
        price_feed: Address,
        synth_token: Address,
        synth_oracle: Address,
    ) {
        self.owner.set(self.env().caller());
        self.collateral_reserve.set(collateral_reserve);
        self.share_token.set(share_token);
        self.reserve_tracker.set(reserve_tracker);
        self.price_feed.set(price_feed);
        self.synth_token.set(synth_token);
        self.synth_oracle.set(synth_oracle);

        self.is_active.set(true);
        self.use_growth_ratio.set(true);
        self.growth.growth_ratio.set(U256::zero());
        self.growth.top_band.set(U256::from(DEFAULT_GR_BAND));
        self.growth.bottom_band.set(U256::from(DEFAULT_GR_BAND));
        self.synth_top_band.set(U256::from(DEFAULT_SYNTH_TOP_BAND));
        self.synth_bottom_band
            .set(U256::from(DEFAULT_SYNTH_BOTTOM_BAND));
        self.internal_cooldown.set(0);
        self.last_update.set(0);
    }

    // ========== Getters ==========

    pub fn owner(&self) -> Address {
        self.owner.get().unwrap_or_revert(&self.env())
    }

    pub fn is_active(&self) -> bool {
        self.is_active.get().unwrap_or(false)
    }

    pub fn use_growth_ratio(&self) -> bool {
        self.use_growth_ratio.get().unwrap_or(false)
    }

    pub fn growth_ratio(&self) -> U256 {
        self.growth.growth_ratio.get().unwrap_or(U256::zero())
    }

    pub fn gr_top_band(&self) -> U256 {
        self.growth.top_band.get().unwrap_or(U256::zero())
    }

    pub fn gr_bottom_band(&self) -> U256 {
        self.growth.bottom_band.get().unwrap_or(U256::zero())
    }

    pub fn synth_top_band(&self) -> U256 {
        self.synth_top_band.get().unwrap_or(U256::zero())
    }

    pub fn synth_bottom_band(&self) -> U256 {
        self.synth_bottom_band.get().unwrap_or(U256::zero())
    }

    pub fn internal_cooldown(&self) -> u64 {
        self.internal_cooldown.get().unwrap_or(0)
    }

    pub fn last_update(&self) -> u64 {
        self.last_update.get().unwrap_or(0)
    }

    pub fn synth_oracle(&self) -> Option<Address> {
        self.synth_oracle.get()
    }

    /// Current synth spot price through the configured oracle
    pub fn get_synth_price(&self) -> U256 {
        let oracle = self.synth_oracle.get().unwrap_or_revert(&self.env());
        let synth = self.synth_token.get().unwrap_or_revert(&self.env());
        OracleClient::consult(&self.env(), oracle, synth, U256::from(ONE))
    }

    // ========== Refresh ==========

    /// Evaluate the peg signal, then the growth signal; step at most once.
    pub fn refresh_collateral_ratio(&mut self) {
        self.require_active();
        self.require_cooldown_passed();

        let synth_price = self.get_synth_price();
        let mut stepped = false;

        if synth_price > self.synth_top_band() {
            self.step_down();
            stepped = true;
        } else if synth_price <= self.synth_bottom_band() {
            self.step_up();
            stepped = true;
        }

        let mut new_growth = self.growth_ratio();
        if self.use_growth_ratio() {
            new_growth = self.compute_growth_ratio();
            if !stepped {
                let old_growth = self.growth_ratio();
                if new_growth > old_growth && new_growth - old_growth > self.gr_top_band() {
                    self.step_down();
                } else if old_growth > new_growth
                    && old_growth - new_growth > self.gr_bottom_band()
                {
                    self.step_up();
                }
            }
            self.growth.growth_ratio.set(new_growth);
        }

        self.last_update.set(self.env().get_block_time());
        self.env().emit_event(CollateralRatioRefreshed {
            synth_price,
            growth_ratio: new_growth,
        });
    }

    // ========== Owner Setters ==========

    pub fn set_active(&mut self, active: bool) {
        self.require_owner();
        self.is_active.set(active);
    }

    pub fn set_use_growth_ratio(&mut self, use_growth_ratio: bool) {
        self.require_owner();
        self.use_growth_ratio.set(use_growth_ratio);
    }

    pub fn set_growth_ratio_bands(&mut self, top_band: U256, bottom_band: U256) {
        self.require_owner();
        self.growth.top_band.set(top_band);
        self.growth.bottom_band.set(bottom_band);
    }

    pub fn set_synth_bands(&mut self, top_band: U256, bottom_band: U256) {
        self.require_owner();
        self.synth_top_band.set(top_band);
        self.synth_bottom_band.set(bottom_band);
    }

    pub fn set_internal_cooldown(&mut self, cooldown: u64) {
        self.require_owner();
        self.internal_cooldown.set(cooldown);
    }

    pub fn set_collateral_reserve(&mut self, reserve: Address) {
        self.require_owner();
        self.collateral_reserve.set(reserve);
    }

    pub fn set_reserve_tracker(&mut self, tracker: Address) {
        self.require_owner();
        self.reserve_tracker.set(tracker);
    }

    pub fn set_share_token(&mut self, share_token: Address) {
        self.require_owner();
        self.share_token.set(share_token);
    }

    pub fn set_price_feed(&mut self, price_feed: Address) {
        self.require_owner();
        self.price_feed.set(price_feed);
    }

    pub fn set_synth_oracle(&mut self, oracle: Address) {
        self.require_owner();
        self.synth_oracle.set(oracle);
    }

    // ========== Internal ==========

    fn compute_growth_ratio(&self) -> U256 {
        let tracker = self.reserve_tracker.get().unwrap_or_revert(&self.env());
        let feed = self.price_feed.get().unwrap_or_revert(&self.env());
        let share = self.share_token.get().unwrap_or_revert(&self.env());
        let reserve = self.collateral_reserve.get().unwrap_or_revert(&self.env());

        let share_reserves = TrackerClient::get_share_reserves(&self.env(), tracker);
        let share_price = OracleClient::consult(&self.env(), feed, share, U256::from(ONE));
        let share_liquidity = share_reserves * share_price;

        let tgsv = ReserveClient::total_global_synth_value(&self.env(), reserve);
        if tgsv.is_zero() {
            self.env().revert(SynthError::UndefinedSynthValueRatio);
        }
        share_liquidity / tgsv
    }

    fn step_up(&self) {
        let reserve = self.collateral_reserve.get().unwrap_or_revert(&self.env());
        ReserveClient::step_up_tcr(&self.env(), reserve);
    }

    fn step_down(&self) {
        let reserve = self.collateral_reserve.get().unwrap_or_revert(&self.env());
        ReserveClient::step_down_tcr(&self.env(), reserve);
    }

    fn require_active(&self) {
        if !self.is_active() {
            self.env().revert(SynthError::ControllerInactive);
        }
    }

    fn require_cooldown_passed(&self) {
        let now = self.env().get_block_time();
        if now < self.last_update() + self.internal_cooldown() {
            self.env().revert(SynthError::CooldownNotPassed);
        }
    }

    fn require_owner(&self) {
        if self.env().caller() != self.owner() {
            self.env().revert(SynthError::NotOwner);
        }
    }
}
