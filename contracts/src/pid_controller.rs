//! Growth-Ratio Stability Controller
//!
//! Periodically compares share liquidity against outstanding synth value
//! and nudges the reserve's target collateral ratio one step at a time.
//!
//! growth_ratio = (share_reserves * share_price) / TGSV
//!
//! Rising growth (deeper share liquidity per unit of synth) lets the
//! protocol run at a lower collateral ratio; falling growth tightens it.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::errors::SynthError;
use crate::interfaces::{OracleClient, ReserveClient, TrackerClient};

/// Default growth-ratio band (0.001, 1e18-scaled)
pub const DEFAULT_GR_BAND: u128 = 1_000_000_000_000_000;

#[odra::event]
pub struct CollateralRatioRefreshed {
    pub growth_ratio: U256,
}

/// Growth-ratio state shared by the controllers
#[odra::module]
pub struct GrowthSignal {
    pub growth_ratio: Var<U256>,
    /// Growth increase beyond this band steps the TCR down
    pub top_band: Var<U256>,
    /// Growth decrease beyond this band steps the TCR up
    pub bottom_band: Var<U256>,
}

/// Growth-ratio feedback controller
#[odra::module(events = [CollateralRatioRefreshed])]
pub struct PidController {
    owner: Var<Address>,
    collateral_reserve: Var<Address>,
    share_token: Var<Address>,
    reserve_tracker: Var<Address>,
    /// Oracle consulted for the share price
    price_feed: Var<Address>,

    is_active: Var<bool>,
    growth: SubModule<GrowthSignal>,
    internal_cooldown: Var<u64>,
    last_update: Var<u64>,
}

#[odra::module]
impl PidController {
    pub fn init(
        &mut self,
        collateral_reserve: Address,
        share_token: Address,
        reserve_tracker: Address,
        price_feed: Address,
    ) {
        self.owner.set(self.env().caller());
        self.collateral_reserve.set(collateral_reserve);
        self.share_token.set(share_token);
        self.reserve_tracker.set(reserve_tracker);
        self.price_feed.set(price_feed);

        self.is_active.set(false);
        self.growth.growth_ratio.set(U256::zero());
        self.growth.top_band.set(U256::from(DEFAULT_GR_BAND));
        self.growth.bottom_band.set(U256::from(DEFAULT_GR_BAND));
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

    pub fn growth_ratio(&self) -> U256 {
        self.growth.growth_ratio.get().unwrap_or(U256::zero())
    }

    pub fn gr_top_band(&self) -> U256 {
        self.growth.top_band.get().unwrap_or(U256::zero())
    }

    pub fn gr_bottom_band(&self) -> U256 {
        self.growth.bottom_band.get().unwrap_or(U256::zero())
    }

    pub fn internal_cooldown(&self) -> u64 {
        self.internal_cooldown.get().unwrap_or(0)
    }

    pub fn last_update(&self) -> u64 {
        self.last_update.get().unwrap_or(0)
    }

    /// Growth ratio as it would be computed right now
    pub fn get_new_growth_ratio(&self) -> U256 {
        self.compute_growth_ratio()
    }

    // ========== Refresh ==========

    /// Recompute the growth ratio and step the TCR at most once.
    pub fn refresh_collateral_ratio(&mut self) {
        self.require_active();
        self.require_cooldown_passed();

        let new_growth = self.compute_growth_ratio();
        let old_growth = self.growth_ratio();

        if new_growth > old_growth && new_growth - old_growth > self.gr_top_band() {
            self.step_down();
        } else if old_growth > new_growth && old_growth - new_growth > self.gr_bottom_band() {
            self.step_up();
        }

        self.growth.growth_ratio.set(new_growth);
        self.last_update.set(self.env().get_block_time());
        self.env().emit_event(CollateralRatioRefreshed {
            growth_ratio: new_growth,
        });
    }

    // ========== Owner Setters ==========

    pub fn set_active(&mut self, active: bool) {
        self.require_owner();
        self.is_active.set(active);
    }

    pub fn set_growth_ratio_bands(&mut self, top_band: U256, bottom_band: U256) {
        self.require_owner();
        self.growth.top_band.set(top_band);
        self.growth.bottom_band.set(bottom_band);
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

    // ========== Internal ==========

    fn compute_growth_ratio(&self) -> U256 {
        let tracker = self.reserve_tracker.get().unwrap_or_revert(&self.env());
        let feed = self.price_feed.get().unwrap_or_revert(&self.env());
        let share = self.share_token.get().unwrap_or_revert(&self.env());
        let reserve = self.collateral_reserve.get().unwrap_or_revert(&self.env());

        let share_reserves = TrackerClient::get_share_reserves(&self.env(), tracker);
        let share_price =
            OracleClient::consult(&self.env(), feed, share, U256::from(crate::ONE));
        // Kept at full 1e36 scale; the TGSV division brings it back to 1e18
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
