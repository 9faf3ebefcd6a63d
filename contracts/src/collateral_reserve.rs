//! Collateral Reserve
//!
//! Custody and accounting core of the protocol. Holds all collateral,
//! tracks the target collateral ratio (TCR), derives the effective
//! collateral ratio (ECR = GCV / TGSV) on demand, and runs the two
//! reserve-rebalancing operations: share buyback against excess
//! collateral and recollateralization of a deficit at a bonus.
//!
//! The reserve is deployed uninitialized and wired up once through
//! `initialize`. TCR moves only through single-step primitives gated to
//! the ratio setter (the stability controller), or through the bounded
//! maintainer override.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::access_control::{Roles, ROLE_MAINTAINER, ROLE_PAUSER, ROLE_POOL, ROLE_RATIO_SETTER};
use crate::errors::SynthError;
use crate::interfaces::{OracleClient, TokenClient, VaultClient};
use crate::registry::AddressRegistry;
use crate::{
    DEFAULT_BONUS_RATE, DEFAULT_INVEST_COLLATERAL_RATIO, DEFAULT_RATIO_DELTA, MAX_FEE, ONE,
};

#[odra::event]
pub struct CollateralAdded {
    pub asset: Address,
}

#[odra::event]
pub struct CollateralRemoved {
    pub asset: Address,
}

#[odra::event]
pub struct SynthAdded {
    pub synth: Address,
}

#[odra::event]
pub struct SynthRemoved {
    pub synth: Address,
}

#[odra::event]
pub struct OracleAdded {
    pub oracle: Address,
}

#[odra::event]
pub struct PoolAdded {
    pub pool: Address,
}

#[odra::event]
pub struct PoolRemoved {
    pub pool: Address,
}

#[odra::event]
pub struct VaultAdded {
    pub vault: Address,
}

#[odra::event]
pub struct VaultRemoved {
    pub vault: Address,
}

#[odra::event]
pub struct CollateralRatioSet {
    pub ratio: U256,
}

#[odra::event]
pub struct BuybackToggled {
    pub paused: bool,
}

#[odra::event]
pub struct RecollateralizeToggled {
    pub paused: bool,
}

#[odra::event]
pub struct TreasuryChanged {
    pub fee_collector: Address,
}

#[odra::event]
pub struct BoughtBack {
    pub caller: Address,
    pub share_in: U256,
    pub collateral_out: U256,
}

#[odra::event]
pub struct Recollateralized {
    pub caller: Address,
    pub collateral_in: U256,
    pub share_out: U256,
}

#[odra::event]
pub struct VaultEntered {
    pub vault: Address,
    pub amount: U256,
}

#[odra::event]
pub struct VaultRecalled {
    pub vault: Address,
    pub amount: U256,
}

/// Ratio, fee, and pause parameters
#[odra::module]
pub struct ReserveParams {
    /// Target collateral ratio, always within [0, ONE]
    pub global_collateral_ratio: Var<U256>,
    /// Step size for the ratio-setter primitives
    pub ratio_delta: Var<U256>,
    /// Recollateralization incentive on top of par value
    pub bonus_rate: Var<U256>,
    pub buyback_fee: Var<U256>,
    pub recollat_fee: Var<U256>,
    /// Minimum time between TCR moves
    pub refresh_cooldown: Var<u64>,
    pub last_call_time: Var<u64>,
    pub buyback_paused: Var<bool>,
    pub recollateralize_paused: Var<bool>,
    /// Fraction of idle reserves deployed into vaults
    pub invest_collateral_ratio: Var<U256>,
}

/// Collateral custody and global accounting
#[odra::module(events = [
    CollateralAdded, CollateralRemoved, SynthAdded, SynthRemoved, OracleAdded,
    PoolAdded, PoolRemoved, VaultAdded, VaultRemoved, CollateralRatioSet,
    BuybackToggled, RecollateralizeToggled, TreasuryChanged, BoughtBack,
    Recollateralized, VaultEntered, VaultRecalled,
])]
pub struct CollateralReserve {
    initialized: Var<bool>,
    params: SubModule<ReserveParams>,

    pid_controller: Var<Address>,
    share_token: Var<Address>,
    share_oracle: Var<Address>,
    fee_collector: Var<Address>,

    collateral_registry: SubModule<AddressRegistry>,
    synth_registry: SubModule<AddressRegistry>,
    pool_registry: SubModule<AddressRegistry>,
    vault_registry: SubModule<AddressRegistry>,
    /// collateral asset -> price oracle
    oracle_of: Mapping<Address, Address>,
    oracles: Mapping<Address, bool>,

    access: SubModule<Roles>,
}

#[odra::module]
impl CollateralReserve {
    pub fn init(&mut self) {
        self.initialized.set(false);
    }

    /// One-shot wiring of the reserve. Grants the maintainer role to
    /// `owner` and the ratio-setter role to `pid_controller`.
    pub fn initialize(
        &mut self,
        owner: Address,
        pid_controller: Address,
        share_token: Address,
        share_oracle: Address,
        fee_collector: Address,
    ) {
        if self.initialized.get().unwrap_or(false) {
            self.env().revert(SynthError::AlreadyInitialized);
        }
        self.initialized.set(true);

        self.pid_controller.set(pid_controller);
        self.share_token.set(share_token);
        self.share_oracle.set(share_oracle);
        self.fee_collector.set(fee_collector);

        self.params.global_collateral_ratio.set(U256::from(ONE));
        self.params.ratio_delta.set(U256::from(DEFAULT_RATIO_DELTA));
        self.params.bonus_rate.set(U256::from(DEFAULT_BONUS_RATE));
        self.params.buyback_fee.set(U256::zero());
        self.params.recollat_fee.set(U256::zero());
        self.params.refresh_cooldown.set(0);
        self.params.last_call_time.set(0);
        self.params.buyback_paused.set(true);
        self.params.recollateralize_paused.set(true);
        self.params
            .invest_collateral_ratio
            .set(U256::from(DEFAULT_INVEST_COLLATERAL_RATIO));

        self.access.grant(ROLE_MAINTAINER, owner);
        self.access.grant(ROLE_RATIO_SETTER, pid_controller);
    }

    // ========== State Getters ==========

    pub fn is_initialized(&self) -> bool {
        self.initialized.get().unwrap_or(false)
    }

    /// Target collateral ratio (TCR)
    pub fn global_collateral_ratio(&self) -> U256 {
        self.params
            .global_collateral_ratio
            .get()
            .unwrap_or(U256::zero())
    }

    pub fn ratio_delta(&self) -> U256 {
        self.params.ratio_delta.get().unwrap_or(U256::zero())
    }

    pub fn bonus_rate(&self) -> U256 {
        self.params.bonus_rate.get().unwrap_or(U256::zero())
    }

    pub fn buyback_fee(&self) -> U256 {
        self.params.buyback_fee.get().unwrap_or(U256::zero())
    }

    pub fn recollat_fee(&self) -> U256 {
        self.params.recollat_fee.get().unwrap_or(U256::zero())
    }

    pub fn refresh_cooldown(&self) -> u64 {
        self.params.refresh_cooldown.get().unwrap_or(0)
    }

    pub fn last_call_time(&self) -> u64 {
        self.params.last_call_time.get().unwrap_or(0)
    }

    pub fn buyback_paused(&self) -> bool {
        self.params.buyback_paused.get().unwrap_or(true)
    }

    pub fn recollateralize_paused(&self) -> bool {
        self.params.recollateralize_paused.get().unwrap_or(true)
    }

    pub fn invest_collateral_ratio(&self) -> U256 {
        self.params
            .invest_collateral_ratio
            .get()
            .unwrap_or(U256::zero())
    }

    pub fn pid_controller(&self) -> Option<Address> {
        self.pid_controller.get()
    }

    pub fn share_token(&self) -> Option<Address> {
        self.share_token.get()
    }

    pub fn fee_collector(&self) -> Option<Address> {
        self.fee_collector.get()
    }

    // ========== Registries ==========

    pub fn add_oracle(&mut self, oracle: Address) {
        self.access.require(ROLE_MAINTAINER);
        if self.is_oracle(oracle) {
            self.env().revert(SynthError::DuplicateEntry);
        }
        self.oracles.set(&oracle, true);
        self.env().emit_event(OracleAdded { oracle });
    }

    pub fn is_oracle(&self, oracle: Address) -> bool {
        self.oracles.get(&oracle).unwrap_or(false)
    }

    pub fn add_collateral(&mut self, asset: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.collateral_registry.add(asset);
        self.env().emit_event(CollateralAdded { asset });
    }

    pub fn remove_collateral(&mut self, asset: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.collateral_registry.remove(asset);
        self.env().emit_event(CollateralRemoved { asset });
    }

    pub fn is_collateral(&self, asset: Address) -> bool {
        self.collateral_registry.contains(asset)
    }

    pub fn collateral_at(&self, index: u32) -> Option<Address> {
        self.collateral_registry.at(index)
    }

    /// Bind a registered oracle to a collateral asset
    pub fn set_oracle_of(&mut self, asset: Address, oracle: Address) {
        self.access.require(ROLE_MAINTAINER);
        if !self.is_oracle(oracle) {
            self.env().revert(SynthError::OracleNotRegistered);
        }
        self.oracle_of.set(&asset, oracle);
    }

    pub fn oracle_of(&self, asset: Address) -> Option<Address> {
        self.oracle_of.get(&asset)
    }

    pub fn add_synth(&mut self, synth: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.synth_registry.add(synth);
        self.env().emit_event(SynthAdded { synth });
    }

    pub fn remove_synth(&mut self, synth: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.synth_registry.remove(synth);
        self.env().emit_event(SynthRemoved { synth });
    }

    pub fn is_synth(&self, synth: Address) -> bool {
        self.synth_registry.contains(synth)
    }

    pub fn synth_at(&self, index: u32) -> Option<Address> {
        self.synth_registry.at(index)
    }

    /// Register a mint/redeem pool and grant it custody access
    pub fn add_pool(&mut self, pool: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.pool_registry.add(pool);
        self.access.grant(ROLE_POOL, pool);
        self.env().emit_event(PoolAdded { pool });
    }

    pub fn remove_pool(&mut self, pool: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.pool_registry.remove(pool);
        self.access.revoke(ROLE_POOL, pool);
        self.env().emit_event(PoolRemoved { pool });
    }

    pub fn is_pool(&self, pool: Address) -> bool {
        self.pool_registry.contains(pool)
    }

    pub fn pool_at(&self, index: u32) -> Option<Address> {
        self.pool_registry.at(index)
    }

    pub fn add_vault(&mut self, vault: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.vault_registry.add(vault);
        self.env().emit_event(VaultAdded { vault });
    }

    pub fn remove_vault(&mut self, vault: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.vault_registry.remove(vault);
        self.env().emit_event(VaultRemoved { vault });
    }

    pub fn vault_at(&self, index: u32) -> Option<Address> {
        self.vault_registry.at(index)
    }

    // ========== Valuation Reads ==========

    /// Price of one whole unit of a collateral asset
    pub fn get_collateral_price(&self, asset: Address) -> U256 {
        match self.oracle_of.get(&asset) {
            Some(oracle) => OracleClient::consult(&self.env(), oracle, asset, U256::from(ONE)),
            None => self.env().revert(SynthError::MissingOracle),
        }
    }

    /// Price of one whole share token
    pub fn get_share_price(&self) -> U256 {
        let oracle = self.share_oracle.get().unwrap_or_revert(&self.env());
        let share = self.share_token.get().unwrap_or_revert(&self.env());
        OracleClient::consult(&self.env(), oracle, share, U256::from(ONE))
    }

    /// Units of `asset` controlled by the reserve: idle balance plus
    /// everything deployed into vaults holding this asset
    pub fn collateral_balance(&self, asset: Address) -> U256 {
        let mut balance = TokenClient::balance_of(&self.env(), asset, self.env().self_address());
        for vault in self.vault_registry.entries() {
            if VaultClient::asset(&self.env(), vault) == asset {
                balance += VaultClient::vault_balance(&self.env(), vault);
            }
        }
        balance
    }

    /// Global collateral value (GCV): every registered collateral balance
    /// priced through its oracle
    pub fn global_collateral_value(&self) -> U256 {
        let mut value = U256::zero();
        for asset in self.collateral_registry.entries() {
            let price = self.get_collateral_price(asset);
            value += self.collateral_balance(asset) * price / U256::from(ONE);
        }
        value
    }

    /// Total global synth value (TGSV): every registered synth supply at
    /// its spot price
    pub fn total_global_synth_value(&self) -> U256 {
        let mut value = U256::zero();
        for synth in self.synth_registry.entries() {
            let supply = TokenClient::total_supply(&self.env(), synth);
            let price = TokenClient::synth_price(&self.env(), synth);
            value += supply * price / U256::from(ONE);
        }
        value
    }

    /// Effective collateral ratio (ECR). Derived on every call, never
    /// stored; 0 when no synth value is outstanding.
    pub fn get_ecr(&self) -> U256 {
        let tgsv = self.total_global_synth_value();
        if tgsv.is_zero() {
            return U256::zero();
        }
        self.global_collateral_value() * U256::from(ONE) / tgsv
    }

    /// Collateral units of `asset` above what the current TCR requires
    pub fn excess_collateral_balance(&self, asset: Address) -> U256 {
        let gcv = self.global_collateral_value();
        let tgsv = self.total_global_synth_value();
        let tcr = self.global_collateral_ratio();

        let ecr = if tgsv.is_zero() {
            U256::zero()
        } else {
            gcv * U256::from(ONE) / tgsv
        };
        if ecr <= tcr {
            return U256::zero();
        }

        let required = tgsv * tcr / U256::from(ONE);
        let excess_value = gcv - required;
        excess_value * U256::from(ONE) / self.get_collateral_price(asset)
    }

    /// Maximum share amount a buyback against `asset` can absorb at
    /// current prices
    pub fn get_max_buyback_share(&self, asset: Address) -> U256 {
        let excess_units = self.excess_collateral_balance(asset);
        if excess_units.is_zero() {
            return U256::zero();
        }

        let one = U256::from(ONE);
        let excess_value = excess_units * self.get_collateral_price(asset) / one;
        excess_value * (one + self.buyback_fee()) / one * one / self.get_share_price()
    }

    /// Collateral units of `asset` needed to lift ECR back up to TCR
    pub fn recollateralize_amount(&self, asset: Address) -> U256 {
        let tgsv = self.total_global_synth_value();
        let tcr = self.global_collateral_ratio();

        // A deficit against a zero synth supply is not a meaningful
        // target; the effective ratio does not exist.
        if tgsv.is_zero() {
            if tcr.is_zero() {
                return U256::zero();
            }
            self.env().revert(SynthError::UndefinedSynthValueRatio);
        }

        let gcv = self.global_collateral_value();
        let required = tgsv * tcr / U256::from(ONE);
        if required <= gcv {
            return U256::zero();
        }
        (required - gcv) * U256::from(ONE) / self.get_collateral_price(asset)
    }

    // ========== TCR Management ==========

    /// Raise TCR by one `ratio_delta`, clamped at 1 (ratio setter only)
    pub fn step_up_tcr(&mut self) {
        self.access.require(ROLE_RATIO_SETTER);
        self.require_cooldown_passed();

        let one = U256::from(ONE);
        let tcr = self.global_collateral_ratio();
        let stepped = tcr + self.ratio_delta();
        let new_tcr = if stepped > one { one } else { stepped };
        self.params.global_collateral_ratio.set(new_tcr);
        let now = self.env().get_block_time();
        self.params.last_call_time.set(now);
        self.env().emit_event(CollateralRatioSet { ratio: new_tcr });
    }

    /// Lower TCR by one `ratio_delta`, clamped at 0 (ratio setter only)
    pub fn step_down_tcr(&mut self) {
        self.access.require(ROLE_RATIO_SETTER);
        self.require_cooldown_passed();

        let tcr = self.global_collateral_ratio();
        let delta = self.ratio_delta();
        let new_tcr = if tcr > delta { tcr - delta } else { U256::zero() };
        self.params.global_collateral_ratio.set(new_tcr);
        let now = self.env().get_block_time();
        self.params.last_call_time.set(now);
        self.env().emit_event(CollateralRatioSet { ratio: new_tcr });
    }

    /// Bounded maintainer override of the TCR
    pub fn set_global_collateral_ratio(&mut self, ratio: U256) {
        self.access.require(ROLE_MAINTAINER);
        if ratio > U256::from(ONE) {
            self.env().revert(SynthError::RatioOutOfBounds);
        }
        self.params.global_collateral_ratio.set(ratio);
        let now = self.env().get_block_time();
        self.params.last_call_time.set(now);
        self.env().emit_event(CollateralRatioSet { ratio });
    }

    pub fn set_ratio_delta(&mut self, delta: U256) {
        self.access.require(ROLE_RATIO_SETTER);
        self.params.ratio_delta.set(delta);
    }

    pub fn set_refresh_cooldown(&mut self, cooldown: u64) {
        self.access.require(ROLE_MAINTAINER);
        self.params.refresh_cooldown.set(cooldown);
    }

    // ========== Buyback & Recollateralization ==========

    /// Burn caller's share against excess collateral of `asset`.
    ///
    /// Valid only while ECR > TCR; the payout may consume the excess down
    /// to the target but never past it.
    pub fn buy_back_share(&mut self, asset: Address, share_amount: U256, min_collateral_out: U256) {
        if self.buyback_paused() {
            self.env().revert(SynthError::BuybackPaused);
        }

        let caller = self.env().caller();
        let share = self.share_token.get().unwrap_or_revert(&self.env());
        if TokenClient::balance_of(&self.env(), share, caller) < share_amount {
            self.env().revert(SynthError::InsufficientShare);
        }

        let tcr = self.global_collateral_ratio();
        let ecr = self.get_ecr();
        if ecr <= tcr {
            self.env().revert(SynthError::NoExcessCollateral);
        }

        let one = U256::from(ONE);
        let collateral_price = self.get_collateral_price(asset);
        let share_value = share_amount * self.get_share_price() / one;
        let collateral_out = share_value * one / collateral_price;
        if collateral_out > self.excess_collateral_balance(asset) {
            self.env().revert(SynthError::BuybackOverExcess);
        }

        let fee = collateral_out * self.buyback_fee() / one;
        let net_out = collateral_out - fee;
        if net_out < min_collateral_out {
            self.env().revert(SynthError::SlippageLimitReached);
        }

        TokenClient::burn_from(&self.env(), share, caller, share_amount);
        TokenClient::transfer(&self.env(), asset, caller, net_out);
        if !fee.is_zero() {
            let collector = self.fee_collector.get().unwrap_or_revert(&self.env());
            TokenClient::transfer(&self.env(), asset, collector, fee);
        }

        self.env().emit_event(BoughtBack {
            caller,
            share_in: share_amount,
            collateral_out: net_out,
        });
    }

    /// Supply collateral into a deficit reserve for freshly minted share
    /// at a bonus.
    pub fn recollateralize_share(
        &mut self,
        asset: Address,
        collateral_amount: U256,
        share_out_min: U256,
    ) {
        if self.recollateralize_paused() {
            self.env().revert(SynthError::RecollateralizePaused);
        }

        let tcr = self.global_collateral_ratio();
        let ecr = self.get_ecr();
        if tcr <= ecr {
            self.env().revert(SynthError::NoCollateralDeficit);
        }

        if collateral_amount > self.recollateralize_amount(asset) {
            self.env().revert(SynthError::RecollateralizeOverLimit);
        }

        let one = U256::from(ONE);
        let collateral_value = collateral_amount * self.get_collateral_price(asset) / one;
        let share_out =
            collateral_value * (one + self.bonus_rate()) / one * one / self.get_share_price();
        let fee = share_out * self.recollat_fee() / one;
        let net_out = share_out - fee;
        if net_out < share_out_min {
            self.env().revert(SynthError::SlippageLimitReached);
        }

        let caller = self.env().caller();
        TokenClient::transfer_from(
            &self.env(),
            asset,
            caller,
            self.env().self_address(),
            collateral_amount,
        );

        let share = self.share_token.get().unwrap_or_revert(&self.env());
        if !net_out.is_zero() {
            TokenClient::mint(&self.env(), share, caller, net_out);
        }
        if !fee.is_zero() {
            let collector = self.fee_collector.get().unwrap_or_revert(&self.env());
            TokenClient::mint(&self.env(), share, collector, fee);
        }

        self.env().emit_event(Recollateralized {
            caller,
            collateral_in: collateral_amount,
            share_out: net_out,
        });
    }

    // ========== Pool Custody ==========

    /// Move reserve collateral out to `to` (pools only)
    pub fn request_transfer(&mut self, to: Address, asset: Address, amount: U256) {
        self.access.require(ROLE_POOL);
        TokenClient::transfer(&self.env(), asset, to, amount);
    }

    // ========== Vault Deployment ==========

    /// Deposit the invest fraction of the idle balance into a vault
    pub fn enter_vault(&mut self, index: u32) {
        self.access.require(ROLE_MAINTAINER);
        let vault = self.registered_vault(index);
        let asset = VaultClient::asset(&self.env(), vault);

        let idle = TokenClient::balance_of(&self.env(), asset, self.env().self_address());
        let amount = idle * self.invest_collateral_ratio() / U256::from(ONE);
        if !amount.is_zero() {
            TokenClient::transfer(&self.env(), asset, vault, amount);
            VaultClient::deposit(&self.env(), vault, amount);
        }
        self.env().emit_event(VaultEntered { vault, amount });
    }

    /// Pull a vault's full balance back into the reserve
    pub fn recall_from_vault(&mut self, index: u32) {
        self.access.require(ROLE_MAINTAINER);
        let vault = self.registered_vault(index);

        let amount = VaultClient::vault_balance(&self.env(), vault);
        if !amount.is_zero() {
            VaultClient::withdraw(&self.env(), vault, amount);
        }
        self.env().emit_event(VaultRecalled { vault, amount });
    }

    /// Re-target a vault to the invest fraction of the combined balance
    pub fn rebalance_vault(&mut self, index: u32) {
        self.access.require(ROLE_MAINTAINER);
        let vault = self.registered_vault(index);
        let asset = VaultClient::asset(&self.env(), vault);

        let idle = TokenClient::balance_of(&self.env(), asset, self.env().self_address());
        let invested = VaultClient::vault_balance(&self.env(), vault);
        let target = (idle + invested) * self.invest_collateral_ratio() / U256::from(ONE);

        if target > invested {
            let amount = target - invested;
            TokenClient::transfer(&self.env(), asset, vault, amount);
            VaultClient::deposit(&self.env(), vault, amount);
            self.env().emit_event(VaultEntered { vault, amount });
        } else if invested > target {
            let amount = invested - target;
            VaultClient::withdraw(&self.env(), vault, amount);
            self.env().emit_event(VaultRecalled { vault, amount });
        }
    }

    // ========== Parameter Setters ==========

    pub fn set_buyback_fee(&mut self, fee: U256) {
        self.access.require(ROLE_MAINTAINER);
        self.require_fee_bound(fee);
        self.params.buyback_fee.set(fee);
    }

    pub fn set_recollat_fee(&mut self, fee: U256) {
        self.access.require(ROLE_MAINTAINER);
        self.require_fee_bound(fee);
        self.params.recollat_fee.set(fee);
    }

    pub fn set_bonus_rate(&mut self, rate: U256) {
        self.access.require(ROLE_MAINTAINER);
        self.params.bonus_rate.set(rate);
    }

    pub fn set_invest_collateral_ratio(&mut self, ratio: U256) {
        self.access.require(ROLE_MAINTAINER);
        if ratio > U256::from(ONE) {
            self.env().revert(SynthError::RatioOutOfBounds);
        }
        self.params.invest_collateral_ratio.set(ratio);
    }

    pub fn set_fee_collector(&mut self, fee_collector: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.fee_collector.set(fee_collector);
        self.env().emit_event(TreasuryChanged { fee_collector });
    }

    pub fn set_share_oracle(&mut self, oracle: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.share_oracle.set(oracle);
    }

    /// Re-point the ratio setter to a new controller
    pub fn set_pid_controller(&mut self, controller: Address) {
        self.access.require(ROLE_MAINTAINER);
        if let Some(old) = self.pid_controller.get() {
            self.access.revoke(ROLE_RATIO_SETTER, old);
        }
        self.pid_controller.set(controller);
        self.access.grant(ROLE_RATIO_SETTER, controller);
    }

    pub fn toggle_buyback(&mut self) {
        self.access.require(ROLE_PAUSER);
        let paused = !self.buyback_paused();
        self.params.buyback_paused.set(paused);
        self.env().emit_event(BuybackToggled { paused });
    }

    pub fn toggle_recollateralize(&mut self) {
        self.access.require(ROLE_PAUSER);
        let paused = !self.recollateralize_paused();
        self.params.recollateralize_paused.set(paused);
        self.env().emit_event(RecollateralizeToggled { paused });
    }

    // ========== Roles ==========

    pub fn has_role(&self, role_id: u8, account: Address) -> bool {
        self.access.has_role(role_id, account)
    }

    pub fn grant_role(&mut self, role_id: u8, account: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.access.grant(role_id, account);
    }

    pub fn revoke_role(&mut self, role_id: u8, account: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.access.revoke(role_id, account);
    }

    // ========== Internal ==========

    fn require_cooldown_passed(&self) {
        let now = self.env().get_block_time();
        if now < self.last_call_time() + self.refresh_cooldown() {
            self.env().revert(SynthError::CooldownNotPassed);
        }
    }

    fn require_fee_bound(&self, fee: U256) {
        if fee > U256::from(MAX_FEE) {
            self.env().revert(SynthError::FeeTooHigh);
        }
    }

    fn registered_vault(&self, index: u32) -> Address {
        match self.vault_at(index) {
            Some(vault) => vault,
            None => self.env().revert(SynthError::VaultNotRegistered),
        }
    }
}
