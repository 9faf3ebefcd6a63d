//! Synth Pool
//!
//! User-facing mint/redeem facade for one (collateral, synth) pairing.
//! The minting mode is dictated by the reserve's target collateral ratio
//! and the redeeming mode by the effective ratio:
//!
//! - TCR == 1: 1:1 mint against collateral only
//! - 0 < TCR < 1: fractional mint against a collateral/share mix
//! - TCR == 0: algorithmic mint against share only
//!
//! Collateral always lands in the reserve; redeem payouts are pulled back
//! out through the reserve's pool-gated custody call. Fees accrue in the
//! pool's own balances and are swept by the maintainer.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::access_control::{Roles, ROLE_MAINTAINER, ROLE_PAUSER};
use crate::errors::SynthError;
use crate::interfaces::{ReserveClient, TokenClient};
use crate::{MAX_FEE, ONE};

#[odra::event]
pub struct Minted {
    pub caller: Address,
    pub collateral_in: U256,
    pub share_in: U256,
    pub synth_out: U256,
}

#[odra::event]
pub struct Redeemed {
    pub caller: Address,
    pub synth_in: U256,
    pub collateral_out: U256,
    pub share_out: U256,
}

#[odra::event]
pub struct Profited {
    pub caller: Address,
    pub profit: U256,
    pub penalty: U256,
}

#[odra::event]
pub struct FeeWithdrawn {
    pub to: Address,
    pub collateral_amount: U256,
    pub share_amount: U256,
}

#[odra::event]
pub struct MintingToggled {
    pub paused: bool,
}

#[odra::event]
pub struct RedeemingToggled {
    pub paused: bool,
}

/// Mint/redeem pool for one collateral-synth pairing
#[odra::module(events = [
    Minted, Redeemed, Profited, FeeWithdrawn, MintingToggled, RedeemingToggled,
])]
pub struct SynthPool {
    collateral_reserve: Var<Address>,
    collateral_token: Var<Address>,
    synth_token: Var<Address>,
    share_token: Var<Address>,

    minting_fee: Var<U256>,
    redemption_fee: Var<U256>,
    mint_paused: Var<bool>,
    redeem_paused: Var<bool>,
    /// Minimum time between a user's consecutive mint/redeem actions
    action_delay: Var<u64>,
    last_action: Mapping<Address, u64>,

    /// Volume-weighted synth price paid at mint, per user
    basis_price: Mapping<Address, U256>,
    /// Synth amount the recorded basis covers
    basis_amount: Mapping<Address, U256>,

    access: SubModule<Roles>,
}

#[odra::module]
impl SynthPool {
    pub fn init(
        &mut self,
        collateral_reserve: Address,
        collateral_token: Address,
        synth_token: Address,
        share_token: Address,
        owner: Address,
    ) {
        self.collateral_reserve.set(collateral_reserve);
        self.collateral_token.set(collateral_token);
        self.synth_token.set(synth_token);
        self.share_token.set(share_token);

        self.minting_fee.set(U256::zero());
        self.redemption_fee.set(U256::zero());
        self.mint_paused.set(true);
        self.redeem_paused.set(true);
        self.action_delay.set(1);

        self.access.grant(ROLE_MAINTAINER, owner);
    }

    // ========== Getters ==========

    pub fn minting_fee(&self) -> U256 {
        self.minting_fee.get().unwrap_or(U256::zero())
    }

    pub fn redemption_fee(&self) -> U256 {
        self.redemption_fee.get().unwrap_or(U256::zero())
    }

    pub fn mint_paused(&self) -> bool {
        self.mint_paused.get().unwrap_or(true)
    }

    pub fn redeem_paused(&self) -> bool {
        self.redeem_paused.get().unwrap_or(true)
    }

    pub fn action_delay(&self) -> u64 {
        self.action_delay.get().unwrap_or(0)
    }

    pub fn last_action(&self, account: Address) -> u64 {
        self.last_action.get(&account).unwrap_or(0)
    }

    pub fn basis_price(&self, account: Address) -> U256 {
        self.basis_price.get(&account).unwrap_or(U256::zero())
    }

    pub fn basis_amount(&self, account: Address) -> U256 {
        self.basis_amount.get(&account).unwrap_or(U256::zero())
    }

    /// Collateral price passthrough; a zero price is valid data
    pub fn get_collateral_price(&self) -> U256 {
        let reserve = self.reserve();
        ReserveClient::get_collateral_price(&self.env(), reserve, self.collateral())
    }

    /// Synth price passthrough
    pub fn get_synth_price(&self) -> U256 {
        TokenClient::synth_price(&self.env(), self.synth())
    }

    // ========== Minting ==========

    /// Mint fully collateralized; requires TCR == 1
    pub fn mint_1t1(&mut self, collateral_amount: U256, synth_out_min: U256) -> U256 {
        self.before_action(collateral_amount, self.mint_paused(), SynthError::MintingPaused);

        if self.tcr() != U256::from(ONE) {
            self.env().revert(SynthError::RatioNotOne);
        }

        let one = U256::from(ONE);
        let fee_collateral = collateral_amount * self.minting_fee() / one;
        let net_collateral = collateral_amount - fee_collateral;
        let collateral_value = net_collateral * self.get_collateral_price() / one;

        let synth_price = self.get_synth_price();
        let synth_out = collateral_value * one / synth_price;
        if synth_out < synth_out_min {
            self.env().revert(SynthError::SlippageLimitReached);
        }

        let caller = self.env().caller();
        self.pull_collateral(caller, net_collateral, fee_collateral);
        TokenClient::mint(&self.env(), self.synth(), caller, synth_out);
        self.record_mint_basis(caller, synth_out, synth_price);

        self.env().emit_event(Minted {
            caller,
            collateral_in: collateral_amount,
            share_in: U256::zero(),
            synth_out,
        });
        synth_out
    }

    /// Mint fully algorithmic against share; requires TCR == 0
    pub fn mint_algorithmic(&mut self, share_amount: U256, synth_out_min: U256) -> U256 {
        self.before_action(share_amount, self.mint_paused(), SynthError::MintingPaused);

        if !self.tcr().is_zero() {
            self.env().revert(SynthError::RatioNotZero);
        }

        let one = U256::from(ONE);
        let fee_share = share_amount * self.minting_fee() / one;
        let net_share = share_amount - fee_share;
        let share_value = net_share * self.share_price() / one;

        let synth_price = self.get_synth_price();
        let synth_out = share_value * one / synth_price;
        if synth_out < synth_out_min {
            self.env().revert(SynthError::SlippageLimitReached);
        }

        let caller = self.env().caller();
        self.pull_share(caller, net_share, fee_share);
        TokenClient::mint(&self.env(), self.synth(), caller, synth_out);
        self.record_mint_basis(caller, synth_out, synth_price);

        self.env().emit_event(Minted {
            caller,
            collateral_in: U256::zero(),
            share_in: share_amount,
            synth_out,
        });
        synth_out
    }

    /// Mint against a collateral/share mix matching the current TCR;
    /// requires 0 < TCR < 1
    pub fn mint_fractional(
        &mut self,
        collateral_amount: U256,
        share_amount: U256,
        synth_out_min: U256,
    ) -> U256 {
        self.before_action(collateral_amount, self.mint_paused(), SynthError::MintingPaused);

        let one = U256::from(ONE);
        let tcr = self.tcr();
        if tcr.is_zero() || tcr == one {
            self.env().revert(SynthError::RatioNotFractional);
        }

        let collateral_price = self.get_collateral_price();
        let share_price = self.share_price();
        let collateral_value = collateral_amount * collateral_price / one;

        // The share leg must cover exactly the non-collateral fraction.
        let required_share_value = collateral_value * (one - tcr) / tcr;
        let required_share = required_share_value * one / share_price;
        if share_amount != required_share {
            self.env().revert(SynthError::CollateralMixMismatch);
        }

        let fee = self.minting_fee();
        let fee_collateral = collateral_amount * fee / one;
        let fee_share = share_amount * fee / one;
        let net_collateral = collateral_amount - fee_collateral;
        let net_share = share_amount - fee_share;

        let net_value =
            net_collateral * collateral_price / one + net_share * share_price / one;
        let synth_price = self.get_synth_price();
        let synth_out = net_value * one / synth_price;
        if synth_out < synth_out_min {
            self.env().revert(SynthError::SlippageLimitReached);
        }

        let caller = self.env().caller();
        self.pull_collateral(caller, net_collateral, fee_collateral);
        self.pull_share(caller, net_share, fee_share);
        TokenClient::mint(&self.env(), self.synth(), caller, synth_out);
        self.record_mint_basis(caller, synth_out, synth_price);

        self.env().emit_event(Minted {
            caller,
            collateral_in: collateral_amount,
            share_in: share_amount,
            synth_out,
        });
        synth_out
    }

    // ========== Redeeming ==========

    /// Redeem fully into collateral; requires ECR == 1.
    /// Returns the (profit, penalty) realized against the caller's basis.
    pub fn redeem_1t1(&mut self, synth_amount: U256, collateral_out_min: U256) -> (U256, U256) {
        self.before_action(synth_amount, self.redeem_paused(), SynthError::RedeemingPaused);

        if self.ecr() != U256::from(ONE) {
            self.env().revert(SynthError::RatioNotOne);
        }

        let one = U256::from(ONE);
        let synth_price = self.get_synth_price();
        let synth_value = synth_amount * synth_price / one;
        let collateral_out = synth_value * one / self.get_collateral_price();
        let fee_collateral = collateral_out * self.redemption_fee() / one;
        let net_collateral = collateral_out - fee_collateral;
        if net_collateral < collateral_out_min {
            self.env().revert(SynthError::SlippageLimitReached);
        }

        let caller = self.env().caller();
        TokenClient::burn_from(&self.env(), self.synth(), caller, synth_amount);
        self.payout_collateral(caller, net_collateral, fee_collateral);
        let (profit, penalty) = self.settle_basis(caller, synth_amount, synth_price);

        self.env().emit_event(Redeemed {
            caller,
            synth_in: synth_amount,
            collateral_out: net_collateral,
            share_out: U256::zero(),
        });
        (profit, penalty)
    }

    /// Redeem fully into freshly minted share; requires ECR == 0
    pub fn redeem_algorithmic(&mut self, synth_amount: U256, share_out_min: U256) -> (U256, U256) {
        self.before_action(synth_amount, self.redeem_paused(), SynthError::RedeemingPaused);

        if !self.ecr().is_zero() {
            self.env().revert(SynthError::RatioNotZero);
        }

        let one = U256::from(ONE);
        let synth_price = self.get_synth_price();
        let synth_value = synth_amount * synth_price / one;
        let share_out = synth_value * one / self.share_price();
        let fee_share = share_out * self.redemption_fee() / one;
        let net_share = share_out - fee_share;
        if net_share < share_out_min {
            self.env().revert(SynthError::SlippageLimitReached);
        }

        let caller = self.env().caller();
        TokenClient::burn_from(&self.env(), self.synth(), caller, synth_amount);
        self.payout_share(caller, net_share, fee_share);
        let (profit, penalty) = self.settle_basis(caller, synth_amount, synth_price);

        self.env().emit_event(Redeemed {
            caller,
            synth_in: synth_amount,
            collateral_out: U256::zero(),
            share_out: net_share,
        });
        (profit, penalty)
    }

    /// Redeem into collateral and share split by the current ECR;
    /// requires 0 < ECR < 1
    pub fn redeem_fractional(
        &mut self,
        synth_amount: U256,
        collateral_out_min: U256,
        share_out_min: U256,
    ) -> (U256, U256) {
        self.before_action(synth_amount, self.redeem_paused(), SynthError::RedeemingPaused);

        let one = U256::from(ONE);
        let ecr = self.ecr();
        if ecr.is_zero() || ecr >= one {
            self.env().revert(SynthError::RatioNotFractional);
        }

        let synth_price = self.get_synth_price();
        let synth_value = synth_amount * synth_price / one;
        let collateral_value = synth_value * ecr / one;
        let share_value = synth_value - collateral_value;

        let collateral_out = collateral_value * one / self.get_collateral_price();
        let share_out = share_value * one / self.share_price();

        let fee = self.redemption_fee();
        let fee_collateral = collateral_out * fee / one;
        let fee_share = share_out * fee / one;
        let net_collateral = collateral_out - fee_collateral;
        let net_share = share_out - fee_share;
        if net_collateral < collateral_out_min || net_share < share_out_min {
            self.env().revert(SynthError::SlippageLimitReached);
        }

        let caller = self.env().caller();
        TokenClient::burn_from(&self.env(), self.synth(), caller, synth_amount);
        self.payout_collateral(caller, net_collateral, fee_collateral);
        self.payout_share(caller, net_share, fee_share);
        let (profit, penalty) = self.settle_basis(caller, synth_amount, synth_price);

        self.env().emit_event(Redeemed {
            caller,
            synth_in: synth_amount,
            collateral_out: net_collateral,
            share_out: net_share,
        });
        (profit, penalty)
    }

    // ========== Administration ==========

    pub fn toggle_minting(&mut self) {
        self.access.require(ROLE_PAUSER);
        let paused = !self.mint_paused();
        self.mint_paused.set(paused);
        self.env().emit_event(MintingToggled { paused });
    }

    pub fn toggle_redeeming(&mut self) {
        self.access.require(ROLE_PAUSER);
        let paused = !self.redeem_paused();
        self.redeem_paused.set(paused);
        self.env().emit_event(RedeemingToggled { paused });
    }

    pub fn set_minting_fee(&mut self, fee: U256) {
        self.access.require(ROLE_MAINTAINER);
        self.require_fee_bound(fee);
        self.minting_fee.set(fee);
    }

    pub fn set_redemption_fee(&mut self, fee: U256) {
        self.access.require(ROLE_MAINTAINER);
        self.require_fee_bound(fee);
        self.redemption_fee.set(fee);
    }

    pub fn set_action_delay(&mut self, delay: u64) {
        self.access.require(ROLE_MAINTAINER);
        if delay == 0 {
            self.env().revert(SynthError::DelayTooShort);
        }
        self.action_delay.set(delay);
    }

    /// Sweep accrued fees out of the pool (maintainer only)
    pub fn withdraw_fee(&mut self) {
        self.access.require(ROLE_MAINTAINER);

        let caller = self.env().caller();
        let this = self.env().self_address();
        let collateral_amount = TokenClient::balance_of(&self.env(), self.collateral(), this);
        let share_amount = TokenClient::balance_of(&self.env(), self.share(), this);

        if !collateral_amount.is_zero() {
            TokenClient::transfer(&self.env(), self.collateral(), caller, collateral_amount);
        }
        if !share_amount.is_zero() {
            TokenClient::transfer(&self.env(), self.share(), caller, share_amount);
        }

        self.env().emit_event(FeeWithdrawn {
            to: caller,
            collateral_amount,
            share_amount,
        });
    }

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

    fn reserve(&self) -> Address {
        self.collateral_reserve.get().unwrap_or_revert(&self.env())
    }

    fn collateral(&self) -> Address {
        self.collateral_token.get().unwrap_or_revert(&self.env())
    }

    fn synth(&self) -> Address {
        self.synth_token.get().unwrap_or_revert(&self.env())
    }

    fn share(&self) -> Address {
        self.share_token.get().unwrap_or_revert(&self.env())
    }

    fn tcr(&self) -> U256 {
        ReserveClient::global_collateral_ratio(&self.env(), self.reserve())
    }

    fn ecr(&self) -> U256 {
        ReserveClient::get_ecr(&self.env(), self.reserve())
    }

    fn share_price(&self) -> U256 {
        ReserveClient::get_share_price(&self.env(), self.reserve())
    }

    /// Common mint/redeem preamble: pause flag, zero amount, per-user delay
    fn before_action(&mut self, amount: U256, paused: bool, paused_error: SynthError) {
        if paused {
            self.env().revert(paused_error);
        }
        if amount.is_zero() {
            self.env().revert(SynthError::ZeroAmount);
        }

        let caller = self.env().caller();
        let now = self.env().get_block_time();
        if now < self.last_action(caller) + self.action_delay() {
            self.env().revert(SynthError::ActionDelayNotPassed);
        }
        self.last_action.set(&caller, now);
    }

    /// Move collateral in: net portion to the reserve, fee portion to the pool
    fn pull_collateral(&self, from: Address, net: U256, fee: U256) {
        let collateral = self.collateral();
        if !net.is_zero() {
            TokenClient::transfer_from(&self.env(), collateral, from, self.reserve(), net);
        }
        if !fee.is_zero() {
            let this = self.env().self_address();
            TokenClient::transfer_from(&self.env(), collateral, from, this, fee);
        }
    }

    /// Move share in: net portion burned, fee portion to the pool
    fn pull_share(&self, from: Address, net: U256, fee: U256) {
        let share = self.share();
        if !net.is_zero() {
            TokenClient::burn_from(&self.env(), share, from, net);
        }
        if !fee.is_zero() {
            let this = self.env().self_address();
            TokenClient::transfer_from(&self.env(), share, from, this, fee);
        }
    }

    /// Pay collateral out of the reserve: net to the user, fee to the pool
    fn payout_collateral(&self, to: Address, net: U256, fee: U256) {
        let reserve = self.reserve();
        let collateral = self.collateral();
        if !net.is_zero() {
            ReserveClient::request_transfer(&self.env(), reserve, to, collateral, net);
        }
        if !fee.is_zero() {
            let this = self.env().self_address();
            ReserveClient::request_transfer(&self.env(), reserve, this, collateral, fee);
        }
    }

    /// Mint share out: net to the user, fee to the pool
    fn payout_share(&self, to: Address, net: U256, fee: U256) {
        let share = self.share();
        if !net.is_zero() {
            TokenClient::mint(&self.env(), share, to, net);
        }
        if !fee.is_zero() {
            let this = self.env().self_address();
            TokenClient::mint(&self.env(), share, this, fee);
        }
    }

    /// Fold a mint into the caller's volume-weighted cost basis
    fn record_mint_basis(&mut self, account: Address, minted: U256, price: U256) {
        let held = self.basis_amount(account);
        let total = held + minted;
        if total.is_zero() {
            return;
        }
        let blended = (self.basis_price(account) * held + price * minted) / total;
        self.basis_price.set(&account, blended);
        self.basis_amount.set(&account, total);
    }

    /// Realize price movement against the recorded basis
    fn settle_basis(&mut self, account: Address, redeemed: U256, price: U256) -> (U256, U256) {
        let held = self.basis_amount(account);
        let covered = if redeemed > held { held } else { redeemed };
        if covered.is_zero() {
            return (U256::zero(), U256::zero());
        }

        let basis = self.basis_price(account);
        let one = U256::from(ONE);
        let (profit, penalty) = if price > basis {
            ((price - basis) * covered / one, U256::zero())
        } else {
            (U256::zero(), (basis - price) * covered / one)
        };

        self.basis_amount.set(&account, held - covered);
        self.env().emit_event(Profited {
            caller: account,
            profit,
            penalty,
        });
        (profit, penalty)
    }

    fn require_fee_bound(&self, fee: U256) {
        if fee > U256::from(MAX_FEE) {
            self.env().revert(SynthError::FeeTooHigh);
        }
    }
}
