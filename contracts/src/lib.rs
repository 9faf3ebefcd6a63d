//! CSPR-Synth Contracts
//!
//! Casper-native fractional-reserve synthetic stablecoin protocol.
//!
//! ## Architecture
//!
//! - **CollateralReserve**: collateral custody, global accounting
//!   (GCV / TGSV / ECR), target collateral ratio (TCR) management,
//!   buyback and recollateralization, vault deployment
//! - **ReserveTracker**: share-token liquidity aggregation across AMM pairs
//! - **PidController**: growth-ratio feedback controller stepping the TCR
//! - **StablePidController**: peg-aware controller layering synth price
//!   bands over the growth-ratio signal
//! - **SynthPool**: user-facing mint/redeem facade (1:1, fractional,
//!   algorithmic modes gated by TCR/ECR)
//! - **Mocks**: token / oracle / AMM pair / vault collaborators for tests
//!
//! All ratios, prices and amounts are 18-decimal fixed-point `U256`;
//! division truncates toward zero.

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod access_control;
pub mod errors;
pub mod interfaces;
pub mod registry;

// Contract modules
pub mod collateral_reserve;
pub mod mocks;
pub mod pid_controller;
pub mod reserve_tracker;
pub mod stable_pid_controller;
pub mod synth_pool;

/// Fixed-point scale (1e18) shared by all ratios, prices and amounts
pub const ONE: u128 = 1_000_000_000_000_000_000;

/// Default TCR step size (0.25%)
pub const DEFAULT_RATIO_DELTA: u128 = 2_500_000_000_000_000;

/// Default recollateralization bonus (0.75%)
pub const DEFAULT_BONUS_RATE: u128 = 7_500_000_000_000_000;

/// Share of idle reserves deployed into vaults (70%)
pub const DEFAULT_INVEST_COLLATERAL_RATIO: u128 = 700_000_000_000_000_000;

/// Upper bound on every protocol fee (5%)
pub const MAX_FEE: u128 = 50_000_000_000_000_000;
