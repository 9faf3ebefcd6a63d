//! Protocol error definitions.

use odra::prelude::*;

/// Synthetic protocol errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SynthError {
    // Access control errors (1xx)
    NotMaintainer = 100,
    NotRatioSetter = 101,
    NotPool = 102,
    NotPauser = 103,
    NotOwner = 104,
    NotMinter = 105,

    // Lifecycle errors (2xx)
    AlreadyInitialized = 200,
    NotInitialized = 201,
    ControllerInactive = 202,
    CooldownNotPassed = 203,
    ActionDelayNotPassed = 204,

    // Pause state errors (3xx)
    MintingPaused = 300,
    RedeemingPaused = 301,
    BuybackPaused = 302,
    RecollateralizePaused = 303,

    // Ratio precondition errors (4xx)
    RatioNotOne = 400,
    RatioNotZero = 401,
    RatioNotFractional = 402,
    CollateralMixMismatch = 403,
    RatioOutOfBounds = 404,
    UndefinedSynthValueRatio = 405,

    // Economic limit errors (5xx)
    SlippageLimitReached = 500,
    BuybackOverExcess = 501,
    NoExcessCollateral = 502,
    RecollateralizeOverLimit = 503,
    NoCollateralDeficit = 504,
    InsufficientShare = 505,
    FeeTooHigh = 506,
    ZeroAmount = 507,
    DelayTooShort = 508,

    // Token errors (6xx)
    InsufficientBalance = 600,
    InsufficientAllowance = 601,

    // Registry errors (7xx)
    DuplicateEntry = 700,
    UnknownEntry = 701,
    OracleNotRegistered = 702,
    MissingOracle = 703,
    VaultNotRegistered = 704,
}

impl SynthError {
    pub const fn message(&self) -> &'static str {
        match self {
            // Access control
            SynthError::NotMaintainer => "Caller is not a maintainer",
            SynthError::NotRatioSetter => "Caller is not a ratio setter",
            SynthError::NotPool => "Sender is not a pool",
            SynthError::NotPauser => "Caller is not a pauser",
            SynthError::NotOwner => "Caller is not the owner",
            SynthError::NotMinter => "Caller is not a minter",

            // Lifecycle
            SynthError::AlreadyInitialized => "Contract already initialized",
            SynthError::NotInitialized => "Contract not initialized",
            SynthError::ControllerInactive => "Controller is not active",
            SynthError::CooldownNotPassed => "Internal cooldown not passed",
            SynthError::ActionDelayNotPassed => "Action delay not passed",

            // Pause state
            SynthError::MintingPaused => "Minting is paused",
            SynthError::RedeemingPaused => "Redeeming is paused",
            SynthError::BuybackPaused => "Buyback is paused",
            SynthError::RecollateralizePaused => "Recollateralize is paused",

            // Ratio preconditions
            SynthError::RatioNotOne => "Collateral ratio must be == 1",
            SynthError::RatioNotZero => "Collateral ratio must be 0",
            SynthError::RatioNotFractional => "Collateral ratio must be between 0 and 1",
            SynthError::CollateralMixMismatch => "Collateral and share mix does not match ratio",
            SynthError::RatioOutOfBounds => "New ratio exceeds bound",
            SynthError::UndefinedSynthValueRatio => "Ratio undefined: no synth value outstanding",

            // Economic limits
            SynthError::SlippageLimitReached => "Slippage limit reached",
            SynthError::BuybackOverExcess => "Buyback over excess balance",
            SynthError::NoExcessCollateral => "No excess collateral to buy back",
            SynthError::RecollateralizeOverLimit => "Recollateralize request over limit",
            SynthError::NoCollateralDeficit => "No collateral deficit to fill",
            SynthError::InsufficientShare => "Not enough share",
            SynthError::FeeTooHigh => "The new fee is too high",
            SynthError::ZeroAmount => "Amount must be greater than zero",
            SynthError::DelayTooShort => "Delay should not be zero",

            // Token
            SynthError::InsufficientBalance => "Insufficient token balance",
            SynthError::InsufficientAllowance => "Insufficient token allowance",

            // Registry
            SynthError::DuplicateEntry => "Address already exists",
            SynthError::UnknownEntry => "Address does not exist",
            SynthError::OracleNotRegistered => "Oracle does not exist",
            SynthError::MissingOracle => "No oracle set for collateral",
            SynthError::VaultNotRegistered => "Vault does not exist",
        }
    }
}

impl core::fmt::Display for SynthError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<SynthError> for OdraError {
    fn from(error: SynthError) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            OdraError::user(error as u16)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            OdraError::user(error as u16, error.message())
        }
    }
}
