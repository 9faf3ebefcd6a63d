//! Cross-contract call helpers.
//!
//! Thin wrappers over `CallDef` for the external contracts the protocol
//! talks to: fungible tokens, price oracles, AMM pairs, and yield vaults.
//! All values are 18-decimal `U256`.

use odra::casper_types::{runtime_args, U256};
use odra::prelude::*;
use odra::CallDef;

/// Fungible token client (CEP-18 style surface plus protocol mint/burn)
pub struct TokenClient;

impl TokenClient {
    pub fn total_supply(env: &odra::ContractEnv, token: Address) -> U256 {
        let call_def = CallDef::new("total_supply", false, runtime_args! {});
        env.call_contract(token, call_def)
    }

    pub fn balance_of(env: &odra::ContractEnv, token: Address, account: Address) -> U256 {
        let args = runtime_args! { "account" => account };
        let call_def = CallDef::new("balance_of", false, args);
        env.call_contract(token, call_def)
    }

    pub fn transfer(env: &odra::ContractEnv, token: Address, recipient: Address, amount: U256) {
        let args = runtime_args! {
            "recipient" => recipient,
            "amount" => amount,
        };
        let call_def = CallDef::new("transfer", true, args);
        env.call_contract::<bool>(token, call_def);
    }

    pub fn transfer_from(
        env: &odra::ContractEnv,
        token: Address,
        owner: Address,
        recipient: Address,
        amount: U256,
    ) {
        let args = runtime_args! {
            "owner" => owner,
            "recipient" => recipient,
            "amount" => amount,
        };
        let call_def = CallDef::new("transfer_from", true, args);
        env.call_contract::<bool>(token, call_def);
    }

    pub fn mint(env: &odra::ContractEnv, token: Address, to: Address, amount: U256) {
        let args = runtime_args! {
            "to" => to,
            "amount" => amount,
        };
        let call_def = CallDef::new("mint", true, args);
        env.call_contract::<()>(token, call_def);
    }

    pub fn burn_from(env: &odra::ContractEnv, token: Address, from: Address, amount: U256) {
        let args = runtime_args! {
            "from" => from,
            "amount" => amount,
        };
        let call_def = CallDef::new("burn_from", true, args);
        env.call_contract::<()>(token, call_def);
    }

    /// Spot price of a synth token, read from the token's own oracle binding
    pub fn synth_price(env: &odra::ContractEnv, token: Address) -> U256 {
        let call_def = CallDef::new("get_synth_price", false, runtime_args! {});
        env.call_contract(token, call_def)
    }
}

/// Price oracle client
pub struct OracleClient;

impl OracleClient {
    /// Value of `amount_in` units of `token`, scaled by 1e18
    pub fn consult(
        env: &odra::ContractEnv,
        oracle: Address,
        token: Address,
        amount_in: U256,
    ) -> U256 {
        let args = runtime_args! {
            "token" => token,
            "amount_in" => amount_in,
        };
        let call_def = CallDef::new("consult", false, args);
        env.call_contract(oracle, call_def)
    }
}

/// AMM pair client
pub struct PairClient;

impl PairClient {
    pub fn token0(env: &odra::ContractEnv, pair: Address) -> Address {
        let call_def = CallDef::new("token0", false, runtime_args! {});
        env.call_contract(pair, call_def)
    }

    pub fn token1(env: &odra::ContractEnv, pair: Address) -> Address {
        let call_def = CallDef::new("token1", false, runtime_args! {});
        env.call_contract(pair, call_def)
    }

    pub fn get_reserves(env: &odra::ContractEnv, pair: Address) -> (U256, U256) {
        let call_def = CallDef::new("get_reserves", false, runtime_args! {});
        env.call_contract(pair, call_def)
    }
}

/// Collateral reserve client (controller and pool side)
pub struct ReserveClient;

impl ReserveClient {
    pub fn total_global_synth_value(env: &odra::ContractEnv, reserve: Address) -> U256 {
        let call_def = CallDef::new("total_global_synth_value", false, runtime_args! {});
        env.call_contract(reserve, call_def)
    }

    pub fn global_collateral_ratio(env: &odra::ContractEnv, reserve: Address) -> U256 {
        let call_def = CallDef::new("global_collateral_ratio", false, runtime_args! {});
        env.call_contract(reserve, call_def)
    }

    pub fn get_ecr(env: &odra::ContractEnv, reserve: Address) -> U256 {
        let call_def = CallDef::new("get_ecr", false, runtime_args! {});
        env.call_contract(reserve, call_def)
    }

    pub fn get_share_price(env: &odra::ContractEnv, reserve: Address) -> U256 {
        let call_def = CallDef::new("get_share_price", false, runtime_args! {});
        env.call_contract(reserve, call_def)
    }

    pub fn get_collateral_price(env: &odra::ContractEnv, reserve: Address, asset: Address) -> U256 {
        let args = runtime_args! { "asset" => asset };
        let call_def = CallDef::new("get_collateral_price", false, args);
        env.call_contract(reserve, call_def)
    }

    pub fn step_up_tcr(env: &odra::ContractEnv, reserve: Address) {
        let call_def = CallDef::new("step_up_tcr", true, runtime_args! {});
        env.call_contract::<()>(reserve, call_def);
    }

    pub fn step_down_tcr(env: &odra::ContractEnv, reserve: Address) {
        let call_def = CallDef::new("step_down_tcr", true, runtime_args! {});
        env.call_contract::<()>(reserve, call_def);
    }

    pub fn request_transfer(
        env: &odra::ContractEnv,
        reserve: Address,
        to: Address,
        asset: Address,
        amount: U256,
    ) {
        let args = runtime_args! {
            "to" => to,
            "asset" => asset,
            "amount" => amount,
        };
        let call_def = CallDef::new("request_transfer", true, args);
        env.call_contract::<()>(reserve, call_def);
    }
}

/// Reserve tracker client
pub struct TrackerClient;

impl TrackerClient {
    pub fn get_share_reserves(env: &odra::ContractEnv, tracker: Address) -> U256 {
        let call_def = CallDef::new("get_share_reserves", false, runtime_args! {});
        env.call_contract(tracker, call_def)
    }
}

/// Yield vault client
pub struct VaultClient;

impl VaultClient {
    pub fn asset(env: &odra::ContractEnv, vault: Address) -> Address {
        let call_def = CallDef::new("asset", false, runtime_args! {});
        env.call_contract(vault, call_def)
    }

    pub fn vault_balance(env: &odra::ContractEnv, vault: Address) -> U256 {
        let call_def = CallDef::new("vault_balance", false, runtime_args! {});
        env.call_contract(vault, call_def)
    }

    pub fn deposit(env: &odra::ContractEnv, vault: Address, amount: U256) {
        let args = runtime_args! { "amount" => amount };
        let call_def = CallDef::new("deposit", true, args);
        env.call_contract::<()>(vault, call_def);
    }

    pub fn withdraw(env: &odra::ContractEnv, vault: Address, amount: U256) {
        let args = runtime_args! { "amount" => amount };
        let call_def = CallDef::new("withdraw", true, args);
        env.call_contract::<()>(vault, call_def);
    }
}
