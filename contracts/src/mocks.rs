//! Test collaborators.
//!
//! Deployable stand-ins for the external contracts the protocol consults:
//! a fungible token with protocol mint/burn, a settable price oracle, an
//! AMM pair with fixed tokens and settable reserves, and a single-asset
//! yield vault.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::errors::SynthError;
use crate::interfaces::{OracleClient, TokenClient};
use crate::ONE;

/// 18-decimal fungible token with owner-granted minters and an optional
/// oracle binding for synth pricing.
#[odra::module]
pub struct MockToken {
    name: Var<String>,
    symbol: Var<String>,
    decimals: Var<u8>,
    total_supply: Var<U256>,
    balances: Mapping<Address, U256>,
    /// (owner, spender) -> amount
    allowances: Mapping<(Address, Address), U256>,
    /// Accounts allowed to mint and burn
    minters: Mapping<Address, bool>,
    owner: Var<Address>,
    /// Oracle consulted by `get_synth_price`
    oracle: Var<Address>,
}

#[odra::module]
impl MockToken {
    pub fn init(&mut self, name: String, symbol: String, initial_supply: U256) {
        let caller = self.env().caller();
        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(18);
        self.owner.set(caller);
        self.total_supply.set(initial_supply);
        self.balances.set(&caller, initial_supply);
    }

    pub fn name(&self) -> String {
        self.name.get().unwrap_or_default()
    }

    pub fn symbol(&self) -> String {
        self.symbol.get().unwrap_or_default()
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get().unwrap_or(18)
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply.get().unwrap_or(U256::zero())
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).unwrap_or(U256::zero())
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or(U256::zero())
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let sender = self.env().caller();
        self.transfer_internal(sender, recipient, amount);
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        self.allowances.set(&(owner, spender), amount);
        true
    }

    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        let spender = self.env().caller();

        let current_allowance = self.allowance(owner, spender);
        if current_allowance < amount {
            self.env().revert(SynthError::InsufficientAllowance);
        }

        self.transfer_internal(owner, recipient, amount);
        self.allowances.set(&(owner, spender), current_allowance - amount);
        true
    }

    /// Mint new tokens (minters only)
    pub fn mint(&mut self, to: Address, amount: U256) {
        self.require_minter();

        let balance = self.balance_of(to);
        self.balances.set(&to, balance + amount);
        self.total_supply.set(self.total_supply() + amount);
    }

    /// Burn tokens from an account (minters only)
    pub fn burn_from(&mut self, from: Address, amount: U256) {
        self.require_minter();

        let balance = self.balance_of(from);
        if balance < amount {
            self.env().revert(SynthError::InsufficientBalance);
        }

        self.balances.set(&from, balance - amount);
        self.total_supply.set(self.total_supply() - amount);
    }

    /// Allow an account to mint and burn (owner only)
    pub fn add_minter(&mut self, minter: Address) {
        self.require_owner();
        self.minters.set(&minter, true);
    }

    pub fn remove_minter(&mut self, minter: Address) {
        self.require_owner();
        self.minters.set(&minter, false);
    }

    pub fn is_minter(&self, account: Address) -> bool {
        self.minters.get(&account).unwrap_or(false)
    }

    /// Bind the oracle used for synth pricing (owner only)
    pub fn set_oracle(&mut self, oracle: Address) {
        self.require_owner();
        self.oracle.set(oracle);
    }

    /// Spot price of this token via its bound oracle
    pub fn get_synth_price(&self) -> U256 {
        match self.oracle.get() {
            Some(oracle) => OracleClient::consult(
                &self.env(),
                oracle,
                self.env().self_address(),
                U256::from(ONE),
            ),
            None => self.env().revert(SynthError::MissingOracle),
        }
    }

    fn transfer_internal(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(SynthError::InsufficientBalance);
        }

        self.balances.set(&from, from_balance - amount);
        let to_balance = self.balance_of(to);
        self.balances.set(&to, to_balance + amount);
    }

    fn require_minter(&self) {
        let caller = self.env().caller();
        if !self.is_minter(caller) {
            self.env().revert(SynthError::NotMinter);
        }
    }

    fn require_owner(&self) {
        if Some(self.env().caller()) != self.owner.get() {
            self.env().revert(SynthError::NotOwner);
        }
    }
}

/// Settable spot-price oracle
#[odra::module]
pub struct MockOracle {
    /// token -> price of one whole token, 1e18-scaled
    prices: Mapping<Address, U256>,
}

#[odra::module]
impl MockOracle {
    pub fn init(&mut self) {}

    pub fn set_price(&mut self, token: Address, price: U256) {
        self.prices.set(&token, price);
    }

    pub fn get_price(&self, token: Address) -> U256 {
        self.prices.get(&token).unwrap_or(U256::zero())
    }

    /// Value of `amount_in` units of `token`
    pub fn consult(&self, token: Address, amount_in: U256) -> U256 {
        amount_in * self.get_price(token) / U256::from(ONE)
    }
}

/// AMM pair with fixed tokens and settable reserves
#[odra::module]
pub struct MockPair {
    token0: Var<Address>,
    token1: Var<Address>,
    reserve0: Var<U256>,
    reserve1: Var<U256>,
}

#[odra::module]
impl MockPair {
    pub fn init(&mut self, token0: Address, token1: Address, reserve0: U256, reserve1: U256) {
        self.token0.set(token0);
        self.token1.set(token1);
        self.reserve0.set(reserve0);
        self.reserve1.set(reserve1);
    }

    pub fn token0(&self) -> Address {
        self.token0.get().unwrap_or_revert(&self.env())
    }

    pub fn token1(&self) -> Address {
        self.token1.get().unwrap_or_revert(&self.env())
    }

    pub fn get_reserves(&self) -> (U256, U256) {
        (
            self.reserve0.get().unwrap_or(U256::zero()),
            self.reserve1.get().unwrap_or(U256::zero()),
        )
    }

    pub fn set_reserves(&mut self, reserve0: U256, reserve1: U256) {
        self.reserve0.set(reserve0);
        self.reserve1.set(reserve1);
    }
}

/// Single-asset yield vault driven by one operator (the reserve).
///
/// `deposit` records funds the operator has already transferred in;
/// `withdraw` sends them back to the operator.
#[odra::module]
pub struct MockVault {
    asset: Var<Address>,
    operator: Var<Address>,
    invested: Var<U256>,
}

#[odra::module]
impl MockVault {
    pub fn init(&mut self, asset: Address, operator: Address) {
        self.asset.set(asset);
        self.operator.set(operator);
        self.invested.set(U256::zero());
    }

    pub fn asset(&self) -> Address {
        self.asset.get().unwrap_or_revert(&self.env())
    }

    pub fn vault_balance(&self) -> U256 {
        self.invested.get().unwrap_or(U256::zero())
    }

    pub fn deposit(&mut self, amount: U256) {
        self.require_operator();
        self.invested.set(self.vault_balance() + amount);
    }

    pub fn withdraw(&mut self, amount: U256) {
        self.require_operator();

        let invested = self.vault_balance();
        if invested < amount {
            self.env().revert(SynthError::InsufficientBalance);
        }

        self.invested.set(invested - amount);
        let operator = self.operator.get().unwrap_or_revert(&self.env());
        TokenClient::transfer(&self.env(), self.asset(), operator, amount);
    }

    fn require_operator(&self) {
        if Some(self.env().caller()) != self.operator.get() {
            self.env().revert(SynthError::NotOwner);
        }
    }
}
