#![no_std]

pub mod events;
mod storage;

use common::ttl;
use soroban_sdk::{
    contract, contractimpl, panic_with_error,
    token::{self, Interface as _},
    Address, Env, String,
};

pub use storage::{AllowanceValue, TokenMetadata};

/// Token errors.
///
/// Methods of the standard token interface cannot return `Result`, so they
/// raise these through `panic_with_error!`; a caller using a `try_` client
/// still receives them as a failed call.
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum TokenError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientBalance = 5,
    InsufficientAllowance = 6,
    InvalidExpiration = 7,
}

/// Fungible token that also publishes the staking emission rate.
#[contract]
pub struct RewardToken;

#[contractimpl]
impl RewardToken {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the token and mint `initial_supply` to `owner`.
    ///
    /// * `reward_rate` – reward units emitted per ledger to staking pools
    ///   that read it through `get_reward_rate`.
    pub fn initialize(
        env: Env,
        owner: Address,
        decimals: u32,
        name: String,
        symbol: String,
        initial_supply: i128,
        reward_rate: i128,
    ) -> Result<(), TokenError> {
        if storage::is_initialized(&env) {
            return Err(TokenError::AlreadyInitialized);
        }
        if initial_supply < 0 || reward_rate < 0 {
            return Err(TokenError::InvalidAmount);
        }

        let metadata = TokenMetadata {
            decimals,
            name: name.clone(),
            symbol: symbol.clone(),
        };
        storage::write_config(&env, &owner, &metadata, reward_rate);

        if initial_supply > 0 {
            storage::receive_balance(&env, &owner, initial_supply)?;
            storage::write_total_supply(&env, initial_supply);
        }

        events::publish_initialized(&env, owner, name, symbol, initial_supply, reward_rate);

        Ok(())
    }

    // ── Owner operations ────────────────────────────────────────────────────

    /// Create `amount` new tokens for `to`. Owner only.
    pub fn mint(env: Env, caller: Address, to: Address, amount: i128) -> Result<(), TokenError> {
        caller.require_auth();
        let owner = Self::require_owner(&env, &caller)?;
        if amount <= 0 {
            return Err(TokenError::InvalidAmount);
        }

        let supply = storage::read_total_supply(&env)
            .checked_add(amount)
            .ok_or(TokenError::InvalidAmount)?;
        storage::receive_balance(&env, &to, amount)?;
        storage::write_total_supply(&env, supply);
        ttl::extend_instance(&env);

        events::publish_mint(&env, owner, to, amount);

        Ok(())
    }

    /// Change the emission rate. Owner only.
    ///
    /// Pools cache the rate they last settled with; see the staker's
    /// `checkpoint` for applying a new rate from the current ledger.
    pub fn set_reward_rate(env: Env, caller: Address, new_rate: i128) -> Result<(), TokenError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        if new_rate < 0 {
            return Err(TokenError::InvalidAmount);
        }

        let previous_rate = storage::read_reward_rate(&env);
        storage::write_reward_rate(&env, new_rate);
        ttl::extend_instance(&env);

        events::publish_reward_rate_set(&env, previous_rate, new_rate);

        Ok(())
    }

    // ── Views ───────────────────────────────────────────────────────────────

    pub fn get_reward_rate(env: Env) -> i128 {
        storage::read_reward_rate(&env)
    }

    pub fn owner(env: Env) -> Result<Address, TokenError> {
        storage::read_owner(&env)
    }

    pub fn total_supply(env: Env) -> i128 {
        storage::read_total_supply(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    fn require_owner(env: &Env, caller: &Address) -> Result<Address, TokenError> {
        let owner = storage::read_owner(env)?;
        if *caller != owner {
            return Err(TokenError::Unauthorized);
        }
        Ok(owner)
    }

    fn move_balance(env: &Env, from: &Address, to: &Address, amount: i128) {
        check_amount(env, amount);
        if let Err(err) = storage::spend_balance(env, from, amount) {
            panic_with_error!(env, err);
        }
        if let Err(err) = storage::receive_balance(env, to, amount) {
            panic_with_error!(env, err);
        }
    }

    fn destroy(env: &Env, from: &Address, amount: i128) {
        check_amount(env, amount);
        if let Err(err) = storage::spend_balance(env, from, amount) {
            panic_with_error!(env, err);
        }
        let supply = storage::read_total_supply(env).saturating_sub(amount);
        storage::write_total_supply(env, supply);
    }
}

fn check_amount(env: &Env, amount: i128) {
    if amount < 0 {
        panic_with_error!(env, TokenError::InvalidAmount);
    }
}

fn unwrap_or_panic<T>(env: &Env, result: Result<T, TokenError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic_with_error!(env, err),
    }
}

#[contractimpl]
impl token::Interface for RewardToken {
    fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        storage::read_allowance(&env, &from, &spender).amount
    }

    fn approve(env: Env, from: Address, spender: Address, amount: i128, expiration_ledger: u32) {
        from.require_auth();
        check_amount(&env, amount);
        ttl::extend_instance(&env);

        unwrap_or_panic(
            &env,
            storage::write_allowance(&env, &from, &spender, amount, expiration_ledger),
        );

        events::publish_approve(&env, from, spender, amount, expiration_ledger);
    }

    fn balance(env: Env, id: Address) -> i128 {
        storage::read_balance(&env, &id)
    }

    fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        ttl::extend_instance(&env);

        Self::move_balance(&env, &from, &to, amount);

        events::publish_transfer(&env, from, to, amount);
    }

    fn transfer_from(env: Env, spender: Address, from: Address, to: Address, amount: i128) {
        spender.require_auth();
        check_amount(&env, amount);
        ttl::extend_instance(&env);

        unwrap_or_panic(
            &env,
            storage::spend_allowance(&env, &from, &spender, amount),
        );
        Self::move_balance(&env, &from, &to, amount);

        events::publish_transfer(&env, from, to, amount);
    }

    fn burn(env: Env, from: Address, amount: i128) {
        from.require_auth();
        ttl::extend_instance(&env);

        Self::destroy(&env, &from, amount);

        events::publish_burn(&env, from, amount);
    }

    fn burn_from(env: Env, spender: Address, from: Address, amount: i128) {
        spender.require_auth();
        check_amount(&env, amount);
        ttl::extend_instance(&env);

        unwrap_or_panic(
            &env,
            storage::spend_allowance(&env, &from, &spender, amount),
        );
        Self::destroy(&env, &from, amount);

        events::publish_burn(&env, from, amount);
    }

    fn decimals(env: Env) -> u32 {
        unwrap_or_panic(&env, storage::read_metadata(&env)).decimals
    }

    fn name(env: Env) -> String {
        unwrap_or_panic(&env, storage::read_metadata(&env)).name
    }

    fn symbol(env: Env) -> String {
        unwrap_or_panic(&env, storage::read_metadata(&env)).symbol
    }
}
