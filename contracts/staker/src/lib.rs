#![no_std]

#[cfg(test)]
extern crate std;

pub mod accrual;
pub mod events;
mod storage;

use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env, Vec};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum StakerError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidAmount = 3,
    TransferFailed = 4,
    NoActiveStake = 5,
    ArithmeticOverflow = 6,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Immutable deployment parameters.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub reward_token: Address,
    pub owner: Address,
}

/// Pool-wide accounting.
///
/// `total_staked` always equals the sum of every stored position's
/// `principal`. `reward_rate` is the emission rate cached at the last
/// settlement and applies to the interval that follows it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    pub total_staked: i128,
    pub last_settled_block: u32,
    pub reward_rate: i128,
    pub staker_count: u32,
}

/// One depositor's stake. Stored only while `principal > 0`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakePosition {
    pub principal: i128,
    pub accrued_reward: i128,
    pub last_settled_block: u32,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakerContract;

#[contractimpl]
impl StakerContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `reward_token` – token that is both staked and paid out; also the
    ///   source of the emission rate.
    /// * `owner`        – administrator address, exposed read-only.
    pub fn initialize(env: Env, reward_token: Address, owner: Address) -> Result<(), StakerError> {
        if storage::is_initialized(&env) {
            return Err(StakerError::AlreadyInitialized);
        }

        let start_block = env.ledger().sequence();
        let reward_rate = accrual::current_rate(&env, &reward_token);

        storage::write_config(
            &env,
            &PoolConfig {
                reward_token: reward_token.clone(),
                owner: owner.clone(),
            },
        );
        storage::write_pool(
            &env,
            &PoolState {
                total_staked: 0,
                last_settled_block: start_block,
                reward_rate,
                staker_count: 0,
            },
        );

        events::publish_initialized(&env, reward_token, owner, reward_rate, start_block);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Stake `amount` tokens previously approved for this contract.
    ///
    /// The pool is settled first so the new principal earns nothing for
    /// blocks before this one.
    pub fn deposit(env: Env, staker: Address, amount: i128) -> Result<(), StakerError> {
        staker.require_auth();
        if amount <= 0 {
            return Err(StakerError::InvalidAmount);
        }

        // 1. Settle the whole pool at the current height.
        let settled_at = accrual::settle(&env, env.ledger().sequence())?.block;

        // 2. Pull tokens from the staker into custody.
        let config = storage::read_config(&env)?;
        let custody = env.current_contract_address();
        let pulled = token::Client::new(&env, &config.reward_token).try_transfer_from(
            &custody,
            &staker,
            &custody,
            &amount,
        );
        if !matches!(pulled, Ok(Ok(()))) {
            return Err(StakerError::TransferFailed);
        }

        // 3. Credit the position and the pool.
        let mut pool = storage::read_pool(&env)?;
        let mut position = match storage::read_position(&env, &staker) {
            Some(position) => position,
            None => {
                storage::add_staker(&env, &staker);
                pool.staker_count = pool.staker_count.saturating_add(1);
                StakePosition {
                    principal: 0,
                    accrued_reward: 0,
                    last_settled_block: settled_at,
                }
            }
        };

        position.principal = position
            .principal
            .checked_add(amount)
            .ok_or(StakerError::ArithmeticOverflow)?;
        pool.total_staked = pool
            .total_staked
            .checked_add(amount)
            .ok_or(StakerError::ArithmeticOverflow)?;

        // 4. Stamp the pool's checkpoint, which never moves backwards.
        position.last_settled_block = settled_at;

        storage::write_position(&env, &staker, &position);
        storage::write_pool(&env, &pool);

        events::publish_deposited(&env, staker, amount, position.principal, pool.total_staked);

        Ok(())
    }

    /// Return the caller's full principal plus accrued reward and close the
    /// position. Returns the amount paid out.
    ///
    /// If the payout transfer fails the position is left untouched.
    pub fn withdraw(env: Env, staker: Address) -> Result<i128, StakerError> {
        staker.require_auth();

        let has_stake = storage::read_position(&env, &staker)
            .map(|position| position.principal > 0)
            .unwrap_or(false);
        if !has_stake {
            return Err(StakerError::NoActiveStake);
        }

        // 1. Settle so the position holds everything it is owed.
        accrual::settle(&env, env.ledger().sequence())?;

        let position =
            storage::read_position(&env, &staker).ok_or(StakerError::NoActiveStake)?;
        let payout = position
            .principal
            .checked_add(position.accrued_reward)
            .ok_or(StakerError::ArithmeticOverflow)?;

        // 2. Pay out of custody.
        let config = storage::read_config(&env)?;
        let paid = token::Client::new(&env, &config.reward_token).try_transfer(
            &env.current_contract_address(),
            &staker,
            &payout,
        );
        if !matches!(paid, Ok(Ok(()))) {
            return Err(StakerError::TransferFailed);
        }

        // 3. Close the position.
        let mut pool = storage::read_pool(&env)?;
        pool.total_staked = pool
            .total_staked
            .checked_sub(position.principal)
            .ok_or(StakerError::ArithmeticOverflow)?;
        pool.staker_count = pool.staker_count.saturating_sub(1);

        storage::remove_position(&env, &staker);
        storage::remove_staker(&env, &staker);
        storage::write_pool(&env, &pool);

        events::publish_withdrawn(
            &env,
            staker,
            position.principal,
            position.accrued_reward,
            pool.total_staked,
        );

        Ok(payout)
    }

    /// Add reward liquidity to custody. Positions are unaffected.
    pub fn fund(env: Env, funder: Address, amount: i128) -> Result<(), StakerError> {
        funder.require_auth();
        if amount <= 0 {
            return Err(StakerError::InvalidAmount);
        }

        let config = storage::read_config(&env)?;
        let sent = token::Client::new(&env, &config.reward_token).try_transfer(
            &funder,
            &env.current_contract_address(),
            &amount,
        );
        if !matches!(sent, Ok(Ok(()))) {
            return Err(StakerError::TransferFailed);
        }

        events::publish_funded(&env, funder, amount);

        Ok(())
    }

    /// Settle the pool at the current height and pick up the token's
    /// current reward rate. Returns the settled height.
    pub fn checkpoint(env: Env) -> Result<u32, StakerError> {
        let settlement = accrual::settle(&env, env.ledger().sequence())?;
        Ok(settlement.block)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Reward `staker` would receive if the pool settled now.
    pub fn check_total_rewards(env: Env, staker: Address) -> Result<i128, StakerError> {
        accrual::preview_reward(&env, &staker)
    }

    pub fn reward_token(env: Env) -> Result<Address, StakerError> {
        storage::read_config(&env).map(|config| config.reward_token)
    }

    pub fn owner(env: Env) -> Result<Address, StakerError> {
        storage::read_config(&env).map(|config| config.owner)
    }

    pub fn get_position(env: Env, staker: Address) -> Option<StakePosition> {
        storage::read_position(&env, &staker)
    }

    pub fn get_pool_state(env: Env) -> Result<PoolState, StakerError> {
        storage::read_pool(&env)
    }

    pub fn get_total_staked(env: Env) -> Result<i128, StakerError> {
        storage::read_pool(&env).map(|pool| pool.total_staked)
    }

    /// Addresses that currently hold a position.
    pub fn get_stakers(env: Env) -> Vec<Address> {
        storage::read_stakers(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_properties;
