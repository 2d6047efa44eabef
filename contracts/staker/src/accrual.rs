use soroban_sdk::{contractclient, log, Address, Env, I256};

use crate::{events, storage, StakerError};

/// The only piece of the reward token the engine reads.
#[contractclient(name = "RewardRateClient")]
pub trait RewardRateSource {
    fn get_reward_rate(env: Env) -> i128;
}

/// Outcome of one `settle` call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub block: u32,
    pub elapsed: u32,
    pub distributed: i128,
}

// ── Core arithmetic ─────────────────────────────────────────────────────────

/// Blocks since the last checkpoint. Repeated or regressed heights yield 0.
pub fn elapsed_blocks(last_settled: u32, current: u32) -> u32 {
    current.saturating_sub(last_settled)
}

/// Total reward released to the pool over `elapsed` blocks.
pub fn emission(elapsed: u32, reward_rate: i128) -> Result<i128, StakerError> {
    reward_rate
        .checked_mul(i128::from(elapsed))
        .ok_or(StakerError::ArithmeticOverflow)
}

/// One position's cut of the emission over `elapsed` blocks:
///
/// ```text
/// share = floor(elapsed × rate × principal / total_staked)
/// ```
///
/// The product is formed in 256 bits so 18-decimal amounts cannot overflow
/// before the division. The fractional remainder is dropped and never
/// carried into a later settlement.
///
/// # Arguments
/// * `env`          - backs the 256-bit intermediates
/// * `elapsed`      - blocks in the interval being paid
/// * `reward_rate`  - tokens released per block over that interval
/// * `principal`    - the position's stake
/// * `total_staked` - pool-wide stake over the same interval
pub fn share_of_emission(
    env: &Env,
    elapsed: u32,
    reward_rate: i128,
    principal: i128,
    total_staked: i128,
) -> Result<i128, StakerError> {
    if elapsed == 0 || reward_rate <= 0 || principal <= 0 || total_staked <= 0 {
        return Ok(0);
    }

    let product = I256::from_i128(env, reward_rate)
        .mul(&I256::from_i128(env, i128::from(elapsed)))
        .mul(&I256::from_i128(env, principal));

    product
        .div(&I256::from_i128(env, total_staked))
        .to_i128()
        .ok_or(StakerError::ArithmeticOverflow)
}

// ── Pool settlement ─────────────────────────────────────────────────────────

/// Distribute everything emitted since the pool's last checkpoint.
///
/// Every active position receives its share of the interval at the rate
/// cached by the previous settlement; the cached rate is then refreshed
/// from the reward token so a rate change only applies going forward.
/// Must run before any change to `total_staked`.
///
/// A height below the pool's checkpoint is logged and ignored; the returned
/// `Settlement.block` is then the existing checkpoint.
///
/// # Arguments
/// * `env`           - contract environment
/// * `current_block` - ledger sequence to settle up to
pub fn settle(env: &Env, current_block: u32) -> Result<Settlement, StakerError> {
    let config = storage::read_config(env)?;
    let mut pool = storage::read_pool(env)?;

    if current_block < pool.last_settled_block {
        log!(
            env,
            "settle ignored regressed height",
            current_block,
            pool.last_settled_block
        );
        return Ok(Settlement {
            block: pool.last_settled_block,
            elapsed: 0,
            distributed: 0,
        });
    }

    let elapsed = elapsed_blocks(pool.last_settled_block, current_block);
    let latest_rate = current_rate(env, &config.reward_token);

    if elapsed == 0 {
        if latest_rate != pool.reward_rate {
            pool.reward_rate = latest_rate;
            storage::write_pool(env, &pool);
        }
        return Ok(Settlement {
            block: current_block,
            elapsed: 0,
            distributed: 0,
        });
    }

    let mut distributed: i128 = 0;
    if pool.total_staked > 0 {
        for staker in storage::read_stakers(env).iter() {
            let Some(mut position) = storage::read_position(env, &staker) else {
                continue;
            };
            let share = share_of_emission(
                env,
                elapsed,
                pool.reward_rate,
                position.principal,
                pool.total_staked,
            )?;
            position.accrued_reward = position
                .accrued_reward
                .checked_add(share)
                .ok_or(StakerError::ArithmeticOverflow)?;
            position.last_settled_block = current_block;
            storage::write_position(env, &staker, &position);

            distributed = distributed
                .checked_add(share)
                .ok_or(StakerError::ArithmeticOverflow)?;
        }

        let released = emission(elapsed, pool.reward_rate)?;
        debug_assert!(distributed <= released);
        log!(
            env,
            "settled",
            current_block,
            elapsed,
            distributed,
            released - distributed
        );
        events::publish_settled(
            env,
            current_block,
            elapsed,
            pool.reward_rate,
            distributed,
            pool.total_staked,
        );
    }

    pool.last_settled_block = current_block;
    pool.reward_rate = latest_rate;
    storage::write_pool(env, &pool);

    Ok(Settlement {
        block: current_block,
        elapsed,
        distributed,
    })
}

/// Reward owed to `staker` if the pool were settled right now. Read-only.
///
/// # Arguments
/// * `env`    - contract environment
/// * `staker` - address to report on; unknown addresses owe nothing
pub fn preview_reward(env: &Env, staker: &Address) -> Result<i128, StakerError> {
    let Some(position) = storage::read_position(env, staker) else {
        return Ok(0);
    };
    let pool = storage::read_pool(env)?;

    let elapsed = elapsed_blocks(pool.last_settled_block, env.ledger().sequence());
    let pending = share_of_emission(
        env,
        elapsed,
        pool.reward_rate,
        position.principal,
        pool.total_staked,
    )?;

    position
        .accrued_reward
        .checked_add(pending)
        .ok_or(StakerError::ArithmeticOverflow)
}

pub fn current_rate(env: &Env, reward_token: &Address) -> i128 {
    RewardRateClient::new(env, reward_token).get_reward_rate()
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests; the Env only backs the 256-bit intermediates.

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    #[test]
    fn elapsed_is_zero_for_same_or_lower_height() {
        assert_eq!(elapsed_blocks(10, 10), 0);
        assert_eq!(elapsed_blocks(10, 7), 0);
        assert_eq!(elapsed_blocks(10, 13), 3);
    }

    #[test]
    fn share_zero_when_no_stakers() {
        let env = Env::default();
        assert_eq!(share_of_emission(&env, 5, 100, 0, 0), Ok(0));
    }

    #[test]
    fn share_zero_when_no_time_passed() {
        let env = Env::default();
        assert_eq!(share_of_emission(&env, 0, 100, 1_000, 1_000), Ok(0));
    }

    #[test]
    fn sole_staker_takes_whole_emission() {
        let env = Env::default();
        assert_eq!(share_of_emission(&env, 4, 100, 1_000, 1_000), Ok(400));
    }

    #[test]
    fn share_proportional_to_principal() {
        // 3 blocks × 100 = 300 split 1:2.
        let env = Env::default();
        assert_eq!(share_of_emission(&env, 3, 100, 1_000, 3_000), Ok(100));
        assert_eq!(share_of_emission(&env, 3, 100, 2_000, 3_000), Ok(200));
    }

    #[test]
    fn remainder_is_floored_not_carried() {
        // 100 split three ways: each gets 33, one unit is forfeited.
        let env = Env::default();
        let share = share_of_emission(&env, 1, 100, 1, 3).unwrap();
        assert_eq!(share, 33);
        assert!(share * 3 <= emission(1, 100).unwrap());
    }

    #[test]
    fn share_handles_eighteen_decimal_amounts() {
        // rate 100e18/block, stakes 1000e18 each: the raw product is ~1e41,
        // well beyond i128, but the share itself fits.
        let env = Env::default();
        let e18: i128 = 1_000_000_000_000_000_000;
        let share = share_of_emission(&env, 3, 100 * e18, 1_000 * e18, 2_000 * e18).unwrap();
        assert_eq!(share, 150 * e18);
    }

    #[test]
    fn share_overflow_is_reported() {
        let env = Env::default();
        let result = share_of_emission(&env, u32::MAX, i128::MAX, 1, 1);
        assert_eq!(result, Err(StakerError::ArithmeticOverflow));
    }

    #[test]
    fn emission_overflow_is_reported() {
        assert_eq!(emission(2, i128::MAX), Err(StakerError::ArithmeticOverflow));
        assert_eq!(emission(7, 100), Ok(700));
    }
}
