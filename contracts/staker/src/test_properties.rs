#![cfg(test)]

extern crate std;

use proptest::prelude::*;
use reward_token::{RewardToken, RewardTokenClient};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Env, String};
use std::vec::Vec;

use crate::*;

const RATE: i128 = 1_000;
const START_BLOCK: u32 = 10;

#[derive(Clone, Debug)]
enum Op {
    Deposit { user: usize, amount: i128 },
    Advance { blocks: u32 },
    Withdraw { user: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, 1i128..5_000).prop_map(|(user, amount)| Op::Deposit { user, amount }),
        (1u32..6).prop_map(|blocks| Op::Advance { blocks }),
        (0usize..3).prop_map(|user| Op::Withdraw { user }),
    ]
}

fn deploy(env: &Env) -> (RewardTokenClient<'_>, StakerContractClient<'_>, Address) {
    env.mock_all_auths();
    env.ledger().set_sequence_number(START_BLOCK);

    let token_owner = Address::generate(env);
    let token_id = env.register(RewardToken, ());
    let token = RewardTokenClient::new(env, &token_id);
    token.initialize(
        &token_owner,
        &7,
        &String::from_str(env, "RewardToken"),
        &String::from_str(env, "RT"),
        &1_000_000_000_000,
        &RATE,
    );

    let staker_id = env.register(StakerContract, ());
    let staker = StakerContractClient::new(env, &staker_id);
    staker.initialize(&token_id, &Address::generate(env));

    (token, staker, token_owner)
}

fn deposit(
    env: &Env,
    token: &RewardTokenClient,
    staker: &StakerContractClient,
    user: &Address,
    amount: i128,
) {
    let expiration = env.ledger().sequence() + 1_000;
    token.approve(user, &staker.address, &amount, &expiration);
    staker.deposit(user, &amount);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn rewards_are_proportional_to_stake(
        a in 1i128..1_000_000,
        b in 1i128..1_000_000,
        blocks in 1u32..50,
    ) {
        let env = Env::default();
        let (token, staker, token_owner) = deploy(&env);
        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        token.mint(&token_owner, &alice, &a);
        token.mint(&token_owner, &bob, &b);

        deposit(&env, &token, &staker, &alice, a);
        deposit(&env, &token, &staker, &bob, b);
        env.ledger().set_sequence_number(START_BLOCK + blocks);

        let ra = staker.check_total_rewards(&alice);
        let rb = staker.check_total_rewards(&bob);

        // Exact shares are E·a/T and E·b/T; flooring each loses < 1 unit.
        let skew = (ra * b - rb * a).abs();
        prop_assert!(skew <= a.max(b), "ra={} rb={} a={} b={}", ra, rb, a, b);
        prop_assert!(ra + rb <= RATE * i128::from(blocks));
    }

    #[test]
    fn payouts_never_exceed_emission(ops in prop::collection::vec(op_strategy(), 1..25)) {
        let env = Env::default();
        let (token, staker, token_owner) = deploy(&env);
        staker.fund(&token_owner, &1_000_000_000);

        let users: Vec<Address> = (0..3).map(|_| Address::generate(&env)).collect();
        for user in users.iter() {
            token.mint(&token_owner, user, &1_000_000_000);
        }

        let mut principal = [0i128; 3];
        let mut active_blocks: i128 = 0;
        let mut rewards_paid: i128 = 0;
        let mut block = START_BLOCK;

        for op in ops {
            match op {
                Op::Deposit { user, amount } => {
                    deposit(&env, &token, &staker, &users[user], amount);
                    principal[user] += amount;
                }
                Op::Advance { blocks } => {
                    if principal.iter().sum::<i128>() > 0 {
                        active_blocks += i128::from(blocks);
                    }
                    block += blocks;
                    env.ledger().set_sequence_number(block);
                }
                Op::Withdraw { user } => {
                    if principal[user] > 0 {
                        let payout = staker.withdraw(&users[user]);
                        rewards_paid += payout - principal[user];
                        principal[user] = 0;
                    } else {
                        prop_assert_eq!(
                            staker.try_withdraw(&users[user]),
                            Err(Ok(StakerError::NoActiveStake))
                        );
                    }
                }
            }

            let total: i128 = principal.iter().sum();
            prop_assert_eq!(staker.get_total_staked(), total);
            let stored: i128 = staker
                .get_stakers()
                .iter()
                .map(|s| staker.get_position(&s).map(|p| p.principal).unwrap_or(0))
                .sum();
            prop_assert_eq!(stored, total);
        }

        let outstanding: i128 = users
            .iter()
            .map(|user| staker.check_total_rewards(user))
            .sum();
        prop_assert!(rewards_paid + outstanding <= RATE * active_blocks);
    }

    #[test]
    fn settling_twice_at_one_height_changes_nothing(
        amount in 1i128..1_000_000,
        blocks in 0u32..20,
    ) {
        let env = Env::default();
        let (token, staker, token_owner) = deploy(&env);
        let user = Address::generate(&env);
        token.mint(&token_owner, &user, &amount);
        deposit(&env, &token, &staker, &user, amount);

        env.ledger().set_sequence_number(START_BLOCK + blocks);
        staker.checkpoint();
        let pool = staker.get_pool_state();
        let position = staker.get_position(&user);

        staker.checkpoint();
        prop_assert_eq!(staker.get_pool_state(), pool);
        prop_assert_eq!(staker.get_position(&user), position);
    }
}
