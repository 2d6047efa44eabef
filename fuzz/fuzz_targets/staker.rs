#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reward_token::{RewardToken, RewardTokenClient};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Env, String};
use staker::{StakerContract, StakerContractClient, StakerError};

const USERS: usize = 4;
const RATE: i128 = 10_000;
const START_BLOCK: u32 = 10;

#[derive(Arbitrary, Debug)]
enum Action {
    Deposit { user: u8, amount: u32 },
    Advance { blocks: u8 },
    Withdraw { user: u8 },
    Checkpoint,
}

#[derive(Arbitrary, Debug)]
struct Input {
    actions: Vec<Action>,
}

fuzz_target!(|input: Input| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(START_BLOCK);

    let token_owner = Address::generate(&env);
    let token_id = env.register(RewardToken, ());
    let token = RewardTokenClient::new(&env, &token_id);
    token.initialize(
        &token_owner,
        &7,
        &String::from_str(&env, "RewardToken"),
        &String::from_str(&env, "RT"),
        &i128::from(u64::MAX),
        &RATE,
    );

    let staker_id = env.register(StakerContract, ());
    let staker = StakerContractClient::new(&env, &staker_id);
    staker.initialize(&token_id, &token_owner);
    staker.fund(&token_owner, &i128::from(u32::MAX));

    let users: Vec<Address> = (0..USERS).map(|_| Address::generate(&env)).collect();
    for user in &users {
        token.mint(&token_owner, user, &i128::from(u64::MAX));
    }

    let mut principal = [0i128; USERS];
    let mut active_blocks: i128 = 0;
    let mut rewards_paid: i128 = 0;
    let mut block = START_BLOCK;

    for action in input.actions.into_iter().take(64) {
        match action {
            Action::Deposit { user, amount } => {
                let idx = user as usize % USERS;
                let amount = i128::from(amount);
                token.approve(&users[idx], &staker_id, &amount, &(block + 100));
                let result = staker.try_deposit(&users[idx], &amount);
                if amount == 0 {
                    assert_eq!(result, Err(Ok(StakerError::InvalidAmount)));
                } else {
                    assert!(result.is_ok());
                    principal[idx] += amount;
                }
            }
            Action::Advance { blocks } => {
                if principal.iter().sum::<i128>() > 0 {
                    active_blocks += i128::from(blocks);
                }
                block += u32::from(blocks);
                env.ledger().set_sequence_number(block);
            }
            Action::Withdraw { user } => {
                let idx = user as usize % USERS;
                match staker.try_withdraw(&users[idx]) {
                    Ok(Ok(payout)) => {
                        assert!(principal[idx] > 0);
                        rewards_paid += payout - principal[idx];
                        principal[idx] = 0;
                    }
                    Err(Ok(StakerError::NoActiveStake)) => assert_eq!(principal[idx], 0),
                    other => panic!("unexpected withdraw result: {:?}", other),
                }
            }
            Action::Checkpoint => {
                staker.checkpoint();
            }
        }

        assert_eq!(staker.get_total_staked(), principal.iter().sum::<i128>());
    }

    let outstanding: i128 = users.iter().map(|u| staker.check_total_rewards(u)).sum();
    assert!(rewards_paid + outstanding <= RATE * active_blocks);
});
