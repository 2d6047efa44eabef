use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub reward_token: Address,
    pub owner: Address,
    pub reward_rate: i128,
    pub start_block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettledEvent {
    pub block: u32,
    pub elapsed: u32,
    pub reward_rate: i128,
    pub distributed: i128,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub staker: Address,
    pub amount: i128,
    pub principal: i128,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub principal: i128,
    pub reward: i128,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundedEvent {
    pub funder: Address,
    pub amount: i128,
}

pub fn publish_initialized(
    env: &Env,
    reward_token: Address,
    owner: Address,
    reward_rate: i128,
    start_block: u32,
) {
    let payload = InitializedEvent {
        reward_token,
        owner,
        reward_rate,
        start_block,
    };
    env.events().publish((symbol_short!("INIT"),), payload);
}

pub fn publish_settled(
    env: &Env,
    block: u32,
    elapsed: u32,
    reward_rate: i128,
    distributed: i128,
    total_staked: i128,
) {
    let payload = SettledEvent {
        block,
        elapsed,
        reward_rate,
        distributed,
        total_staked,
    };
    env.events().publish((symbol_short!("SETTLED"),), payload);
}

pub fn publish_deposited(
    env: &Env,
    staker: Address,
    amount: i128,
    principal: i128,
    total_staked: i128,
) {
    let payload = DepositedEvent {
        staker: staker.clone(),
        amount,
        principal,
        total_staked,
    };
    env.events()
        .publish((symbol_short!("DEPOSIT"), staker), payload);
}

pub fn publish_withdrawn(
    env: &Env,
    staker: Address,
    principal: i128,
    reward: i128,
    total_staked: i128,
) {
    let payload = WithdrawnEvent {
        staker: staker.clone(),
        principal,
        reward,
        total_staked,
    };
    env.events()
        .publish((symbol_short!("WITHDRAW"), staker), payload);
}

pub fn publish_funded(env: &Env, funder: Address, amount: i128) {
    let payload = FundedEvent {
        funder: funder.clone(),
        amount,
    };
    env.events().publish((symbol_short!("FUNDED"), funder), payload);
}
