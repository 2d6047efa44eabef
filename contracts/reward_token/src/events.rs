use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub name: String,
    pub symbol: String,
    pub initial_supply: i128,
    pub reward_rate: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateSetEvent {
    pub previous_rate: i128,
    pub new_rate: i128,
}

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    name: String,
    symbol: String,
    initial_supply: i128,
    reward_rate: i128,
) {
    let payload = InitializedEvent {
        owner,
        name,
        symbol,
        initial_supply,
        reward_rate,
    };
    env.events().publish((symbol_short!("INIT"),), payload);
}

pub fn publish_reward_rate_set(env: &Env, previous_rate: i128, new_rate: i128) {
    let payload = RewardRateSetEvent {
        previous_rate,
        new_rate,
    };
    env.events().publish((symbol_short!("RATE_SET"),), payload);
}

// Movement events keep the topic/data layout wallets expect from SEP-41 tokens.

pub fn publish_mint(env: &Env, owner: Address, to: Address, amount: i128) {
    env.events()
        .publish((symbol_short!("mint"), owner, to), amount);
}

pub fn publish_transfer(env: &Env, from: Address, to: Address, amount: i128) {
    env.events()
        .publish((symbol_short!("transfer"), from, to), amount);
}

pub fn publish_approve(
    env: &Env,
    from: Address,
    spender: Address,
    amount: i128,
    expiration_ledger: u32,
) {
    env.events().publish(
        (symbol_short!("approve"), from, spender),
        (amount, expiration_ledger),
    );
}

pub fn publish_burn(env: &Env, from: Address, amount: i128) {
    env.events().publish((symbol_short!("burn"), from), amount);
}
