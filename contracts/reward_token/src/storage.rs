use common::ttl;
use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol};

use crate::TokenError;

// ── Storage key constants ───────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const OWNER: Symbol = symbol_short!("OWNER");
const REWARD_RATE: Symbol = symbol_short!("RWD_RATE");
const TOTAL_SUPPLY: Symbol = symbol_short!("SUPPLY");
const METADATA: Symbol = symbol_short!("META");

// Per-account persistent storage uses tuple keys.
const BALANCE: Symbol = symbol_short!("BAL");
const ALLOWANCE: Symbol = symbol_short!("ALLOW");

// ── Types ───────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenMetadata {
    pub decimals: u32,
    pub name: String,
    pub symbol: String,
}

/// Approved amount together with the last ledger it may be spent in.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllowanceValue {
    pub amount: i128,
    pub expiration_ledger: u32,
}

// ── Instance configuration ──────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn write_config(env: &Env, owner: &Address, metadata: &TokenMetadata, reward_rate: i128) {
    env.storage().instance().set(&OWNER, owner);
    env.storage().instance().set(&METADATA, metadata);
    env.storage().instance().set(&REWARD_RATE, &reward_rate);
    env.storage().instance().set(&INITIALIZED, &true);
    ttl::extend_instance(env);
}

pub fn read_owner(env: &Env) -> Result<Address, TokenError> {
    env.storage()
        .instance()
        .get(&OWNER)
        .ok_or(TokenError::NotInitialized)
}

pub fn read_metadata(env: &Env) -> Result<TokenMetadata, TokenError> {
    env.storage()
        .instance()
        .get(&METADATA)
        .ok_or(TokenError::NotInitialized)
}

pub fn read_reward_rate(env: &Env) -> i128 {
    env.storage().instance().get(&REWARD_RATE).unwrap_or(0)
}

pub fn write_reward_rate(env: &Env, rate: i128) {
    env.storage().instance().set(&REWARD_RATE, &rate);
}

pub fn read_total_supply(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_SUPPLY).unwrap_or(0)
}

pub fn write_total_supply(env: &Env, supply: i128) {
    env.storage().instance().set(&TOTAL_SUPPLY, &supply);
}

// ── Balances ────────────────────────────────────────────────────────────────

pub fn read_balance(env: &Env, id: &Address) -> i128 {
    let key = (BALANCE, id.clone());
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(balance) => {
            ttl::extend_persistent(env, &key);
            balance
        }
        None => 0,
    }
}

fn write_balance(env: &Env, id: &Address, amount: i128) {
    let key = (BALANCE, id.clone());
    env.storage().persistent().set(&key, &amount);
    ttl::extend_persistent(env, &key);
}

pub fn receive_balance(env: &Env, id: &Address, amount: i128) -> Result<(), TokenError> {
    let balance = read_balance(env, id);
    let updated = balance
        .checked_add(amount)
        .ok_or(TokenError::InvalidAmount)?;
    write_balance(env, id, updated);
    Ok(())
}

pub fn spend_balance(env: &Env, id: &Address, amount: i128) -> Result<(), TokenError> {
    let balance = read_balance(env, id);
    if balance < amount {
        return Err(TokenError::InsufficientBalance);
    }
    write_balance(env, id, balance - amount);
    Ok(())
}

// ── Allowances ──────────────────────────────────────────────────────────────

/// Current allowance; an expired approval reads as zero.
pub fn read_allowance(env: &Env, from: &Address, spender: &Address) -> AllowanceValue {
    let key = (ALLOWANCE, from.clone(), spender.clone());
    match env.storage().temporary().get::<_, AllowanceValue>(&key) {
        Some(allowance) if allowance.expiration_ledger >= env.ledger().sequence() => allowance,
        Some(allowance) => AllowanceValue {
            amount: 0,
            expiration_ledger: allowance.expiration_ledger,
        },
        None => AllowanceValue {
            amount: 0,
            expiration_ledger: 0,
        },
    }
}

pub fn write_allowance(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
    expiration_ledger: u32,
) -> Result<(), TokenError> {
    let current = env.ledger().sequence();
    if amount > 0 && expiration_ledger < current {
        return Err(TokenError::InvalidExpiration);
    }

    let key = (ALLOWANCE, from.clone(), spender.clone());
    let allowance = AllowanceValue {
        amount,
        expiration_ledger,
    };
    env.storage().temporary().set(&key, &allowance);

    if amount > 0 {
        let live_for = expiration_ledger - current;
        env.storage()
            .temporary()
            .extend_ttl(&key, live_for, live_for);
    }
    Ok(())
}

pub fn spend_allowance(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
) -> Result<(), TokenError> {
    let allowance = read_allowance(env, from, spender);
    if allowance.amount < amount {
        return Err(TokenError::InsufficientAllowance);
    }
    if amount > 0 {
        write_allowance(
            env,
            from,
            spender,
            allowance.amount - amount,
            allowance.expiration_ledger,
        )?;
    }
    Ok(())
}
