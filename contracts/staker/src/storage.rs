use common::ttl;
use soroban_sdk::{symbol_short, Address, Env, Symbol, Vec};

use crate::{PoolConfig, PoolState, StakePosition, StakerError};

// ── Storage key constants ───────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");
const POOL: Symbol = symbol_short!("POOL");
const STAKERS: Symbol = symbol_short!("STAKERS");

// Per-staker persistent storage uses tuple keys:  (prefix, staker_address)
const POSITION: Symbol = symbol_short!("POS");

// ── Instance storage ────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn write_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&CONFIG, config);
    env.storage().instance().set(&INITIALIZED, &true);
    ttl::extend_instance(env);
}

pub fn read_config(env: &Env) -> Result<PoolConfig, StakerError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(StakerError::NotInitialized)
}

pub fn read_pool(env: &Env) -> Result<PoolState, StakerError> {
    env.storage()
        .instance()
        .get(&POOL)
        .ok_or(StakerError::NotInitialized)
}

pub fn write_pool(env: &Env, pool: &PoolState) {
    env.storage().instance().set(&POOL, pool);
    ttl::extend_instance(env);
}

// ── Positions ───────────────────────────────────────────────────────────────

fn position_key(staker: &Address) -> (Symbol, Address) {
    (POSITION, staker.clone())
}

/// `None` means the address has never staked or has fully withdrawn.
pub fn read_position(env: &Env, staker: &Address) -> Option<StakePosition> {
    let key = position_key(staker);
    if !ttl::touch_persistent(env, &key) {
        return None;
    }
    env.storage().persistent().get(&key)
}

pub fn write_position(env: &Env, staker: &Address, position: &StakePosition) {
    let key = position_key(staker);
    env.storage().persistent().set(&key, position);
    ttl::extend_persistent(env, &key);
}

pub fn remove_position(env: &Env, staker: &Address) {
    env.storage().persistent().remove(&position_key(staker));
}

// ── Active-staker index ─────────────────────────────────────────────────────

pub fn read_stakers(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&STAKERS)
        .unwrap_or(Vec::new(env))
}

fn write_stakers(env: &Env, stakers: &Vec<Address>) {
    env.storage().persistent().set(&STAKERS, stakers);
    ttl::extend_persistent(env, &STAKERS);
}

pub fn add_staker(env: &Env, staker: &Address) {
    let mut stakers = read_stakers(env);
    if !stakers.contains(staker) {
        stakers.push_back(staker.clone());
        write_stakers(env, &stakers);
    }
}

pub fn remove_staker(env: &Env, staker: &Address) {
    let mut stakers = read_stakers(env);
    if let Some(index) = stakers.first_index_of(staker) {
        stakers.remove(index);
        write_stakers(env, &stakers);
    }
}
