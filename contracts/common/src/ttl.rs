use soroban_sdk::{Env, IntoVal, Val};

/// Ledgers left before an entry's TTL is bumped again (~7 days at 5s/ledger).
pub const TTL_THRESHOLD: u32 = 120_960;
/// Ledgers an entry is kept alive for after a bump (~30 days).
pub const TTL_EXTEND_TO: u32 = 518_400;

/// Keep the calling contract's instance storage (and code) alive.
pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Keep a persistent entry alive. The key must exist.
pub fn extend_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Bump a persistent entry only if it is present.
pub fn touch_persistent<K>(env: &Env, key: &K) -> bool
where
    K: IntoVal<Env, Val>,
{
    if env.storage().persistent().has(key) {
        extend_persistent(env, key);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{contract, symbol_short, testutils::storage::Persistent as _};

    #[contract]
    pub struct TtlHost;

    #[test]
    fn touch_missing_key_is_noop() {
        let env = Env::default();
        let id = env.register(TtlHost, ());
        env.as_contract(&id, || {
            assert!(!touch_persistent(&env, &symbol_short!("NOPE")));
        });
    }

    #[test]
    fn touch_existing_key_extends_ttl() {
        let env = Env::default();
        let id = env.register(TtlHost, ());
        env.as_contract(&id, || {
            let key = symbol_short!("KEY");
            env.storage().persistent().set(&key, &7u32);
            assert!(touch_persistent(&env, &key));
            assert!(env.storage().persistent().get_ttl(&key) >= TTL_THRESHOLD);
        });
    }
}
