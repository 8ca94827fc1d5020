//! Frozen-stake ledger.
//!
//! Shares granted by a deposit into a bonus pool stay frozen for the pool's
//! `frozen_period`. Each (pool, user) keeps a map `unlock_time → amount`.
//! An entry whose unlock time has passed no longer counts as locked, but it
//! stays in storage until the next deposit or withdraw for that user runs
//! [`release_due`]. Views go through [`projected_locked`], which never
//! writes.

use soroban_sdk::{symbol_short, Address, Env, Map, Symbol, Vec};

use crate::pool::{PoolInfo, UserInfo};

const FROZEN: Symbol = symbol_short!("FROZEN");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

fn frozen_key(pid: u32, user: &Address) -> (Symbol, u32, Address) {
    (FROZEN, pid, user.clone())
}

pub fn load_entries(env: &Env, pid: u32, user: &Address) -> Map<u64, i128> {
    env.storage()
        .persistent()
        .get(&frozen_key(pid, user))
        .unwrap_or(Map::new(env))
}

fn store_entries(env: &Env, pid: u32, user: &Address, entries: &Map<u64, i128>) {
    let key = frozen_key(pid, user);
    if entries.is_empty() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, entries);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Sum of all entries already due at `at`.
pub fn due_amount(entries: &Map<u64, i128>, at: u64) -> i128 {
    let mut due: i128 = 0;
    // Keys iterate in ascending order.
    for (unlock_at, amount) in entries.iter() {
        if unlock_at > at {
            break;
        }
        due = due.saturating_add(amount);
    }
    due
}

/// Lock `amount` freshly granted shares until `now + pool.frozen_period`.
/// Returns the unlock time.
pub fn add_lock(
    env: &Env,
    pid: u32,
    pool: &PoolInfo,
    user: &Address,
    info: &mut UserInfo,
    amount: i128,
) -> u64 {
    let unlock_at = env.ledger().timestamp().saturating_add(pool.frozen_period);
    if amount <= 0 {
        return unlock_at;
    }

    let mut entries = load_entries(env, pid, user);
    let existing = entries.get(unlock_at).unwrap_or(0);
    entries.set(unlock_at, existing.saturating_add(amount));
    store_entries(env, pid, user, &entries);

    info.shares_frozen = info.shares_frozen.saturating_add(amount);
    unlock_at
}

/// Drop every entry whose unlock time has passed and unfreeze its shares.
/// Returns the amount released.
pub fn release_due(env: &Env, pid: u32, user: &Address, info: &mut UserInfo) -> i128 {
    let now = env.ledger().timestamp();
    let mut entries = load_entries(env, pid, user);
    if entries.is_empty() {
        return 0;
    }

    let mut released: i128 = 0;
    let mut due_keys = Vec::<u64>::new(env);
    for (unlock_at, amount) in entries.iter() {
        if unlock_at > now {
            break;
        }
        released = released.saturating_add(amount);
        due_keys.push_back(unlock_at);
    }
    if due_keys.is_empty() {
        return 0;
    }

    for unlock_at in due_keys.iter() {
        entries.remove(unlock_at);
    }
    store_entries(env, pid, user, &entries);

    info.shares_frozen = info.shares_frozen.saturating_sub(released).max(0);
    released
}

/// Shares still frozen at `at`, without touching storage.
pub fn projected_locked(env: &Env, pid: u32, user: &Address, info: &UserInfo, at: u64) -> i128 {
    let entries = load_entries(env, pid, user);
    info.shares_frozen
        .saturating_sub(due_amount(&entries, at))
        .max(0)
}
