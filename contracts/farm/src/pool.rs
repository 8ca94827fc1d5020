use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ContractError;

// ── Storage keys ────────────────────────────────────────────────────────────

const POOL_COUNT: Symbol = symbol_short!("POOL_CNT");
const TOTAL_ALLOC: Symbol = symbol_short!("TOT_ALLOC");

// Persistent tuple keys: (prefix, pid) and (prefix, pid, user).
const POOL: Symbol = symbol_short!("POOL");
const USER: Symbol = symbol_short!("USER");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Types ───────────────────────────────────────────────────────────────────

/// Emission accounting for one pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    pub want: Address,
    pub strategy: Address,
    pub alloc_point: u64,
    pub last_reward_time: u64,
    /// Accumulated reward per share, scaled by `rewards::PRECISION`.
    pub acc_per_share: i128,
    /// Seconds newly granted shares stay frozen (bonus pools only).
    pub frozen_period: u64,
}

/// A user's position in one pool.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserInfo {
    pub shares: i128,
    pub shares_frozen: i128,
    pub reward_debt: i128,
    pub bonus_debt: i128,
}

// ── Pools ───────────────────────────────────────────────────────────────────

fn pool_key(pid: u32) -> (Symbol, u32) {
    (POOL, pid)
}

pub fn pool_count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_COUNT).unwrap_or(0)
}

pub fn load_pool(env: &Env, pid: u32) -> Result<PoolInfo, ContractError> {
    let key = pool_key(pid);
    let pool: PoolInfo = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::PoolNotFound)?;
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(pool)
}

pub fn store_pool(env: &Env, pid: u32, pool: &PoolInfo) {
    let key = pool_key(pid);
    env.storage().persistent().set(&key, pool);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Append a pool and return its id.
pub fn push_pool(env: &Env, pool: &PoolInfo) -> u32 {
    let pid = pool_count(env);
    store_pool(env, pid, pool);
    env.storage()
        .instance()
        .set(&POOL_COUNT, &pid.saturating_add(1));
    pid
}

pub fn total_alloc_point(env: &Env) -> u64 {
    env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0)
}

pub fn set_total_alloc_point(env: &Env, total: u64) {
    env.storage().instance().set(&TOTAL_ALLOC, &total);
}

// ── Users ───────────────────────────────────────────────────────────────────

fn user_key(pid: u32, user: &Address) -> (Symbol, u32, Address) {
    (USER, pid, user.clone())
}

/// Absent positions read as all-zero.
pub fn load_user(env: &Env, pid: u32, user: &Address) -> UserInfo {
    env.storage()
        .persistent()
        .get(&user_key(pid, user))
        .unwrap_or_default()
}

pub fn store_user(env: &Env, pid: u32, user: &Address, info: &UserInfo) {
    let key = user_key(pid, user);
    env.storage().persistent().set(&key, info);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
