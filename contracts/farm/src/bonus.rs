//! Bonus accounting track.
//!
//! Only pools flagged bonus-eligible at creation carry a [`BonusInfo`]; every
//! other pool id maps to `None`. The bonus accumulator is fed by buyback
//! proceeds reported by whitelisted strategies, not by the emission schedule.

use soroban_sdk::{contracttype, log, symbol_short, Address, Env, Symbol, Vec};

use crate::interfaces::StrategyClient;
use crate::rewards;

const BONUS_POOLS: Symbol = symbol_short!("BNS_POOLS");
const TOTAL_BONUS: Symbol = symbol_short!("TOT_BONUS");

const BONUS: Symbol = symbol_short!("BONUS");
const WHITELIST: Symbol = symbol_short!("WL");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BonusInfo {
    pub strategy: Address,
    pub alloc_point: u64,
    /// Accumulated bonus per share, scaled by `rewards::PRECISION`.
    pub acc_per_share: i128,
}

fn bonus_key(pid: u32) -> (Symbol, u32) {
    (BONUS, pid)
}

fn whitelist_key(strategy: &Address) -> (Symbol, Address) {
    (WHITELIST, strategy.clone())
}

// ── Entries ─────────────────────────────────────────────────────────────────

pub fn load_bonus(env: &Env, pid: u32) -> Option<BonusInfo> {
    env.storage().persistent().get(&bonus_key(pid))
}

pub fn store_bonus(env: &Env, pid: u32, bonus: &BonusInfo) {
    let key = bonus_key(pid);
    env.storage().persistent().set(&key, bonus);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Ids of all bonus-eligible pools, in creation order.
pub fn bonus_pools(env: &Env) -> Vec<u32> {
    env.storage()
        .instance()
        .get(&BONUS_POOLS)
        .unwrap_or(Vec::new(env))
}

/// Create the bonus entry for a freshly added pool.
pub fn register(env: &Env, pid: u32, bonus: &BonusInfo) {
    store_bonus(env, pid, bonus);

    let mut ids = bonus_pools(env);
    ids.push_back(pid);
    env.storage().instance().set(&BONUS_POOLS, &ids);

    let total = total_bonus_point(env).saturating_add(bonus.alloc_point);
    set_total_bonus_point(env, total);
}

pub fn total_bonus_point(env: &Env) -> u64 {
    env.storage().instance().get(&TOTAL_BONUS).unwrap_or(0)
}

pub fn set_total_bonus_point(env: &Env, total: u64) {
    env.storage().instance().set(&TOTAL_BONUS, &total);
}

// ── Whitelist ───────────────────────────────────────────────────────────────

pub fn is_whitelisted(env: &Env, strategy: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&whitelist_key(strategy))
        .unwrap_or(false)
}

pub fn whitelist(env: &Env, strategy: &Address) {
    let key = whitelist_key(strategy);
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Distribution ────────────────────────────────────────────────────────────

/// Spread `amount` over all bonus entries by allocation weight.
///
/// An entry whose strategy holds no shares forgoes its slice; nothing is
/// carried forward. Returns the amount actually credited.
pub fn distribute(env: &Env, amount: i128) -> i128 {
    let total = total_bonus_point(env);
    if total == 0 || amount <= 0 {
        return 0;
    }

    let mut credited: i128 = 0;
    for pid in bonus_pools(env).iter() {
        let Some(mut bonus) = load_bonus(env, pid) else {
            continue;
        };
        let share = rewards::bonus_share(amount, bonus.alloc_point, total);
        if share <= 0 {
            continue;
        }
        let shares_total = StrategyClient::new(env, &bonus.strategy).shares_total();
        if shares_total <= 0 {
            log!(env, "Buyback share {} forgone for empty pool {}", share, pid);
            continue;
        }
        bonus.acc_per_share = bonus
            .acc_per_share
            .saturating_add(rewards::acc_increment(share, shares_total));
        store_bonus(env, pid, &bonus);
        credited = credited.saturating_add(share);
    }
    credited
}
