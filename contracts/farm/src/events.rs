#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the farm is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub dev_address: Address,
    pub initial_rate: i128,
    pub start_time: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pid: u32,
    pub want: Address,
    pub strategy: Address,
    pub alloc_point: u64,
    pub bonus_eligible: bool,
    pub bonus_alloc_point: u64,
    pub frozen_period: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSetEvent {
    pub pid: u32,
    pub alloc_point: u64,
    pub bonus_alloc_point: u64,
    pub frozen_period: u64,
    pub timestamp: u64,
}

/// Fired when `update_pool` mints a new batch of rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolUpdatedEvent {
    pub pid: u32,
    pub reward: i128,
    pub acc_per_share: i128,
    pub timestamp: u64,
}

/// Fired when the emission rate decays into a new period.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateDecayedEvent {
    pub period: u32,
    pub rate_per_second: i128,
    pub timestamp: u64,
}

/// Deposit, withdraw and emergency exit all share this record.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserActionEvent {
    pub user: Address,
    pub pid: u32,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when settled rewards are paid out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub user: Address,
    pub pid: u32,
    pub reward: i128,
    pub bonus: i128,
    pub paid: i128,
    pub timestamp: u64,
}

/// Fired when newly granted shares are frozen.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SharesFrozenEvent {
    pub user: Address,
    pub pid: u32,
    pub amount: i128,
    pub unlock_at: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuybackDistributedEvent {
    pub strategy: Address,
    pub amount: i128,
    pub credited: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecayRatioSetEvent {
    pub numerator: i128,
    pub denominator: i128,
    pub locked: bool,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddressSetEvent {
    pub address: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerRateSetEvent {
    pub owner_rate: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensRescuedEvent {
    pub token: Address,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when an admin transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferProposedEvent {
    pub current_admin: Address,
    pub proposed_admin: Address,
    pub timestamp: u64,
}

/// Fired when an admin transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferAcceptedEvent {
    pub old_admin: Address,
    pub new_admin: Address,
    pub timestamp: u64,
}

/// Fired when a pending admin transfer is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferCancelledEvent {
    pub admin: Address,
    pub cancelled_proposed: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    reward_token: Address,
    dev_address: Address,
    initial_rate: i128,
    start_time: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            reward_token,
            dev_address,
            initial_rate,
            start_time,
            timestamp: env.ledger().timestamp(),
        },
    );
}

#[allow(clippy::too_many_arguments)]
pub fn publish_pool_added(
    env: &Env,
    pid: u32,
    want: Address,
    strategy: Address,
    alloc_point: u64,
    bonus_eligible: bool,
    bonus_alloc_point: u64,
    frozen_period: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pid),
        PoolAddedEvent {
            pid,
            want,
            strategy,
            alloc_point,
            bonus_eligible,
            bonus_alloc_point,
            frozen_period,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_set(
    env: &Env,
    pid: u32,
    alloc_point: u64,
    bonus_alloc_point: u64,
    frozen_period: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_SET"), pid),
        PoolSetEvent {
            pid,
            alloc_point,
            bonus_alloc_point,
            frozen_period,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_updated(env: &Env, pid: u32, reward: i128, acc_per_share: i128) {
    env.events().publish(
        (symbol_short!("POOL_UPD"), pid),
        PoolUpdatedEvent {
            pid,
            reward,
            acc_per_share,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rate_decayed(env: &Env, period: u32, rate_per_second: i128) {
    env.events().publish(
        (symbol_short!("DECAY"),),
        RateDecayedEvent {
            period,
            rate_per_second,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposit(env: &Env, user: Address, pid: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), user.clone(), pid),
        UserActionEvent {
            user,
            pid,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdraw(env: &Env, user: Address, pid: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), user.clone(), pid),
        UserActionEvent {
            user,
            pid,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_withdraw(env: &Env, user: Address, pid: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("EMERGENCY"), user.clone(), pid),
        UserActionEvent {
            user,
            pid,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_paid(
    env: &Env,
    user: Address,
    pid: u32,
    reward: i128,
    bonus: i128,
    paid: i128,
) {
    env.events().publish(
        (symbol_short!("PAID"), user.clone(), pid),
        RewardPaidEvent {
            user,
            pid,
            reward,
            bonus,
            paid,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_shares_frozen(env: &Env, user: Address, pid: u32, amount: i128, unlock_at: u64) {
    env.events().publish(
        (symbol_short!("FROZEN"), user.clone(), pid),
        SharesFrozenEvent {
            user,
            pid,
            amount,
            unlock_at,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_buyback_distributed(env: &Env, strategy: Address, amount: i128, credited: i128) {
    env.events().publish(
        (symbol_short!("BUYBACK"), strategy.clone()),
        BuybackDistributedEvent {
            strategy,
            amount,
            credited,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_decay_ratio_set(env: &Env, numerator: i128, denominator: i128, locked: bool) {
    env.events().publish(
        (symbol_short!("RATIO_SET"),),
        DecayRatioSetEvent {
            numerator,
            denominator,
            locked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_token_set(env: &Env, address: Address) {
    env.events().publish(
        (symbol_short!("RWD_TOK"),),
        AddressSetEvent {
            address,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_dev_address_set(env: &Env, address: Address) {
    env.events().publish(
        (symbol_short!("DEV_ADDR"),),
        AddressSetEvent {
            address,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_rate_set(env: &Env, owner_rate: u32) {
    env.events().publish(
        (symbol_short!("OWN_RATE"),),
        OwnerRateSetEvent {
            owner_rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_tokens_rescued(env: &Env, token: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RESCUED"), token.clone()),
        TokensRescuedEvent {
            token,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transfer_proposed(env: &Env, current_admin: Address, proposed_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"), current_admin.clone()),
        AdminTransferProposedEvent {
            current_admin,
            proposed_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transfer_accepted(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_ACPT"), new_admin.clone()),
        AdminTransferAcceptedEvent {
            old_admin,
            new_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transfer_cancelled(env: &Env, admin: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("ADM_CNCL"), admin.clone()),
        AdminTransferCancelledEvent {
            admin,
            cancelled_proposed,
            timestamp: env.ledger().timestamp(),
        },
    );
}
