#![no_std]

pub mod bonus;
pub mod emission;
pub mod events;
pub mod frozen;
pub mod guard;
pub mod interfaces;
pub mod pool;
pub mod rewards;

use soroban_sdk::{
    contract, contractimpl, contracttype, log, symbol_short, token, Address, Env, Symbol, Vec,
};

use bonus::BonusInfo;
use emission::{EmissionSchedule, EmissionState};
use interfaces::{RewardTokenClient, StrategyClient};
use pool::{PoolInfo, UserInfo};

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");
const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");

/// `owner_rate` is expressed in basis points of each minted reward.
const MAX_OWNER_RATE: u32 = 10_000;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    PoolNotFound = 5,
    /// The caller holds no shares in the pool.
    NoStake = 6,
    /// The strategy reports zero shares while a user still holds some.
    PoolInsolvent = 7,
    /// The reward token cannot be swept out through `rescue_tokens`.
    ProtectedAsset = 8,
    ReentrantCall = 9,
    /// A strategy may back only one pool.
    DuplicateStrategy = 10,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Farm-wide settings written by `initialize` and the admin setters.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FarmConfig {
    pub reward_token: Address,
    pub dev_address: Address,
    /// Extra mint to `dev_address`, in basis points of each pool reward.
    pub owner_rate: u32,
    /// Emission halts once the reward token's supply reaches this.
    pub max_supply: i128,
}

/// Full snapshot of a position, including every frozen entry still stored.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserInfoView {
    pub shares: i128,
    pub shares_frozen: i128,
    pub bonus_debt: i128,
    pub reward_debt: i128,
    pub unlock_times: Vec<u64>,
    pub locked_amounts: Vec<i128>,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct FarmContract;

#[contractimpl]
impl FarmContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the farm.
    ///
    /// * `reward_token` – mintable token paid out to depositors.
    /// * `dev_address`  – receives `owner_rate` basis points on every mint.
    /// * `max_supply`   – emission stops once the reward supply reaches it.
    /// * `schedule`     – start time, period length, initial per-second rate
    ///                    and per-period decay ratio.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        dev_address: Address,
        owner_rate: u32,
        max_supply: i128,
        schedule: EmissionSchedule,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if owner_rate > MAX_OWNER_RATE || max_supply <= 0 || !schedule.is_valid() {
            return Err(ContractError::InvalidInput);
        }

        let config = FarmConfig {
            reward_token: reward_token.clone(),
            dev_address: dev_address.clone(),
            owner_rate,
            max_supply,
        };

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&CONFIG, &config);
        emission::store(&env, &EmissionState::from_schedule(&schedule));

        events::publish_initialized(
            &env,
            admin,
            reward_token,
            dev_address,
            schedule.initial_rate,
            schedule.start_time,
        );

        Ok(())
    }

    // ── Pool administration ─────────────────────────────────────────────────

    /// Append a pool and return its id.
    ///
    /// Bonus eligibility is decided here once and for all; the strategy is
    /// whitelisted for `distribute_buyback`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_pool(
        env: Env,
        caller: Address,
        with_update: bool,
        bonus_eligible: bool,
        alloc_point: u64,
        bonus_alloc_point: u64,
        frozen_period: u64,
        want: Address,
        strategy: Address,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if bonus::is_whitelisted(&env, &strategy) {
            return Err(ContractError::DuplicateStrategy);
        }
        if with_update {
            Self::update_all(&env)?;
        }

        let start_time = emission::load(&env)?.start_time;
        let last_reward_time = env.ledger().timestamp().max(start_time);

        let pid = pool::push_pool(
            &env,
            &PoolInfo {
                want: want.clone(),
                strategy: strategy.clone(),
                alloc_point,
                last_reward_time,
                acc_per_share: 0,
                frozen_period,
            },
        );
        let total = pool::total_alloc_point(&env).saturating_add(alloc_point);
        pool::set_total_alloc_point(&env, total);

        if bonus_eligible {
            bonus::register(
                &env,
                pid,
                &BonusInfo {
                    strategy: strategy.clone(),
                    alloc_point: bonus_alloc_point,
                    acc_per_share: 0,
                },
            );
        }
        bonus::whitelist(&env, &strategy);

        events::publish_pool_added(
            &env,
            pid,
            want,
            strategy,
            alloc_point,
            bonus_eligible,
            bonus_alloc_point,
            frozen_period,
        );

        Ok(pid)
    }

    /// Re-weight a pool. Bonus weight only applies to bonus-eligible pools.
    pub fn set_pool(
        env: Env,
        caller: Address,
        with_update: bool,
        pid: u32,
        alloc_point: u64,
        bonus_alloc_point: u64,
        frozen_period: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let mut pool_info = pool::load_pool(&env, pid)?;
        if with_update {
            Self::update_all(&env)?;
            pool_info = pool::load_pool(&env, pid)?;
        }

        let total = pool::total_alloc_point(&env)
            .saturating_sub(pool_info.alloc_point)
            .saturating_add(alloc_point);
        pool::set_total_alloc_point(&env, total);

        pool_info.alloc_point = alloc_point;
        pool_info.frozen_period = frozen_period;
        pool::store_pool(&env, pid, &pool_info);

        if let Some(mut entry) = bonus::load_bonus(&env, pid) {
            let total_bonus = bonus::total_bonus_point(&env)
                .saturating_sub(entry.alloc_point)
                .saturating_add(bonus_alloc_point);
            bonus::set_total_bonus_point(&env, total_bonus);
            entry.alloc_point = bonus_alloc_point;
            bonus::store_bonus(&env, pid, &entry);
        }

        events::publish_pool_set(&env, pid, alloc_point, bonus_alloc_point, frozen_period);

        Ok(())
    }

    // ── Reward accrual ──────────────────────────────────────────────────────

    /// Bring one pool's accumulator up to the current ledger time.
    pub fn update_pool(env: Env, pid: u32) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        let config = Self::load_config(&env)?;
        let mut state = emission::load(&env)?;
        Self::sync_pool(&env, &config, &mut state, pid)?;
        emission::store(&env, &state);
        Ok(())
    }

    /// `update_pool` for every pool. Safe to call redundantly.
    pub fn mass_update_pools(env: Env) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::update_all(&env)
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` of the pool's want token and harvest pending rewards.
    ///
    /// `amount == 0` only harvests. Shares granted in a bonus pool are frozen
    /// for the pool's `frozen_period`. Returns the shares granted.
    pub fn deposit(
        env: Env,
        user: Address,
        pid: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        guard::with_guard(&env, || Self::deposit_guarded(&env, &user, pid, amount))
    }

    /// Withdraw up to `amount` of want and harvest pending rewards.
    ///
    /// The amount is clamped to what the user's unfrozen shares are worth.
    /// Returns the want amount actually transferred.
    pub fn withdraw(
        env: Env,
        user: Address,
        pid: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        guard::with_guard(&env, || Self::withdraw_guarded(&env, &user, pid, amount))
    }

    /// Withdraw everything that is not frozen.
    pub fn withdraw_all(env: Env, user: Address, pid: u32) -> Result<i128, ContractError> {
        Self::withdraw(env, user, pid, i128::MAX)
    }

    /// Leave the pool without settling rewards.
    ///
    /// Expired frozen entries are released first. Shares and both reward
    /// checkpoints are then zeroed. Shares that are still frozen are not paid
    /// out and their entries are kept, so a later deposit starts from the
    /// stale `shares_frozen`.
    pub fn emergency_withdraw(env: Env, user: Address, pid: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        guard::with_guard(&env, || Self::emergency_withdraw_guarded(&env, &user, pid))
    }

    // ── Bonus track ─────────────────────────────────────────────────────────

    /// Credit buyback proceeds to the bonus pools.
    ///
    /// Only whitelisted strategies may call this. The proceeds are expected to
    /// have been transferred to the farm already. Returns the amount credited.
    pub fn distribute_buyback(
        env: Env,
        caller: Address,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        if !bonus::is_whitelisted(&env, &caller) {
            return Err(ContractError::Unauthorized);
        }
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let credited = bonus::distribute(&env, amount);

        events::publish_buyback_distributed(&env, caller, amount, credited);

        Ok(credited)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Reward plus bonus `user` could harvest right now.
    pub fn pending(env: Env, pid: u32, user: Address) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        let pool_info = pool::load_pool(&env, pid)?;
        let info = pool::load_user(&env, pid, &user);
        let now = env.ledger().timestamp();

        let mut acc_per_share = pool_info.acc_per_share;
        if now > pool_info.last_reward_time {
            let shares_total = StrategyClient::new(&env, &pool_info.strategy).shares_total();
            if shares_total > 0 {
                let state = emission::load(&env)?.projected(now);
                let supply = RewardTokenClient::new(&env, &config.reward_token).total_supply();
                let multiplier = emission::get_multiplier(
                    pool_info.last_reward_time,
                    now,
                    supply,
                    config.max_supply,
                );
                let reward = rewards::pool_reward(
                    multiplier,
                    state.rate_per_second,
                    pool_info.alloc_point,
                    pool::total_alloc_point(&env),
                );
                acc_per_share =
                    acc_per_share.saturating_add(rewards::acc_increment(reward, shares_total));
            }
        }

        let reward = rewards::pending(info.shares, acc_per_share, info.reward_debt).max(0);
        let bonus_amount = bonus::load_bonus(&env, pid)
            .map(|b| rewards::pending(info.shares, b.acc_per_share, info.bonus_debt).max(0))
            .unwrap_or(0);

        Ok(reward.saturating_add(bonus_amount))
    }

    /// Want value of the position and the part of it still frozen.
    pub fn staked_want_tokens(
        env: Env,
        pid: u32,
        user: Address,
    ) -> Result<(i128, i128), ContractError> {
        let pool_info = pool::load_pool(&env, pid)?;
        let info = pool::load_user(&env, pid, &user);

        let strategy = StrategyClient::new(&env, &pool_info.strategy);
        let shares_total = strategy.shares_total();
        if shares_total <= 0 {
            return Ok((0, 0));
        }
        let want_locked_total = strategy.want_locked_total();

        let now = env.ledger().timestamp();
        let locked = frozen::projected_locked(&env, pid, &user, &info, now);

        Ok((
            rewards::share_value(info.shares, want_locked_total, shares_total),
            rewards::share_value(locked, want_locked_total, shares_total),
        ))
    }

    /// Raw position plus every frozen entry, due or not.
    pub fn inspect_user_info(
        env: Env,
        pid: u32,
        user: Address,
    ) -> Result<UserInfoView, ContractError> {
        pool::load_pool(&env, pid)?;
        let info = pool::load_user(&env, pid, &user);
        let entries = frozen::load_entries(&env, pid, &user);

        Ok(UserInfoView {
            shares: info.shares,
            shares_frozen: info.shares_frozen,
            bonus_debt: info.bonus_debt,
            reward_debt: info.reward_debt,
            unlock_times: entries.keys(),
            locked_amounts: entries.values(),
        })
    }

    pub fn pool_length(env: Env) -> u32 {
        pool::pool_count(&env)
    }

    pub fn get_pool(env: Env, pid: u32) -> Result<PoolInfo, ContractError> {
        pool::load_pool(&env, pid)
    }

    /// `None` for pools created without bonus eligibility.
    pub fn get_bonus(env: Env, pid: u32) -> Option<BonusInfo> {
        bonus::load_bonus(&env, pid)
    }

    pub fn bonus_pool_ids(env: Env) -> Vec<u32> {
        bonus::bonus_pools(&env)
    }

    pub fn get_user(env: Env, pid: u32, user: Address) -> UserInfo {
        pool::load_user(&env, pid, &user)
    }

    pub fn get_emission(env: Env) -> Result<EmissionState, ContractError> {
        emission::load(&env)
    }

    pub fn get_config(env: Env) -> Result<FarmConfig, ContractError> {
        Self::load_config(&env)
    }

    pub fn total_alloc_point(env: Env) -> u64 {
        pool::total_alloc_point(&env)
    }

    pub fn total_bonus_point(env: Env) -> u64 {
        bonus::total_bonus_point(&env)
    }

    pub fn is_whitelisted(env: Env, strategy: Address) -> bool {
        bonus::is_whitelisted(&env, &strategy)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Propose a new admin address. Only the current admin can call this.
    /// The new admin must call `accept_admin` to complete the transfer.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        env.storage().instance().set(&PENDING_ADMIN, &new_admin);

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    /// Accept the pending admin transfer. Only the proposed admin can call this.
    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_admin.require_auth();

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_ADMIN)
            .ok_or(ContractError::InvalidInput)?;

        if new_admin != pending {
            return Err(ContractError::Unauthorized);
        }

        let old_admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;

        env.storage().instance().set(&ADMIN, &new_admin);
        env.storage().instance().remove(&PENDING_ADMIN);

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    /// Cancel a pending admin transfer. Only the current admin can call this.
    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_ADMIN)
            .ok_or(ContractError::InvalidInput)?;

        env.storage().instance().remove(&PENDING_ADMIN);

        events::publish_admin_transfer_cancelled(&env, current_admin, pending);

        Ok(())
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        env.storage().instance().get(&PENDING_ADMIN)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    pub fn set_reward_token(
        env: Env,
        caller: Address,
        reward_token: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let mut config = Self::load_config(&env)?;
        config.reward_token = reward_token.clone();
        env.storage().instance().set(&CONFIG, &config);

        events::publish_reward_token_set(&env, reward_token);

        Ok(())
    }

    pub fn set_dev_address(
        env: Env,
        caller: Address,
        dev_address: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let mut config = Self::load_config(&env)?;
        config.dev_address = dev_address.clone();
        env.storage().instance().set(&CONFIG, &config);

        events::publish_dev_address_set(&env, dev_address);

        Ok(())
    }

    /// Update the dev cut (basis points, at most 10 000).
    pub fn set_owner_rate(
        env: Env,
        caller: Address,
        owner_rate: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if owner_rate > MAX_OWNER_RATE {
            return Err(ContractError::InvalidInput);
        }

        let mut config = Self::load_config(&env)?;
        config.owner_rate = owner_rate;
        env.storage().instance().set(&CONFIG, &config);

        events::publish_owner_rate_set(&env, owner_rate);

        Ok(())
    }

    /// Change the per-period decay ratio.
    ///
    /// Pending decay is applied first, so a ratio change can never rewrite a
    /// period that has already elapsed. Once the latch is engaged the call is
    /// a no-op and returns `false`.
    pub fn set_decay_ratio(
        env: Env,
        caller: Address,
        numerator: i128,
        denominator: i128,
    ) -> Result<bool, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if !emission::is_valid_ratio(numerator, denominator) {
            return Err(ContractError::InvalidInput);
        }

        let mut state = emission::load(&env)?;
        Self::advance_emission(&env, &mut state, env.ledger().timestamp());
        let changed = state.set_ratio(numerator, denominator);
        emission::store(&env, &state);

        if changed {
            events::publish_decay_ratio_set(&env, numerator, denominator, state.decay_locked);
        }

        Ok(changed)
    }

    /// Engage the decay-ratio latch. Irreversible.
    pub fn lock_decay_ratio(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let mut state = emission::load(&env)?;
        state.lock_ratio();
        emission::store(&env, &state);

        events::publish_decay_ratio_set(
            &env,
            state.decay_numerator,
            state.decay_denominator,
            true,
        );

        Ok(())
    }

    /// Sweep a token sent to the farm by mistake to the admin.
    ///
    /// The reward token backs outstanding claims and is refused.
    pub fn rescue_tokens(
        env: Env,
        caller: Address,
        token_address: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let config = Self::load_config(&env)?;
        if token_address == config.reward_token {
            return Err(ContractError::ProtectedAsset);
        }
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        token::Client::new(&env, &token_address).transfer(
            &env.current_contract_address(),
            &caller,
            &amount,
        );

        events::publish_tokens_rescued(&env, token_address, caller, amount);

        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert if `caller` is not the stored admin.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != admin {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn load_config(env: &Env) -> Result<FarmConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    fn advance_emission(env: &Env, state: &mut EmissionState, now: u64) {
        if state.advance(now) {
            events::publish_rate_decayed(env, state.last_decay_period, state.rate_per_second);
        }
    }

    /// Load the decay clock once, sync every pool against it, store it back.
    fn update_all(env: &Env) -> Result<(), ContractError> {
        let config = Self::load_config(env)?;
        let mut state = emission::load(env)?;
        for pid in 0..pool::pool_count(env) {
            Self::sync_pool(env, &config, &mut state, pid)?;
        }
        emission::store(env, &state);
        Ok(())
    }

    /// Single-pool variant of `update_all` that hands back the synced pool.
    fn update_one(env: &Env, config: &FarmConfig, pid: u32) -> Result<PoolInfo, ContractError> {
        let mut state = emission::load(env)?;
        let pool_info = Self::sync_pool(env, config, &mut state, pid)?;
        emission::store(env, &state);
        Ok(pool_info)
    }

    /// Accrue rewards for `pid` up to now.
    ///
    /// 1. Advance the shared decay clock.
    /// 2. Skip if the pool is already current.
    /// 3. With no shares staked, just move the timestamp.
    /// 4. With a zero multiplier (supply ceiling hit), leave the timestamp.
    /// 5. Otherwise mint the pool's reward plus the dev cut and grow the
    ///    accumulator.
    fn sync_pool(
        env: &Env,
        config: &FarmConfig,
        state: &mut EmissionState,
        pid: u32,
    ) -> Result<PoolInfo, ContractError> {
        let mut pool_info = pool::load_pool(env, pid)?;
        let now = env.ledger().timestamp();

        Self::advance_emission(env, state, now);

        if now <= pool_info.last_reward_time {
            return Ok(pool_info);
        }

        let shares_total = StrategyClient::new(env, &pool_info.strategy).shares_total();
        if shares_total <= 0 {
            pool_info.last_reward_time = now;
            pool::store_pool(env, pid, &pool_info);
            return Ok(pool_info);
        }

        let reward_token = RewardTokenClient::new(env, &config.reward_token);
        let multiplier = emission::get_multiplier(
            pool_info.last_reward_time,
            now,
            reward_token.total_supply(),
            config.max_supply,
        );
        if multiplier == 0 {
            return Ok(pool_info);
        }

        let reward = rewards::pool_reward(
            multiplier,
            state.rate_per_second,
            pool_info.alloc_point,
            pool::total_alloc_point(env),
        );
        if reward > 0 {
            let dev_cut = rewards::owner_cut(reward, config.owner_rate);
            if dev_cut > 0 {
                reward_token.mint(&config.dev_address, &dev_cut);
            }
            reward_token.mint(&env.current_contract_address(), &reward);

            pool_info.acc_per_share = pool_info
                .acc_per_share
                .saturating_add(rewards::acc_increment(reward, shares_total));
        }
        pool_info.last_reward_time = now;
        pool::store_pool(env, pid, &pool_info);

        events::publish_pool_updated(env, pid, reward, pool_info.acc_per_share);

        Ok(pool_info)
    }

    /// Pay out whatever reward and bonus `info` has accrued since its last
    /// checkpoint.
    fn settle(
        env: &Env,
        config: &FarmConfig,
        pid: u32,
        user: &Address,
        info: &UserInfo,
        pool_info: &PoolInfo,
        bonus_info: Option<&BonusInfo>,
    ) {
        if info.shares <= 0 {
            return;
        }
        let reward = rewards::pending(info.shares, pool_info.acc_per_share, info.reward_debt).max(0);
        let bonus_amount = bonus_info
            .map(|b| rewards::pending(info.shares, b.acc_per_share, info.bonus_debt).max(0))
            .unwrap_or(0);

        let owed = reward.saturating_add(bonus_amount);
        if owed <= 0 {
            return;
        }
        let paid = Self::safe_reward_transfer(env, config, user, owed);

        events::publish_reward_paid(env, user.clone(), pid, reward, bonus_amount, paid);
    }

    /// Transfer up to `amount` reward tokens, clamped to the farm's balance.
    fn safe_reward_transfer(env: &Env, config: &FarmConfig, to: &Address, amount: i128) -> i128 {
        let reward_token = RewardTokenClient::new(env, &config.reward_token);
        let farm = env.current_contract_address();

        let balance = reward_token.balance(&farm);
        let paid = amount.min(balance).max(0);
        if paid < amount {
            log!(env, "Reward payout clamped: owed {}, paid {}", amount, paid);
        }
        if paid > 0 {
            reward_token.transfer(&farm, to, &paid);
        }
        paid
    }

    /// Reset both checkpoints to the position's current entitlement.
    fn checkpoint(info: &mut UserInfo, pool_info: &PoolInfo, bonus_info: Option<&BonusInfo>) {
        info.reward_debt = rewards::accumulated(info.shares, pool_info.acc_per_share);
        info.bonus_debt = bonus_info
            .map(|b| rewards::accumulated(info.shares, b.acc_per_share))
            .unwrap_or(0);
    }

    fn deposit_guarded(
        env: &Env,
        user: &Address,
        pid: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        let config = Self::load_config(env)?;
        let pool_info = Self::update_one(env, &config, pid)?;
        let bonus_info = bonus::load_bonus(env, pid);

        let mut info = pool::load_user(env, pid, user);
        frozen::release_due(env, pid, user, &mut info);

        Self::settle(env, &config, pid, user, &info, &pool_info, bonus_info.as_ref());

        let mut shares_added: i128 = 0;
        if amount > 0 {
            let farm = env.current_contract_address();
            let want = token::Client::new(env, &pool_info.want);
            want.transfer(user, &farm, &amount);
            want.transfer(&farm, &pool_info.strategy, &amount);

            shares_added = StrategyClient::new(env, &pool_info.strategy)
                .deposit(user, &amount)
                .max(0);
            info.shares = info.shares.saturating_add(shares_added);

            if bonus_info.is_some() && shares_added > 0 {
                let unlock_at =
                    frozen::add_lock(env, pid, &pool_info, user, &mut info, shares_added);
                events::publish_shares_frozen(env, user.clone(), pid, shares_added, unlock_at);
            }
        }

        Self::checkpoint(&mut info, &pool_info, bonus_info.as_ref());
        pool::store_user(env, pid, user, &info);

        events::publish_deposit(env, user.clone(), pid, amount);

        Ok(shares_added)
    }

    fn withdraw_guarded(
        env: &Env,
        user: &Address,
        pid: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        let config = Self::load_config(env)?;
        let pool_info = Self::update_one(env, &config, pid)?;
        let bonus_info = bonus::load_bonus(env, pid);

        let mut info = pool::load_user(env, pid, user);
        frozen::release_due(env, pid, user, &mut info);

        if info.shares <= 0 {
            return Err(ContractError::NoStake);
        }
        let strategy = StrategyClient::new(env, &pool_info.strategy);
        let shares_total = strategy.shares_total();
        if shares_total <= 0 {
            return Err(ContractError::PoolInsolvent);
        }

        Self::settle(env, &config, pid, user, &info, &pool_info, bonus_info.as_ref());

        let want_locked_total = strategy.want_locked_total();
        let ceiling = rewards::withdrawable(
            info.shares,
            info.shares_frozen,
            want_locked_total,
            shares_total,
        );
        let mut amount = amount.min(ceiling);

        if amount > 0 {
            let shares_removed = strategy.withdraw(user, &amount).max(0);
            info.shares = info.shares.saturating_sub(shares_removed).max(0);
            amount = Self::send_want(env, &pool_info.want, user, amount);
        }

        Self::checkpoint(&mut info, &pool_info, bonus_info.as_ref());
        pool::store_user(env, pid, user, &info);

        events::publish_withdraw(env, user.clone(), pid, amount);

        Ok(amount)
    }

    fn emergency_withdraw_guarded(
        env: &Env,
        user: &Address,
        pid: u32,
    ) -> Result<i128, ContractError> {
        let pool_info = pool::load_pool(env, pid)?;
        let mut info = pool::load_user(env, pid, user);
        frozen::release_due(env, pid, user, &mut info);

        let strategy = StrategyClient::new(env, &pool_info.strategy);
        let shares_total = strategy.shares_total();
        if info.shares > 0 && shares_total <= 0 {
            return Err(ContractError::PoolInsolvent);
        }

        let want_locked_total = strategy.want_locked_total();
        let amount = rewards::withdrawable(
            info.shares,
            info.shares_frozen,
            want_locked_total,
            shares_total,
        );

        let mut sent: i128 = 0;
        if amount > 0 {
            strategy.withdraw(user, &amount);
            sent = Self::send_want(env, &pool_info.want, user, amount);
        }

        // Entries that have not expired stay as they are.
        info.shares = 0;
        info.reward_debt = 0;
        info.bonus_debt = 0;
        pool::store_user(env, pid, user, &info);

        events::publish_emergency_withdraw(env, user.clone(), pid, sent);

        Ok(sent)
    }

    /// Transfer want back to `user`, never more than the farm actually holds.
    fn send_want(env: &Env, want_address: &Address, user: &Address, amount: i128) -> i128 {
        let farm = env.current_contract_address();
        let want = token::Client::new(env, want_address);
        let sent = amount.min(want.balance(&farm)).max(0);
        if sent < amount {
            log!(env, "Want transfer clamped: requested {}, sent {}", amount, sent);
        }
        if sent > 0 {
            want.transfer(&farm, user, &sent);
        }
        sent
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;
