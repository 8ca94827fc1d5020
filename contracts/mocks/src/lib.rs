//! Test doubles for the contracts the farm depends on.
//!
//! - [`MockStrategy`]: a vault that mints shares pro rata to the want it
//!   holds and returns want to the farm on withdraw.
//! - [`MockRewardToken`]: a minimal mintable token that tracks total supply.
//!
//! Only the farm may move funds through the strategy; the token lets anyone
//! mint so tests can pre-fund balances and push supply to the ceiling.

#![no_std]

use soroban_sdk::{contract, contractimpl, symbol_short, token, Address, Env, Symbol};

// ── Strategy ─────────────────────────────────────────────────────────────────

const FARM: Symbol = symbol_short!("FARM");
const WANT: Symbol = symbol_short!("WANT");
const SHARES: Symbol = symbol_short!("SHARES");
const LOCKED: Symbol = symbol_short!("LOCKED");

#[contract]
pub struct MockStrategy;

#[contractimpl]
impl MockStrategy {
    pub fn initialize(env: Env, farm: Address, want: Address) {
        env.storage().instance().set(&FARM, &farm);
        env.storage().instance().set(&WANT, &want);
    }

    pub fn shares_total(env: Env) -> i128 {
        env.storage().instance().get(&SHARES).unwrap_or(0)
    }

    pub fn want_locked_total(env: Env) -> i128 {
        env.storage().instance().get(&LOCKED).unwrap_or(0)
    }

    /// Called by the farm after it has forwarded `amount` want.
    pub fn deposit(env: Env, _user: Address, amount: i128) -> i128 {
        Self::farm(&env).require_auth();

        let shares_total = Self::shares_total(env.clone());
        let locked = Self::want_locked_total(env.clone());
        let shares_added = if shares_total == 0 || locked == 0 {
            amount
        } else {
            amount * shares_total / locked
        };

        Self::set_totals(env, shares_total + shares_added, locked + amount);
        shares_added
    }

    /// Burns the shares worth `amount` and sends the want back to the farm.
    pub fn withdraw(env: Env, _user: Address, amount: i128) -> i128 {
        let farm = Self::farm(&env);
        farm.require_auth();

        let shares_total = Self::shares_total(env.clone());
        let locked = Self::want_locked_total(env.clone());
        let amount = amount.min(locked);
        let shares_removed = if locked == 0 {
            0
        } else {
            (amount * shares_total / locked).min(shares_total)
        };

        let want: Address = env.storage().instance().get(&WANT).unwrap();
        let client = token::Client::new(&env, &want);
        let held = client.balance(&env.current_contract_address());
        let sent = amount.min(held);
        if sent > 0 {
            client.transfer(&env.current_contract_address(), &farm, &sent);
        }

        Self::set_totals(env, shares_total - shares_removed, locked - amount);
        shares_removed
    }

    /// Grow the want backing existing shares, as a compounding vault would.
    /// The caller is expected to have minted `profit` want to this contract.
    pub fn simulate_yield(env: Env, profit: i128) {
        let locked = Self::want_locked_total(env.clone());
        env.storage().instance().set(&LOCKED, &(locked + profit));
    }

    /// Overwrite both totals, e.g. to model a drained strategy.
    pub fn set_totals(env: Env, shares_total: i128, want_locked_total: i128) {
        env.storage().instance().set(&SHARES, &shares_total);
        env.storage().instance().set(&LOCKED, &want_locked_total);
    }

    fn farm(env: &Env) -> Address {
        env.storage().instance().get(&FARM).unwrap()
    }
}

// ── Reward token ─────────────────────────────────────────────────────────────

const SUPPLY: Symbol = symbol_short!("SUPPLY");
const BALANCE: Symbol = symbol_short!("BAL");

#[contract]
pub struct MockRewardToken;

#[contractimpl]
impl MockRewardToken {
    pub fn mint(env: Env, to: Address, amount: i128) {
        let balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .persistent()
            .set(&(BALANCE, to), &(balance + amount));
        let supply = Self::total_supply(env.clone());
        env.storage().instance().set(&SUPPLY, &(supply + amount));
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        env.storage().persistent().get(&(BALANCE, id)).unwrap_or(0)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();

        let from_balance = Self::balance(env.clone(), from.clone());
        if from_balance < amount {
            panic!("insufficient balance");
        }
        let to_balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .persistent()
            .set(&(BALANCE, from), &(from_balance - amount));
        env.storage()
            .persistent()
            .set(&(BALANCE, to), &(to_balance + amount));
    }

    /// Burn without touching supply, to model a farm that holds less than it
    /// owes.
    pub fn drain(env: Env, id: Address, amount: i128) {
        let balance = Self::balance(env.clone(), id.clone());
        env.storage()
            .persistent()
            .set(&(BALANCE, id), &(balance - amount).max(0));
    }

    pub fn total_supply(env: Env) -> i128 {
        env.storage().instance().get(&SUPPLY).unwrap_or(0)
    }
}
