//! Contracts the farm calls but does not implement.
//!
//! The want asset uses the standard token interface (`soroban_sdk::token`);
//! only the strategy and the mintable reward token need bespoke clients.

use soroban_sdk::{contractclient, Address, Env};

/// Yield strategy backing one pool.
///
/// Shares are the strategy's unit of account and need not be 1:1 with the
/// deposited want amount. On `withdraw` the strategy sends the want tokens
/// back to the farm.
#[contractclient(name = "StrategyClient")]
pub trait Strategy {
    fn shares_total(env: Env) -> i128;
    fn want_locked_total(env: Env) -> i128;
    fn deposit(env: Env, user: Address, amount: i128) -> i128;
    fn withdraw(env: Env, user: Address, amount: i128) -> i128;
}

/// Reward token the farm is allowed to mint.
#[contractclient(name = "RewardTokenClient")]
pub trait RewardToken {
    fn mint(env: Env, to: Address, amount: i128);
    fn balance(env: Env, id: Address) -> i128;
    fn transfer(env: Env, from: Address, to: Address, amount: i128);
    fn total_supply(env: Env) -> i128;
}
