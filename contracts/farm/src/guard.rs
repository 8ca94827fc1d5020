//! Global reentrancy guard.
//!
//! One flag for the whole farm, not per pool: a nested call into any pool
//! during an external transfer would otherwise see half-updated accounting.

use soroban_sdk::{symbol_short, Env, Symbol};

use crate::ContractError;

const ENTERED: Symbol = symbol_short!("ENTERED");

pub fn is_entered(env: &Env) -> bool {
    env.storage().instance().get(&ENTERED).unwrap_or(false)
}

/// Take the guard, failing if another mutating call holds it.
pub fn enter(env: &Env) -> Result<(), ContractError> {
    if is_entered(env) {
        return Err(ContractError::ReentrantCall);
    }
    env.storage().instance().set(&ENTERED, &true);
    Ok(())
}

pub fn exit(env: &Env) {
    env.storage().instance().remove(&ENTERED);
}

/// Run `f` while holding the guard. The guard is released whether `f`
/// succeeds or fails.
pub fn with_guard<T>(
    env: &Env,
    f: impl FnOnce() -> Result<T, ContractError>,
) -> Result<T, ContractError> {
    enter(env)?;
    let result = f();
    exit(env);
    result
}
