extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    vec, Address, Env,
};

use crate::test::{
    add_pool, assert_contract_error, funded_user, schedule, setup, LONG_PERIOD, MAX_SUPPLY, RATE,
    START,
};
use crate::{ContractError, FarmContract, FarmContractClient};

fn bare() -> (Env, FarmContractClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let client = FarmContractClient::new(&env, &env.register(FarmContract, ()));
    let admin = Address::generate(&env);
    let reward = Address::generate(&env);
    (env, client, admin, reward)
}

// ── initialize ───────────────────────────────────────────────────────────────

#[test]
fn test_initialize_twice_fails() {
    let farm = setup();
    let result = farm.client.try_initialize(
        &farm.admin,
        &farm.reward.address,
        &farm.dev,
        &0,
        &MAX_SUPPLY,
        &schedule(LONG_PERIOD, 1, 1),
    );
    assert_contract_error(result, ContractError::AlreadyInitialized);
}

#[test]
fn test_initialize_rejects_owner_rate_above_full() {
    let (env, client, admin, reward) = bare();
    let dev = Address::generate(&env);
    let result = client.try_initialize(
        &admin,
        &reward,
        &dev,
        &10_001,
        &MAX_SUPPLY,
        &schedule(LONG_PERIOD, 1, 1),
    );
    assert_contract_error(result, ContractError::InvalidInput);
    assert!(!client.is_initialized());
}

#[test]
fn test_initialize_rejects_bad_schedule() {
    let (env, client, admin, reward) = bare();
    let dev = Address::generate(&env);

    assert_contract_error(
        client.try_initialize(&admin, &reward, &dev, &0, &MAX_SUPPLY, &schedule(0, 1, 1)),
        ContractError::InvalidInput,
    );
    assert_contract_error(
        client.try_initialize(&admin, &reward, &dev, &0, &MAX_SUPPLY, &schedule(100, 2, 1)),
        ContractError::InvalidInput,
    );
    assert_contract_error(
        client.try_initialize(&admin, &reward, &dev, &0, &0, &schedule(100, 1, 2)),
        ContractError::InvalidInput,
    );
}

// ── Pool administration ──────────────────────────────────────────────────────

#[test]
fn test_non_admin_cannot_add_pool() {
    let farm = setup();
    let stranger = Address::generate(&farm.env);
    let want = Address::generate(&farm.env);
    let strategy = Address::generate(&farm.env);

    let result = farm.client.try_add_pool(
        &stranger, &false, &false, &100, &0, &0, &want, &strategy,
    );
    assert_contract_error(result, ContractError::Unauthorized);
    assert_eq!(farm.client.pool_length(), 0);
}

#[test]
fn test_strategy_cannot_back_two_pools() {
    let farm = setup();
    let pool = add_pool(&farm, false, 100, 0, 0);

    let result = farm.client.try_add_pool(
        &farm.admin,
        &false,
        &true,
        &50,
        &50,
        &0,
        &pool.want,
        &pool.strategy.address,
    );
    assert_contract_error(result, ContractError::DuplicateStrategy);
    assert_eq!(farm.client.pool_length(), 1);
}

#[test]
fn test_pool_ids_are_sequential() {
    let farm = setup();
    let a = add_pool(&farm, false, 100, 0, 0);
    let b = add_pool(&farm, true, 200, 10, 60);
    let c = add_pool(&farm, false, 300, 0, 0);

    assert_eq!((a.pid, b.pid, c.pid), (0, 1, 2));
    assert_eq!(farm.client.pool_length(), 3);
    assert_eq!(farm.client.total_alloc_point(), 600);

    let info = farm.client.get_pool(&b.pid);
    assert_eq!(info.want, b.want);
    assert_eq!(info.strategy, b.strategy.address);
    assert_eq!(info.frozen_period, 60);
    assert_eq!(info.acc_per_share, 0);
}

#[test]
fn test_set_pool_keeps_totals_consistent() {
    let farm = setup();
    let a = add_pool(&farm, true, 100, 40, 10);
    let b = add_pool(&farm, true, 300, 60, 10);

    farm.client.set_pool(&farm.admin, &true, &a.pid, &500, &10, &20);

    assert_eq!(farm.client.total_alloc_point(), 800);
    assert_eq!(farm.client.total_bonus_point(), 70);

    let pool_a = farm.client.get_pool(&a.pid);
    assert_eq!(pool_a.alloc_point, 500);
    assert_eq!(pool_a.frozen_period, 20);
    assert_eq!(farm.client.get_bonus(&a.pid).unwrap().alloc_point, 10);
    assert_eq!(farm.client.get_bonus(&b.pid).unwrap().alloc_point, 60);

    let pools = farm.client.pool_length();
    let sum: u64 = (0..pools).map(|pid| farm.client.get_pool(&pid).alloc_point).sum();
    assert_eq!(sum, farm.client.total_alloc_point());
}

#[test]
fn test_set_pool_ignores_bonus_weight_for_plain_pool() {
    let farm = setup();
    let plain = add_pool(&farm, false, 100, 0, 0);
    add_pool(&farm, true, 100, 25, 0);

    farm.client.set_pool(&farm.admin, &false, &plain.pid, &100, &999, &0);

    assert!(farm.client.get_bonus(&plain.pid).is_none());
    assert_eq!(farm.client.total_bonus_point(), 25);
}

#[test]
fn test_set_pool_unknown_pid() {
    let farm = setup();
    assert_contract_error(
        farm.client.try_set_pool(&farm.admin, &false, &3, &100, &0, &0),
        ContractError::PoolNotFound,
    );
}

#[test]
fn test_non_admin_cannot_set_pool() {
    let farm = setup();
    let pool = add_pool(&farm, false, 100, 0, 0);
    let stranger = Address::generate(&farm.env);

    assert_contract_error(
        farm.client.try_set_pool(&stranger, &false, &pool.pid, &1, &0, &0),
        ContractError::Unauthorized,
    );
    assert_eq!(farm.client.get_pool(&pool.pid).alloc_point, 100);
}

#[test]
fn test_zero_weight_pool_earns_nothing() {
    let farm = setup();
    let pool = add_pool(&farm, false, 100, 0, 0);
    farm.client.set_pool(&farm.admin, &false, &pool.pid, &0, &0, &0);
    assert_eq!(farm.client.total_alloc_point(), 0);

    let user = funded_user(&farm, &pool, 1_000);
    farm.client.deposit(&user, &pool.pid, &1_000);

    farm.env.ledger().set_timestamp(START + 100);
    farm.client.update_pool(&pool.pid);

    assert_eq!(farm.client.pending(&pool.pid, &user), 0);
    assert_eq!(farm.reward.total_supply(), 0);
}

// ── Setters ──────────────────────────────────────────────────────────────────

#[test]
fn test_admin_setters() {
    let farm = setup();
    let new_reward = Address::generate(&farm.env);
    let new_dev = Address::generate(&farm.env);

    farm.client.set_reward_token(&farm.admin, &new_reward);
    farm.client.set_dev_address(&farm.admin, &new_dev);
    farm.client.set_owner_rate(&farm.admin, &10_000);

    let config = farm.client.get_config();
    assert_eq!(config.reward_token, new_reward);
    assert_eq!(config.dev_address, new_dev);
    assert_eq!(config.owner_rate, 10_000);
}

#[test]
fn test_owner_rate_upper_bound() {
    let farm = setup();
    assert_contract_error(
        farm.client.try_set_owner_rate(&farm.admin, &10_001),
        ContractError::InvalidInput,
    );
    assert_eq!(farm.client.get_config().owner_rate, 0);
}

#[test]
fn test_non_admin_cannot_use_setters() {
    let farm = setup();
    let stranger = Address::generate(&farm.env);

    assert_contract_error(
        farm.client.try_set_reward_token(&stranger, &stranger),
        ContractError::Unauthorized,
    );
    assert_contract_error(
        farm.client.try_set_dev_address(&stranger, &stranger),
        ContractError::Unauthorized,
    );
    assert_contract_error(
        farm.client.try_set_owner_rate(&stranger, &1),
        ContractError::Unauthorized,
    );
    assert_contract_error(
        farm.client.try_set_decay_ratio(&stranger, &1, &2),
        ContractError::Unauthorized,
    );
    assert_contract_error(
        farm.client.try_lock_decay_ratio(&stranger),
        ContractError::Unauthorized,
    );
    assert_eq!(farm.client.get_emission().rate_per_second, RATE);
}

// ── rescue_tokens ────────────────────────────────────────────────────────────

#[test]
fn test_rescue_refuses_reward_token() {
    let farm = setup();
    farm.reward.mint(&farm.client.address, &1_000);

    assert_contract_error(
        farm.client.try_rescue_tokens(&farm.admin, &farm.reward.address, &1_000),
        ContractError::ProtectedAsset,
    );
    assert_eq!(farm.reward.balance(&farm.client.address), 1_000);
}

#[test]
fn test_rescue_stray_token() {
    let farm = setup();
    let stray = farm
        .env
        .register_stellar_asset_contract_v2(Address::generate(&farm.env))
        .address();
    StellarAssetClient::new(&farm.env, &stray).mint(&farm.client.address, &400);

    farm.client.rescue_tokens(&farm.admin, &stray, &150);

    let token = TokenClient::new(&farm.env, &stray);
    assert_eq!(token.balance(&farm.admin), 150);
    assert_eq!(token.balance(&farm.client.address), 250);

    assert_contract_error(
        farm.client.try_rescue_tokens(&farm.admin, &stray, &0),
        ContractError::InvalidInput,
    );
    let stranger = Address::generate(&farm.env);
    assert_contract_error(
        farm.client.try_rescue_tokens(&stranger, &stray, &1),
        ContractError::Unauthorized,
    );
}

// ── Two-step admin transfer ──────────────────────────────────────────────────

#[test]
fn test_admin_transfer_two_step() {
    let farm = setup();
    let next = Address::generate(&farm.env);

    farm.client.propose_admin(&farm.admin, &next);
    assert_eq!(farm.client.get_pending_admin(), Some(next.clone()));
    assert_eq!(farm.client.get_admin(), farm.admin);

    farm.client.accept_admin(&next);
    assert_eq!(farm.client.get_admin(), next);
    assert_eq!(farm.client.get_pending_admin(), None);

    // The old admin has lost its rights.
    assert_contract_error(
        farm.client.try_set_owner_rate(&farm.admin, &1),
        ContractError::Unauthorized,
    );
    farm.client.set_owner_rate(&next, &1);
}

#[test]
fn test_accept_admin_by_wrong_address() {
    let farm = setup();
    let next = Address::generate(&farm.env);
    let impostor = Address::generate(&farm.env);

    assert_contract_error(farm.client.try_accept_admin(&next), ContractError::InvalidInput);

    farm.client.propose_admin(&farm.admin, &next);
    assert_contract_error(
        farm.client.try_accept_admin(&impostor),
        ContractError::Unauthorized,
    );
    assert_eq!(farm.client.get_admin(), farm.admin);
}

#[test]
fn test_cancel_admin_transfer() {
    let farm = setup();
    let next = Address::generate(&farm.env);

    assert_contract_error(
        farm.client.try_cancel_admin_transfer(&farm.admin),
        ContractError::InvalidInput,
    );

    farm.client.propose_admin(&farm.admin, &next);
    farm.client.cancel_admin_transfer(&farm.admin);

    assert_eq!(farm.client.get_pending_admin(), None);
    assert_contract_error(farm.client.try_accept_admin(&next), ContractError::InvalidInput);
}

#[test]
fn test_bonus_pool_listing() {
    let farm = setup();
    add_pool(&farm, false, 10, 0, 0);
    let b = add_pool(&farm, true, 10, 5, 0);
    let c = add_pool(&farm, true, 10, 5, 0);

    assert_eq!(farm.client.bonus_pool_ids(), vec![&farm.env, b.pid, c.pid]);
    assert_eq!(farm.client.total_bonus_point(), 10);
}
