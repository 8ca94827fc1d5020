#![no_main]

use arbitrary::Arbitrary;
use farm::emission::EmissionSchedule;
use farm::{rewards, FarmContract, FarmContractClient};
use farm_mocks::{MockRewardToken, MockRewardTokenClient, MockStrategy, MockStrategyClient};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env,
};

const POOLS: u32 = 3;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { user: u8, pid: u8, amount: u64 },
    Withdraw { user: u8, pid: u8, amount: u64 },
    WithdrawAll { user: u8, pid: u8 },
    EmergencyWithdraw { user: u8, pid: u8 },
    Advance { seconds: u16 },
    UpdatePool { pid: u8 },
    SetPool { pid: u8, alloc_point: u16, bonus_alloc_point: u16, frozen_period: u16 },
    Buyback { amount: u64 },
    SetDecayRatio { numerator: u16, denominator: u16 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_000);

    let reward_id = env.register(MockRewardToken, ());
    let reward = MockRewardTokenClient::new(&env, &reward_id);

    let client = FarmContractClient::new(&env, &env.register(FarmContract, ()));
    let admin = Address::generate(&env);
    client.initialize(
        &admin,
        &reward_id,
        &Address::generate(&env),
        &1_000,
        &i128::MAX,
        &EmissionSchedule {
            start_time: 1_000,
            period_length: 3_600,
            initial_rate: 1_000_000,
            decay_numerator: 9,
            decay_denominator: 10,
        },
    );

    let users: Vec<Address> = (0..4).map(|_| Address::generate(&env)).collect();
    let mut strategies = Vec::new();
    for pid in 0..POOLS {
        let want = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();
        let strategy = MockStrategyClient::new(&env, &env.register(MockStrategy, ()));
        strategy.initialize(&client.address, &want);
        let bonus = pid > 0;
        client.add_pool(
            &admin,
            &false,
            &bonus,
            &100,
            &50,
            &600,
            &want,
            &strategy.address,
        );
        for user in &users {
            StellarAssetClient::new(&env, &want).mint(user, &(u64::MAX as i128));
        }
        strategies.push(strategy);
    }

    // Shares left with each strategy by emergency exits out of frozen stakes.
    let mut stranded = vec![0i128; POOLS as usize];

    // Contract errors are expected; we are looking for host panics from
    // overflow or broken accounting.
    for action in actions {
        match action {
            FuzzAction::Deposit { user, pid, amount } => {
                let user = &users[user as usize % users.len()];
                let _ = client.try_deposit(user, &(pid as u32 % POOLS), &(amount as i128));
            }
            FuzzAction::Withdraw { user, pid, amount } => {
                let user = &users[user as usize % users.len()];
                let _ = client.try_withdraw(user, &(pid as u32 % POOLS), &(amount as i128));
            }
            FuzzAction::WithdrawAll { user, pid } => {
                let user = &users[user as usize % users.len()];
                let _ = client.try_withdraw_all(user, &(pid as u32 % POOLS));
            }
            FuzzAction::EmergencyWithdraw { user, pid } => {
                let user = &users[user as usize % users.len()];
                let pid = pid as u32 % POOLS;
                let strategy = &strategies[pid as usize];
                let shares_before = client.get_user(&pid, user).shares;
                let total_before = strategy.shares_total();
                if let Ok(Ok(_)) = client.try_emergency_withdraw(user, &pid) {
                    // Frozen shares stay with the strategy but leave the user.
                    let burned = total_before - strategy.shares_total();
                    stranded[pid as usize] += shares_before - burned;
                }
            }
            FuzzAction::Advance { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + seconds as u64);
            }
            FuzzAction::UpdatePool { pid } => {
                let _ = client.try_update_pool(&(pid as u32 % POOLS));
            }
            FuzzAction::SetPool {
                pid,
                alloc_point,
                bonus_alloc_point,
                frozen_period,
            } => {
                let _ = client.try_set_pool(
                    &admin,
                    &true,
                    &(pid as u32 % POOLS),
                    &(alloc_point as u64),
                    &(bonus_alloc_point as u64),
                    &(frozen_period as u64),
                );
            }
            FuzzAction::Buyback { amount } => {
                reward.mint(&client.address, &(amount as i128));
                let _ = client.try_distribute_buyback(&strategies[1].address, &(amount as i128));
            }
            FuzzAction::SetDecayRatio {
                numerator,
                denominator,
            } => {
                let _ = client.try_set_decay_ratio(
                    &admin,
                    &(numerator as i128),
                    &(denominator as i128),
                );
            }
        }

        for pid in 0..POOLS {
            let pool = client.get_pool(&pid);
            let bonus = client.get_bonus(&pid);
            let mut shares = 0i128;
            for user in &users {
                let info = client.get_user(&pid, user);
                assert!(info.shares >= 0);
                assert!(rewards::pending(info.shares, pool.acc_per_share, info.reward_debt) >= 0);
                if let Some(bonus) = &bonus {
                    let owed = rewards::pending(info.shares, bonus.acc_per_share, info.bonus_debt);
                    assert!(owed >= 0);
                }
                shares += info.shares;
            }
            assert!(stranded[pid as usize] >= 0);
            assert_eq!(
                shares + stranded[pid as usize],
                strategies[pid as usize].shares_total()
            );
        }
    }
});
