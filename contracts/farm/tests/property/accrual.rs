#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for the reward arithmetic and the decay clock.
//!
//! Invariants tested:
//! - Spreading an amount over shares never pays out more than the amount
//! - Per-pool rewards never sum to more than the farm-wide emission
//! - The dev cut never exceeds the reward it is taken from
//! - The emission rate never increases over time
//! - Advancing the clock period by period never ends above one jump
//! - A single jump truncates once: `rate × num^k / den^k`
//! - The rate is frozen from period 10 onwards
//! - The withdrawable ceiling never exceeds the position's value

use farm::emission::{EmissionSchedule, EmissionState, MAX_DECAY_PERIODS};
use farm::rewards;
use proptest::prelude::*;

const START: u64 = 1_000;

fn state(period: u64, rate: i128, num: i128, den: i128) -> EmissionState {
    EmissionState::from_schedule(&EmissionSchedule {
        start_time: START,
        period_length: period,
        initial_rate: rate,
        decay_numerator: num,
        decay_denominator: den,
    })
}

/// Valid `(numerator, denominator)` with `numerator ≤ denominator`.
fn ratio() -> impl Strategy<Value = (i128, i128)> {
    (1i128..=1_000).prop_flat_map(|den| (0i128..=den, Just(den)))
}

/// Ratios small enough that `rate × num^10` fits in an `i128`.
fn small_ratio() -> impl Strategy<Value = (i128, i128)> {
    (1i128..=100).prop_flat_map(|den| (0i128..=den, Just(den)))
}

proptest! {
    /// Every holder's share of a spread amount, summed, stays within the amount.
    #[test]
    fn prop_spread_never_overpays(
        amount in 0i128..=1_000_000_000_000,
        holdings in prop::collection::vec(1i128..=1_000_000, 1..8),
    ) {
        let total: i128 = holdings.iter().sum();
        let acc = rewards::acc_increment(amount, total);
        let paid: i128 = holdings.iter().map(|s| rewards::accumulated(*s, acc)).sum();
        prop_assert!(paid <= amount);
        prop_assert!(paid >= 0);
    }

    /// Rewards across all pools never exceed `multiplier × rate`.
    #[test]
    fn prop_pool_rewards_bounded_by_emission(
        multiplier in 0u64..=1_000_000,
        rate in 0i128..=1_000_000_000,
        allocs in prop::collection::vec(0u64..=10_000, 1..6),
    ) {
        let total: u64 = allocs.iter().sum();
        let sum: i128 = allocs
            .iter()
            .map(|a| rewards::pool_reward(multiplier, rate, *a, total))
            .sum();
        prop_assert!(sum <= multiplier as i128 * rate);
    }

    #[test]
    fn prop_owner_cut_bounded(reward in 0i128..=1_000_000_000_000, rate in 0u32..=10_000) {
        let cut = rewards::owner_cut(reward, rate);
        prop_assert!(cut >= 0);
        prop_assert!(cut <= reward);
    }

    /// Later timestamps never see a higher rate.
    #[test]
    fn prop_rate_non_increasing(
        period in 1u64..=10_000,
        rate in 0i128..=1_000_000_000_000,
        (num, den) in ratio(),
        offsets in prop::collection::vec(0u64..=200_000, 1..10),
    ) {
        let mut s = state(period, rate, num, den);
        let mut sorted = offsets;
        sorted.sort_unstable();

        let mut last_rate = s.rate_per_second;
        for offset in sorted {
            s.advance(START + offset);
            prop_assert!(s.rate_per_second <= last_rate);
            prop_assert!(s.last_decay_period <= MAX_DECAY_PERIODS);
            last_rate = s.rate_per_second;
        }
    }

    /// Many small updates never end above one late update, since each update
    /// truncates once.
    #[test]
    fn prop_stepwise_never_above_jump(
        period in 1u64..=1_000,
        rate in 0i128..=1_000_000_000_000,
        (num, den) in small_ratio(),
        target in 0u64..=20_000,
        step in 1u64..=500,
    ) {
        let mut stepped = state(period, rate, num, den);
        let mut t = START;
        while t < START + target {
            stepped.advance(t);
            t += step;
        }
        stepped.advance(START + target);

        let mut jumped = state(period, rate, num, den);
        jumped.advance(START + target);

        prop_assert!(stepped.rate_per_second <= jumped.rate_per_second);
    }

    /// A first update at period `k` lands on `rate × num^k / den^k`, or leaves
    /// the rate alone once `k` is past period 10.
    #[test]
    fn prop_single_jump_truncates_once(
        period in 1u64..=1_000,
        rate in 0i128..=1_000_000_000_000,
        (num, den) in small_ratio(),
        target in 0u64..=20_000,
    ) {
        let mut s = state(period, rate, num, den);
        s.advance(START + target);

        let k = (target / period) as u32;
        let expected = if k <= MAX_DECAY_PERIODS {
            rate * num.pow(k) / den.pow(k)
        } else {
            rate
        };
        prop_assert_eq!(s.rate_per_second, expected);
    }

    /// Past period 10 the rate never changes again.
    #[test]
    fn prop_rate_frozen_after_last_period(
        period in 1u64..=1_000,
        rate in 0i128..=1_000_000_000_000,
        (num, den) in ratio(),
        extra in 0u64..=1_000_000,
    ) {
        let mut s = state(period, rate, num, den);
        s.advance(START + period * MAX_DECAY_PERIODS as u64);
        let at_last = s.rate_per_second;

        prop_assert!(!s.advance(START + period * MAX_DECAY_PERIODS as u64 + extra));
        prop_assert_eq!(s.rate_per_second, at_last);
    }

    /// The frozen part of a position can only lower what is withdrawable.
    #[test]
    fn prop_withdrawable_within_value(
        shares in 0i128..=1_000_000_000,
        frozen in 0i128..=1_000_000_000,
        shares_total in 1i128..=1_000_000_000,
        want_locked_total in 0i128..=1_000_000_000,
    ) {
        let ceiling = rewards::withdrawable(shares, frozen, want_locked_total, shares_total);
        let value = rewards::share_value(shares, want_locked_total, shares_total);
        prop_assert!(ceiling >= 0);
        prop_assert!(ceiling <= value);
        if frozen == 0 {
            prop_assert_eq!(ceiling, value);
        }
    }
}
