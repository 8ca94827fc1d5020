//! Emission-rate schedule.
//!
//! The rate decays by `decay_numerator / decay_denominator` once per elapsed
//! period, counted from `start_time`. Decay is only applied by calls whose
//! period index is at most [`MAX_DECAY_PERIODS`]; after that the last
//! computed rate applies forever, even if some periods were never visited.
//! There is a single schedule for the whole farm: every `update_pool` call
//! advances the same stored [`EmissionState`].

use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::ContractError;

const EMISSION: Symbol = symbol_short!("EMISSION");

/// Last period in which the rate still decays.
pub const MAX_DECAY_PERIODS: u32 = 10;

/// Parameters supplied once at `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionSchedule {
    pub start_time: u64,
    pub period_length: u64,
    pub initial_rate: i128,
    pub decay_numerator: i128,
    pub decay_denominator: i128,
}

/// Global decay clock.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionState {
    pub start_time: u64,
    pub period_length: u64,
    /// Reward tokens emitted per second across all pools.
    pub rate_per_second: i128,
    pub last_decay_period: u32,
    pub decay_numerator: i128,
    pub decay_denominator: i128,
    /// One-way latch; once set the decay ratio can no longer change.
    pub decay_locked: bool,
}

/// `0 ≤ numerator ≤ denominator`, `denominator > 0`.
pub fn is_valid_ratio(numerator: i128, denominator: i128) -> bool {
    denominator > 0 && numerator >= 0 && numerator <= denominator
}

impl EmissionSchedule {
    pub fn is_valid(&self) -> bool {
        self.period_length > 0
            && self.initial_rate >= 0
            && is_valid_ratio(self.decay_numerator, self.decay_denominator)
    }
}

impl EmissionState {
    pub fn from_schedule(schedule: &EmissionSchedule) -> Self {
        Self {
            start_time: schedule.start_time,
            period_length: schedule.period_length,
            rate_per_second: schedule.initial_rate,
            last_decay_period: 0,
            decay_numerator: schedule.decay_numerator,
            decay_denominator: schedule.decay_denominator,
            decay_locked: false,
        }
    }

    /// Number of whole periods elapsed at `now`, or `None` before the farm
    /// starts.
    pub fn period_index(&self, now: u64) -> Option<u32> {
        if now <= self.start_time || self.period_length == 0 {
            return None;
        }
        let periods = (now - self.start_time) / self.period_length;
        Some(u32::try_from(periods).unwrap_or(u32::MAX))
    }

    /// Bring the rate up to date for `now`. Returns `true` if the rate was
    /// decayed.
    ///
    /// Decay only happens while the period index is at most
    /// [`MAX_DECAY_PERIODS`]. A call that first lands past it leaves the rate
    /// wherever the previous call put it. The first applied step engages the
    /// ratio latch.
    pub fn advance(&mut self, now: u64) -> bool {
        let period = match self.period_index(now) {
            Some(p) if p <= MAX_DECAY_PERIODS => p,
            _ => return false,
        };
        if period <= self.last_decay_period {
            return false;
        }

        let elapsed = period.saturating_sub(self.last_decay_period);
        self.rate_per_second = decay(
            self.rate_per_second,
            self.decay_numerator,
            self.decay_denominator,
            elapsed,
        );
        self.last_decay_period = period;
        self.decay_locked = true;
        true
    }

    /// Copy of the state as it would look after `advance(now)`, for views.
    pub fn projected(&self, now: u64) -> Self {
        let mut state = self.clone();
        state.advance(now);
        state
    }

    /// Replace the decay ratio unless the latch is engaged. Returns whether
    /// the ratio changed.
    pub fn set_ratio(&mut self, numerator: i128, denominator: i128) -> bool {
        if self.decay_locked {
            return false;
        }
        self.decay_numerator = numerator;
        self.decay_denominator = denominator;
        true
    }

    pub fn lock_ratio(&mut self) {
        self.decay_locked = true;
    }
}

/// `rate × (numerator / denominator)^elapsed` with a single truncation.
///
/// Falls back to one truncating step per period when the powers or the
/// product overflow `i128`.
#[allow(clippy::arithmetic_side_effects)]
pub fn decay(rate: i128, numerator: i128, denominator: i128, elapsed: u32) -> i128 {
    if denominator <= 0 {
        return rate;
    }
    let exact = numerator
        .checked_pow(elapsed)
        .zip(denominator.checked_pow(elapsed))
        .and_then(|(num, den)| rate.checked_mul(num).map(|product| product / den));
    if let Some(rate) = exact {
        return rate;
    }

    let mut stepped = rate;
    for _ in 0..elapsed {
        // floor(r × n / d) without forming r × n.
        stepped = (stepped / denominator).saturating_mul(numerator)
            + (stepped % denominator).saturating_mul(numerator) / denominator;
    }
    stepped
}

/// Seconds of emission in `[from, to)`; zero once the reward token's supply
/// has reached `max_supply`.
pub fn get_multiplier(from: u64, to: u64, total_supply: i128, max_supply: i128) -> u64 {
    if total_supply >= max_supply {
        return 0;
    }
    to.saturating_sub(from)
}

// ── Storage ─────────────────────────────────────────────────────────────────

pub fn load(env: &Env) -> Result<EmissionState, ContractError> {
    env.storage()
        .instance()
        .get(&EMISSION)
        .ok_or(ContractError::NotInitialized)
}

pub fn store(env: &Env, state: &EmissionState) {
    env.storage().instance().set(&EMISSION, state);
}
