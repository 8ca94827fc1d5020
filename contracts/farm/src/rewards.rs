/// Fixed-point scaling factor.
///
/// Both the emission accumulator and the bonus accumulator are stored
/// multiplied by this constant so per-share values keep 12 decimal places
/// without floating-point arithmetic.
pub const PRECISION: i128 = 1_000_000_000_000;

/// Denominator for basis-point rates (`owner_rate`).
pub const BASIS_POINTS: i128 = 10_000;

// ── Emission side ───────────────────────────────────────────────────────────

/// Reward owed to a single pool for `multiplier` seconds of emission.
///
/// ```text
/// reward = multiplier × rate × alloc_point / total_alloc_point
/// ```
///
/// A zero `total_alloc_point` yields zero instead of dividing by zero.
#[allow(clippy::arithmetic_side_effects)]
pub fn pool_reward(multiplier: u64, rate: i128, alloc_point: u64, total_alloc_point: u64) -> i128 {
    if total_alloc_point == 0 {
        return 0;
    }
    (multiplier as i128)
        .saturating_mul(rate)
        .saturating_mul(alloc_point as i128)
        / total_alloc_point as i128
}

/// Development cut minted on top of a pool reward.
#[allow(clippy::arithmetic_side_effects)]
pub fn owner_cut(reward: i128, owner_rate: u32) -> i128 {
    reward.saturating_mul(owner_rate as i128) / BASIS_POINTS
}

/// Growth of an accumulator when `amount` is spread over `shares_total`.
///
/// ```text
/// Δacc = amount × PRECISION / shares_total
/// ```
///
/// Returns zero when nobody holds shares; the caller decides what happens to
/// the undistributed amount.
#[allow(clippy::arithmetic_side_effects)]
pub fn acc_increment(amount: i128, shares_total: i128) -> i128 {
    if shares_total <= 0 {
        return 0;
    }
    amount.saturating_mul(PRECISION) / shares_total
}

// ── User side ───────────────────────────────────────────────────────────────

/// Everything a position of `shares` has accumulated since inception at
/// accumulator value `acc_per_share`. This is also the checkpoint value
/// written into `reward_debt`/`bonus_debt`.
#[allow(clippy::arithmetic_side_effects)]
pub fn accumulated(shares: i128, acc_per_share: i128) -> i128 {
    shares.saturating_mul(acc_per_share) / PRECISION
}

/// Claimable amount since the last checkpoint.
///
/// Negative only if operations were applied out of order; callers clamp at
/// zero before paying.
pub fn pending(shares: i128, acc_per_share: i128, debt: i128) -> i128 {
    accumulated(shares, acc_per_share).saturating_sub(debt)
}

/// Bonus slice of a buyback for one bonus entry.
#[allow(clippy::arithmetic_side_effects)]
pub fn bonus_share(amount: i128, alloc_point: u64, total_bonus_point: u64) -> i128 {
    if total_bonus_point == 0 {
        return 0;
    }
    amount.saturating_mul(alloc_point as i128) / total_bonus_point as i128
}

// ── Strategy valuation ──────────────────────────────────────────────────────

/// Want-asset value of `shares` given the strategy's totals.
#[allow(clippy::arithmetic_side_effects)]
pub fn share_value(shares: i128, want_locked_total: i128, shares_total: i128) -> i128 {
    if shares_total <= 0 || shares <= 0 {
        return 0;
    }
    shares.saturating_mul(want_locked_total) / shares_total
}

/// Ceiling on what a user may pull out: frozen shares are never withdrawable.
pub fn withdrawable(
    shares: i128,
    shares_frozen: i128,
    want_locked_total: i128,
    shares_total: i128,
) -> i128 {
    let free = shares.saturating_sub(shares_frozen).max(0);
    share_value(free, want_locked_total, shares_total)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure math, no Soroban environment.
