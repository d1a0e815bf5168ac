//! Growth timers for planted seeds.
//!
//! Growth is a pure function of timestamps: a plot planted at `planted_at`
//! reaches 100% after the configured [`GrowthDuration`]. Nothing advances
//! in the background; progress is recomputed whenever it is asked for.
//!
//! Two readings exist for every plot. Live progress uses the current time.
//! Prior progress uses the plot's `prior_check_at` watermark, written on
//! every garden visit, and shows what the player saw last time.

use petgarden_types::{Garden, Plot};

/// Growth duration used when configuration is missing or non-positive.
pub const DEFAULT_GROWTH_SECONDS: i64 = 86_400;

/// Progress value of a fully grown plot.
pub const FULLY_GROWN: u8 = 100;

/// Validated, strictly positive seconds for a seed to fully grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GrowthDuration(i64);

impl GrowthDuration {
    /// Build from a configured value, falling back to
    /// [`DEFAULT_GROWTH_SECONDS`] when it is absent or not positive.
    pub fn from_config(seconds: Option<i64>) -> Self {
        match seconds {
            Some(secs) if secs > 0 => Self(secs),
            Some(secs) => {
                tracing::warn!(
                    configured = secs,
                    fallback = DEFAULT_GROWTH_SECONDS,
                    "Non-positive garden growth duration, using fallback"
                );
                Self(DEFAULT_GROWTH_SECONDS)
            }
            None => {
                tracing::warn!(
                    fallback = DEFAULT_GROWTH_SECONDS,
                    "Garden growth duration not configured, using fallback"
                );
                Self(DEFAULT_GROWTH_SECONDS)
            }
        }
    }

    /// Seconds to full growth.
    pub const fn seconds(self) -> i64 {
        self.0
    }
}

impl Default for GrowthDuration {
    fn default() -> Self {
        Self(DEFAULT_GROWTH_SECONDS)
    }
}

/// Growth percentage of a seed planted at `planted_at`, observed at `now`.
///
/// `0` when nothing is planted (`planted_at <= 0`) or no time has passed,
/// `100` once the full duration has elapsed, otherwise the elapsed share
/// rounded half up.
pub fn progress(planted_at: i64, now: i64, total: GrowthDuration) -> u8 {
    if planted_at <= 0 {
        return 0;
    }
    let elapsed = now.saturating_sub(planted_at);
    if elapsed <= 0 {
        return 0;
    }
    if elapsed >= total.0 {
        return FULLY_GROWN;
    }

    // round(100 * elapsed / total) == (200 * elapsed + total) / (2 * total)
    let total = i128::from(total.0);
    let percent = i128::from(elapsed)
        .checked_mul(200)
        .and_then(|scaled| scaled.checked_add(total))
        .and_then(|scaled| scaled.checked_div(total.checked_mul(2)?));

    percent
        .and_then(|p| u8::try_from(p).ok())
        .map_or(FULLY_GROWN, |p| p.min(FULLY_GROWN))
}

/// Growth percentage as of the last visit watermark.
///
/// `0` if the plot has not been visited since it was planted.
pub fn prior_progress(planted_at: i64, prior_check_at: i64, total: GrowthDuration) -> u8 {
    if prior_check_at <= planted_at {
        return 0;
    }
    progress(planted_at, prior_check_at, total)
}

/// Live progress of a plot; empty plots report `0`.
pub fn plot_progress(plot: &Plot, now: i64, total: GrowthDuration) -> u8 {
    if plot.is_empty() {
        return 0;
    }
    progress(plot.planted_at, now, total)
}

/// Progress of a plot as of its last visit; empty plots report `0`.
pub fn plot_prior_progress(plot: &Plot, total: GrowthDuration) -> u8 {
    if plot.is_empty() {
        return 0;
    }
    prior_progress(plot.planted_at, plot.prior_check_at, total)
}

/// Unix seconds at which a seed planted at `planted_at` is fully grown.
pub const fn completes_at(planted_at: i64, total: GrowthDuration) -> i64 {
    planted_at.saturating_add(total.0)
}

/// Whether every plot is planted and fully grown, the precondition for
/// resolving a catch.
pub fn is_ready_to_harvest(garden: &Garden, now: i64, total: GrowthDuration) -> bool {
    garden.is_full()
        && garden
            .plots()
            .all(|plot| plot_progress(plot, now, total) == FULLY_GROWN)
}
