//! Deterministic simulated step source.
//!
//! Generates a plausible step count per calendar day from a seeded PCG
//! generator: the same seed and day always produce the same total, which
//! makes polling loops and reconciliation reproducible. "Today" only exposes
//! the fraction of its total proportional to how much of the day has
//! elapsed, so repeated reads within a day observe a growing counter.

use chrono::{DateTime, Datelike, Local, Utc};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::error::HealthError;

use super::{day_bounds, HealthSource};

const DEFAULT_BASE: u64 = 6_000;
const DEFAULT_SPREAD: u64 = 8_000;

/// Seeded per-day step generator.
pub struct SimulatedSource {
    seed: u64,
    base: u64,
    spread: u64,
}

impl SimulatedSource {
    /// Daily totals land in `base..=base + spread`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            base: DEFAULT_BASE,
            spread: DEFAULT_SPREAD,
        }
    }

    pub fn with_range(seed: u64, base: u64, spread: u64) -> Self {
        Self { seed, base, spread }
    }

    /// Full-day total for one local calendar day.
    pub fn day_total(&self, day: chrono::NaiveDate) -> u64 {
        let ordinal = day.num_days_from_ce() as u64;
        let mut rng = Pcg64::seed_from_u64(self.seed ^ ordinal.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        self.base + rng.gen_range(0..=self.spread)
    }
}

impl HealthSource for SimulatedSource {
    fn name(&self) -> &str {
        "simulated"
    }

    fn steps_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, HealthError> {
        if start >= end {
            return Err(HealthError::InvalidRange { start, end });
        }

        // No steps exist in the future; this is what makes today's counter
        // grow between polls.
        let end = end.min(Utc::now());
        if end <= start {
            return Ok(0);
        }

        let mut total = 0u64;
        let mut day = start.with_timezone(&Local).date_naive();
        let last_day = end.with_timezone(&Local).date_naive();
        while day <= last_day {
            let (day_start, day_end) = day_bounds(day);
            let lo = start.max(day_start);
            let hi = end.min(day_end);
            if hi > lo {
                let day_secs = (day_end - day_start).num_seconds().max(1);
                let frac = (hi - lo).num_seconds() as f64 / day_secs as f64;
                total += (self.day_total(day) as f64 * frac).round() as u64;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        Ok(total)
    }
}
