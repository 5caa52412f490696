//! Lifetime step-total reconciliation.
//!
//! The health platform reports "steps so far today" as a counter that resets
//! to near zero at midnight. The lifetime total is our own number and must
//! only ever grow, so every fresh reading is reconciled against the pair we
//! persisted last time: the lifetime total and the last observed daily count.

use serde::{Deserialize, Serialize};

/// The persisted pair the reconciler owns.
///
/// Stored in the key-value table under `total_steps` / `last_daily_steps`
/// and written back as one transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTotals {
    /// Cumulative step count across all days, independent of the platform's
    /// own counters. Monotonically non-decreasing.
    pub lifetime_total: u64,
    /// The daily counter value seen by the previous reconcile pass.
    pub last_observed_daily: u64,
}

/// Outcome of a single reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The daily counter did not move; nothing to persist.
    Unchanged,
    /// Normal intra-day increase; `delta` was added to the lifetime total.
    Advanced { delta: u64 },
    /// The daily counter went backwards. Treated as a midnight rollover:
    /// all of today's steps (`carried`) are new, the negative delta is
    /// discarded rather than subtracted.
    ///
    /// A same-day sensor correction is indistinguishable from a rollover
    /// and takes this branch too. Known ambiguity, left unresolved.
    Rollover { carried: u64 },
}

/// Reconcile a fresh daily reading against the persisted totals.
///
/// Pure function: the caller persists the returned [`StepTotals`] (both
/// fields atomically) when the outcome is not [`Reconciliation::Unchanged`].
///
/// The lifetime total never decreases, and a repeated identical reading is
/// a no-op, so each day's steps are counted exactly once.
pub fn reconcile(totals: StepTotals, current_daily: u64) -> (StepTotals, Reconciliation) {
    if current_daily == totals.last_observed_daily {
        return (totals, Reconciliation::Unchanged);
    }

    let (lifetime_total, outcome) = if current_daily > totals.last_observed_daily {
        let delta = current_daily - totals.last_observed_daily;
        (
            totals.lifetime_total + delta,
            Reconciliation::Advanced { delta },
        )
    } else {
        (
            totals.lifetime_total + current_daily,
            Reconciliation::Rollover {
                carried: current_daily,
            },
        )
    };

    (
        StepTotals {
            lifetime_total,
            last_observed_daily: current_daily,
        },
        outcome,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(lifetime: u64, last_daily: u64) -> StepTotals {
        StepTotals {
            lifetime_total: lifetime,
            last_observed_daily: last_daily,
        }
    }

    #[test]
    fn intra_day_increase_adds_diff() {
        let (next, outcome) = reconcile(totals(1000, 500), 700);
        assert_eq!(next, totals(1200, 700));
        assert_eq!(outcome, Reconciliation::Advanced { delta: 200 });
    }

    #[test]
    fn rollover_adds_only_todays_steps() {
        let (next, outcome) = reconcile(totals(1200, 9000), 50);
        assert_eq!(next, totals(1250, 50));
        assert_eq!(outcome, Reconciliation::Rollover { carried: 50 });
    }

    #[test]
    fn identical_reading_is_a_noop() {
        let (next, outcome) = reconcile(totals(1200, 700), 700);
        assert_eq!(next, totals(1200, 700));
        assert_eq!(outcome, Reconciliation::Unchanged);
    }

    #[test]
    fn repeated_reconcile_is_idempotent() {
        let (first, _) = reconcile(totals(1000, 500), 700);
        let (second, outcome) = reconcile(first, 700);
        assert_eq!(second, first);
        assert_eq!(outcome, Reconciliation::Unchanged);
    }

    #[test]
    fn rollover_to_zero_changes_nothing_but_last_daily() {
        let (next, outcome) = reconcile(totals(5000, 8000), 0);
        assert_eq!(next, totals(5000, 0));
        assert_eq!(outcome, Reconciliation::Rollover { carried: 0 });
    }

    #[test]
    fn fresh_install_counts_first_reading_in_full() {
        let (next, outcome) = reconcile(StepTotals::default(), 4321);
        assert_eq!(next, totals(4321, 4321));
        assert_eq!(outcome, Reconciliation::Advanced { delta: 4321 });
    }
}
