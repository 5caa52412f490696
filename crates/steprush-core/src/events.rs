use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tracker::StepSummary;

/// Every reconcile pass produces zero or more events.
/// The CLI prints them; a GUI layer would poll for them the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StepEvent {
    /// Normal intra-day increase was folded into the lifetime total.
    TotalsAdvanced {
        delta: u64,
        lifetime_total: u64,
        at: DateTime<Utc>,
    },
    /// The daily counter went backwards; a rollover was assumed and only
    /// today's steps were carried into the lifetime total.
    RolloverDetected {
        previous_daily: u64,
        carried: u64,
        lifetime_total: u64,
        at: DateTime<Utc>,
    },
    /// Today's count crossed the configured goal during this pass.
    GoalReached {
        steps: u64,
        goal: u64,
        streak: usize,
        at: DateTime<Utc>,
    },
    /// Full summary snapshot, emitted on every poll tick.
    Snapshot {
        today_steps: u64,
        total_steps: u64,
        weekly_steps: Vec<u64>,
        streak: usize,
        goal: u64,
        at: DateTime<Utc>,
    },
}

impl From<&StepSummary> for StepEvent {
    fn from(summary: &StepSummary) -> Self {
        StepEvent::Snapshot {
            today_steps: summary.today_steps,
            total_steps: summary.total_steps,
            weekly_steps: summary.weekly_steps.clone(),
            streak: summary.streak,
            goal: summary.goal,
            at: summary.at,
        }
    }
}
