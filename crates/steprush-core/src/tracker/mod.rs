//! Step tracking service.
//!
//! [`StepTracker`] glues the three pieces together: it reads the daily
//! counter from a [`HealthSource`], reconciles it into the persisted
//! lifetime total, records history, and produces the summary struct the
//! presentation layer consumes.

mod reconcile;
mod streak;

pub use reconcile::{reconcile, Reconciliation, StepTotals};
pub use streak::{streak, DEFAULT_DAILY_GOAL};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::StepEvent;
use crate::health::HealthSource;
use crate::storage::{DailyRecord, Database, TotalsInfo};

/// The struct presentation layers consume: today, lifetime, weekly window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSummary {
    pub today_steps: u64,
    pub total_steps: u64,
    /// Seven local calendar days ending today, oldest to newest.
    pub weekly_steps: Vec<u64>,
    pub streak: usize,
    pub goal: u64,
    pub at: DateTime<Utc>,
}

/// Step tracking service over one health source and one database.
///
/// `refresh` is a read-modify-write of the persisted pair; callers that poll
/// concurrently must serialize their passes (see [`crate::refresh::Refresher`]).
pub struct StepTracker {
    source: Box<dyn HealthSource>,
    db: Database,
    goal: u64,
}

impl StepTracker {
    pub fn new(source: Box<dyn HealthSource>, db: Database, goal: u64) -> Self {
        Self { source, db, goal }
    }

    pub fn goal(&self) -> u64 {
        self.goal
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// One reconcile pass: read the source, fold the reading into the
    /// lifetime total, persist, and build a fresh summary.
    ///
    /// A failing health read is non-fatal: the last persisted snapshot is
    /// returned unchanged and no event is raised. Persistence failures do
    /// propagate.
    pub fn refresh(&self) -> Result<(StepSummary, Vec<StepEvent>)> {
        let today = Local::now().date_naive();

        let current = match self.source.today_steps() {
            Ok(steps) => steps,
            Err(_) => return Ok((self.local_summary(today)?, Vec::new())),
        };

        let totals = self.db.load_totals()?;
        let (new_totals, outcome) = reconcile(totals, current);
        let at = Utc::now();

        let mut events = Vec::new();
        match outcome {
            Reconciliation::Unchanged => {}
            Reconciliation::Advanced { delta } => {
                self.db.save_totals(&new_totals, today)?;
                events.push(StepEvent::TotalsAdvanced {
                    delta,
                    lifetime_total: new_totals.lifetime_total,
                    at,
                });
            }
            Reconciliation::Rollover { carried } => {
                self.db.save_totals(&new_totals, today)?;
                events.push(StepEvent::RolloverDetected {
                    previous_daily: totals.last_observed_daily,
                    carried,
                    lifetime_total: new_totals.lifetime_total,
                    at,
                });
            }
        }

        self.db.record_day(today, current, self.source.name())?;

        let weekly = match self.source.weekly_steps() {
            Ok(week) => week,
            // Partial source outage: serve the week from local history.
            Err(_) => self.db.weekly_history(today)?,
        };
        let streak_len = streak(&weekly, self.goal);

        if totals.last_observed_daily < self.goal && current >= self.goal {
            events.push(StepEvent::GoalReached {
                steps: current,
                goal: self.goal,
                streak: streak_len,
                at,
            });
        }

        let summary = StepSummary {
            today_steps: current,
            total_steps: new_totals.lifetime_total,
            weekly_steps: weekly,
            streak: streak_len,
            goal: self.goal,
            at,
        };
        Ok((summary, events))
    }

    /// Summary from local state only; never touches the source.
    pub fn snapshot(&self) -> Result<StepSummary> {
        self.local_summary(Local::now().date_naive())
    }

    /// Zero the lifetime total (first-run reset).
    pub fn reset_totals(&self) -> Result<()> {
        self.db.reset_totals()?;
        Ok(())
    }

    /// Debug view of the persisted pair.
    pub fn totals_info(&self) -> Result<TotalsInfo> {
        Ok(self.db.totals_info()?)
    }

    /// Recent history rows, newest first.
    pub fn history(&self, days: u32) -> Result<Vec<DailyRecord>> {
        Ok(self.db.history(days)?)
    }

    fn local_summary(&self, today: NaiveDate) -> Result<StepSummary> {
        let totals = self.db.load_totals()?;
        let today_steps = self
            .db
            .steps_on(today)?
            .unwrap_or(totals.last_observed_daily);
        let weekly = self.db.weekly_history(today)?;
        let streak_len = streak(&weekly, self.goal);
        Ok(StepSummary {
            today_steps,
            total_steps: totals.lifetime_total,
            weekly_steps: weekly,
            streak: streak_len,
            goal: self.goal,
            at: Utc::now(),
        })
    }
}
