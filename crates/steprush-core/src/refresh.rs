//! Periodic refresh loop.
//!
//! The foreground poll (~60 s) and the background job (~15 min) both drive
//! reconcile passes. Each pass is a read-modify-write of the persisted pair,
//! so concurrent passes must not interleave: the tracker lives behind an
//! async mutex and every pass takes the lock for its full duration. Last
//! write wins between serialized passes, which is all the cancellation
//! semantics needed here.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::error::Result;
use crate::events::StepEvent;
use crate::tracker::{StepSummary, StepTracker};

/// Drives a [`StepTracker`] on a fixed interval.
pub struct Refresher {
    tracker: Arc<Mutex<StepTracker>>,
    interval: Duration,
}

impl Refresher {
    pub fn new(tracker: StepTracker, interval: Duration) -> Self {
        Self::shared(Arc::new(Mutex::new(tracker)), interval)
    }

    /// Build around an already-shared tracker, e.g. when a foreground poll
    /// and a background job refresh the same state.
    pub fn shared(tracker: Arc<Mutex<StepTracker>>, interval: Duration) -> Self {
        Self { tracker, interval }
    }

    pub fn tracker(&self) -> Arc<Mutex<StepTracker>> {
        Arc::clone(&self.tracker)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One guarded reconcile pass (what the background job does per wake-up).
    pub async fn run_once(&self) -> Result<(StepSummary, Vec<StepEvent>)> {
        let tracker = self.tracker.lock().await;
        tracker.refresh()
    }

    /// Poll until `on_pass` returns `false` or a pass fails.
    ///
    /// The first pass runs immediately; later passes wait out the interval.
    pub async fn run<F>(&self, mut on_pass: F) -> Result<()>
    where
        F: FnMut(&StepSummary, &[StepEvent]) -> bool,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let (summary, events) = self.run_once().await?;
            if !on_pass(&summary, &events) {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};

    use super::*;
    use crate::health::{ExportSource, StepRecord};
    use crate::storage::Database;
    use crate::tracker::DEFAULT_DAILY_GOAL;

    fn refresher(count: u64, interval_ms: u64) -> Refresher {
        let now = Utc::now();
        let source = ExportSource::from_records(vec![StepRecord {
            start: now - ChronoDuration::minutes(1),
            end: now,
            count,
        }]);
        let tracker = StepTracker::new(
            Box::new(source),
            Database::open_memory().unwrap(),
            DEFAULT_DAILY_GOAL,
        );
        Refresher::new(tracker, Duration::from_millis(interval_ms))
    }

    #[tokio::test]
    async fn run_once_performs_a_pass() {
        let refresher = refresher(750, 10);
        let (summary, events) = refresher.run_once().await.unwrap();
        assert_eq!(summary.total_steps, 750);
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_passes_do_not_double_count() {
        let refresher = refresher(750, 10);
        let (a, b) = tokio::join!(refresher.run_once(), refresher.run_once());
        let (summary_a, _) = a.unwrap();
        let (summary_b, _) = b.unwrap();
        // Serialized passes: the second sees an unchanged counter.
        assert_eq!(summary_a.total_steps, 750);
        assert_eq!(summary_b.total_steps, 750);
    }

    #[tokio::test]
    async fn run_stops_when_callback_says_so() {
        let refresher = refresher(750, 1);
        let mut passes = 0;
        refresher
            .run(|summary, _events| {
                assert_eq!(summary.total_steps, 750);
                passes += 1;
                passes < 3
            })
            .await
            .unwrap();
        assert_eq!(passes, 3);
    }
}
