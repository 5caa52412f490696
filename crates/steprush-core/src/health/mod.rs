//! Health-data source abstraction.
//!
//! The platform health API sits behind the [`HealthSource`] trait: one
//! required method answering "how many steps were recorded in `[start, end)`",
//! with day and week queries derived from it. Day boundaries follow the local
//! timezone, matching what the step counter on a phone does.

mod export;
mod simulated;

pub use export::{ExportSource, StepRecord};
pub use simulated::SimulatedSource;

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::HealthError;

/// Days in the weekly window.
pub const WEEK_DAYS: usize = 7;

/// A queryable source of step-count data.
///
/// Implementations are read-only; reconciliation and persistence happen in
/// the tracker. A failing read is non-fatal to callers by policy.
pub trait HealthSource: Send + Sync {
    /// Unique identifier (e.g. "export", "simulated").
    fn name(&self) -> &str;

    /// Whether the source can currently serve reads.
    fn is_available(&self) -> bool {
        true
    }

    /// Steps recorded in `[start, end)`.
    fn steps_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, HealthError>;

    /// Steps recorded on one local calendar day.
    fn daily_steps(&self, day: NaiveDate) -> Result<u64, HealthError> {
        let (start, end) = day_bounds(day);
        self.steps_between(start, end)
    }

    /// Today's count so far.
    fn today_steps(&self) -> Result<u64, HealthError> {
        self.daily_steps(Local::now().date_naive())
    }

    /// The last [`WEEK_DAYS`] local calendar days ending today, oldest to
    /// newest.
    fn weekly_steps(&self) -> Result<Vec<u64>, HealthError> {
        let today = Local::now().date_naive();
        let mut week = Vec::with_capacity(WEEK_DAYS);
        for offset in (0..WEEK_DAYS as i64).rev() {
            week.push(self.daily_steps(today - Duration::days(offset))?);
        }
        Ok(week)
    }
}

/// UTC instants of local midnight at the start and end of `day`.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = day.succ_opt().unwrap_or(day);
    (local_midnight(day), local_midnight(next))
}

fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    match midnight.and_local_timezone(Local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // DST transition at midnight: take the earlier reading of the clock.
        LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&midnight),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;

    #[test]
    fn day_bounds_span_one_day() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let (start, end) = day_bounds(day);
        assert!(end > start);
        // A calendar day is 24h except across DST transitions.
        let hours = (end - start).num_hours();
        assert!((23..=25).contains(&hours));
    }

    #[test]
    fn weekly_steps_returns_seven_days_oldest_first() {
        struct ByDay;
        impl HealthSource for ByDay {
            fn name(&self) -> &str {
                "by-day"
            }
            fn steps_between(
                &self,
                start: DateTime<Utc>,
                _end: DateTime<Utc>,
            ) -> Result<u64, HealthError> {
                // Encode the queried day so ordering is observable.
                Ok(start.with_timezone(&Local).date_naive().day0() as u64)
            }
        }

        let week = ByDay.weekly_steps().unwrap();
        assert_eq!(week.len(), WEEK_DAYS);
        let today = Local::now().date_naive().day0() as u64;
        assert_eq!(*week.last().unwrap(), today);
    }
}
