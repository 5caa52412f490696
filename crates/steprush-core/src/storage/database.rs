//! SQLite-backed persistence.
//!
//! Provides durable storage for:
//! - The reconciler's persisted pair (lifetime total + last observed daily),
//!   kept in the key-value table under the same keys the original shared
//!   preferences used
//! - Per-day step history, upserted on every refresh
//! - A general string key-value store for application state

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::health::WEEK_DAYS;
use crate::tracker::StepTotals;

use super::{data_dir, migrations};

const KEY_TOTAL_STEPS: &str = "total_steps";
const KEY_LAST_DAILY_STEPS: &str = "last_daily_steps";
const KEY_LAST_UPDATE_DATE: &str = "last_update_date";

/// One row of local step history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    pub day: NaiveDate,
    pub steps: u64,
    pub source: String,
    pub updated_at: DateTime<Utc>,
}

/// Debug view of the persisted totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalsInfo {
    pub lifetime_total: u64,
    pub last_observed_daily: u64,
    pub last_update_date: Option<String>,
}

/// SQLite database at `~/.config/steprush/steprush.db`.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database, creating file and schema if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("steprush.db");
        let conn = Connection::open(path)?;
        migrations::migrate(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (tests and ephemeral runs).
    pub fn open_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open_in_memory()?;
        migrations::migrate(&conn)?;
        Ok(Self { conn })
    }

    // ── Reconciler state ─────────────────────────────────────────────

    /// Load the persisted totals pair; both default to 0 on first run.
    pub fn load_totals(&self) -> Result<StepTotals, rusqlite::Error> {
        let read = |key: &str| -> Result<u64, rusqlite::Error> {
            Ok(self
                .kv_get(key)?
                .and_then(|v| v.parse().ok())
                .unwrap_or(0))
        };
        Ok(StepTotals {
            lifetime_total: read(KEY_TOTAL_STEPS)?,
            last_observed_daily: read(KEY_LAST_DAILY_STEPS)?,
        })
    }

    /// Persist the totals pair and the update date in one transaction.
    ///
    /// The pair must never be written piecemeal: a reconcile pass that
    /// persists only one half would double- or under-count the next delta.
    pub fn save_totals(&self, totals: &StepTotals, day: NaiveDate) -> Result<(), rusqlite::Error> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in [
            (KEY_TOTAL_STEPS, totals.lifetime_total.to_string()),
            (KEY_LAST_DAILY_STEPS, totals.last_observed_daily.to_string()),
            (KEY_LAST_UPDATE_DATE, day.to_string()),
        ] {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        tx.commit()
    }

    /// Zero the totals pair and forget the update date (first-run reset).
    pub fn reset_totals(&self) -> Result<(), rusqlite::Error> {
        let tx = self.conn.unchecked_transaction()?;
        for key in [KEY_TOTAL_STEPS, KEY_LAST_DAILY_STEPS] {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, '0')",
                params![key],
            )?;
        }
        tx.execute(
            "DELETE FROM kv WHERE key = ?1",
            params![KEY_LAST_UPDATE_DATE],
        )?;
        tx.commit()
    }

    /// Debug dump of the persisted totals.
    pub fn totals_info(&self) -> Result<TotalsInfo, rusqlite::Error> {
        let totals = self.load_totals()?;
        Ok(TotalsInfo {
            lifetime_total: totals.lifetime_total,
            last_observed_daily: totals.last_observed_daily,
            last_update_date: self.kv_get(KEY_LAST_UPDATE_DATE)?,
        })
    }

    // ── Daily history ────────────────────────────────────────────────

    /// Upsert today's count into the history table.
    pub fn record_day(
        &self,
        day: NaiveDate,
        steps: u64,
        source: &str,
    ) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO daily_steps (day, steps, source, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(day) DO UPDATE SET
                 steps = excluded.steps,
                 source = excluded.source,
                 updated_at = excluded.updated_at",
            params![day.to_string(), steps, source, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Recorded count for one day, if any.
    pub fn steps_on(&self, day: NaiveDate) -> Result<Option<u64>, rusqlite::Error> {
        let result = self.conn.query_row(
            "SELECT steps FROM daily_steps WHERE day = ?1",
            params![day.to_string()],
            |row| row.get::<_, u64>(0),
        );
        match result {
            Ok(steps) => Ok(Some(steps)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The last seven recorded days ending at `today`, oldest to newest.
    /// Days without a row count as 0.
    pub fn weekly_history(&self, today: NaiveDate) -> Result<Vec<u64>, rusqlite::Error> {
        let mut week = Vec::with_capacity(WEEK_DAYS);
        for offset in (0..WEEK_DAYS as i64).rev() {
            let day = today - Duration::days(offset);
            week.push(self.steps_on(day)?.unwrap_or(0));
        }
        Ok(week)
    }

    /// Most recent history rows, newest first.
    pub fn history(&self, limit: u32) -> Result<Vec<DailyRecord>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT day, steps, source, updated_at
             FROM daily_steps
             ORDER BY day DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            let day: String = row.get(0)?;
            let updated_at: String = row.get(3)?;
            Ok(DailyRecord {
                day: NaiveDate::parse_from_str(&day, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?,
                steps: row.get(1)?,
                source: row.get(2)?,
                updated_at: DateTime::parse_from_rfc3339(&updated_at)
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?
                    .with_timezone(&Utc),
            })
        })?;
        rows.collect()
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let result = self.conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}
