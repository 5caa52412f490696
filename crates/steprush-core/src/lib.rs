//! # StepRush Core Library
//!
//! This library provides the core business logic for StepRush, a step
//! tracker that maintains its own lifetime step total on top of a platform
//! health API whose daily counter resets at midnight. It implements a
//! CLI-first philosophy: all operations are available via a standalone CLI
//! binary, with any GUI being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Tracker**: pure reconciliation of daily counter readings into a
//!   monotone lifetime total, plus goal-streak calculation
//! - **Health**: the [`HealthSource`] trait over "steps in `[start, end)`"
//!   range queries, with export-file and simulated implementations
//! - **Storage**: SQLite-based totals/history persistence and TOML-based
//!   configuration
//! - **Refresh**: serialized periodic polling for foreground and background
//!   refresh
//!
//! ## Key Components
//!
//! - [`reconcile`]: the counter-to-lifetime-total reconciliation step
//! - [`StepTracker`]: the service producing [`StepSummary`] snapshots
//! - [`Database`]: totals and daily-history persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod health;
pub mod refresh;
pub mod storage;
pub mod tracker;

pub use error::{ConfigError, CoreError, DatabaseError, HealthError, Result};
pub use events::StepEvent;
pub use health::{ExportSource, HealthSource, SimulatedSource, StepRecord, WEEK_DAYS};
pub use refresh::Refresher;
pub use storage::{Config, DailyRecord, Database, SourceKind, TotalsInfo};
pub use tracker::{
    reconcile, streak, Reconciliation, StepSummary, StepTotals, StepTracker, DEFAULT_DAILY_GOAL,
};
