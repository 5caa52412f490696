mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, GoalConfig, RefreshConfig, SourceConfig, SourceKind};
pub use database::{DailyRecord, Database, TotalsInfo};

use std::path::PathBuf;

/// Returns `~/.config/steprush[-dev]/` based on STEPRUSH_ENV.
///
/// Set STEPRUSH_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STEPRUSH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("steprush-dev")
    } else {
        base_dir.join("steprush")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
