//! Shared construction helpers for CLI commands.

use steprush_core::{
    Config, Database, ExportSource, HealthSource, SimulatedSource, SourceKind, StepTracker,
};

/// Build the health source the config asks for.
pub fn build_source(config: &Config) -> Result<Box<dyn HealthSource>, Box<dyn std::error::Error>> {
    match config.source.kind {
        SourceKind::Simulated => Ok(Box::new(SimulatedSource::new(config.source.seed))),
        SourceKind::Export => {
            let path = config
                .source
                .export_path
                .as_deref()
                .ok_or("source.export_path is not set")?;
            Ok(Box::new(ExportSource::load(path)?))
        }
    }
}

/// Open the tracker with the configured source, database and goal.
pub fn open_tracker() -> Result<StepTracker, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let source = build_source(&config)?;
    let db = Database::open()?;
    Ok(StepTracker::new(source, db, config.goal.daily_steps))
}
