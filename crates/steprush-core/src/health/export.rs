//! Health source backed by a JSON export file.
//!
//! Health platforms can export raw step records; this source loads such an
//! export (an array of `{start, end, count}` objects) and answers range
//! queries by summing matching records. A record is attributed to the query
//! range when its start instant falls inside `[start, end)`, so a record is
//! never counted twice by adjacent ranges.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HealthError;

use super::HealthSource;

/// One raw step record from the export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub count: u64,
}

/// Step source reading from an exported record file.
pub struct ExportSource {
    path: PathBuf,
    records: Vec<StepRecord>,
}

impl ExportSource {
    /// Load records from a JSON export file.
    ///
    /// # Errors
    /// Returns [`HealthError::ReadFailed`] if the file cannot be read or
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HealthError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            HealthError::ReadFailed(format!("cannot read {}: {e}", path.display()))
        })?;
        let records: Vec<StepRecord> = serde_json::from_str(&content).map_err(|e| {
            HealthError::ReadFailed(format!("cannot parse {}: {e}", path.display()))
        })?;
        Ok(Self { path, records })
    }

    /// Build a source from in-memory records.
    pub fn from_records(records: Vec<StepRecord>) -> Self {
        Self {
            path: PathBuf::new(),
            records,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl HealthSource for ExportSource {
    fn name(&self) -> &str {
        "export"
    }

    fn steps_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, HealthError> {
        if start >= end {
            return Err(HealthError::InvalidRange { start, end });
        }
        Ok(self
            .records
            .iter()
            .filter(|r| r.start >= start && r.start < end)
            .map(|r| r.count)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 25, hour, 0, 0).unwrap()
    }

    fn record(start_hour: u32, count: u64) -> StepRecord {
        StepRecord {
            start: at(start_hour),
            end: at(start_hour + 1),
            count,
        }
    }

    #[test]
    fn sums_records_starting_inside_range() {
        let source =
            ExportSource::from_records(vec![record(8, 500), record(12, 700), record(20, 300)]);
        assert_eq!(source.steps_between(at(8), at(13)).unwrap(), 1200);
        assert_eq!(source.steps_between(at(0), at(23)).unwrap(), 1500);
    }

    #[test]
    fn range_end_is_exclusive() {
        let source = ExportSource::from_records(vec![record(12, 700)]);
        assert_eq!(source.steps_between(at(10), at(12)).unwrap(), 0);
        assert_eq!(source.steps_between(at(12), at(13)).unwrap(), 700);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let source = ExportSource::from_records(vec![]);
        assert!(matches!(
            source.steps_between(at(13), at(12)),
            Err(HealthError::InvalidRange { .. })
        ));
    }

    #[test]
    fn loads_json_export_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let records = vec![record(9, 1234)];
        std::fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

        let source = ExportSource::load(&path).unwrap();
        assert_eq!(source.record_count(), 1);
        assert_eq!(source.steps_between(at(9), at(10)).unwrap(), 1234);
    }

    #[test]
    fn missing_file_is_a_read_failure() {
        assert!(matches!(
            ExportSource::load("/nonexistent/export.json"),
            Err(HealthError::ReadFailed(_))
        ));
    }
}
