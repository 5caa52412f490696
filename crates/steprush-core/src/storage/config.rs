//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Daily step goal
//! - Foreground poll and background refresh cadence
//! - Which health source to read and how to build it
//!
//! Configuration is stored at `~/.config/steprush/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::tracker::DEFAULT_DAILY_GOAL;

/// Goal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_daily_goal")]
    pub daily_steps: u64,
}

/// Refresh cadence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Foreground poll interval (the `watch` loop).
    #[serde(default = "default_foreground_poll_secs")]
    pub foreground_poll_secs: u64,
    /// Background job interval.
    #[serde(default = "default_background_interval_mins")]
    pub background_interval_mins: u64,
}

/// Which health source to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Simulated,
    Export,
}

/// Health source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_kind")]
    pub kind: SourceKind,
    /// Path to the JSON export file (required for `kind = "export"`).
    #[serde(default)]
    pub export_path: Option<String>,
    /// Seed for the simulated source.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/steprush/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub goal: GoalConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

fn default_daily_goal() -> u64 {
    DEFAULT_DAILY_GOAL
}
fn default_foreground_poll_secs() -> u64 {
    60
}
fn default_background_interval_mins() -> u64 {
    15
}
fn default_source_kind() -> SourceKind {
    SourceKind::Simulated
}
fn default_seed() -> u64 {
    42
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            daily_steps: default_daily_goal(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            foreground_poll_secs: default_foreground_poll_secs(),
            background_interval_mins: default_background_interval_mins(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_source_kind(),
            export_path: None,
            seed: default_seed(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            goal: GoalConfig::default(),
            refresh: RefreshConfig::default(),
            source: SourceConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing a default config on first run.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and save.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value does not fit the
    /// field's type, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (parents, leaf),
            None => return Err(format!("unknown config key: {key}").into()),
        };

        let mut current = &mut json;
        for part in parents.split('.') {
            current = current
                .get_mut(part)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
        }
        let obj = current
            .as_object_mut()
            .ok_or_else(|| format!("unknown config key: {key}"))?;
        if !obj.contains_key(leaf) {
            return Err(format!("unknown config key: {key}").into());
        }
        obj.insert(leaf.to_string(), parse_scalar(value));

        // Deserializing back validates the new value against the field type.
        *self = serde_json::from_value(json)
            .map_err(|e| format!("invalid value for '{key}': {e}"))?;
        self.save()?;
        Ok(())
    }
}

/// Parse a CLI-provided string into the loosest matching JSON scalar.
fn parse_scalar(value: &str) -> serde_json::Value {
    if let Ok(b) = value.parse::<bool>() {
        return serde_json::Value::Bool(b);
    }
    if let Ok(n) = value.parse::<u64>() {
        return serde_json::Value::Number(n.into());
    }
    if let Ok(n) = value.parse::<f64>() {
        if let Some(num) = serde_json::Number::from_f64(n) {
            return serde_json::Value::Number(num);
        }
    }
    serde_json::Value::String(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.goal.daily_steps, 10_000);
        assert_eq!(parsed.refresh.foreground_poll_secs, 60);
        assert_eq!(parsed.refresh.background_interval_mins, 15);
        assert_eq!(parsed.source.kind, SourceKind::Simulated);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("goal.daily_steps").as_deref(), Some("10000"));
        assert_eq!(cfg.get("source.kind").as_deref(), Some("simulated"));
        assert!(cfg.get("source.export_path").is_none());
        assert!(cfg.get("goal.missing_key").is_none());
    }

    #[test]
    fn parse_scalar_infers_types() {
        assert_eq!(parse_scalar("true"), serde_json::Value::Bool(true));
        assert_eq!(parse_scalar("12000"), serde_json::Value::Number(12000.into()));
        assert_eq!(
            parse_scalar("export"),
            serde_json::Value::String("export".into())
        );
    }

    #[test]
    fn empty_toml_uses_all_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.goal.daily_steps, 10_000);
        assert_eq!(cfg.source.seed, 42);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str("[goal]\ndaily_steps = 12000\n").unwrap();
        assert_eq!(cfg.goal.daily_steps, 12_000);
        assert_eq!(cfg.refresh.foreground_poll_secs, 60);
    }

    #[test]
    fn source_kind_parses_lowercase() {
        let cfg: Config = toml::from_str("[source]\nkind = \"export\"\n").unwrap();
        assert_eq!(cfg.source.kind, SourceKind::Export);
    }
}
