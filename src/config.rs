//! Runtime configuration for the cycle sequencer.
//!
//! Dwell durations, tick intervals, the log cap, and the remote-failure
//! policy are configuration, not constants. Defaults match the dashboard's
//! observed timings; a TOML file can override any of them and the CLI points
//! at the file with `--config`.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sequencer::log::DEFAULT_LOG_CAPACITY;

/// What to do when the remote cycle cannot be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Log the error and simulate the remaining phases locally.
    FallbackLocal,
    /// Log the error and stay at rest.
    Halt,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::FallbackLocal
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// Dwell for phases missing from the table, in milliseconds.
    pub default_dwell_ms: u64,
    /// Per-phase dwell overrides, keyed by phase label.
    pub dwell_ms: BTreeMap<String, u64>,
    /// Background variation ticker period.
    pub variation_interval_ms: u64,
    /// Remote status poll period.
    pub poll_interval_ms: u64,
    /// Ring-buffer cap on retained session log lines.
    pub log_capacity: usize,
    /// Policy when the remote start signal fails.
    pub on_start_failure: FailurePolicy,
}

impl Default for CycleConfig {
    fn default() -> Self {
        // The improvement cycle's observed dwell table. Gate phases carry no
        // entry on purpose: they have no timer.
        let dwell_ms = BTreeMap::from([
            ("SCANNING".to_string(), 4000),
            ("PLANNING".to_string(), 3000),
            ("CODING".to_string(), 5000),
            ("TESTING".to_string(), 3000),
            ("SKEPTIC_REVIEW".to_string(), 3000),
            ("ARBITRATION".to_string(), 4000),
            ("CI_CD".to_string(), 6000),
            ("DEPLOYED".to_string(), 3000),
        ]);

        Self {
            default_dwell_ms: 2000,
            dwell_ms,
            variation_interval_ms: 5000,
            poll_interval_ms: 1000,
            log_capacity: DEFAULT_LOG_CAPACITY,
            on_start_failure: FailurePolicy::default(),
        }
    }
}

impl CycleConfig {
    /// Dwell for a phase label, falling back to the default.
    pub fn dwell_for(&self, label: &str) -> Duration {
        let ms = self
            .dwell_ms
            .get(label)
            .copied()
            .unwrap_or(self.default_dwell_ms);
        Duration::from_millis(ms)
    }

    pub fn variation_interval(&self) -> Duration {
        Duration::from_millis(self.variation_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: CycleConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML: {}", path.display()))?;

        Ok(config)
    }

    /// Load from a file when one is given and exists, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::load(p),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_dwell_table_matches_observed_timings() {
        let config = CycleConfig::default();
        assert_eq!(config.dwell_for("SCANNING"), Duration::from_millis(4000));
        assert_eq!(config.dwell_for("CODING"), Duration::from_millis(5000));
        assert_eq!(config.dwell_for("CI_CD"), Duration::from_millis(6000));
        assert_eq!(config.dwell_for("DEPLOYED"), Duration::from_millis(3000));
    }

    #[test]
    fn test_unknown_phase_falls_back_to_default_dwell() {
        let config = CycleConfig::default();
        assert_eq!(config.dwell_for("REBUTTAL"), Duration::from_millis(2000));
    }

    #[test]
    fn test_gate_phase_has_no_table_entry() {
        let config = CycleConfig::default();
        assert!(!config.dwell_ms.contains_key("PR_REVIEW"));
    }

    #[test]
    fn test_load_parses_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("predator.toml");
        fs::write(
            &path,
            r#"
default_dwell_ms = 500
log_capacity = 32
on_start_failure = "halt"

[dwell_ms]
SCANNING = 100
"#,
        )
        .unwrap();

        let config = CycleConfig::load(&path).unwrap();
        assert_eq!(config.dwell_for("SCANNING"), Duration::from_millis(100));
        assert_eq!(config.dwell_for("PLANNING"), Duration::from_millis(500));
        assert_eq!(config.log_capacity, 32);
        assert_eq!(config.on_start_failure, FailurePolicy::Halt);
    }

    #[test]
    fn test_load_invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("predator.toml");
        fs::write(&path, "{ not toml }").unwrap();

        let result = CycleConfig::load(&path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse config TOML")
        );
    }

    #[test]
    fn test_load_or_default_missing_file_falls_back() {
        let config = CycleConfig::load_or_default(Some(Path::new("/nonexistent/predator.toml")))
            .unwrap();
        assert_eq!(config.default_dwell_ms, 2000);
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = CycleConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: CycleConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.default_dwell_ms, config.default_dwell_ms);
        assert_eq!(parsed.dwell_ms, config.dwell_ms);
        assert_eq!(parsed.on_start_failure, config.on_start_failure);
    }
}
