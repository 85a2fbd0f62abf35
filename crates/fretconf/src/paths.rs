//! Paths and telemetry - things that cannot change at runtime.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Filesystem paths for persisted visualizer state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the snapshot database.
    /// Default: ~/.local/share/fretboard
    #[serde(default = "PathsConfig::default_state_dir")]
    pub state_dir: PathBuf,
}

impl PathsConfig {
    fn default_state_dir() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.data_local_dir().join("fretboard"))
            .unwrap_or_else(|| PathBuf::from(".local/share/fretboard"))
    }

    /// SQLite file holding the chordie, preferences and custom tuning snapshots.
    pub fn snapshot_db(&self) -> PathBuf {
        self.state_dir.join("snapshots.db")
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: Self::default_state_dir(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    /// Default: info
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_db_lives_in_state_dir() {
        let paths = PathsConfig {
            state_dir: PathBuf::from("/tmp/fretboard-state"),
        };
        assert_eq!(
            paths.snapshot_db(),
            PathBuf::from("/tmp/fretboard-state/snapshots.db")
        );
    }

    #[test]
    fn test_default_state_dir_mentions_fretboard() {
        let paths = PathsConfig::default();
        assert!(paths.state_dir.to_string_lossy().contains("fretboard"));
    }
}
