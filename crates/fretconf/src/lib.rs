//! Configuration loading for the fretboard visualizer.
//!
//! Configuration is split into two categories:
//!
//! - **Paths & telemetry** (`PathsConfig`, `TelemetryConfig`): where snapshots
//!   live and how loud the logs are. Fixed for the lifetime of the process.
//!
//! - **Defaults** (`DefaultsConfig`): initial preference values used when no
//!   persisted preferences exist. After the first transition the persisted
//!   preferences become the source of truth.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/fretboard/config.toml` (system)
//! 2. `~/.config/fretboard/config.toml` (user)
//! 3. `./fretboard.toml` (local override)
//! 4. Environment variables (`FRETBOARD_*`)
//!
//! # Example Config
//!
//! ```toml
//! [paths]
//! state_dir = "~/.local/share/fretboard"
//!
//! [telemetry]
//! log_level = "debug"
//!
//! [defaults]
//! tuning = "Drop D Tuning"
//! show_chord_tones = true
//! ```

pub mod defaults;
pub mod loader;
pub mod paths;

pub use defaults::DefaultsConfig;
pub use loader::{discover_config_files_with_override, ConfigSources};
pub use paths::{PathsConfig, TelemetryConfig};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete visualizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FretConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Seeds the preferences when nothing has been persisted yet.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl FretConfig {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply env overrides.
    ///
    /// If `config_path` is provided, it takes precedence over the local
    /// `./fretboard.toml` override. System and user configs still load first.
    pub fn load_from(config_path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&std::path::Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = FretConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            let file_config = loader::load_from_file(&path)?;
            config = loader::merge_configs(config, file_config);
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Serialize config to a TOML string.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# Fretboard Configuration\n\n");

        output.push_str("[paths]\n");
        output.push_str(&format!(
            "state_dir = \"{}\"\n",
            self.paths.state_dir.display()
        ));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = \"{}\"\n", self.telemetry.log_level));

        output.push_str("\n[defaults]\n");
        output.push_str(&format!("tuning = \"{}\"\n", self.defaults.tuning));
        output.push_str(&format!("show_notes = {}\n", self.defaults.show_notes));
        output.push_str(&format!(
            "show_chord_tones = {}\n",
            self.defaults.show_chord_tones
        ));
        output.push_str(&format!("show_scales = {}\n", self.defaults.show_scales));
        output.push_str(&format!(
            "highlight_root = {}\n",
            self.defaults.highlight_root
        ));
        output.push_str(&format!(
            "highlight_position = {}\n",
            self.defaults.highlight_position
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FretConfig::default();
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.defaults.tuning, "Standard Tuning");
        assert!(config.defaults.show_notes);
        assert!(!config.defaults.show_chord_tones);
    }

    #[test]
    fn test_to_toml_reparses() {
        let mut config = FretConfig::default();
        config.paths.state_dir = PathBuf::from("/var/lib/fretboard");
        config.defaults.tuning = "Open G Tuning".to_string();
        config.defaults.highlight_position = true;

        let toml = config.to_toml();
        let reparsed = loader::parse_toml(&toml, std::path::Path::new("roundtrip.toml")).unwrap();
        assert_eq!(reparsed, config);
    }
}
