//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, DefaultsConfig, FretConfig, PathsConfig, TelemetryConfig};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with an explicit override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/fretboard/config.toml");
    if system.exists() {
        files.push(system);
    }

    // XDG_CONFIG_HOME or ~/.config
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("fretboard/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("fretboard.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Load config from a TOML file.
pub fn load_from_file(path: &Path) -> Result<FretConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_toml(&contents, path)
}

/// Parse config from a TOML string. Missing sections fall back to defaults.
pub(crate) fn parse_toml(contents: &str, path: &Path) -> Result<FretConfig, ConfigError> {
    let mut config: FretConfig =
        toml::from_str(contents).map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // Paths in files may use ~ or $VAR
    let raw = config.paths.state_dir.to_string_lossy().into_owned();
    config.paths.state_dir = expand_path(&raw);

    Ok(config)
}

/// Merge two configs, with `overlay` taking precedence where it differs from
/// the compiled defaults.
pub fn merge_configs(base: FretConfig, overlay: FretConfig) -> FretConfig {
    let default_paths = PathsConfig::default();
    let default_telemetry = TelemetryConfig::default();
    let default_defaults = DefaultsConfig::default();

    FretConfig {
        paths: PathsConfig {
            state_dir: if overlay.paths.state_dir != default_paths.state_dir {
                overlay.paths.state_dir
            } else {
                base.paths.state_dir
            },
        },
        telemetry: TelemetryConfig {
            log_level: if overlay.telemetry.log_level != default_telemetry.log_level {
                overlay.telemetry.log_level
            } else {
                base.telemetry.log_level
            },
        },
        defaults: DefaultsConfig {
            tuning: if overlay.defaults.tuning != default_defaults.tuning {
                overlay.defaults.tuning
            } else {
                base.defaults.tuning
            },
            show_notes: if overlay.defaults.show_notes != default_defaults.show_notes {
                overlay.defaults.show_notes
            } else {
                base.defaults.show_notes
            },
            show_chord_tones: if overlay.defaults.show_chord_tones
                != default_defaults.show_chord_tones
            {
                overlay.defaults.show_chord_tones
            } else {
                base.defaults.show_chord_tones
            },
            show_scales: if overlay.defaults.show_scales != default_defaults.show_scales {
                overlay.defaults.show_scales
            } else {
                base.defaults.show_scales
            },
            highlight_root: if overlay.defaults.highlight_root != default_defaults.highlight_root
            {
                overlay.defaults.highlight_root
            } else {
                base.defaults.highlight_root
            },
            highlight_position: if overlay.defaults.highlight_position
                != default_defaults.highlight_position
            {
                overlay.defaults.highlight_position
            } else {
                base.defaults.highlight_position
            },
        },
    }
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut FretConfig, sources: &mut ConfigSources) {
    if let Ok(v) = env::var("FRETBOARD_STATE_DIR") {
        config.paths.state_dir = expand_path(&v);
        sources.env_overrides.push("FRETBOARD_STATE_DIR".to_string());
    }

    if let Ok(v) = env::var("FRETBOARD_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("FRETBOARD_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Ok(v) = env::var("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }

    if let Ok(v) = env::var("FRETBOARD_TUNING") {
        config.defaults.tuning = v;
        sources.env_overrides.push("FRETBOARD_TUNING".to_string());
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            home.join(stripped)
        } else {
            PathBuf::from(path)
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            if let Ok(var_value) = env::var(var_name) {
                PathBuf::from(var_value).join(&stripped[slash_pos + 1..])
            } else {
                PathBuf::from(path)
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path("~/test/path");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_absolute() {
        let expanded = expand_path("/absolute/path");
        assert_eq!(expanded, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_discover_config_files() {
        // Just verify it doesn't panic
        let _files = discover_config_files();
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
[paths]
state_dir = "/custom/state"
"#;
        let config = parse_toml(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.paths.state_dir, PathBuf::from("/custom/state"));
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.defaults, DefaultsConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
[paths]
state_dir = "/data/fretboard"

[telemetry]
log_level = "debug"

[defaults]
tuning = "DADGAD Tuning"
show_notes = false
show_chord_tones = true
highlight_position = true
"#;
        let config = parse_toml(toml, Path::new("test.toml")).unwrap();

        assert_eq!(config.paths.state_dir, PathBuf::from("/data/fretboard"));
        assert_eq!(config.telemetry.log_level, "debug");
        assert_eq!(config.defaults.tuning, "DADGAD Tuning");
        assert!(!config.defaults.show_notes);
        assert!(config.defaults.show_chord_tones);
        assert!(config.defaults.highlight_position);
        assert!(config.defaults.highlight_root);
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = parse_toml("[defaults\ntuning = ", Path::new("broken.toml")).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_merge_overlay_wins_only_when_set() {
        let mut base = FretConfig::default();
        base.defaults.tuning = "Drop D Tuning".to_string();
        base.telemetry.log_level = "warn".to_string();

        let mut overlay = FretConfig::default();
        overlay.defaults.show_chord_tones = true;

        let merged = merge_configs(base, overlay);
        assert_eq!(merged.defaults.tuning, "Drop D Tuning");
        assert_eq!(merged.telemetry.log_level, "warn");
        assert!(merged.defaults.show_chord_tones);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fretboard.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[defaults]\ntuning = \"Open D Tuning\"").unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.defaults.tuning, "Open D Tuning");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = load_from_file(Path::new("/nonexistent/fretboard.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }
}
