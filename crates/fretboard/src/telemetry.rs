//! Opt-in log output for embedders. The engine only emits events; nothing
//! is printed until a subscriber is installed.

use anyhow::{Context, Result};
use fretconf::TelemetryConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive from `telemetry.log_level`, which already carries any
/// `FRETBOARD_LOG_LEVEL`/`RUST_LOG` override applied by `fretconf`.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("invalid log level `{}`", config.log_level))
}

/// Install a global formatting subscriber filtered by `config`.
pub fn init(config: &TelemetryConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(config)?)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("installing tracing subscriber")?;

    tracing::info!(log_level = %config.log_level, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(log_level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: log_level.to_string(),
        }
    }

    #[test]
    fn accepts_levels_and_directives() {
        assert!(env_filter(&level("info")).is_ok());
        assert!(env_filter(&level("warn,fretboard=debug")).is_ok());
    }

    #[test]
    fn rejects_unknown_level() {
        let err = env_filter(&level("fretboard=loud")).unwrap_err();
        assert!(err.to_string().contains("fretboard=loud"));
    }

    #[test]
    fn init_installs_once() {
        assert!(init(&level("debug")).is_ok());
        assert!(init(&level("debug")).is_err());
    }
}
