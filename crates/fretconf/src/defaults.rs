//! Default preferences - seed the visualizer until preferences are persisted.

use serde::{Deserialize, Serialize};

/// Initial preference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Tuning name from the built-in catalog.
    #[serde(default = "DefaultsConfig::default_tuning")]
    pub tuning: String,

    /// Show note names (true) or interval labels (false).
    #[serde(default = "default_true")]
    pub show_notes: bool,

    #[serde(default)]
    pub show_chord_tones: bool,

    #[serde(default)]
    pub show_scales: bool,

    #[serde(default = "default_true")]
    pub highlight_root: bool,

    #[serde(default)]
    pub highlight_position: bool,
}

fn default_true() -> bool {
    true
}

impl DefaultsConfig {
    fn default_tuning() -> String {
        "Standard Tuning".to_string()
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tuning: Self::default_tuning(),
            show_notes: true,
            show_chord_tones: false,
            show_scales: false,
            highlight_root: true,
            highlight_position: false,
        }
    }
}
