use fretconf::DefaultsConfig;
use serde::{Deserialize, Serialize};

use crate::tuning::STANDARD_TUNING;

/// Display flags and the current chord/scale selection.
///
/// Indices are positions in the current detected-chord and scale lists and
/// are re-validated whenever they are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub active_chord: Option<usize>,
    pub active_scale: Option<usize>,
    /// Note names (true) or interval labels (false).
    pub show_notes: bool,
    pub show_chord_tones: bool,
    pub show_scales: bool,
    pub highlight_root: bool,
    pub highlight_notes: bool,
    pub highlight_position: bool,
    pub show_more_chord_info: bool,
    pub guitar_tuning: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            active_chord: None,
            active_scale: None,
            show_notes: true,
            show_chord_tones: false,
            show_scales: false,
            highlight_root: true,
            highlight_notes: false,
            highlight_position: false,
            show_more_chord_info: false,
            guitar_tuning: STANDARD_TUNING.to_string(),
        }
    }
}

/// Boolean preferences that can be flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKey {
    ShowNotes,
    ShowChordTones,
    ShowScales,
    HighlightRoot,
    HighlightNotes,
    HighlightPosition,
    ShowMoreChordInfo,
}

impl Preferences {
    pub fn from_config(defaults: &DefaultsConfig) -> Self {
        Self {
            show_notes: defaults.show_notes,
            show_chord_tones: defaults.show_chord_tones,
            show_scales: defaults.show_scales,
            highlight_root: defaults.highlight_root,
            highlight_position: defaults.highlight_position,
            guitar_tuning: defaults.tuning.clone(),
            ..Self::default()
        }
    }

    pub fn flag(&self, key: PreferenceKey) -> bool {
        match key {
            PreferenceKey::ShowNotes => self.show_notes,
            PreferenceKey::ShowChordTones => self.show_chord_tones,
            PreferenceKey::ShowScales => self.show_scales,
            PreferenceKey::HighlightRoot => self.highlight_root,
            PreferenceKey::HighlightNotes => self.highlight_notes,
            PreferenceKey::HighlightPosition => self.highlight_position,
            PreferenceKey::ShowMoreChordInfo => self.show_more_chord_info,
        }
    }

    /// Flip `key`, returning its new value.
    pub fn toggle(&mut self, key: PreferenceKey) -> bool {
        let flag = match key {
            PreferenceKey::ShowNotes => &mut self.show_notes,
            PreferenceKey::ShowChordTones => &mut self.show_chord_tones,
            PreferenceKey::ShowScales => &mut self.show_scales,
            PreferenceKey::HighlightRoot => &mut self.highlight_root,
            PreferenceKey::HighlightNotes => &mut self.highlight_notes,
            PreferenceKey::HighlightPosition => &mut self.highlight_position,
            PreferenceKey::ShowMoreChordInfo => &mut self.show_more_chord_info,
        };
        *flag = !*flag;
        *flag
    }

    /// Keep the active chord valid for a list of `len` chords: an unset or
    /// stale index becomes 0, and an empty list clears it.
    pub fn resolve_active_chord(&mut self, len: usize) {
        self.active_chord = match self.active_chord {
            _ if len == 0 => None,
            Some(i) if i < len => Some(i),
            _ => Some(0),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let prefs = Preferences::default();
        assert!(prefs.show_notes);
        assert!(prefs.highlight_root);
        assert!(!prefs.show_chord_tones);
        assert_eq!(prefs.active_chord, None);
        assert_eq!(prefs.guitar_tuning, "Standard Tuning");
    }

    #[test]
    fn seeded_from_config() {
        let defaults = DefaultsConfig {
            tuning: "Drop D Tuning".into(),
            show_chord_tones: true,
            ..DefaultsConfig::default()
        };
        let prefs = Preferences::from_config(&defaults);
        assert_eq!(prefs.guitar_tuning, "Drop D Tuning");
        assert!(prefs.show_chord_tones);
        assert!(prefs.show_notes);
    }

    #[test]
    fn toggle_flips_one_flag() {
        let mut prefs = Preferences::default();
        assert!(prefs.toggle(PreferenceKey::HighlightPosition));
        assert!(prefs.flag(PreferenceKey::HighlightPosition));
        assert!(!prefs.toggle(PreferenceKey::ShowNotes));
        assert!(prefs.highlight_root);
    }

    #[test]
    fn resolve_active_chord_rules() {
        let mut prefs = Preferences::default();
        prefs.resolve_active_chord(3);
        assert_eq!(prefs.active_chord, Some(0));

        prefs.active_chord = Some(2);
        prefs.resolve_active_chord(3);
        assert_eq!(prefs.active_chord, Some(2));

        prefs.resolve_active_chord(2);
        assert_eq!(prefs.active_chord, Some(0));

        prefs.resolve_active_chord(0);
        assert_eq!(prefs.active_chord, None);
    }

    #[test]
    fn partial_snapshot_fills_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"show_notes": false}"#).unwrap();
        assert!(!prefs.show_notes);
        assert!(prefs.highlight_root);
        assert_eq!(prefs.guitar_tuning, "Standard Tuning");
    }
}
