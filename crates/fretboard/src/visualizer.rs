use std::sync::Arc;

use anyhow::{Context, Result};
use fretconf::FretConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::annotate::{
    annotate_chord_tones, annotate_relative, annotate_scale_tones, clear_chord_tones,
    position_markers, reset_annotations, unmarked_frets, FretMarker,
};
use crate::board::{Chordie, Fretboard, ToggleOutcome};
use crate::detection::detect_chords;
use crate::error::FretboardError;
use crate::pitch::PitchClass;
use crate::preferences::{PreferenceKey, Preferences};
use crate::scales::{load_scale, scales_for_chord};
use crate::store::{
    MemoryStore, SnapshotStore, SqliteStore, CHORDIE_KEY, CUSTOM_TUNING_KEY, PREFERENCES_KEY,
    SNAPSHOT_VERSION,
};
use crate::theory::{MusicTheory, TonalTheory};
use crate::tuning::{
    StringId, TunedString, Tuning, CUSTOM_TUNING, OCTAVE_RANGE, STANDARD_TUNING,
};
use crate::types::{DetectedChord, DetectedChords};

/// A tuning change: pick a catalog entry, or retune one string of the
/// custom slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuningSelection {
    Named(String),
    Retune {
        string: StringId,
        note: PitchClass,
        octave: i8,
    },
}

/// Every user-facing transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ToggleCell { string: StringId, pitch: PitchClass },
    SetActiveChord(usize),
    SetActiveScale(usize),
    TogglePreference(PreferenceKey),
    SetGuitarTuning(TuningSelection),
    Reset,
}

/// Owns the fretboard, the selection and everything derived from it.
///
/// Each transition runs the derivation in a fixed order (selection,
/// detection, active chord, annotations, chord tones, scale suggestions,
/// fret markers) and then persists. Persistence failures are logged and
/// never undo the transition.
pub struct Visualizer {
    theory: Arc<dyn MusicTheory>,
    store: Box<dyn SnapshotStore>,
    board: Fretboard,
    chordie: Chordie,
    chords: DetectedChords,
    preferences: Preferences,
    scales: Vec<String>,
    frets: Vec<FretMarker>,
    custom_tuning: Tuning,
}

impl Visualizer {
    /// In-memory visualizer with the built-in theory and default preferences.
    pub fn new() -> Self {
        Self::with_theory(
            Arc::new(TonalTheory),
            Box::new(MemoryStore::new()),
            Preferences::default(),
        )
    }

    /// Open the snapshot database named by `config` and restore from it.
    pub fn open(config: &FretConfig) -> Result<Self> {
        let db_path = config.paths.snapshot_db();
        info!(
            db = %db_path.display(),
            log_level = %config.telemetry.log_level,
            "opening visualizer"
        );
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("opening snapshot store at {}", db_path.display()))?;

        Ok(Self::with_theory(
            Arc::new(TonalTheory),
            Box::new(store),
            Preferences::from_config(&config.defaults),
        ))
    }

    /// Build with a custom theory backend and store, restoring any snapshots
    /// the store holds. `defaults` applies when no preferences were saved.
    pub fn with_theory(
        theory: Arc<dyn MusicTheory>,
        store: Box<dyn SnapshotStore>,
        defaults: Preferences,
    ) -> Self {
        let chordie: Chordie = restore(store.as_ref(), CHORDIE_KEY).unwrap_or_default();
        let mut preferences: Preferences =
            restore(store.as_ref(), PREFERENCES_KEY).unwrap_or(defaults);
        let custom_tuning = restore::<[TunedString; 6]>(store.as_ref(), CUSTOM_TUNING_KEY)
            .and_then(custom_from_strings)
            .unwrap_or_else(Tuning::custom_default);

        let tuning = match lookup_tuning(&preferences.guitar_tuning, &custom_tuning) {
            Some(tuning) => tuning,
            None => {
                warn!(
                    tuning = %preferences.guitar_tuning,
                    "restored tuning is unknown, using standard tuning"
                );
                preferences.guitar_tuning = STANDARD_TUNING.to_string();
                Tuning::standard()
            }
        };

        let mut visualizer = Self {
            theory,
            store,
            board: Fretboard::new(&tuning, Some(&chordie)),
            chordie,
            chords: DetectedChords::default(),
            preferences,
            scales: Vec::new(),
            frets: unmarked_frets(),
            custom_tuning,
        };
        visualizer.on_chord_set_changed();

        info!(
            tuning = %visualizer.preferences.guitar_tuning,
            pitches = visualizer.chordie.pitches().len(),
            chords = visualizer.chords.len(),
            "visualizer restored"
        );
        visualizer
    }

    // --- transitions ---

    pub fn dispatch(&mut self, action: Action) -> Result<(), FretboardError> {
        match action {
            Action::ToggleCell { string, pitch } => self.toggle_cell(string, pitch),
            Action::SetActiveChord(index) => self.set_active_chord(index),
            Action::SetActiveScale(index) => self.set_active_scale(index),
            Action::TogglePreference(key) => self.toggle_preference(key),
            Action::SetGuitarTuning(selection) => return self.set_guitar_tuning(selection),
            Action::Reset => self.reset(),
        }
        Ok(())
    }

    /// Select or deselect `pitch` on `string`. Chord-tone cells are ignored.
    pub fn toggle_cell(&mut self, string: StringId, pitch: PitchClass) {
        match self.board.toggle(string, pitch) {
            ToggleOutcome::Ignored => {
                debug!(%string, %pitch, "toggle ignored on chord tone");
                return;
            }
            ToggleOutcome::Changed { string, slot } => {
                debug!(%string, slot = ?slot, "string selection changed");
                self.chordie.set(string, slot);
            }
        }

        self.on_chord_set_changed();
        self.persist(CHORDIE_KEY, &self.chordie);
        self.persist(PREFERENCES_KEY, &self.preferences);
    }

    /// Make chord `index` active. An index outside the current list selects
    /// nothing.
    pub fn set_active_chord(&mut self, index: usize) {
        self.preferences.active_chord = (index < self.chords.len()).then_some(index);
        self.preferences.active_scale = None;
        debug!(index, active = ?self.preferences.active_chord, "active chord set");

        self.apply_active_chord();
        self.refresh_chord_tones();
        self.refresh_frets();
        self.persist(PREFERENCES_KEY, &self.preferences);
    }

    /// Toggle the scale overlay for suggestion `index`. Selecting the active
    /// scale again restores the chord's own annotations.
    pub fn set_active_scale(&mut self, index: usize) {
        if index >= self.scales.len() {
            debug!(index, scales = self.scales.len(), "scale index out of range");
            return;
        }

        if self.preferences.active_scale == Some(index) {
            self.preferences.active_scale = None;
            debug!(index, "scale overlay cleared");
            self.apply_active_chord();
            self.refresh_chord_tones();
        } else {
            let Some(chord) = self.active_chord().cloned() else {
                return;
            };
            let scale_name = self.scales[index].clone();
            let scale = load_scale(&chord, &scale_name, self.theory.as_ref());
            if scale.empty {
                warn!(chord = %chord.chord, scale = %scale_name, "scale lookup missed");
            }

            self.preferences.active_scale = Some(index);
            debug!(index, scale = %scale.name, "scale overlay set");
            if let Err(e) = annotate_scale_tones(&mut self.board, &scale.notes) {
                error!(error = %e, scale = %scale.name, "failed to mark scale tones");
                clear_chord_tones(&mut self.board);
            }
            self.annotate(&scale.notes, &scale.intervals);
        }

        self.refresh_frets();
        self.persist(PREFERENCES_KEY, &self.preferences);
    }

    pub fn toggle_preference(&mut self, key: PreferenceKey) {
        let value = self.preferences.toggle(key);
        debug!(key = ?key, value, "preference toggled");

        match key {
            PreferenceKey::ShowChordTones => self.refresh_chord_tones(),
            PreferenceKey::HighlightPosition => self.refresh_frets(),
            _ => {}
        }
        self.persist(PREFERENCES_KEY, &self.preferences);
    }

    /// Switch tuning and rebuild the grid around the current selection.
    pub fn set_guitar_tuning(&mut self, selection: TuningSelection) -> Result<(), FretboardError> {
        let tuning = match selection {
            TuningSelection::Named(name) => {
                let tuning = lookup_tuning(&name, &self.custom_tuning)
                    .ok_or_else(|| FretboardError::UnknownTuning(name.clone()))?;
                self.preferences.guitar_tuning = name;
                tuning
            }
            TuningSelection::Retune {
                string,
                note,
                octave,
            } => {
                self.custom_tuning.retune(string, note, octave)?;
                self.preferences.guitar_tuning = CUSTOM_TUNING.to_string();
                self.persist(CUSTOM_TUNING_KEY, &self.custom_tuning.strings);
                self.custom_tuning.clone()
            }
        };
        debug!(tuning = %tuning.name, "tuning changed");

        self.board = Fretboard::new(&tuning, Some(&self.chordie));
        self.on_chord_set_changed();
        self.persist(PREFERENCES_KEY, &self.preferences);
        Ok(())
    }

    /// Clear the selection and everything derived from it.
    pub fn reset(&mut self) {
        self.chordie = Chordie::default();
        self.chords = DetectedChords::default();
        self.board = Fretboard::new(&self.tuning(), None);
        self.scales.clear();
        self.preferences.active_chord = None;
        self.preferences.active_scale = None;
        self.refresh_frets();
        debug!("visualizer reset");

        self.persist(CHORDIE_KEY, &self.chordie);
        self.persist(PREFERENCES_KEY, &self.preferences);
    }

    // --- derivation ---

    fn on_chord_set_changed(&mut self) {
        self.chords = detect_chords(&self.chordie, self.theory.as_ref());
        self.preferences.active_scale = None;
        self.preferences.resolve_active_chord(self.chords.len());

        self.apply_active_chord();
        self.refresh_chord_tones();
        self.refresh_frets();
    }

    /// Annotations and scale suggestions for the active chord, or none.
    fn apply_active_chord(&mut self) {
        match self.active_chord().cloned() {
            Some(chord) => {
                self.annotate(&chord.data.notes, &chord.data.intervals);
                self.scales = scales_for_chord(&chord, self.theory.as_ref());
            }
            None => {
                reset_annotations(&mut self.board);
                self.scales.clear();
            }
        }
    }

    fn annotate(&mut self, notes: &[String], intervals: &[String]) {
        if let Err(e) = annotate_relative(&mut self.board, notes, intervals) {
            error!(error = %e, "failed to annotate fretboard");
            reset_annotations(&mut self.board);
        }
    }

    /// Chord-tone overlay from the selection, replacing any scale markers.
    fn refresh_chord_tones(&mut self) {
        if self.preferences.show_chord_tones {
            annotate_chord_tones(&mut self.board, &self.chordie);
        } else {
            clear_chord_tones(&mut self.board);
        }
    }

    fn refresh_frets(&mut self) {
        self.frets = if self.preferences.highlight_position {
            position_markers(&self.board)
        } else {
            unmarked_frets()
        };
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize snapshot");
                return;
            }
        };
        if let Err(e) = self.store.save(key, SNAPSHOT_VERSION, &json) {
            warn!(key, error = %format!("{e:#}"), "failed to persist snapshot");
        }
    }

    // --- read access ---

    pub fn fretboard(&self) -> &Fretboard {
        &self.board
    }

    pub fn chordie(&self) -> &Chordie {
        &self.chordie
    }

    pub fn chords(&self) -> &DetectedChords {
        &self.chords
    }

    /// The active chord, if its index is valid for the current list.
    pub fn active_chord(&self) -> Option<&DetectedChord> {
        self.preferences
            .active_chord
            .and_then(|index| self.chords.get(index))
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn scales(&self) -> &[String] {
        &self.scales
    }

    /// Name of the active scale overlay, if its index is valid.
    pub fn active_scale_name(&self) -> Option<&str> {
        self.preferences
            .active_scale
            .and_then(|index| self.scales.get(index))
            .map(String::as_str)
    }

    pub fn frets(&self) -> &[FretMarker] {
        &self.frets
    }

    /// The tuning the grid is currently built from.
    pub fn tuning(&self) -> Tuning {
        lookup_tuning(&self.preferences.guitar_tuning, &self.custom_tuning)
            .unwrap_or_else(Tuning::standard)
    }

    pub fn custom_tuning(&self) -> &Tuning {
        &self.custom_tuning
    }

    /// Text for one cell under the current display mode. Interval labels
    /// are only used when the active chord has intervals to show.
    pub fn cell_label(&self, string: StringId, pitch: PitchClass) -> Option<&str> {
        let has_intervals = self
            .active_chord()
            .is_some_and(|c| !c.data.intervals.is_empty());
        let show_intervals = !self.preferences.show_notes && has_intervals;
        self.board.cell(string, pitch)?.label(show_intervals)
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup_tuning(name: &str, custom: &Tuning) -> Option<Tuning> {
    if name == CUSTOM_TUNING {
        Some(custom.clone())
    } else {
        Tuning::named(name)
    }
}

fn custom_from_strings(strings: [TunedString; 6]) -> Option<Tuning> {
    let ordered = strings
        .iter()
        .zip(StringId::ALL)
        .all(|(entry, id)| entry.string == id);
    if !ordered {
        warn!("restored custom tuning is out of string order, using default");
        return None;
    }
    if let Some(entry) = strings.iter().find(|s| !OCTAVE_RANGE.contains(&s.octave)) {
        warn!(
            string = %entry.string,
            octave = entry.octave,
            "restored custom tuning has an invalid octave, using default"
        );
        return None;
    }
    Some(Tuning {
        name: CUSTOM_TUNING.to_string(),
        strings,
    })
}

/// Load one snapshot, falling back (with a warning) on any failure.
fn restore<T: DeserializeOwned>(store: &dyn SnapshotStore, key: &str) -> Option<T> {
    let json = match store.load(key, SNAPSHOT_VERSION) {
        Ok(Some(json)) => json,
        Ok(None) => {
            debug!(key, version = SNAPSHOT_VERSION, "no snapshot stored");
            return None;
        }
        Err(e) => {
            warn!(key, error = %format!("{e:#}"), "failed to load snapshot, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "unreadable snapshot, using defaults");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::PitchClass::*;
    use pretty_assertions::assert_eq;

    fn play(v: &mut Visualizer, notes: &[(StringId, PitchClass)]) {
        for (string, pitch) in notes {
            v.toggle_cell(*string, *pitch);
        }
    }

    #[test]
    fn starts_empty() {
        let v = Visualizer::new();
        assert!(v.chords().is_empty());
        assert!(v.chordie().is_empty());
        assert_eq!(v.active_chord(), None);
        assert!(v.scales().is_empty());
        assert_eq!(v.frets().len(), 12);
    }

    #[test]
    fn first_chord_becomes_active() {
        let mut v = Visualizer::new();
        play(
            &mut v,
            &[
                (StringId::Fifth, C),
                (StringId::Fourth, E),
                (StringId::Third, G),
            ],
        );
        assert_eq!(v.preferences().active_chord, Some(0));
        assert_eq!(v.active_chord().unwrap().chord, "CM");
        assert!(!v.scales().is_empty());
    }

    #[test]
    fn out_of_range_chord_selects_nothing() {
        let mut v = Visualizer::new();
        play(
            &mut v,
            &[
                (StringId::Fifth, C),
                (StringId::Fourth, E),
                (StringId::Third, G),
            ],
        );
        v.set_active_chord(9);
        assert_eq!(v.preferences().active_chord, None);
        assert!(v.scales().is_empty());
        assert!(v.fretboard().strings.iter().flat_map(|s| &s.cells).all(|c| c.interval.is_none()));
    }

    #[test]
    fn out_of_range_scale_is_ignored() {
        let mut v = Visualizer::new();
        v.set_active_scale(0);
        assert_eq!(v.preferences().active_scale, None);
    }

    #[test]
    fn unknown_tuning_changes_nothing() {
        let mut v = Visualizer::new();
        v.toggle_cell(StringId::Fifth, C);
        let before = v.fretboard().clone();
        let err = v
            .set_guitar_tuning(TuningSelection::Named("Banjo Tuning".into()))
            .unwrap_err();
        assert_eq!(err, FretboardError::UnknownTuning("Banjo Tuning".into()));
        assert_eq!(v.fretboard(), &before);
        assert_eq!(v.preferences().guitar_tuning, STANDARD_TUNING);
    }

    #[test]
    fn retune_switches_to_custom() {
        let mut v = Visualizer::new();
        v.set_guitar_tuning(TuningSelection::Retune {
            string: StringId::Sixth,
            note: D,
            octave: 2,
        })
        .unwrap();
        assert_eq!(v.preferences().guitar_tuning, CUSTOM_TUNING);
        assert_eq!(v.tuning().strings[0].note, D);
        assert_eq!(v.fretboard().string(StringId::Sixth).cells[0].pitch_class, D);
    }

    #[test]
    fn retune_rejects_out_of_range_octave() {
        let mut v = Visualizer::new();
        v.toggle_cell(StringId::Sixth, E);
        let before = v.fretboard().clone();

        let err = v
            .set_guitar_tuning(TuningSelection::Retune {
                string: StringId::Sixth,
                note: E,
                octave: 127,
            })
            .unwrap_err();
        assert_eq!(err, FretboardError::InvalidOctave(127));
        assert_eq!(v.fretboard(), &before);
        assert_eq!(v.preferences().guitar_tuning, STANDARD_TUNING);
        assert_eq!(v.custom_tuning().strings, Tuning::standard().strings);
    }

    #[test]
    fn dispatch_routes_actions() {
        let mut v = Visualizer::new();
        v.dispatch(Action::ToggleCell {
            string: StringId::Fifth,
            pitch: C,
        })
        .unwrap();
        v.dispatch(Action::TogglePreference(PreferenceKey::ShowMoreChordInfo))
            .unwrap();
        assert_eq!(v.chordie().fifth, Some(C));
        assert!(v.preferences().show_more_chord_info);

        v.dispatch(Action::Reset).unwrap();
        assert!(v.chordie().is_empty());
        assert!(v.dispatch(Action::SetGuitarTuning(TuningSelection::Named("nope".into()))).is_err());
    }

    #[test]
    fn cell_label_follows_display_mode() {
        let mut v = Visualizer::new();
        play(
            &mut v,
            &[
                (StringId::Fifth, C),
                (StringId::Fourth, E),
                (StringId::Third, G),
            ],
        );
        assert_eq!(v.cell_label(StringId::Second, C), Some("C"));
        v.toggle_preference(PreferenceKey::ShowNotes);
        assert_eq!(v.cell_label(StringId::Second, C), Some("1P"));
        assert_eq!(v.cell_label(StringId::Second, D), None);
    }
}
