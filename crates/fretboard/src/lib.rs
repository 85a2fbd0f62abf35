//! Fretboard chord visualizer core.
//!
//! Toggle one note per string, and the [`Visualizer`] works out which chords
//! the selection forms, labels every cell of the fretboard with its interval
//! and spelling in the active chord, suggests scales that fit, and can
//! overlay one of them. State is persisted through a [`SnapshotStore`].
//!
//! Chord and scale knowledge sits behind the [`MusicTheory`] traits;
//! [`TonalTheory`] is the built-in implementation.
//!
//! The crate logs through `tracing` and installs no subscriber itself;
//! [`telemetry::init`] sets one up from the configured log level.

pub mod annotate;
pub mod board;
pub mod detection;
pub mod dictionary;
pub mod error;
pub mod interval;
pub mod pitch;
pub mod preferences;
pub mod scales;
pub mod store;
pub mod telemetry;
pub mod theory;
pub mod tuning;
pub mod types;
pub mod visualizer;

pub use annotate::{FretHighlight, FretMarker};
pub use board::{Chordie, FretCell, Fretboard, GuitarString, ToggleOutcome, FRET_COUNT};
pub use detection::{detect_chords, split_slash_chord, SlashChord};
pub use error::{FretboardError, Result};
pub use pitch::{enharmonic, Note, PitchClass, CHROMATIC_SHARP};
pub use preferences::{PreferenceKey, Preferences};
pub use store::{MemoryStore, SnapshotStore, SqliteStore, SNAPSHOT_VERSION};
pub use theory::{
    ChordDetector, ChordDictionary, DetectOptions, MusicTheory, ScaleDictionary, TonalTheory,
};
pub use tuning::{StringId, TunedString, Tuning, CUSTOM_TUNING, STANDARD_TUNING};
pub use types::{ChordData, ChordQuality, DetectedChord, DetectedChords, ScaleData};
pub use visualizer::{Action, TuningSelection, Visualizer};
