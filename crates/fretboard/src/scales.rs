use tracing::debug;

use crate::detection::slash_root;
use crate::theory::MusicTheory;
use crate::types::{DetectedChord, ScaleData};

/// Scales that fit `chord`, keyed by its name without the bass.
pub fn scales_for_chord(chord: &DetectedChord, theory: &dyn MusicTheory) -> Vec<String> {
    if chord.data.empty {
        return Vec::new();
    }
    theory.scales_for_chord(chord.pre_slash())
}

/// Tonic to build scales on: the looked-up tonic, else the root read off
/// the detector name.
pub fn scale_tonic(chord: &DetectedChord) -> Option<String> {
    chord
        .data
        .tonic
        .clone()
        .filter(|t| !t.is_empty())
        .or_else(|| {
            let root = slash_root(chord.pre_slash());
            (!root.is_empty()).then(|| root.to_string())
        })
}

/// Notes and intervals of `scale_name` built on the chord's tonic.
pub fn load_scale(chord: &DetectedChord, scale_name: &str, theory: &dyn MusicTheory) -> ScaleData {
    let Some(tonic) = scale_tonic(chord) else {
        debug!(chord = %chord.chord, "no tonic for scale overlay");
        return ScaleData::empty();
    };
    theory.scale(&format!("{} {}", tonic, scale_name))
}
