use tracing::{debug, warn};

use crate::board::Chordie;
use crate::pitch::CHROMATIC_SHARP;
use crate::theory::{DetectOptions, MusicTheory};
use crate::types::{ChordData, DetectedChord, DetectedChords};

/// Pieces of a slash chord name such as `"Em#5/C"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlashChord<'a> {
    pub quality: &'a str,
    pub root: &'a str,
    pub bass: &'a str,
}

/// Split a slash chord name at its first slash.
///
/// The root is the last chromatic (sharp-spelled) name, in C-to-B order,
/// found anywhere in the text before the slash, and the quality is that
/// text with the root's length cut from its front. No recognisable root
/// gives an empty root and the whole pre-slash text as the quality.
/// Returns `None` for names without a slash.
pub fn split_slash_chord(name: &str) -> Option<SlashChord<'_>> {
    let (pre, bass) = name.split_once('/')?;
    let root = slash_root(pre);
    let quality = pre.get(root.len()..).unwrap_or(pre);
    Some(SlashChord {
        quality,
        root,
        bass,
    })
}

/// Last chromatic name contained in `pre_slash`, or `""`.
pub fn slash_root(pre_slash: &str) -> &'static str {
    CHROMATIC_SHARP
        .iter()
        .rev()
        .find(|note| pre_slash.contains(**note))
        .copied()
        .unwrap_or("")
}

fn lookup(name: &str, theory: &dyn MusicTheory) -> ChordData {
    match split_slash_chord(name) {
        Some(parts) => {
            let data = theory.chord_from_parts(parts.quality, parts.root, Some(parts.bass));
            if data.empty {
                debug!(chord = name, "slash lookup missed, retrying without bass");
                theory.chord_from_parts(parts.quality, parts.root, None)
            } else {
                data
            }
        }
        None => theory.chord(name),
    }
}

/// Detect every chord the selection forms and attach its metadata.
///
/// Strict detection runs first; the perfect-fifth relaxation is tried only
/// when it finds nothing.
pub fn detect_chords(chordie: &Chordie, theory: &dyn MusicTheory) -> DetectedChords {
    let pitches = chordie.pitches();
    if pitches.is_empty() {
        return DetectedChords::default();
    }

    let mut names = theory.detect(&pitches, DetectOptions::default());
    if names.is_empty() {
        names = theory.detect(
            &pitches,
            DetectOptions {
                assume_perfect_fifth: true,
            },
        );
    }

    let chords: DetectedChords = names
        .into_iter()
        .map(|chord| {
            let data = lookup(&chord, theory);
            if data.notes.len() != data.intervals.len() {
                warn!(
                    chord = %chord,
                    notes = data.notes.len(),
                    intervals = data.intervals.len(),
                    "chord notes and intervals differ in length"
                );
            }
            debug_assert_eq!(
                data.notes.len(),
                data.intervals.len(),
                "notes and intervals of {chord} differ in length"
            );
            DetectedChord { chord, data }
        })
        .collect();

    debug!(pitches = pitches.len(), chords = chords.len(), "detected chords");
    chords
}
