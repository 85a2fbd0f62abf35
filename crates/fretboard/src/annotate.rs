//! Per-cell annotations: interval labels, respellings, chord-tone markers
//! and fret position markers. Every pass clears before it writes.

use serde::{Deserialize, Serialize};

use crate::board::{Chordie, Fretboard, FRET_COUNT};
use crate::error::Result;
use crate::pitch::{enharmonic, PitchClass};

/// Frets around a root that belong to its playing position.
const POSITION_SPAN: usize = 2;

pub fn reset_annotations(board: &mut Fretboard) {
    for cell in board.cells_mut() {
        cell.relative_note = None;
        cell.interval = None;
    }
}

pub fn clear_chord_tones(board: &mut Fretboard) {
    for cell in board.cells_mut() {
        cell.chord_tone = false;
    }
}

/// Write `interval` (and, for non-canonical spellings, the spelling itself)
/// onto the cell of each note's pitch class on every string.
///
/// `notes` and `intervals` pair up by position; unpaired notes are skipped.
pub fn annotate_relative(board: &mut Fretboard, notes: &[String], intervals: &[String]) -> Result<()> {
    reset_annotations(board);

    for (note, interval) in notes.iter().zip(intervals.iter()) {
        let (pitch, relative) = match enharmonic(note) {
            Some(pitch) => (pitch, Some(note.clone())),
            None => (note.parse::<PitchClass>()?, None),
        };
        for string in board.strings.iter_mut() {
            if let Some(cell) = string.cell_mut(pitch) {
                if relative.is_some() {
                    cell.relative_note = relative.clone();
                }
                cell.interval = Some(interval.clone());
            }
        }
    }
    Ok(())
}

fn mark_tones(board: &mut Fretboard, pitches: &[PitchClass]) {
    clear_chord_tones(board);
    for string in board.strings.iter_mut() {
        for cell in string.cells.iter_mut() {
            if !cell.active && pitches.contains(&cell.pitch_class) {
                cell.chord_tone = true;
            }
        }
    }
}

/// Mark every cell sounding a selected pitch, leaving each string's own
/// selection unmarked.
pub fn annotate_chord_tones(board: &mut Fretboard, chordie: &Chordie) {
    mark_tones(board, &chordie.pitches());
}

/// Mark every cell sounding one of the scale's notes, whatever their
/// spelling.
pub fn annotate_scale_tones(board: &mut Fretboard, notes: &[String]) -> Result<()> {
    let pitches = notes
        .iter()
        .map(|n| PitchClass::from_spelling(n))
        .collect::<Result<Vec<_>>>()?;
    mark_tones(board, &pitches);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FretHighlight {
    Root,
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FretMarker {
    pub fret: usize,
    pub highlight: Option<FretHighlight>,
}

pub fn unmarked_frets() -> Vec<FretMarker> {
    (0..FRET_COUNT)
        .map(|fret| FretMarker {
            fret,
            highlight: None,
        })
        .collect()
}

/// Root frets plus the frets within reach of them.
pub fn position_markers(board: &Fretboard) -> Vec<FretMarker> {
    let mut markers = unmarked_frets();

    let roots: Vec<usize> = (0..FRET_COUNT)
        .filter(|fret| {
            board
                .strings
                .iter()
                .any(|s| s.cells.get(*fret).is_some_and(|c| c.is_root()))
        })
        .collect();

    for &root in &roots {
        let low = root.saturating_sub(POSITION_SPAN);
        let high = (root + POSITION_SPAN).min(FRET_COUNT - 1);
        for marker in &mut markers[low..=high] {
            if marker.highlight.is_none() {
                marker.highlight = Some(FretHighlight::Position);
            }
        }
    }
    for &root in &roots {
        markers[root].highlight = Some(FretHighlight::Root);
    }
    markers
}
