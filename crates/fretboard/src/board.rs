use serde::{Deserialize, Serialize};

use crate::pitch::PitchClass;
use crate::tuning::{StringId, Tuning};

/// Frets per string, open string included.
pub const FRET_COUNT: usize = 12;

/// One playable position on one string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FretCell {
    pub pitch_class: PitchClass,
    pub octave: i8,
    pub active: bool,
    /// Another string's selection sounds this pitch here.
    pub chord_tone: bool,
    /// Alternate spelling when the active chord or scale spells this pitch
    /// with flats or double accidentals.
    pub relative_note: Option<String>,
    pub interval: Option<String>,
}

impl FretCell {
    fn new(pitch_class: PitchClass, octave: i8) -> Self {
        Self {
            pitch_class,
            octave,
            active: false,
            chord_tone: false,
            relative_note: None,
            interval: None,
        }
    }

    /// Text shown on the cell: its spelling in note mode, its interval in
    /// interval mode (nothing when it has none).
    pub fn label(&self, show_intervals: bool) -> Option<&str> {
        if show_intervals {
            self.interval.as_deref()
        } else {
            Some(
                self.relative_note
                    .as_deref()
                    .unwrap_or_else(|| self.pitch_class.name()),
            )
        }
    }

    /// Carries the root interval of the current annotation.
    pub fn is_root(&self) -> bool {
        matches!(self.interval.as_deref(), Some("1P") | Some("8P"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuitarString {
    pub id: StringId,
    /// Frets 0..12, open string first.
    pub cells: Vec<FretCell>,
}

impl GuitarString {
    /// Fret at which `pitch` sounds on this string.
    pub fn fret_of(&self, pitch: PitchClass) -> Option<usize> {
        self.cells.iter().position(|c| c.pitch_class == pitch)
    }

    pub fn cell(&self, pitch: PitchClass) -> Option<&FretCell> {
        self.cells.iter().find(|c| c.pitch_class == pitch)
    }

    pub fn cell_mut(&mut self, pitch: PitchClass) -> Option<&mut FretCell> {
        self.cells.iter_mut().find(|c| c.pitch_class == pitch)
    }

    pub fn active_pitch(&self) -> Option<PitchClass> {
        self.cells.iter().find(|c| c.active).map(|c| c.pitch_class)
    }
}

/// The six selected pitch slots, one per string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Chordie {
    #[serde(rename = "6th")]
    pub sixth: Option<PitchClass>,
    #[serde(rename = "5th")]
    pub fifth: Option<PitchClass>,
    #[serde(rename = "4th")]
    pub fourth: Option<PitchClass>,
    #[serde(rename = "3rd")]
    pub third: Option<PitchClass>,
    #[serde(rename = "2nd")]
    pub second: Option<PitchClass>,
    #[serde(rename = "1st")]
    pub first: Option<PitchClass>,
}

impl Chordie {
    pub fn get(&self, string: StringId) -> Option<PitchClass> {
        match string {
            StringId::Sixth => self.sixth,
            StringId::Fifth => self.fifth,
            StringId::Fourth => self.fourth,
            StringId::Third => self.third,
            StringId::Second => self.second,
            StringId::First => self.first,
        }
    }

    pub fn set(&mut self, string: StringId, pitch: Option<PitchClass>) {
        let slot = match string {
            StringId::Sixth => &mut self.sixth,
            StringId::Fifth => &mut self.fifth,
            StringId::Fourth => &mut self.fourth,
            StringId::Third => &mut self.third,
            StringId::Second => &mut self.second,
            StringId::First => &mut self.first,
        };
        *slot = pitch;
    }

    /// Selected pitches, lowest string first.
    pub fn pitches(&self) -> Vec<PitchClass> {
        StringId::ALL.iter().filter_map(|s| self.get(*s)).collect()
    }

    pub fn is_empty(&self) -> bool {
        StringId::ALL.iter().all(|s| self.get(*s).is_none())
    }

    pub fn iter(&self) -> impl Iterator<Item = (StringId, Option<PitchClass>)> + '_ {
        StringId::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

/// What a toggle gesture did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The target was a chord-tone marker; nothing changed.
    Ignored,
    /// The string's selection is now `slot`.
    Changed {
        string: StringId,
        slot: Option<PitchClass>,
    },
}

/// Six strings by twelve frets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fretboard {
    pub strings: Vec<GuitarString>,
}

impl Fretboard {
    /// Build the grid for `tuning`, pre-activating the cells named by
    /// `snapshot`. Snapshot pitches absent from a string are skipped.
    pub fn new(tuning: &Tuning, snapshot: Option<&Chordie>) -> Self {
        let strings = tuning
            .strings
            .iter()
            .map(|open| {
                let mut octave = open.octave;
                let cells = (0..FRET_COUNT)
                    .map(|fret| {
                        let pitch = open.note.transpose(fret as i32);
                        if pitch == PitchClass::C && fret >= 1 {
                            octave = octave.saturating_add(1);
                        }
                        FretCell::new(pitch, octave)
                    })
                    .collect();
                GuitarString {
                    id: open.string,
                    cells,
                }
            })
            .collect();

        let mut board = Self { strings };
        if let Some(chordie) = snapshot {
            for (string, pitch) in chordie.iter() {
                let Some(pitch) = pitch else { continue };
                if let Some(cell) = board.string_mut(string).cell_mut(pitch) {
                    cell.active = true;
                }
            }
        }
        board
    }

    pub fn string(&self, id: StringId) -> &GuitarString {
        &self.strings[id.index()]
    }

    pub fn string_mut(&mut self, id: StringId) -> &mut GuitarString {
        &mut self.strings[id.index()]
    }

    pub fn cell(&self, string: StringId, pitch: PitchClass) -> Option<&FretCell> {
        self.string(string).cell(pitch)
    }

    pub fn fret_of(&self, string: StringId, pitch: PitchClass) -> Option<usize> {
        self.string(string).fret_of(pitch)
    }

    /// Active pitch per string, in a fresh selection record.
    pub fn active_pitches(&self) -> Chordie {
        let mut chordie = Chordie::default();
        for string in &self.strings {
            chordie.set(string.id, string.active_pitch());
        }
        chordie
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut FretCell> {
        self.strings.iter_mut().flat_map(|s| s.cells.iter_mut())
    }

    /// Flip the cell for `pitch` on `string`, deactivating every other cell
    /// on that string. Chord-tone markers are not selectable.
    pub fn toggle(&mut self, string: StringId, pitch: PitchClass) -> ToggleOutcome {
        let guitar_string = self.string_mut(string);
        let Some(fret) = guitar_string.fret_of(pitch) else {
            return ToggleOutcome::Ignored;
        };
        if guitar_string.cells[fret].chord_tone {
            return ToggleOutcome::Ignored;
        }

        for (i, cell) in guitar_string.cells.iter_mut().enumerate() {
            if i != fret {
                cell.active = false;
            }
        }
        let cell = &mut guitar_string.cells[fret];
        cell.active = !cell.active;

        ToggleOutcome::Changed {
            string,
            slot: cell.active.then_some(pitch),
        }
    }
}
