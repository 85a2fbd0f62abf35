use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FretboardError;

/// Canonical sharp spelling of the twelve pitch classes, C first.
pub const CHROMATIC_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// One of the twelve chromatic pitch classes, independent of octave.
///
/// Always spelled with sharps; other spellings are resolved through
/// [`enharmonic`] before they are used as a fretboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    #[serde(rename = "C#")]
    Cs,
    D,
    #[serde(rename = "D#")]
    Ds,
    E,
    F,
    #[serde(rename = "F#")]
    Fs,
    G,
    #[serde(rename = "G#")]
    Gs,
    A,
    #[serde(rename = "A#")]
    As,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    pub const fn from_index(idx: usize) -> PitchClass {
        Self::ALL[idx % 12]
    }

    /// Semitones above C (0..=11).
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        CHROMATIC_SHARP[self as usize]
    }

    /// Move by `semitones` (may be negative), wrapping around the octave.
    pub fn transpose(self, semitones: i32) -> PitchClass {
        Self::from_index((self.index() as i32 + semitones).rem_euclid(12) as usize)
    }

    /// Resolve any spelling ("Ab", "F##", "C") to its pitch class.
    pub fn from_spelling(name: &str) -> Result<PitchClass, FretboardError> {
        Ok(name.parse::<Note>()?.pitch_class())
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = FretboardError;

    /// Accepts canonical sharp names only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CHROMATIC_SHARP
            .iter()
            .position(|name| *name == s)
            .map(PitchClass::from_index)
            .ok_or_else(|| FretboardError::InvalidNote(s.to_string()))
    }
}

/// Natural note letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    const NATURAL_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

    /// Position in C D E F G A B.
    pub const fn step(self) -> usize {
        self as usize
    }

    pub fn from_step(step: i32) -> Letter {
        Self::ALL[step.rem_euclid(7) as usize]
    }

    pub const fn semitones(self) -> i32 {
        Self::NATURAL_SEMITONES[self as usize]
    }

    fn from_char(c: char) -> Option<Letter> {
        match c {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// A spelled note without octave: letter plus alteration
/// (positive for sharps, negative for flats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub letter: Letter,
    pub alteration: i32,
}

impl Note {
    pub const fn new(letter: Letter, alteration: i32) -> Self {
        Self { letter, alteration }
    }

    pub fn pitch_class(&self) -> PitchClass {
        PitchClass::from_index((self.letter.semitones() + self.alteration).rem_euclid(12) as usize)
    }

    /// True when this spelling is the canonical sharp name of its pitch class.
    pub fn is_canonical(&self) -> bool {
        self.to_string() == self.pitch_class().name()
    }
}

impl From<PitchClass> for Note {
    fn from(pc: PitchClass) -> Self {
        let name = pc.name();
        let letter = name
            .chars()
            .next()
            .and_then(Letter::from_char)
            .unwrap_or(Letter::C);
        let alteration = if name.len() > 1 { 1 } else { 0 };
        Note::new(letter, alteration)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        let accidental = if self.alteration > 0 { "#" } else { "b" };
        for _ in 0..self.alteration.unsigned_abs() {
            f.write_str(accidental)?;
        }
        Ok(())
    }
}

impl FromStr for Note {
    type Err = FretboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FretboardError::InvalidNote(s.to_string());
        let mut chars = s.chars();
        let letter = chars.next().and_then(Letter::from_char).ok_or_else(invalid)?;
        let accidentals = chars.as_str();

        let alteration = if accidentals.is_empty() {
            0
        } else if accidentals.chars().all(|c| c == '#') {
            accidentals.len() as i32
        } else if accidentals.chars().all(|c| c == 'b') {
            -(accidentals.len() as i32)
        } else {
            return Err(invalid());
        };

        Ok(Note::new(letter, alteration))
    }
}

/// Fixed double-flat entries. Each resolves one semitone above its spelled
/// pitch.
const LEGACY_DOUBLE_FLATS: [(&str, PitchClass); 5] = [
    ("Fbb", PitchClass::E),
    ("Cbb", PitchClass::B),
    ("Gbb", PitchClass::Fs),
    ("Dbb", PitchClass::Cs),
    ("Abb", PitchClass::Gs),
];

/// Enharmonic-equivalence table.
///
/// Returns the canonical pitch class for every non-canonical spelling
/// (flats, E#/B#, Cb/Fb, double sharps, double flats) and `None` for names
/// that are already canonical or are not note names at all.
///
/// Fbb, Cbb, Gbb, Dbb and Abb resolve through the fixed entries
/// rather than by spelling arithmetic.
pub fn enharmonic(name: &str) -> Option<PitchClass> {
    if let Some((_, pitch)) = LEGACY_DOUBLE_FLATS.iter().find(|(n, _)| *n == name) {
        return Some(*pitch);
    }
    let note = name.parse::<Note>().ok()?;
    if note.is_canonical() {
        None
    } else {
        Some(note.pitch_class())
    }
}
