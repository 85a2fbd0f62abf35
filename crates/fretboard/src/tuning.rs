use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FretboardError, Result};
use crate::pitch::PitchClass;
use PitchClass::*;

/// A guitar string, numbered from the highest-pitched (1st) down to the
/// lowest-pitched (6th).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StringId {
    #[serde(rename = "6th")]
    Sixth,
    #[serde(rename = "5th")]
    Fifth,
    #[serde(rename = "4th")]
    Fourth,
    #[serde(rename = "3rd")]
    Third,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "1st")]
    First,
}

impl StringId {
    /// Low to high, the order pitches are collected for detection.
    pub const ALL: [StringId; 6] = [
        StringId::Sixth,
        StringId::Fifth,
        StringId::Fourth,
        StringId::Third,
        StringId::Second,
        StringId::First,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            StringId::Sixth => "6th",
            StringId::Fifth => "5th",
            StringId::Fourth => "4th",
            StringId::Third => "3rd",
            StringId::Second => "2nd",
            StringId::First => "1st",
        }
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StringId {
    type Err = FretboardError;

    fn from_str(s: &str) -> Result<Self> {
        StringId::ALL
            .into_iter()
            .find(|id| id.label() == s)
            .ok_or_else(|| FretboardError::UnknownString(s.to_string()))
    }
}

/// Open-string pitch for one string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunedString {
    pub string: StringId,
    pub note: PitchClass,
    pub octave: i8,
}

/// Octaves accepted for an open string.
pub const OCTAVE_RANGE: RangeInclusive<i8> = 0..=8;

pub const STANDARD_TUNING: &str = "Standard Tuning";
pub const CUSTOM_TUNING: &str = "Custom Tuning";

/// A named six-string tuning, ordered 6th string first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuning {
    pub name: String,
    pub strings: [TunedString; 6],
}

impl Tuning {
    fn from_table(name: &str, table: [(PitchClass, i8); 6]) -> Self {
        let strings = std::array::from_fn(|i| TunedString {
            string: StringId::ALL[i],
            note: table[i].0,
            octave: table[i].1,
        });
        Self {
            name: name.to_string(),
            strings,
        }
    }

    pub fn standard() -> Self {
        Self::from_table(STANDARD_TUNING, [(E, 2), (A, 2), (D, 3), (G, 3), (B, 3), (E, 4)])
    }

    /// The initial value of the user-editable custom slot.
    pub fn custom_default() -> Self {
        Self {
            name: CUSTOM_TUNING.to_string(),
            ..Self::standard()
        }
    }

    /// Every built-in tuning, standard first. The custom slot is not included.
    pub fn catalog() -> Vec<Tuning> {
        vec![
            Self::standard(),
            Self::from_table("Drop D Tuning", [(D, 2), (A, 2), (D, 3), (G, 3), (B, 3), (E, 4)]),
            Self::from_table("Half Step Down", [(Ds, 2), (Gs, 2), (Cs, 3), (Fs, 3), (As, 3), (Ds, 4)]),
            Self::from_table("Full Step Down", [(D, 2), (G, 2), (C, 3), (F, 3), (A, 3), (D, 4)]),
            Self::from_table("Drop C Tuning", [(C, 2), (G, 2), (C, 3), (F, 3), (A, 3), (D, 4)]),
            Self::from_table("Open G Tuning", [(D, 2), (G, 2), (D, 3), (G, 3), (B, 3), (D, 4)]),
            Self::from_table("Open D Tuning", [(D, 2), (A, 2), (D, 3), (Fs, 3), (A, 3), (D, 4)]),
            Self::from_table("Open E Tuning", [(E, 2), (B, 2), (E, 3), (Gs, 3), (B, 3), (E, 4)]),
            Self::from_table("DADGAD Tuning", [(D, 2), (A, 2), (D, 3), (G, 3), (A, 3), (D, 4)]),
        ]
    }

    /// Look up a built-in tuning by name.
    pub fn named(name: &str) -> Option<Tuning> {
        Self::catalog().into_iter().find(|t| t.name == name)
    }

    pub fn open_string(&self, string: StringId) -> &TunedString {
        &self.strings[string.index()]
    }

    /// Change the open pitch of one string.
    pub fn retune(&mut self, string: StringId, note: PitchClass, octave: i8) -> Result<()> {
        if !OCTAVE_RANGE.contains(&octave) {
            return Err(FretboardError::InvalidOctave(octave));
        }
        let entry = &mut self.strings[string.index()];
        entry.note = note;
        entry.octave = octave;
        Ok(())
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::standard()
    }
}
