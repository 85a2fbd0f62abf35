use std::fmt;
use std::str::FromStr;

use crate::error::FretboardError;
use crate::pitch::{Letter, Note};

/// Semitone size of each simple interval number, unison first.
const SIMPLE_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    DoublyDiminished,
    Diminished,
    Minor,
    Perfect,
    Major,
    Augmented,
    DoublyAugmented,
}

impl Quality {
    fn symbol(self) -> &'static str {
        match self {
            Quality::DoublyDiminished => "dd",
            Quality::Diminished => "d",
            Quality::Minor => "m",
            Quality::Perfect => "P",
            Quality::Major => "M",
            Quality::Augmented => "A",
            Quality::DoublyAugmented => "AA",
        }
    }

    fn from_symbol(s: &str) -> Option<Quality> {
        match s {
            "dd" => Some(Quality::DoublyDiminished),
            "d" => Some(Quality::Diminished),
            "m" => Some(Quality::Minor),
            "P" => Some(Quality::Perfect),
            "M" => Some(Quality::Major),
            "A" => Some(Quality::Augmented),
            "AA" => Some(Quality::DoublyAugmented),
            _ => None,
        }
    }

    /// Alteration in semitones relative to the perfect or major size.
    fn alteration(self, perfectable: bool) -> Option<i32> {
        match (self, perfectable) {
            (Quality::Perfect, true) => Some(0),
            (Quality::Augmented, _) => Some(1),
            (Quality::DoublyAugmented, _) => Some(2),
            (Quality::Diminished, true) => Some(-1),
            (Quality::DoublyDiminished, true) => Some(-2),
            (Quality::Major, false) => Some(0),
            (Quality::Minor, false) => Some(-1),
            (Quality::Diminished, false) => Some(-2),
            (Quality::DoublyDiminished, false) => Some(-3),
            _ => None,
        }
    }

    fn from_alteration(alteration: i32, perfectable: bool) -> Option<Quality> {
        match (alteration, perfectable) {
            (0, true) => Some(Quality::Perfect),
            (1, _) => Some(Quality::Augmented),
            (2, _) => Some(Quality::DoublyAugmented),
            (-1, true) => Some(Quality::Diminished),
            (-2, true) => Some(Quality::DoublyDiminished),
            (0, false) => Some(Quality::Major),
            (-1, false) => Some(Quality::Minor),
            (-2, false) => Some(Quality::Diminished),
            (-3, false) => Some(Quality::DoublyDiminished),
            _ => None,
        }
    }

    fn inverted(self) -> Quality {
        match self {
            Quality::DoublyDiminished => Quality::DoublyAugmented,
            Quality::Diminished => Quality::Augmented,
            Quality::Minor => Quality::Major,
            Quality::Perfect => Quality::Perfect,
            Quality::Major => Quality::Minor,
            Quality::Augmented => Quality::Diminished,
            Quality::DoublyAugmented => Quality::DoublyDiminished,
        }
    }
}

/// A tonal-style interval label such as `3M`, `5P`, `7d`, `13M` or `-7m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    /// Interval number, 1 = unison. Compound numbers (9, 11, 13) are allowed.
    pub number: u32,
    pub quality: Quality,
    pub descending: bool,
}

impl Interval {
    fn simple_index(number: u32) -> usize {
        ((number - 1) % 7) as usize
    }

    fn is_perfectable(number: u32) -> bool {
        matches!(Self::simple_index(number), 0 | 3 | 4)
    }

    /// Signed size in semitones.
    pub fn semitones(&self) -> i32 {
        let octaves = ((self.number - 1) / 7) as i32;
        let alteration = self
            .quality
            .alteration(Self::is_perfectable(self.number))
            .unwrap_or(0);
        let size = SIMPLE_SEMITONES[Self::simple_index(self.number)] + 12 * octaves + alteration;
        if self.descending {
            -size
        } else {
            size
        }
    }

    /// The same interval one octave higher (`3M` → `10M`).
    pub fn up_octave(&self) -> Interval {
        Interval {
            number: self.number + 7,
            ..*self
        }
    }

    /// Complement to the octave, pointing downwards (`2M` → `-7m`, `1P` → `-8P`).
    pub fn below_octave(&self) -> Interval {
        let simple = Self::simple_index(self.number) as u32 + 1;
        Interval {
            number: 9 - simple,
            quality: self.quality.inverted(),
            descending: true,
        }
    }

    /// Ascending simple interval from `from` up to `to`.
    pub fn between(from: &Note, to: &Note) -> Option<Interval> {
        let steps = (to.letter.step() as i32 - from.letter.step() as i32).rem_euclid(7);
        let from_semis = from.letter.semitones() + from.alteration;
        let to_semis = to.letter.semitones() + to.alteration;
        let semis = (to_semis - from_semis).rem_euclid(12);

        let mut alteration = semis - SIMPLE_SEMITONES[steps as usize];
        if alteration > 6 {
            alteration -= 12;
        } else if alteration < -6 {
            alteration += 12;
        }

        let number = steps as u32 + 1;
        let quality = Quality::from_alteration(alteration, Self::is_perfectable(number))?;
        Some(Interval {
            number,
            quality,
            descending: false,
        })
    }

    /// Spell the note this interval away from `note`, keeping letter names
    /// consistent (so `G#` + `5A` is `D##`, not `E`).
    pub fn transpose(&self, note: &Note) -> Note {
        let steps = (self.number as i32 - 1) * if self.descending { -1 } else { 1 };
        let letter = Letter::from_step(note.letter.step() as i32 + steps);
        let target = note.letter.semitones() + note.alteration + self.semitones();

        let mut alteration = (target - letter.semitones()).rem_euclid(12);
        if alteration > 6 {
            alteration -= 12;
        }
        Note::new(letter, alteration)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            f.write_str("-")?;
        }
        write!(f, "{}{}", self.number, self.quality.symbol())
    }
}

impl FromStr for Interval {
    type Err = FretboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FretboardError::InvalidInterval(s.to_string());
        let (descending, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let number: u32 = rest[..digits_end].parse().map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }

        let quality = Quality::from_symbol(&rest[digits_end..]).ok_or_else(invalid)?;
        quality
            .alteration(Self::is_perfectable(number))
            .ok_or_else(invalid)?;

        Ok(Interval {
            number,
            quality,
            descending,
        })
    }
}
