use crate::interval::Interval;
use crate::types::ChordQuality;

/// Bitmask over 12 semitones: bit i set means the set contains the pitch
/// `i` semitones above the root.
pub type Chroma = u16;

/// Chroma bit for the perfect fifth.
pub const PERFECT_FIFTH: Chroma = 1 << 7;
const ANY_THIRD: Chroma = (1 << 3) | (1 << 4);
const ANY_SEVENTH: Chroma = (1 << 10) | (1 << 11);
const ALTERED_FIFTHS: Chroma = (1 << 6) | (1 << 8);

pub fn chroma_of<'a>(intervals: impl IntoIterator<Item = &'a str>) -> Chroma {
    intervals
        .into_iter()
        .filter_map(|label| label.parse::<Interval>().ok())
        .fold(0, |mask, ivl| mask | 1 << ivl.semitones().rem_euclid(12))
}

/// Rotate a chroma so that `root` semitones becomes bit 0.
pub fn rotate(chroma: Chroma, root: usize) -> Chroma {
    let root = root % 12;
    let mask = chroma & 0x0fff;
    ((mask >> root) | (mask << (12 - root))) & 0x0fff
}

/// A chord type: interval recipe plus the names it is known by.
///
/// The first alias is the one detection uses when naming chords.
pub struct ChordType {
    pub name: &'static str,
    pub intervals: &'static [&'static str],
    pub aliases: &'static [&'static str],
}

impl ChordType {
    pub fn chroma(&self) -> Chroma {
        chroma_of(self.intervals.iter().copied())
    }

    pub fn quality(&self) -> ChordQuality {
        let has = |label: &str| self.intervals.contains(&label);
        if has("5A") {
            ChordQuality::Augmented
        } else if has("3M") {
            ChordQuality::Major
        } else if has("5d") {
            ChordQuality::Diminished
        } else if has("3m") {
            ChordQuality::Minor
        } else {
            ChordQuality::Unknown
        }
    }

    /// Third, perfect fifth and a seventh: the shapes a missing fifth may be
    /// assumed for.
    pub fn accepts_assumed_fifth(&self) -> bool {
        let chroma = self.chroma();
        chroma & ANY_THIRD != 0 && chroma & PERFECT_FIFTH != 0 && chroma & ANY_SEVENTH != 0
    }

    pub fn symbol_alias(&self) -> &'static str {
        self.aliases.first().copied().unwrap_or("")
    }
}

/// Add a perfect fifth to a rotated pitch set unless it already carries an
/// altered fifth.
pub fn with_perfect_fifth(chroma: Chroma) -> Chroma {
    if chroma & ALTERED_FIFTHS != 0 {
        chroma
    } else {
        chroma | PERFECT_FIFTH
    }
}

/// Recognised chord types, in detection priority order.
///
/// Pentatonic-shaped types (6/9, 9sus4/11, m7add11) are left out so that the
/// six open strings of standard tuning do not name a chord.
pub static CHORD_TYPES: &[ChordType] = &[
    // Major
    ChordType { name: "major", intervals: &["1P", "3M", "5P"], aliases: &["M", "^", "", "maj"] },
    ChordType { name: "major seventh", intervals: &["1P", "3M", "5P", "7M"], aliases: &["maj7", "Δ", "ma7", "M7", "Maj7", "^7"] },
    ChordType { name: "major ninth", intervals: &["1P", "3M", "5P", "7M", "9M"], aliases: &["maj9", "Δ9", "^9"] },
    ChordType { name: "major thirteenth", intervals: &["1P", "3M", "5P", "7M", "9M", "13M"], aliases: &["maj13", "Maj13", "^13"] },
    ChordType { name: "sixth", intervals: &["1P", "3M", "5P", "6M"], aliases: &["6", "add6", "add13", "M6"] },
    ChordType { name: "lydian", intervals: &["1P", "3M", "5P", "7M", "11A"], aliases: &["maj#4", "Δ#4", "Δ#11", "M7#11", "^7#11", "maj7#11"] },
    ChordType { name: "added ninth", intervals: &["1P", "3M", "5P", "9M"], aliases: &["Madd9", "2", "add9", "add2"] },
    // Minor
    ChordType { name: "minor", intervals: &["1P", "3m", "5P"], aliases: &["m", "min", "-"] },
    ChordType { name: "minor seventh", intervals: &["1P", "3m", "5P", "7m"], aliases: &["m7", "-7", "mi7", "min7"] },
    ChordType { name: "minor/major seventh", intervals: &["1P", "3m", "5P", "7M"], aliases: &["m/ma7", "m/maj7", "mM7", "mMaj7", "m/M7", "-Δ7", "mΔ", "-^7"] },
    ChordType { name: "minor sixth", intervals: &["1P", "3m", "5P", "6M"], aliases: &["m6", "-6"] },
    ChordType { name: "minor ninth", intervals: &["1P", "3m", "5P", "7m", "9M"], aliases: &["m9", "-9"] },
    ChordType { name: "minor eleventh", intervals: &["1P", "3m", "5P", "7m", "9M", "11P"], aliases: &["m11", "-11"] },
    ChordType { name: "minor augmented", intervals: &["1P", "3m", "5A"], aliases: &["m#5", "-#5", "m+"] },
    ChordType { name: "minor added ninth", intervals: &["1P", "3m", "5P", "9M"], aliases: &["madd9", "m(add9)"] },
    // Dominant
    ChordType { name: "dominant seventh", intervals: &["1P", "3M", "5P", "7m"], aliases: &["7", "dom"] },
    ChordType { name: "dominant ninth", intervals: &["1P", "3M", "5P", "7m", "9M"], aliases: &["9"] },
    ChordType { name: "dominant thirteenth", intervals: &["1P", "3M", "5P", "7m", "9M", "13M"], aliases: &["13"] },
    ChordType { name: "dominant flat ninth", intervals: &["1P", "3M", "5P", "7m", "9m"], aliases: &["7b9"] },
    ChordType { name: "dominant sharp ninth", intervals: &["1P", "3M", "5P", "7m", "9A"], aliases: &["7#9"] },
    ChordType { name: "augmented seventh", intervals: &["1P", "3M", "5A", "7m"], aliases: &["7#5", "+7", "7+", "7aug", "aug7"] },
    ChordType { name: "dominant flat fifth", intervals: &["1P", "3M", "5d", "7m"], aliases: &["7b5"] },
    // Suspended
    ChordType { name: "suspended fourth", intervals: &["1P", "4P", "5P"], aliases: &["sus4", "sus"] },
    ChordType { name: "suspended second", intervals: &["1P", "2M", "5P"], aliases: &["sus2"] },
    ChordType { name: "suspended fourth seventh", intervals: &["1P", "4P", "5P", "7m"], aliases: &["7sus4", "7sus"] },
    ChordType { name: "fifth", intervals: &["1P", "5P"], aliases: &["5"] },
    // Symmetric / altered
    ChordType { name: "augmented", intervals: &["1P", "3M", "5A"], aliases: &["aug", "+", "+5", "^#5"] },
    ChordType { name: "augmented major seventh", intervals: &["1P", "3M", "5A", "7M"], aliases: &["maj7#5", "maj#5", "Δ#5", "M7#5", "^7#5"] },
    ChordType { name: "diminished", intervals: &["1P", "3m", "5d"], aliases: &["dim", "°", "o"] },
    ChordType { name: "diminished seventh", intervals: &["1P", "3m", "5d", "7d"], aliases: &["dim7", "°7", "o7"] },
    ChordType { name: "half-diminished", intervals: &["1P", "3m", "5d", "7m"], aliases: &["m7b5", "ø", "-7b5", "h7", "h"] },
];

/// Find a chord type by any alias or by full name.
pub fn chord_type(symbol: &str) -> Option<&'static ChordType> {
    CHORD_TYPES
        .iter()
        .find(|t| t.aliases.contains(&symbol))
        .or_else(|| CHORD_TYPES.iter().find(|t| t.name == symbol))
}

/// A scale type: interval recipe plus alternative names.
pub struct ScaleType {
    pub name: &'static str,
    pub intervals: &'static [&'static str],
    pub aliases: &'static [&'static str],
}

impl ScaleType {
    pub fn chroma(&self) -> Chroma {
        chroma_of(self.intervals.iter().copied())
    }
}

/// Recognised scale types, in suggestion order.
pub static SCALE_TYPES: &[ScaleType] = &[
    ScaleType { name: "major pentatonic", intervals: &["1P", "2M", "3M", "5P", "6M"], aliases: &["pentatonic"] },
    ScaleType { name: "minor pentatonic", intervals: &["1P", "3m", "4P", "5P", "7m"], aliases: &[] },
    ScaleType { name: "major blues", intervals: &["1P", "2M", "3m", "3M", "5P", "6M"], aliases: &[] },
    ScaleType { name: "minor blues", intervals: &["1P", "3m", "4P", "5d", "5P", "7m"], aliases: &["blues"] },
    ScaleType { name: "whole tone", intervals: &["1P", "2M", "3M", "4A", "5A", "7m"], aliases: &[] },
    ScaleType { name: "major", intervals: &["1P", "2M", "3M", "4P", "5P", "6M", "7M"], aliases: &["ionian"] },
    ScaleType { name: "dorian", intervals: &["1P", "2M", "3m", "4P", "5P", "6M", "7m"], aliases: &[] },
    ScaleType { name: "phrygian", intervals: &["1P", "2m", "3m", "4P", "5P", "6m", "7m"], aliases: &[] },
    ScaleType { name: "lydian", intervals: &["1P", "2M", "3M", "4A", "5P", "6M", "7M"], aliases: &[] },
    ScaleType { name: "mixolydian", intervals: &["1P", "2M", "3M", "4P", "5P", "6M", "7m"], aliases: &["dominant"] },
    ScaleType { name: "aeolian", intervals: &["1P", "2M", "3m", "4P", "5P", "6m", "7m"], aliases: &["minor"] },
    ScaleType { name: "locrian", intervals: &["1P", "2m", "3m", "4P", "5d", "6m", "7m"], aliases: &[] },
    ScaleType { name: "harmonic minor", intervals: &["1P", "2M", "3m", "4P", "5P", "6m", "7M"], aliases: &[] },
    ScaleType { name: "melodic minor", intervals: &["1P", "2M", "3m", "4P", "5P", "6M", "7M"], aliases: &[] },
    ScaleType { name: "lydian dominant", intervals: &["1P", "2M", "3M", "4A", "5P", "6M", "7m"], aliases: &["lydian b7"] },
    ScaleType { name: "phrygian dominant", intervals: &["1P", "2m", "3M", "4P", "5P", "6m", "7m"], aliases: &["spanish"] },
    ScaleType { name: "altered", intervals: &["1P", "2m", "3m", "3M", "5d", "6m", "7m"], aliases: &["super locrian"] },
    ScaleType { name: "bebop", intervals: &["1P", "2M", "3M", "4P", "5P", "6M", "7m", "7M"], aliases: &[] },
    ScaleType { name: "diminished", intervals: &["1P", "2M", "3m", "4P", "5d", "6m", "6M", "7M"], aliases: &["whole-half diminished"] },
    ScaleType { name: "half-whole diminished", intervals: &["1P", "2m", "3m", "3M", "4A", "5P", "6M", "7m"], aliases: &["dominant diminished"] },
    ScaleType { name: "chromatic", intervals: &["1P", "2m", "2M", "3m", "3M", "4P", "4A", "5P", "6m", "6M", "7m", "7M"], aliases: &[] },
];

/// Find a scale type by name or alias.
pub fn scale_type(name: &str) -> Option<&'static ScaleType> {
    SCALE_TYPES
        .iter()
        .find(|t| t.name == name)
        .or_else(|| SCALE_TYPES.iter().find(|t| t.aliases.contains(&name)))
}
