use serde::{Deserialize, Serialize};

/// Broad chord quality, derived from the intervals a chord type contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    Major,
    Minor,
    Augmented,
    Diminished,
    #[default]
    Unknown,
}

impl std::fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChordQuality::Major => write!(f, "Major"),
            ChordQuality::Minor => write!(f, "Minor"),
            ChordQuality::Augmented => write!(f, "Augmented"),
            ChordQuality::Diminished => write!(f, "Diminished"),
            ChordQuality::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Chord metadata as returned by a chord lookup.
///
/// `notes` and `intervals` are positionally aligned. A lookup miss is
/// reported with `empty = true` and every list empty, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChordData {
    /// Long name, e.g. "C major" or "C major over E".
    pub name: String,
    /// Short symbol, e.g. "CM" or "CM/E".
    pub symbol: String,
    pub tonic: Option<String>,
    pub empty: bool,
    pub aliases: Vec<String>,
    /// Tonal-style interval labels ("1P", "3M", "-7m", ...).
    pub intervals: Vec<String>,
    /// Spelled notes, possibly with flats or double accidentals.
    pub notes: Vec<String>,
    pub quality: ChordQuality,
    /// Full chord type name, e.g. "major seventh".
    pub chord_type: String,
}

impl ChordData {
    pub fn empty() -> Self {
        Self {
            empty: true,
            ..Default::default()
        }
    }
}

/// Scale metadata as returned by a scale lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScaleData {
    pub name: String,
    pub tonic: Option<String>,
    pub empty: bool,
    pub scale_type: String,
    pub aliases: Vec<String>,
    pub intervals: Vec<String>,
    pub notes: Vec<String>,
}

impl ScaleData {
    pub fn empty() -> Self {
        Self {
            empty: true,
            ..Default::default()
        }
    }
}

/// One detector result paired with its looked-up metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedChord {
    /// Raw detector text, e.g. "CM" or "Em#5/C".
    pub chord: String,
    pub data: ChordData,
}

impl DetectedChord {
    /// Notes paired with their intervals, in lookup order.
    pub fn intervals_by_note(&self) -> Vec<(&str, &str)> {
        self.data
            .notes
            .iter()
            .zip(self.data.intervals.iter())
            .map(|(n, i)| (n.as_str(), i.as_str()))
            .collect()
    }

    /// Detector text before the first slash ("Em#5/C" → "Em#5").
    pub fn pre_slash(&self) -> &str {
        self.chord.split('/').next().unwrap_or(&self.chord)
    }
}

/// Detected chords for the current selection, indexed in detector order.
///
/// Replaced wholesale whenever the selection changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectedChords {
    chords: Vec<DetectedChord>,
}

impl DetectedChords {
    pub fn new(chords: Vec<DetectedChord>) -> Self {
        Self { chords }
    }

    pub fn get(&self, index: usize) -> Option<&DetectedChord> {
        self.chords.get(index)
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DetectedChord> {
        self.chords.iter()
    }

    /// Detector names in index order.
    pub fn names(&self) -> Vec<&str> {
        self.chords.iter().map(|c| c.chord.as_str()).collect()
    }
}

impl FromIterator<DetectedChord> for DetectedChords {
    fn from_iter<I: IntoIterator<Item = DetectedChord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
