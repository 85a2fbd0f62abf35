use crate::dictionary::{self, ChordType, Chroma, CHORD_TYPES, SCALE_TYPES};
use crate::interval::Interval;
use crate::pitch::{Note, PitchClass};
use crate::types::{ChordData, ScaleData};

/// Options for a single detection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectOptions {
    /// Treat a missing perfect fifth as present for seventh-chord shapes.
    pub assume_perfect_fifth: bool,
}

/// Names the chords a set of pitch classes forms.
///
/// The first pitch is the bass. Results are detector-ordered chord names
/// such as `"CM"` or `"Em#5/C"`.
pub trait ChordDetector: Send + Sync {
    fn detect(&self, pitches: &[PitchClass], options: DetectOptions) -> Vec<String>;
}

/// Chord metadata lookups. Misses return [`ChordData::empty`].
pub trait ChordDictionary: Send + Sync {
    /// Look up a full chord name such as `"CM"`, `"Bbm7"` or `"CM/E"`.
    fn chord(&self, name: &str) -> ChordData;

    /// Look up a chord from its quality alias, root and optional bass.
    fn chord_from_parts(&self, quality: &str, root: &str, bass: Option<&str>) -> ChordData;
}

/// Scale lookups. Misses return [`ScaleData::empty`] or an empty list.
pub trait ScaleDictionary: Send + Sync {
    /// Look up `"<tonic> <scale name>"`, e.g. `"C major pentatonic"`.
    fn scale(&self, query: &str) -> ScaleData;

    /// Scale names that contain every tone of the named chord.
    fn scales_for_chord(&self, chord: &str) -> Vec<String>;
}

/// Everything the visualizer needs from a music theory backend.
pub trait MusicTheory: ChordDetector + ChordDictionary + ScaleDictionary {}

impl<T: ChordDetector + ChordDictionary + ScaleDictionary> MusicTheory for T {}

/// Built-in theory backend over the static chord and scale dictionaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct TonalTheory;

impl TonalTheory {
    fn chroma_of_pitches(pitches: &[PitchClass]) -> Chroma {
        pitches.iter().fold(0, |mask, pc| mask | 1 << pc.index())
    }

    fn build_chord(
        chord_type: &'static ChordType,
        alias: &str,
        tonic: Option<Note>,
        bass: Option<Note>,
    ) -> ChordData {
        let mut intervals: Vec<Interval> = chord_type
            .intervals
            .iter()
            .filter_map(|label| label.parse().ok())
            .collect();

        let mut over = None;
        if let (Some(tonic), Some(bass)) = (tonic, bass) {
            let bass_interval = Interval::between(&tonic, &bass);
            let degree = bass_interval.and_then(|ivl| {
                intervals
                    .iter()
                    .position(|i| i.number == ivl.number && i.quality == ivl.quality)
            });
            match degree {
                Some(degree) => {
                    // Inversion: chord tones below the bass move up an octave.
                    intervals.rotate_left(degree);
                    let len = intervals.len();
                    for ivl in intervals.iter_mut().skip(len - degree) {
                        *ivl = ivl.up_octave();
                    }
                    if degree > 0 {
                        over = Some(bass);
                    }
                }
                None => {
                    if bass.pitch_class() != tonic.pitch_class() {
                        if let Some(ivl) = bass_interval {
                            intervals.insert(0, ivl.below_octave());
                        }
                        over = Some(bass);
                    }
                }
            }
        }

        let notes = match tonic {
            Some(tonic) => intervals.iter().map(|i| i.transpose(&tonic).to_string()).collect(),
            None => Vec::new(),
        };

        let alias = if chord_type.aliases.contains(&alias) {
            alias
        } else {
            chord_type.symbol_alias()
        };
        let tonic_name = tonic.map(|t| t.to_string());
        let mut symbol = format!("{}{}", tonic_name.as_deref().unwrap_or(""), alias);
        let mut name = match &tonic_name {
            Some(t) => format!("{} {}", t, chord_type.name),
            None => chord_type.name.to_string(),
        };
        if let Some(bass) = over {
            symbol.push_str(&format!("/{}", bass));
            name.push_str(&format!(" over {}", bass));
        }

        ChordData {
            name,
            symbol,
            tonic: tonic_name,
            empty: false,
            aliases: chord_type.aliases.iter().map(|a| a.to_string()).collect(),
            intervals: intervals.iter().map(|i| i.to_string()).collect(),
            notes,
            quality: chord_type.quality(),
            chord_type: chord_type.name.to_string(),
        }
    }
}

/// Split a leading note name off a symbol: `"Bbm7"` → `("Bb", "m7")`.
/// Returns an empty tonic when the text does not start with a note letter.
fn split_tonic(text: &str) -> (&str, &str) {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, c)) if matches!(c, 'A'..='G') => {}
        _ => return ("", text),
    }
    let rest = &text[1..];
    let accidental = rest.chars().next();
    let run = match accidental {
        Some(acc @ ('#' | 'b')) => rest.chars().take_while(|c| *c == acc).count(),
        _ => 0,
    };
    text.split_at(1 + run)
}

fn parse_optional_note(text: &str) -> Result<Option<Note>, ()> {
    if text.is_empty() {
        Ok(None)
    } else {
        text.parse::<Note>().map(Some).map_err(|_| ())
    }
}

impl ChordDetector for TonalTheory {
    fn detect(&self, pitches: &[PitchClass], options: DetectOptions) -> Vec<String> {
        let Some(bass) = pitches.first() else {
            return Vec::new();
        };
        let set = Self::chroma_of_pitches(pitches);

        let mut found: Vec<(bool, String)> = Vec::new();
        for root in PitchClass::ALL {
            if set & (1 << root.index()) == 0 {
                continue;
            }
            let mode = dictionary::rotate(set, root.index());
            let mode_with_fifth = dictionary::with_perfect_fifth(mode);

            for chord_type in CHORD_TYPES {
                let target = if options.assume_perfect_fifth && chord_type.accepts_assumed_fifth() {
                    mode_with_fifth
                } else {
                    mode
                };
                if chord_type.chroma() != target {
                    continue;
                }
                let alias = chord_type.symbol_alias();
                if root == *bass {
                    found.push((false, format!("{}{}", root, alias)));
                } else {
                    found.push((true, format!("{}{}/{}", root, alias, bass)));
                }
            }
        }

        // Root-position names first; stable within each group.
        found.sort_by_key(|(inversion, _)| *inversion);
        found.into_iter().map(|(_, name)| name).collect()
    }
}

impl ChordDictionary for TonalTheory {
    fn chord(&self, name: &str) -> ChordData {
        let (tonic, rest) = split_tonic(name);

        // A trailing "/<note>" is a bass; anything else after a slash is part
        // of the type alias (e.g. "m/ma7").
        let (alias, bass) = match rest.split_once('/') {
            Some((alias, after)) if after.parse::<Note>().is_ok() => (alias, after),
            _ => (rest, ""),
        };

        self.chord_from_parts(alias, tonic, Some(bass).filter(|b| !b.is_empty()))
    }

    fn chord_from_parts(&self, quality: &str, root: &str, bass: Option<&str>) -> ChordData {
        let Some(chord_type) = dictionary::chord_type(quality) else {
            return ChordData::empty();
        };
        let Ok(tonic) = parse_optional_note(root) else {
            return ChordData::empty();
        };
        let Ok(bass) = parse_optional_note(bass.unwrap_or("")) else {
            return ChordData::empty();
        };
        Self::build_chord(chord_type, quality, tonic, bass)
    }
}

impl ScaleDictionary for TonalTheory {
    fn scale(&self, query: &str) -> ScaleData {
        let query = query.trim();
        let (first, rest) = query.split_once(' ').unwrap_or((query, ""));
        let (tonic, type_name) = match first.parse::<Note>() {
            Ok(note) => (Some(note), rest.trim()),
            Err(_) => (None, query),
        };

        let Some(scale_type) = dictionary::scale_type(type_name) else {
            return ScaleData::empty();
        };

        let intervals: Vec<Interval> = scale_type
            .intervals
            .iter()
            .filter_map(|label| label.parse().ok())
            .collect();
        let notes = match tonic {
            Some(tonic) => intervals.iter().map(|i| i.transpose(&tonic).to_string()).collect(),
            None => Vec::new(),
        };
        let tonic_name = tonic.map(|t| t.to_string());
        let name = match &tonic_name {
            Some(t) => format!("{} {}", t, scale_type.name),
            None => scale_type.name.to_string(),
        };

        ScaleData {
            name,
            tonic: tonic_name,
            empty: false,
            scale_type: scale_type.name.to_string(),
            aliases: scale_type.aliases.iter().map(|a| a.to_string()).collect(),
            intervals: intervals.iter().map(|i| i.to_string()).collect(),
            notes,
        }
    }

    fn scales_for_chord(&self, chord: &str) -> Vec<String> {
        let data = self.chord(chord);
        if data.empty {
            return Vec::new();
        }
        let Some(chord_type) = dictionary::chord_type(&data.chord_type) else {
            return Vec::new();
        };
        let chord_chroma = chord_type.chroma();

        SCALE_TYPES
            .iter()
            .filter(|scale| {
                let chroma = scale.chroma();
                chroma & chord_chroma == chord_chroma && chroma != chord_chroma
            })
            .map(|scale| scale.name.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChordQuality;
    use pretty_assertions::assert_eq;
    use PitchClass::*;

    fn detect(pitches: &[PitchClass]) -> Vec<String> {
        TonalTheory.detect(pitches, DetectOptions::default())
    }

    #[test]
    fn detects_major_triad_and_inversion() {
        assert_eq!(detect(&[C, E, G]), vec!["CM", "Em#5/C"]);
    }

    #[test]
    fn inversions_rank_after_root_position() {
        // E in the bass: C major is an inversion, E minor augmented is not.
        assert_eq!(detect(&[E, G, C]), vec!["Em#5", "CM/E"]);
    }

    #[test]
    fn empty_and_single_pitch_detect_nothing() {
        assert!(detect(&[]).is_empty());
        assert!(detect(&[A]).is_empty());
    }

    #[test]
    fn open_strings_in_standard_tuning_name_no_chord() {
        assert!(detect(&[E, A, D, G, B, E]).is_empty());
        let relaxed = TonalTheory.detect(
            &[E, A, D, G, B, E],
            DetectOptions {
                assume_perfect_fifth: true,
            },
        );
        assert!(relaxed.is_empty());
    }

    #[test]
    fn assumed_fifth_completes_seventh_shapes() {
        assert!(detect(&[C, E, As]).is_empty());
        let relaxed = TonalTheory.detect(
            &[C, E, As],
            DetectOptions {
                assume_perfect_fifth: true,
            },
        );
        assert_eq!(relaxed.first().map(String::as_str), Some("C7"));
    }

    #[test]
    fn chord_by_name() {
        let chord = TonalTheory.chord("CM");
        assert!(!chord.empty);
        assert_eq!(chord.name, "C major");
        assert_eq!(chord.symbol, "CM");
        assert_eq!(chord.tonic.as_deref(), Some("C"));
        assert_eq!(chord.notes, vec!["C", "E", "G"]);
        assert_eq!(chord.intervals, vec!["1P", "3M", "5P"]);
        assert_eq!(chord.quality, ChordQuality::Major);
    }

    #[test]
    fn chord_spelling_uses_letters() {
        let chord = TonalTheory.chord("G#m#5");
        assert_eq!(chord.notes, vec!["G#", "B", "D##"]);
        assert_eq!(chord.quality, ChordQuality::Augmented);

        let chord = TonalTheory.chord("Bbm7");
        assert_eq!(chord.notes, vec!["Bb", "Db", "F", "Ab"]);
    }

    #[test]
    fn unknown_chord_is_empty() {
        assert!(TonalTheory.chord("Cxyz").empty);
        assert!(TonalTheory.chord_from_parts("M", "H", None).empty);
        assert!(TonalTheory.chord_from_parts("M", "C", Some("Q")).empty);
    }

    #[test]
    fn slash_alias_is_part_of_type() {
        let chord = TonalTheory.chord("Cm/ma7");
        assert!(!chord.empty);
        assert_eq!(chord.chord_type, "minor/major seventh");
        assert_eq!(chord.notes, vec!["C", "Eb", "G", "B"]);
    }

    #[test]
    fn bass_that_is_a_chord_tone_inverts() {
        let chord = TonalTheory.chord_from_parts("M", "C", Some("E"));
        assert_eq!(chord.intervals, vec!["3M", "5P", "8P"]);
        assert_eq!(chord.notes, vec!["E", "G", "C"]);
        assert_eq!(chord.symbol, "CM/E");
        assert_eq!(chord.name, "C major over E");
    }

    #[test]
    fn foreign_bass_is_prepended_below() {
        let chord = TonalTheory.chord_from_parts("m#5", "E", Some("C"));
        assert_eq!(chord.intervals, vec!["-3M", "1P", "3m", "5A"]);
        assert_eq!(chord.notes, vec!["C", "E", "G", "B#"]);
        assert_eq!(chord.symbol, "Em#5/C");
    }

    #[test]
    fn scale_lookup() {
        let scale = TonalTheory.scale("C major pentatonic");
        assert!(!scale.empty);
        assert_eq!(scale.notes, vec!["C", "D", "E", "G", "A"]);
        assert_eq!(scale.name, "C major pentatonic");

        let aeolian = TonalTheory.scale("A minor");
        assert_eq!(aeolian.notes, vec!["A", "B", "C", "D", "E", "F", "G"]);

        assert!(TonalTheory.scale("C klingon").empty);
    }

    #[test]
    fn scales_for_major_triad() {
        let scales = TonalTheory.scales_for_chord("CM");
        assert!(scales.contains(&"major pentatonic".to_string()));
        assert!(scales.contains(&"major".to_string()));
        assert!(scales.contains(&"mixolydian".to_string()));
        assert!(!scales.contains(&"aeolian".to_string()));
        assert_eq!(scales.first().map(String::as_str), Some("major pentatonic"));
    }

    #[test]
    fn scales_for_unknown_chord_is_empty() {
        assert!(TonalTheory.scales_for_chord("Cxyz").is_empty());
    }
}
