//! End-to-end gesture scenarios against the built-in theory.

use fretboard::{
    FretHighlight, PitchClass, PreferenceKey, StringId, TuningSelection, Visualizer,
};
use pretty_assertions::assert_eq;
use PitchClass::*;

fn play(v: &mut Visualizer, notes: &[(StringId, PitchClass)]) {
    for (string, pitch) in notes {
        v.toggle_cell(*string, *pitch);
    }
}

fn c_major(v: &mut Visualizer) {
    play(
        v,
        &[
            (StringId::Fifth, C),
            (StringId::Fourth, E),
            (StringId::Third, G),
        ],
    );
}

#[test]
fn open_strings_detect_nothing() {
    let mut v = Visualizer::new();
    play(
        &mut v,
        &[
            (StringId::Sixth, E),
            (StringId::Fifth, A),
            (StringId::Fourth, D),
            (StringId::Third, G),
            (StringId::Second, B),
            (StringId::First, E),
        ],
    );

    assert_eq!(v.chordie().pitches(), vec![E, A, D, G, B, E]);
    assert!(v.chords().is_empty());
    assert_eq!(v.preferences().active_chord, None);
    assert!(v.scales().is_empty());
}

#[test]
fn single_note_detects_nothing() {
    let mut v = Visualizer::new();
    v.toggle_cell(StringId::Third, G);

    assert!(v.chords().is_empty());
    assert_eq!(v.preferences().active_chord, None);
    assert!(v
        .fretboard()
        .strings
        .iter()
        .flat_map(|s| &s.cells)
        .all(|c| c.interval.is_none() && c.relative_note.is_none()));
}

#[test]
fn c_major_annotates_every_string() {
    let mut v = Visualizer::new();
    c_major(&mut v);

    let chord = v.active_chord().expect("a chord is active");
    assert_eq!(chord.chord, "CM");
    assert_eq!(chord.data.notes, vec!["C", "E", "G"]);

    v.set_active_chord(0);
    for string in StringId::ALL {
        let board = v.fretboard();
        assert_eq!(board.cell(string, C).unwrap().interval.as_deref(), Some("1P"));
        assert_eq!(board.cell(string, E).unwrap().interval.as_deref(), Some("3M"));
        assert_eq!(board.cell(string, G).unwrap().interval.as_deref(), Some("5P"));
        assert_eq!(board.cell(string, A).unwrap().interval, None);
    }
}

#[test]
fn switching_to_inversion_respells_cells() {
    let mut v = Visualizer::new();
    c_major(&mut v);
    assert_eq!(v.chords().names(), vec!["CM", "Em#5/C"]);

    v.set_active_chord(1);
    let board = v.fretboard();
    // E minor augmented spells its fifth B#, which sits on the C cells.
    let c_cell = board.cell(StringId::Second, C).unwrap();
    assert_eq!(c_cell.relative_note.as_deref(), Some("B#"));
    assert_eq!(c_cell.interval.as_deref(), Some("5A"));
    assert_eq!(board.cell(StringId::Second, E).unwrap().interval.as_deref(), Some("1P"));
}

#[test]
fn removing_a_note_heals_the_selection() {
    let mut v = Visualizer::new();
    c_major(&mut v);
    v.set_active_chord(1);

    v.toggle_cell(StringId::Third, G);
    assert!(v.chords().is_empty());
    assert_eq!(v.preferences().active_chord, None);
    assert!(v.scales().is_empty());

    v.toggle_cell(StringId::Third, G);
    assert_eq!(v.preferences().active_chord, Some(0));
    assert_eq!(v.active_chord().unwrap().chord, "CM");
}

#[test]
fn scale_toggle_restores_previous_overlay() {
    let mut v = Visualizer::new();
    c_major(&mut v);
    v.toggle_preference(PreferenceKey::ShowChordTones);
    v.toggle_preference(PreferenceKey::HighlightPosition);

    let board_before = v.fretboard().clone();
    let frets_before = v.frets().to_vec();
    let prefs_before = v.preferences().clone();

    v.set_active_scale(0);
    assert_eq!(v.active_scale_name(), Some("major pentatonic"));
    let d_cell = v.fretboard().cell(StringId::First, D).unwrap();
    assert!(d_cell.chord_tone);
    assert_eq!(d_cell.interval.as_deref(), Some("2M"));

    v.set_active_scale(0);
    assert_eq!(v.active_scale_name(), None);
    assert_eq!(v.fretboard(), &board_before);
    assert_eq!(v.frets(), frets_before.as_slice());
    assert_eq!(v.preferences(), &prefs_before);
}

#[test]
fn chord_tone_toggle_replaces_scale_markers() {
    let mut v = Visualizer::new();
    c_major(&mut v);
    v.set_active_scale(0);
    assert!(v.fretboard().cell(StringId::First, D).unwrap().chord_tone);

    v.toggle_preference(PreferenceKey::ShowChordTones);
    assert!(v.preferences().show_chord_tones);
    let board = v.fretboard();
    assert!(!board.cell(StringId::First, D).unwrap().chord_tone);
    assert!(board.cell(StringId::First, C).unwrap().chord_tone);
    assert!(board.cell(StringId::First, G).unwrap().chord_tone);

    v.toggle_preference(PreferenceKey::ShowChordTones);
    assert!(v
        .fretboard()
        .strings
        .iter()
        .flat_map(|s| &s.cells)
        .all(|c| !c.chord_tone));
}

#[test]
fn selecting_a_chord_clears_the_scale() {
    let mut v = Visualizer::new();
    c_major(&mut v);
    v.set_active_scale(1);
    assert!(v.active_scale_name().is_some());

    v.set_active_chord(0);
    assert_eq!(v.preferences().active_scale, None);
    assert!(!v.fretboard().cell(StringId::First, D).unwrap().chord_tone);
}

#[test]
fn tuning_change_keeps_the_chord() {
    let mut v = Visualizer::new();
    c_major(&mut v);
    let names_before: Vec<String> = v.chords().names().iter().map(|s| s.to_string()).collect();
    let chordie_before = *v.chordie();

    v.set_guitar_tuning(TuningSelection::Named("Drop D Tuning".into()))
        .unwrap();

    assert_eq!(v.preferences().guitar_tuning, "Drop D Tuning");
    assert_eq!(v.chordie(), &chordie_before);
    assert_eq!(&v.fretboard().active_pitches(), v.chordie());
    assert_eq!(v.chords().names(), names_before);
    assert_eq!(v.active_chord().unwrap().chord, "CM");
}

#[test]
fn tuning_change_moves_low_string_selection() {
    let mut v = Visualizer::new();
    v.toggle_cell(StringId::Sixth, E);
    assert_eq!(v.fretboard().fret_of(StringId::Sixth, E), Some(0));

    v.set_guitar_tuning(TuningSelection::Named("Drop D Tuning".into()))
        .unwrap();
    let string = v.fretboard().string(StringId::Sixth);
    assert_eq!(string.fret_of(E), Some(2));
    assert!(string.cells[2].active);
}

#[test]
fn position_highlight_marks_root_frets() {
    let mut v = Visualizer::new();
    c_major(&mut v);
    assert!(v.frets().iter().all(|m| m.highlight.is_none()));

    v.toggle_preference(PreferenceKey::HighlightPosition);
    assert_eq!(v.frets()[3].highlight, Some(FretHighlight::Root));
    assert_eq!(v.frets()[2].highlight, Some(FretHighlight::Position));

    v.toggle_preference(PreferenceKey::HighlightPosition);
    assert!(v.frets().iter().all(|m| m.highlight.is_none()));
}

#[test]
fn reset_clears_everything_derived() {
    let mut v = Visualizer::new();
    c_major(&mut v);
    v.set_active_scale(0);

    v.reset();
    assert!(v.chordie().is_empty());
    assert!(v.chords().is_empty());
    assert!(v.scales().is_empty());
    assert_eq!(v.preferences().active_chord, None);
    assert_eq!(v.preferences().active_scale, None);
    assert!(v
        .fretboard()
        .strings
        .iter()
        .flat_map(|s| &s.cells)
        .all(|c| !c.active && !c.chord_tone && c.interval.is_none()));
}
