// Host-side tests for note identifiers, durations and transposition.

use etudio_core::*;

fn n(s: &str) -> NoteId {
    s.parse().unwrap()
}

#[test]
fn parses_and_displays_sharp_spelling() {
    assert_eq!(n("C4").to_string(), "C4");
    assert_eq!(n("F#4").to_string(), "F#4");
    assert_eq!(n("A#5").pitch(), PitchClass::ASharp);
    assert_eq!(n("C-1").octave(), -1);
}

#[test]
fn flats_normalise_to_sharps() {
    assert_eq!(n("Db4"), n("C#4"));
    assert_eq!(n("Bb3"), n("A#3"));
    // crossing the octave boundary
    assert_eq!(n("Cb4"), n("B3"));
}

#[test]
fn rejects_malformed_identifiers() {
    for bad in ["", "H4", "C", "C#", "c4", "C10", "C+4", "C#x", "Cb-1"] {
        assert!(bad.parse::<NoteId>().is_err(), "{bad:?} should not parse");
    }
    assert_eq!(
        "X9".parse::<NoteId>(),
        Err(InstrumentError::InvalidNote("X9".into()))
    );
}

#[test]
fn midi_numbers_follow_c4_is_60() {
    assert_eq!(n("C4").midi(), 60);
    assert_eq!(n("A4").midi(), 69);
    assert_eq!(n("C-1").midi(), 0);
    assert_eq!(NoteId::from_midi(61), Some(n("C#4")));
    assert_eq!(NoteId::from_midi(-1), None);
}

#[test]
fn ordering_follows_pitch_height() {
    assert!(n("B3") < n("C4"));
    assert!(n("C4") < n("C#4"));
    assert!(n("A#6") < n("B6"));
}

#[test]
fn file_stem_spells_sharps_with_s() {
    assert_eq!(n("F#4").file_stem(), "Fs4");
    assert_eq!(n("C3").file_stem(), "C3");
    assert!(n("G#5").is_black());
    assert!(!n("E5").is_black());
}

#[test]
fn octave_up_transposes_and_inverts() {
    let p = TranspositionPolicy::OctaveUp;
    assert_eq!(p.apply(n("C3")), Some(n("C4")));
    assert_eq!(p.invert(n("C4")), Some(n("C3")));
    assert_eq!(p.apply(n("C9")), None);
    assert_eq!(TranspositionPolicy::None.apply(n("E5")), Some(n("E5")));
    assert_eq!(TranspositionPolicy::default(), TranspositionPolicy::None);
}

#[test]
fn transposition_policy_parses_config_values() {
    let parse = |s: &str| s.parse::<TranspositionPolicy>();
    assert_eq!(parse("octave-up"), Ok(TranspositionPolicy::OctaveUp));
    assert_eq!(parse("+12"), Ok(TranspositionPolicy::OctaveUp));
    assert_eq!(parse(" None "), Ok(TranspositionPolicy::None));
    assert!("fifth".parse::<TranspositionPolicy>().is_err());
}

#[test]
fn duration_tokens_at_120_bpm() {
    let secs = |t: &str| t.parse::<NoteDuration>().unwrap().to_seconds(120.0);
    assert!((secs("8n") - 0.25).abs() < 1e-9);
    assert!((secs("4n") - 0.5).abs() < 1e-9);
    assert!((secs("4n.") - 0.75).abs() < 1e-9);
    assert!((secs("4t") - 1.0 / 3.0).abs() < 1e-9);
    assert!((secs("1m") - 2.0).abs() < 1e-9);
    assert!((secs("0.3") - 0.3).abs() < 1e-9);
}

#[test]
fn duration_display_matches_token() {
    for token in ["8n", "16n.", "4t", "2m"] {
        assert_eq!(token.parse::<NoteDuration>().unwrap().to_string(), token);
    }
}

#[test]
fn rejects_bad_duration_tokens() {
    for bad in ["", "3n", "0n", "128n", "0m", "-1", "abc", "0"] {
        assert!(bad.parse::<NoteDuration>().is_err(), "{bad:?} should not parse");
    }
}
