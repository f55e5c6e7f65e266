// Host-side end-to-end tests: input events through the instrument to the
// recording player and the highlight tracker.

mod common;

use common::{FakePlayer, PlayerLog};
use etudio_core::*;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn n(s: &str) -> NoteId {
    s.parse().unwrap()
}

fn key_down(key: &str) -> InputEvent<'_> {
    InputEvent::KeyDown {
        key,
        repeat: false,
        modified: false,
    }
}

fn mounted(config: InstrumentConfig) -> (Instrument<FakePlayer>, Rc<RefCell<PlayerLog>>) {
    let mut instrument = Instrument::new(config).unwrap();
    let (player, log) = FakePlayer::new();
    instrument.engine.install(player);
    (instrument, log)
}

#[test]
fn pressing_q_plays_and_lights_c3() {
    let (mut inst, log) = mounted(InstrumentConfig::default());
    let t0 = Instant::now();
    let press = inst.handle_input_at(key_down("q"), t0).unwrap();
    assert_eq!(press.note, n("C3"));
    assert!(press.sound.is_started());
    assert_eq!(press.visible_for, Duration::from_millis(200));

    let log = log.borrow();
    assert_eq!(log.started.len(), 1);
    assert_eq!(log.started[0].sample_ref, "C3.mp3");
    assert!((log.started[0].hold_sec - 0.25).abs() < 1e-9);

    assert!(inst.feedback.is_active_at(&n("C3"), t0 + Duration::from_millis(100)));
    assert!(!inst.feedback.is_active_at(&n("C3"), t0 + Duration::from_millis(200)));
}

#[test]
fn press_while_loading_still_highlights() {
    let mut inst: Instrument<FakePlayer> = Instrument::new(InstrumentConfig::default()).unwrap();
    let t0 = Instant::now();
    let press = inst
        .handle_input_at(InputEvent::PointerDown { note: "E4" }, t0)
        .unwrap();
    assert_eq!(press.sound, TriggerOutcome::NotReady);
    assert!(inst.feedback.is_active_at(&n("E4"), t0));
}

#[test]
fn octave_up_plays_the_next_octave_but_lights_the_pressed_key() {
    let config = InstrumentConfig {
        transpose: TranspositionPolicy::OctaveUp,
        ..InstrumentConfig::default()
    };
    let (mut inst, log) = mounted(config);
    let t0 = Instant::now();
    let press = inst.handle_input_at(key_down("q"), t0).unwrap();
    assert_eq!(
        press.sound,
        TriggerOutcome::Started {
            voice: 1,
            sounding: n("C4")
        }
    );
    assert_eq!(log.borrow().started[0].note, n("C4"));
    assert!(inst.feedback.is_active_at(&n("C3"), t0));
    assert!(!inst.feedback.is_active_at(&n("C4"), t0));
}

#[test]
fn keys_outside_the_range_do_nothing() {
    let config = InstrumentConfig {
        low: n("C4"),
        ..InstrumentConfig::default()
    };
    let (mut inst, log) = mounted(config);
    let t0 = Instant::now();
    assert!(inst.handle_input_at(key_down("q"), t0).is_none());
    assert!(!inst.feedback.is_active_at(&n("C3"), t0));
    assert!(inst
        .handle_input_at(InputEvent::PointerDown { note: "C1" }, t0)
        .is_none());
    assert!(!inst.feedback.is_active_at(&n("C1"), t0));
    assert!(log.borrow().started.is_empty());

    // keys inside the range still play
    let press = inst
        .handle_input_at(InputEvent::PointerDown { note: "C4" }, t0)
        .unwrap();
    assert!(press.sound.is_started());
}

#[test]
fn octave_up_past_the_top_lights_the_key_without_sound() {
    let config = InstrumentConfig {
        transpose: TranspositionPolicy::OctaveUp,
        ..InstrumentConfig::default()
    };
    let (mut inst, log) = mounted(config);
    let t0 = Instant::now();
    let press = inst
        .handle_input_at(InputEvent::PointerDown { note: "B6" }, t0)
        .unwrap();
    assert_eq!(press.sound, TriggerOutcome::MissingSample(n("B7")));
    assert!(inst.feedback.is_active_at(&n("B6"), t0));
    assert!(log.borrow().started.is_empty());
}

#[test]
fn repeated_key_down_plays_once() {
    let (mut inst, log) = mounted(InstrumentConfig::default());
    let t0 = Instant::now();
    assert!(inst.handle_input_at(key_down("z"), t0).is_some());
    assert!(inst
        .handle_input_at(
            InputEvent::KeyDown {
                key: "z",
                repeat: true,
                modified: false
            },
            t0
        )
        .is_none());
    inst.handle_input_at(InputEvent::KeyUp { key: "z" }, t0);
    assert!(inst.handle_input_at(key_down("z"), t0).is_some());
    assert_eq!(log.borrow().started.len(), 2);
}

#[test]
fn fast_re_press_keeps_the_key_lit() {
    let (mut inst, _log) = mounted(InstrumentConfig::default());
    let t0 = Instant::now();
    let first = inst
        .handle_input_at(InputEvent::PointerDown { note: "G4" }, t0)
        .unwrap();
    let second = inst
        .handle_input_at(
            InputEvent::PointerDown { note: "G4" },
            t0 + Duration::from_millis(150),
        )
        .unwrap();
    // first highlight timer fires
    assert!(!inst.feedback.expire(&n("G4"), first.generation));
    assert!(inst
        .feedback
        .is_active_at(&n("G4"), t0 + Duration::from_millis(200)));
    assert!(inst.feedback.expire(&n("G4"), second.generation));
}

#[test]
fn highlight_timer_also_clears_marks_whose_timer_never_fired() {
    let (mut inst, _log) = mounted(InstrumentConfig::default());
    let t0 = Instant::now();
    // C4's timer is lost
    inst.handle_input_at(InputEvent::PointerDown { note: "C4" }, t0);
    let e4 = inst
        .handle_input_at(InputEvent::PointerDown { note: "E4" }, t0)
        .unwrap();
    let g4 = inst
        .handle_input_at(
            InputEvent::PointerDown { note: "G4" },
            t0 + Duration::from_millis(100),
        )
        .unwrap();

    let at = t0 + Duration::from_millis(200);
    let released = inst.release_highlight_at(e4.note, e4.generation, at);
    assert_eq!(released.as_slice(), &[n("C4"), n("E4")]);
    assert!(inst.feedback.is_active_at(&n("G4"), at));

    // G4's timer fires a little early; its own mark is still released
    let early = t0 + Duration::from_millis(290);
    let released = inst.release_highlight_at(g4.note, g4.generation, early);
    assert_eq!(released.as_slice(), &[n("G4")]);
}

#[test]
fn sustained_highlight_window_from_config() {
    let config = InstrumentConfig {
        press_visible: Duration::from_millis(SUSTAINED_PRESS_VISIBLE_MS),
        ..InstrumentConfig::default()
    };
    let (mut inst, _log) = mounted(config);
    let t0 = Instant::now();
    inst.handle_input_at(key_down("w"), t0);
    assert!(inst
        .feedback
        .is_active_at(&n("D3"), t0 + Duration::from_millis(500)));
}

#[test]
fn unmount_disposes_and_silences() {
    let (mut inst, log) = mounted(InstrumentConfig::default());
    inst.engine.dispose();
    let press = inst.handle_input(key_down("q")).unwrap();
    assert_eq!(press.sound, TriggerOutcome::Disposed);
    assert_eq!(log.borrow().dispose_calls, 1);
    drop(inst);
    assert_eq!(log.borrow().dispose_calls, 1);
}

#[test]
fn dropping_the_instrument_releases_audio() {
    let (inst, log) = mounted(InstrumentConfig::default());
    drop(inst);
    assert_eq!(log.borrow().dispose_calls, 1);
}

#[test]
fn invalid_config_fails_to_mount() {
    let config = InstrumentConfig {
        duration_token: "7n".into(),
        ..InstrumentConfig::default()
    };
    assert!(Instrument::<FakePlayer>::new(config).is_err());
}
