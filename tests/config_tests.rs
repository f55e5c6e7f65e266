// Host-side tests for reading instrument settings from data-* attributes.

use etudio_core::*;
use std::collections::HashMap;
use std::time::Duration;

fn from_pairs(pairs: &[(&str, &str)]) -> Result<InstrumentConfig> {
    let attrs: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    InstrumentConfig::from_attributes(|key| attrs.get(key).cloned())
}

#[test]
fn no_attributes_gives_defaults() {
    let config = from_pairs(&[]).unwrap();
    assert_eq!(config, InstrumentConfig::default());
    assert_eq!(config.press_visible, Duration::from_millis(200));
    assert_eq!(config.particle_count, 30);
    assert_eq!(config.transpose, TranspositionPolicy::None);
}

#[test]
fn attributes_override_defaults() {
    let config = from_pairs(&[
        ("low", "C4"),
        ("high", "C5"),
        ("transpose", "octave-up"),
        ("press-ms", "800"),
        ("duration", "4n."),
        ("tempo", "90"),
        ("attack", "0.02"),
        ("release", "1.5"),
        ("gain", "0.7"),
        ("particles", "0"),
        ("sample-base", "https://cdn.example/piano/"),
    ])
    .unwrap();
    assert_eq!(config.low.to_string(), "C4");
    assert_eq!(config.high.to_string(), "C5");
    assert_eq!(config.transpose, TranspositionPolicy::OctaveUp);
    assert_eq!(config.press_visible, Duration::from_millis(800));
    assert_eq!(config.duration_token, "4n.");
    assert_eq!(config.tempo_bpm, 90.0);
    assert_eq!(
        config.envelope,
        Envelope {
            attack: 0.02,
            release: 1.5,
            gain: 0.7
        }
    );
    assert_eq!(config.particle_count, 0);
    assert_eq!(config.sample_base_url, "https://cdn.example/piano/");
}

#[test]
fn malformed_values_name_the_attribute() {
    assert_eq!(
        from_pairs(&[("press-ms", "soon")]),
        Err(InstrumentError::InvalidConfig {
            key: "press-ms".into(),
            value: "soon".into()
        })
    );
    assert!(matches!(
        from_pairs(&[("low", "Q9")]),
        Err(InstrumentError::InvalidNote(_))
    ));
    assert!(matches!(
        from_pairs(&[("duration", "5n")]),
        Err(InstrumentError::InvalidDuration(_))
    ));
}

#[test]
fn out_of_range_values_are_rejected() {
    assert!(matches!(
        from_pairs(&[("low", "C6"), ("high", "C5")]),
        Err(InstrumentError::EmptyRange { .. })
    ));
    assert!(from_pairs(&[("tempo", "1000")]).is_err());
    assert!(from_pairs(&[("particles", "100000")]).is_err());
    assert!(matches!(
        from_pairs(&[("gain", "-1")]),
        Err(InstrumentError::InvalidEnvelope(_))
    ));
}

#[test]
fn config_keys_are_all_recognised() {
    assert_eq!(CONFIG_KEYS.len(), 11);
    for key in CONFIG_KEYS {
        // a malformed value fails on its own key; none are silently skipped
        let result = from_pairs(&[(key, "garbage!")]);
        if key == "sample-base" {
            assert!(result.is_ok());
        } else {
            assert!(result.is_err(), "{key} accepted garbage");
        }
    }
}
