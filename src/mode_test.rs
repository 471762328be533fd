use std::collections::HashSet;

use super::*;

#[test]
fn default_mode_is_car() {
    assert_eq!(TransportMode::default(), TransportMode::Car);
}

#[test]
fn serde_uses_lowercase_names() {
    for mode in TransportMode::ALL {
        let json = serde_json::to_string(&mode).unwrap();
        assert_eq!(json, format!("\"{}\"", mode.as_str()));
    }
}

#[test]
fn deserialize_rejects_unknown_mode() {
    assert!(serde_json::from_str::<TransportMode>("\"train\"").is_err());
    assert!(serde_json::from_str::<TransportMode>("\"Car\"").is_err());
}

#[test]
fn from_str_matches_wire_names() {
    for mode in TransportMode::ALL {
        assert_eq!(mode.as_str().parse::<TransportMode>(), Ok(mode));
    }
    assert_eq!("scooter".parse::<TransportMode>(), Err(UnknownMode("scooter".into())));
}

#[test]
fn every_mode_has_a_distinct_color() {
    let colors = TransportMode::ALL
        .iter()
        .map(|m| m.color())
        .collect::<HashSet<_>>();
    assert_eq!(colors.len(), TransportMode::ALL.len());
    assert!(colors.iter().all(|c| c.starts_with('#') && c.len() == 7));
}

#[test]
fn display_matches_wire_name() {
    assert_eq!(TransportMode::Cycle.to_string(), "cycle");
    assert_eq!(TransportMode::Cycle.icon(), "bicycle");
    assert_eq!(TransportMode::Bus.label(), "Bus");
}
