//! Unit tests for the closed code sets.
//!
//! Run with: cargo test --test codes_unit_test

use meteo_db::entity::codes::{EntityType, ReadingType, SensorType, StationType, Units};

#[test]
fn entity_type_codes_round_trip() {
    for kind in EntityType::ALL {
        assert_eq!(EntityType::parse(kind.code()), Some(kind));
    }
    assert_eq!(EntityType::parse("IN"), Some(EntityType::Institutional));
    assert_eq!(EntityType::parse("PR"), Some(EntityType::Private));
}

#[test]
fn undeclared_entity_type_rejected() {
    assert_eq!(EntityType::parse("XX"), None);
    assert_eq!(EntityType::parse(""), None);
    // Codes are case-sensitive, stored uppercase
    assert_eq!(EntityType::parse("in"), None);
}

#[test]
fn entity_type_labels() {
    assert_eq!(EntityType::Institutional.label(), "Institutionnel");
    assert_eq!(EntityType::Organization.label(), "Association");
    assert_eq!(EntityType::Company.label(), "Société");
    assert_eq!(EntityType::Private.label(), "Privé");
}

#[test]
fn reading_type_codes_round_trip() {
    for kind in ReadingType::ALL {
        assert_eq!(ReadingType::parse(kind.code()), Some(kind));
    }
    assert_eq!(ReadingType::parse("MAN"), Some(ReadingType::Manual));
    assert_eq!(ReadingType::parse("AUT"), Some(ReadingType::Automatic));
    assert_eq!(ReadingType::parse("SEMI"), None);
}

#[test]
fn sensor_type_covers_seven_kinds() {
    assert_eq!(SensorType::ALL.len(), 7);
    for kind in SensorType::ALL {
        assert_eq!(SensorType::parse(kind.code()), Some(kind));
        assert!(!kind.label().is_empty());
    }
    assert_eq!(SensorType::parse("ANM"), Some(SensorType::Anemometer));
    assert_eq!(SensorType::parse("PLG"), Some(SensorType::RainGauge));
    assert_eq!(SensorType::parse("ZZZ"), None);
}

#[test]
fn station_type_codes_round_trip() {
    for kind in StationType::ALL {
        assert_eq!(StationType::parse(kind.code()), Some(kind));
    }
    assert_eq!(StationType::DirectReading.label(), "Lecture directe");
    assert_eq!(StationType::parse("XY"), None);
}

#[test]
fn units_codes_round_trip() {
    for kind in Units::ALL {
        assert_eq!(Units::parse(kind.code()), Some(kind));
    }
    assert_eq!(Units::parse("ME"), Some(Units::Metric));
    assert_eq!(Units::parse("US"), Some(Units::Us));
    assert_eq!(Units::parse("SI"), None);
}
