//! Unit tests for composed record labels.
//!
//! Run with: cargo test --test labels_unit_test

use chrono::{TimeZone, Utc};
use meteo_db::labels;

#[test]
fn instrument_model_label() {
    assert_eq!(labels::instrument_model("Acme", "ModelX"), "Acme ModelX");
}

#[test]
fn station_model_label() {
    assert_eq!(
        labels::station_model("Acme", "ModelX", "Lecture directe"),
        "Acme ModelX (Lecture directe)"
    );
}

#[test]
fn station_label_contains_all_components() {
    let model_label = labels::station_model("Acme", "ModelX", "Lecture directe");
    let label = labels::station("N1", "S1", "StationA", &model_label);

    assert_eq!(label, "[N1 - S1] StationA (Acme ModelX (Lecture directe))");
    for part in ["N1", "S1", "StationA", "Acme ModelX (Lecture directe)"] {
        assert!(label.contains(part), "label missing '{part}': {label}");
    }
}

#[test]
fn sensor_label_uses_description_and_station_name() {
    let label = labels::sensor("N1", "S1", "anémomètre mât 10m", "StationA");
    assert_eq!(label, "[N1 - S1] anémomètre mât 10m (StationA)");
}

#[test]
fn archive_label_is_site_code_and_date() {
    let date = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let label = labels::archive("S1", date);
    assert_eq!(label, "[S1] 2026-03-01T12:00:00+00:00");
}
