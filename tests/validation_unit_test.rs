//! Unit tests for payload validation and derived sensor activity.
//!
//! Run with: cargo test --test validation_unit_test

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use meteo_db::entity::sensors;
use meteo_db::error::AppError;
use meteo_db::routes::archives::{CreateArchivePayload, UpdateArchivePayload};
use meteo_db::routes::entities::{CreateEntityPayload, UpdateEntityPayload};
use meteo_db::routes::sites::CreateSitePayload;
use uuid::Uuid;

fn entity_payload() -> CreateEntityPayload {
    CreateEntityPayload {
        name: "Météo Réunion".to_string(),
        description: "Association de passionnés".to_string(),
        entity_type: "OR".to_string(),
        email: "contact@meteor.example".to_string(),
        phone: "+262262000000".to_string(),
        address: "Saint-Denis".to_string(),
        operator: "admin".to_string(),
    }
}

fn site_payload() -> CreateSitePayload {
    CreateSitePayload {
        owner_id: Uuid::new_v4(),
        code: "S1".to_string(),
        description: "Plaine des Cafres".to_string(),
        address: "RN3".to_string(),
        postal_code: 97418,
        town: "Le Tampon".to_string(),
        latitude: Decimal::new(-211_352_400, 7),
        longitude: Decimal::new(555_712_300, 7),
        altitude_m: 1600,
    }
}

fn archive_payload() -> CreateArchivePayload {
    CreateArchivePayload {
        station_id: Uuid::new_v4(),
        site_id: Uuid::new_v4(),
        date: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        interval_sec: 600,
        units: "ME".to_string(),
        temperature: Decimal::new(2150, 2),
        temperature2: Decimal::new(2080, 2),
        humidity: 74,
        dewpoint: Decimal::new(1650, 2),
        windchill: Decimal::new(2150, 2),
        heatindex: Decimal::new(2250, 2),
        pressure: Decimal::new(10132, 1),
        wind_direction: Decimal::new(1350, 1),
        wind: Decimal::new(520, 2),
        wind_gust: Decimal::new(910, 2),
        wind_gust_dir: Decimal::new(14000, 2),
        wind_2min: Decimal::new(480, 2),
        wind_10min: Decimal::new(450, 2),
        rain: Decimal::new(120, 2),
        rain_rate: Decimal::new(240, 2),
        uv_radiation: Decimal::new(65, 1),
        solar_radiation: 820,
        et: Decimal::new(31, 2),
    }
}

fn assert_validation_error<T>(result: Result<T, AppError>) {
    match result {
        Err(AppError::Validation(_)) => {}
        Err(other) => panic!("expected Validation error, got {other:?}"),
        Ok(_) => panic!("expected Validation error, got Ok"),
    }
}

#[test]
fn valid_entity_payload_passes() {
    assert!(entity_payload().validate().is_ok());
}

#[test]
fn undeclared_entity_type_fails_validation() {
    let mut payload = entity_payload();
    payload.entity_type = "XX".to_string();
    assert_validation_error(payload.validate());
}

#[test]
fn malformed_email_fails_validation() {
    let mut payload = entity_payload();
    payload.email = "not-an-email".to_string();
    assert_validation_error(payload.validate());

    let mut payload = entity_payload();
    payload.email = "spaced @example.com".to_string();
    assert_validation_error(payload.validate());
}

#[test]
fn empty_entity_name_fails_validation() {
    let mut payload = entity_payload();
    payload.name = String::new();
    assert_validation_error(payload.validate());
}

#[test]
fn partial_entity_update_only_checks_provided_fields() {
    let payload = UpdateEntityPayload {
        description: Some("updated".to_string()),
        ..Default::default()
    };
    assert!(payload.validate().is_ok());

    let payload = UpdateEntityPayload {
        entity_type: Some("XX".to_string()),
        ..Default::default()
    };
    assert_validation_error(payload.validate());
}

#[test]
fn valid_site_payload_passes() {
    assert!(site_payload().validate().is_ok());
}

#[test]
fn overlong_site_code_fails_validation() {
    let mut payload = site_payload();
    payload.code = "ABCDEFGHIJK".to_string(); // 11 chars
    assert_validation_error(payload.validate());
}

#[test]
fn out_of_range_coordinates_fail_validation() {
    let mut payload = site_payload();
    payload.latitude = Decimal::from(91);
    assert_validation_error(payload.validate());

    let mut payload = site_payload();
    payload.longitude = Decimal::from(-181);
    assert_validation_error(payload.validate());
}

#[test]
fn negative_postal_code_fails_validation() {
    let mut payload = site_payload();
    payload.postal_code = -1;
    assert_validation_error(payload.validate());
}

#[test]
fn valid_archive_payload_passes() {
    assert!(archive_payload().validate().is_ok());
}

#[test]
fn undeclared_units_code_fails_validation() {
    let mut payload = archive_payload();
    payload.units = "SI".to_string();
    assert_validation_error(payload.validate());
}

#[test]
fn non_positive_interval_fails_validation() {
    let mut payload = archive_payload();
    payload.interval_sec = 0;
    assert_validation_error(payload.validate());

    let mut payload = archive_payload();
    payload.interval_sec = -600;
    assert_validation_error(payload.validate());
}

#[test]
fn negative_humidity_fails_validation() {
    let mut payload = archive_payload();
    payload.humidity = -1;
    assert_validation_error(payload.validate());
}

#[test]
fn partial_archive_update_only_checks_provided_fields() {
    let payload = UpdateArchivePayload {
        temperature: Some(Decimal::new(1900, 2)),
        ..Default::default()
    };
    assert!(payload.validate().is_ok());

    let payload = UpdateArchivePayload {
        units: Some("SI".to_string()),
        ..Default::default()
    };
    assert_validation_error(payload.validate());
}

fn sensor_with_end(offset: Duration) -> sensors::Model {
    let now = Utc::now();
    sensors::Model {
        id: Uuid::new_v4(),
        station_id: Uuid::new_v4(),
        instrument_model_id: Uuid::new_v4(),
        description: "thermomètre abri".to_string(),
        date_start: (now - Duration::days(30)).into(),
        date_end: (now + offset).into(),
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn sensor_active_while_window_open() {
    let sensor = sensor_with_end(Duration::days(1));
    assert!(sensor.is_active_at(Utc::now()));
}

#[test]
fn sensor_inactive_after_window_closed() {
    let sensor = sensor_with_end(-Duration::days(1));
    assert!(!sensor.is_active_at(Utc::now()));
}

#[test]
fn sensor_inactive_at_exact_end_instant() {
    let end = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    let sensor = sensors::Model {
        id: Uuid::new_v4(),
        station_id: Uuid::new_v4(),
        instrument_model_id: Uuid::new_v4(),
        description: "pluviomètre".to_string(),
        date_start: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap().into(),
        date_end: end.into(),
        created_at: None,
        updated_at: None,
    };

    // Strictly-after comparison: the boundary instant is already inactive
    assert!(!sensor.is_active_at(end));
    assert!(sensor.is_active_at(end - Duration::seconds(1)));
}
