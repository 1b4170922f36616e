//! Composed display labels for registry records.
//!
//! Simple records label themselves (an entity, network, or brand by `name`,
//! a site by `code`); the catalog and deployment records compose a label
//! from their related records. Handlers pass in the already-resolved names
//! so these stay pure string builders.

use chrono::{DateTime, Utc};

/// `"{brand} {name}"`, e.g. `"Acme ModelX"`.
#[must_use]
pub fn instrument_model(brand: &str, name: &str) -> String {
    format!("{brand} {name}")
}

/// `"{brand} {name} ({station type})"`, e.g. `"Acme ModelX (Lecture directe)"`.
#[must_use]
pub fn station_model(brand: &str, name: &str, station_type_label: &str) -> String {
    format!("{brand} {name} ({station_type_label})")
}

/// `"[{network} - {site code}] {name} ({station model})"`,
/// e.g. `"[N1 - S1] StationA (Acme ModelX (Lecture directe))"`.
#[must_use]
pub fn station(network: &str, site_code: &str, name: &str, station_model_label: &str) -> String {
    format!("[{network} - {site_code}] {name} ({station_model_label})")
}

/// `"[{network} - {site code}] {description} ({station name})"`.
#[must_use]
pub fn sensor(network: &str, site_code: &str, description: &str, station_name: &str) -> String {
    format!("[{network} - {site_code}] {description} ({station_name})")
}

/// `"[{site code}] {date}"` with the observation date in RFC 3339.
#[must_use]
pub fn archive(site_code: &str, date: DateTime<Utc>) -> String {
    format!("[{site_code}] {}", date.to_rfc3339())
}
