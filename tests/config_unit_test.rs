//! Unit tests for configuration parsing.
//!
//! Run with: cargo test --test config_unit_test

use meteo_db::config::Deployment;

#[test]
fn deployment_parses_known_names() {
    assert!(matches!(Deployment::from_str("dev"), Deployment::Dev));
    assert!(matches!(
        Deployment::from_str("development"),
        Deployment::Dev
    ));
    assert!(matches!(Deployment::from_str("staging"), Deployment::Stage));
    assert!(matches!(Deployment::from_str("PROD"), Deployment::Prod));
}

#[test]
fn unknown_deployment_falls_back_to_local() {
    assert!(matches!(Deployment::from_str(""), Deployment::Local));
    assert!(matches!(
        Deployment::from_str("somewhere"),
        Deployment::Local
    ));
}
