//! Unit tests for the operator token check.
//!
//! Run with: cargo test --test auth_unit_test

use meteo_db::routes::check_token;

#[test]
fn matching_token_accepted() {
    assert!(check_token("sk-operator-1", "sk-operator-1"));
}

#[test]
fn wrong_token_rejected() {
    assert!(!check_token("sk-operator-2", "sk-operator-1"));
    assert!(!check_token("", "sk-operator-1"));
}

#[test]
fn prefix_of_token_rejected() {
    assert!(!check_token("sk-operator", "sk-operator-1"));
    assert!(!check_token("sk-operator-12", "sk-operator-1"));
}
