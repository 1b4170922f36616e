//! Unit tests for the RESTRICT delete policy.
//!
//! Every delete handler gathers live reference counts and passes them through
//! `check_unreferenced`; the policy decision itself is pure and tested here.
//!
//! Run with: cargo test --test referential_unit_test

use meteo_db::error::AppError;
use meteo_db::routes::check_unreferenced;

#[test]
fn unreferenced_record_may_be_deleted() {
    assert!(check_unreferenced("brand 'Acme'", &[]).is_ok());
    assert!(check_unreferenced(
        "brand 'Acme'",
        &[("instrument model(s)", 0), ("station model(s)", 0)]
    )
    .is_ok());
}

#[test]
fn referenced_brand_delete_is_rejected() {
    let result = check_unreferenced(
        "brand 'Acme'",
        &[("instrument model(s)", 3), ("station model(s)", 0)],
    );
    match result {
        Err(AppError::ReferentialIntegrity(msg)) => {
            assert!(msg.contains("brand 'Acme'"));
            assert!(msg.contains("3 instrument model(s)"));
        }
        other => panic!("expected ReferentialIntegrity error, got {other:?}"),
    }
}

#[test]
fn any_non_zero_count_rejects_the_delete() {
    assert!(check_unreferenced("site 'S1'", &[("station(s)", 0), ("archive(s)", 1)]).is_err());
    assert!(check_unreferenced("network 'N1'", &[("station(s)", 12)]).is_err());
}
