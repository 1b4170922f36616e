use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::common::AppState;
use crate::error::{AppError, AppResult};

/// Operator guard for the administrative routes.
///
/// Every `/api` request must carry `Authorization: Bearer <ADMIN_TOKEN>`.
/// Health and docs routes are mounted outside this layer.
pub async fn require_operator(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> AppResult<Response> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match header {
        Some(value) => {
            let token = value
                .strip_prefix("Bearer ")
                .ok_or_else(|| {
                    AppError::PermissionDenied(
                        "invalid authorization format, expected Bearer token".to_string(),
                    )
                })?;
            if check_token(token, &state.config.admin_token) {
                Ok(next.run(req).await)
            } else {
                tracing::warn!("Rejected request with invalid operator token");
                Err(AppError::PermissionDenied(
                    "invalid operator token".to_string(),
                ))
            }
        }
        None => Err(AppError::PermissionDenied(
            "missing Authorization header".to_string(),
        )),
    }
}

/// Constant-time-ish comparison: always scans the full candidate so a prefix
/// match is not distinguishable by early exit.
#[must_use]
pub fn check_token(candidate: &str, expected: &str) -> bool {
    if candidate.len() != expected.len() {
        return false;
    }
    candidate
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
