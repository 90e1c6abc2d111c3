// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use morning_glory::error::AppError;

mod common;
use common::body_json;

#[tokio::test]
async fn test_google_api_error_hides_provider_text() {
    let err = AppError::GoogleApi("Token exchange failed: HTTP 400: {\"error\":\"invalid_grant\"}".to_string());
    let response = err.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "oauth_provider_error");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_error_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED, "unauthorized"),
        (AppError::InvalidOAuthState, StatusCode::BAD_REQUEST, "invalid_oauth_state"),
        (
            AppError::BadRequest("missing code".to_string()),
            StatusCode::BAD_REQUEST,
            "bad_request",
        ),
        (
            AppError::NotFound("user".to_string()),
            StatusCode::NOT_FOUND,
            "not_found",
        ),
        (
            AppError::OAuthConfig("GOOGLE_CLIENT_ID"),
            StatusCode::INTERNAL_SERVER_ERROR,
            "oauth_misconfigured",
        ),
    ];

    for (err, status, code) in cases {
        let response = err.into_response();
        assert_eq!(response.status(), status);
        assert_eq!(body_json(response).await["error"], code);
    }
}

#[test]
fn test_is_unique_violation_no_match() {
    assert!(!AppError::BadRequest("dup".to_string()).is_unique_violation());
    assert!(!AppError::Database(sqlx::Error::RowNotFound).is_unique_violation());
}
