// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth authentication routes.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::Redirect,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{
    expired_cookie, oauth_state_cookie, session_cookie, OAUTH_STATE_COOKIE,
};
use crate::models::AuthProvider;
use crate::services::google_oauth::{generate_state_token, state_matches};
use crate::services::{session, users};
use crate::AppState;

const CALLBACK_PATH: &str = "/auth/google/callback";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google", get(auth_start))
        .route(CALLBACK_PATH, get(auth_callback))
}

/// Start OAuth flow - redirect to the Google consent screen.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let client_id = state.config.google_client_id()?;
    let redirect_uri = callback_url(&state, &headers);
    let oauth_state = generate_state_token()?;

    let auth_url = state
        .google
        .authorization_url(client_id, &redirect_uri, &oauth_state);

    tracing::info!(redirect_uri = %redirect_uri, "Starting OAuth flow, redirecting to Google");

    let jar = jar.add(oauth_state_cookie(&oauth_state, state.config.production));
    Ok((jar, Redirect::temporary(&auth_url)))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for tokens, create user and session.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    if let Some(error) = params.error.as_deref() {
        tracing::warn!(error = %error, "OAuth error from Google");
    }

    let (Some(code), Some(returned_state)) = (
        params.code.as_deref().filter(|c| !c.is_empty()),
        params.state.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Missing code or state parameter".to_string(),
        ));
    };

    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value());
    if !state_matches(expected_state, returned_state) {
        tracing::warn!(
            cookie_present = expected_state.is_some(),
            "OAuth state mismatch"
        );
        return Err(AppError::InvalidOAuthState);
    }

    let credentials = state.config.google_credentials()?;
    let redirect_uri = callback_url(&state, &headers);

    tracing::info!("Exchanging authorization code for tokens");
    let tokens = state
        .google
        .exchange_code(&credentials, code, &redirect_uri)
        .await?;
    let profile = state.google.fetch_user_info(&tokens.access_token).await?;

    let now = Utc::now();
    let user = users::ensure_google_user(&state.db, &profile, now).await?;
    let session = session::create_session(
        &state.db,
        &user.id,
        AuthProvider::Google,
        tokens.refresh_token.as_deref(),
        now,
    )
    .await?;

    tracing::info!(user_id = %user.id, nickname = %user.nickname, "OAuth successful");

    let secure = state.config.production;
    let jar = jar
        .add(session_cookie(&session.id, secure))
        .add(expired_cookie(OAUTH_STATE_COOKIE, secure));

    Ok((jar, Redirect::to("/")))
}

/// The callback URL registered with Google.
///
/// Uses `GOOGLE_REDIRECT_URI` when set, otherwise the request's Host header.
fn callback_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(uri) = &state.config.google_redirect_uri {
        return uri.clone();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:8080");

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}{}", scheme, host, CALLBACK_PATH)
}
