// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie authentication middleware.

use crate::error::AppError;
use crate::models::session::SESSION_TTL_DAYS;
use crate::services::session;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use std::sync::Arc;

/// Session ID cookie.
pub const SESSION_COOKIE: &str = "mg_session";
/// CSRF state for the Google redirect round trip.
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
/// One-shot flag set after a check-in, consumed by the home loader.
pub const CELEBRATE_COOKIE: &str = "mg_celebrate";

const OAUTH_STATE_MAX_AGE_MINUTES: i64 = 10;
const CELEBRATE_MAX_AGE_SECONDS: i64 = 60;

/// Authenticated user resolved from the session cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub session_id: String,
}

/// Middleware for pages that need a signed-in user.
///
/// Missing, unknown, expired and revoked sessions are redirected to the home
/// page instead of failing.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match current_session(&state, &jar).await? {
        Some(auth_user) => {
            request.extensions_mut().insert(auth_user);
            Ok(next.run(request).await)
        }
        None => Ok(Redirect::to("/").into_response()),
    }
}

/// Resolve the session cookie, if any, to a signed-in user.
pub async fn current_session(
    state: &AppState,
    jar: &CookieJar,
) -> Result<Option<AuthUser>, AppError> {
    let Some(session_id) = session_cookie_value(jar) else {
        return Ok(None);
    };

    let session = session::resolve_session(&state.db, session_id, Utc::now()).await?;
    Ok(session.map(|s| AuthUser {
        user_id: s.user_id,
        session_id: s.id,
    }))
}

/// Log out: clear the session cookie and, if configured, revoke the row.
pub async fn sign_out(state: &AppState, jar: CookieJar) -> Result<CookieJar, AppError> {
    if let Some(session_id) = session_cookie_value(&jar) {
        session::end_session(
            &state.db,
            session_id,
            state.config.revoke_session_on_logout,
            Utc::now(),
        )
        .await?;
    }

    Ok(jar.add(expired_cookie(SESSION_COOKIE, state.config.production)))
}

fn session_cookie_value(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
}

fn base_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// The `mg_session` cookie for a new session.
pub fn session_cookie(session_id: &str, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(SESSION_COOKIE, session_id.to_string(), secure);
    cookie.set_max_age(time::Duration::days(SESSION_TTL_DAYS));
    cookie
}

/// The short-lived `oauth_state` cookie.
pub fn oauth_state_cookie(state_token: &str, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(OAUTH_STATE_COOKIE, state_token.to_string(), secure);
    cookie.set_max_age(time::Duration::minutes(OAUTH_STATE_MAX_AGE_MINUTES));
    cookie
}

/// The one-shot celebrate flag.
pub fn celebrate_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(CELEBRATE_COOKIE, "1".to_string(), secure);
    cookie.set_max_age(time::Duration::seconds(CELEBRATE_MAX_AGE_SECONDS));
    cookie
}

/// A cookie that makes the browser drop `name` immediately.
pub fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(name, String::new(), secure);
    cookie.set_max_age(time::Duration::ZERO);
    cookie.set_expires(time::OffsetDateTime::UNIX_EPOCH);
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let rendered = session_cookie("abc", false).to_string();

        assert!(rendered.starts_with("mg_session=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=2592000"));
        assert!(!rendered.contains("Secure"));

        assert!(session_cookie("abc", true).to_string().contains("Secure"));
    }

    #[test]
    fn test_oauth_state_cookie_is_short_lived() {
        let rendered = oauth_state_cookie("deadbeef", false).to_string();

        assert!(rendered.starts_with("oauth_state=deadbeef"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Max-Age=600"));
    }

    #[test]
    fn test_expired_cookie() {
        let rendered = expired_cookie(SESSION_COOKIE, true).to_string();

        assert!(rendered.starts_with("mg_session=;"));
        assert!(rendered.contains("Max-Age=0"));
        assert!(rendered.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(rendered.contains("Secure"));
    }
}
