// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-side session lifecycle.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

use crate::db::Database;
use crate::error::AppError;
use crate::models::session::SESSION_TTL_DAYS;
use crate::models::{AuthProvider, Session};

/// Create and store a new session for `user_id`, valid for 30 days.
pub async fn create_session(
    db: &Database,
    user_id: &str,
    provider: AuthProvider,
    refresh_token: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Session, AppError> {
    let id = uuid::Uuid::new_v4().to_string();
    let session = Session {
        refresh_token_hash: hash_refresh_token(&id, refresh_token),
        id,
        user_id: user_id.to_string(),
        provider: provider.as_str().to_string(),
        expires_at: now + Duration::days(SESSION_TTL_DAYS),
        revoked_at: None,
        created_at: now,
    };

    db.create_session(&session).await?;

    tracing::info!(
        user_id,
        session = %short_id(&session.id),
        expires_at = %session.expires_at,
        "Session created"
    );

    Ok(session)
}

/// Look up the session behind a cookie value.
///
/// Unknown, revoked and expired sessions all resolve to `None`.
pub async fn resolve_session(
    db: &Database,
    session_id: &str,
    now: DateTime<Utc>,
) -> Result<Option<Session>, AppError> {
    let Some(session) = db.get_session(session_id).await? else {
        tracing::debug!(session = %short_id(session_id), "Unknown session cookie");
        return Ok(None);
    };

    if !session.is_active(now) {
        tracing::debug!(
            session = %short_id(session_id),
            revoked = session.revoked_at.is_some(),
            "Inactive session cookie"
        );
        return Ok(None);
    }

    Ok(Some(session))
}

/// Revoke a session row when logging out.
pub async fn end_session(
    db: &Database,
    session_id: &str,
    revoke: bool,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if !revoke {
        tracing::warn!(
            session = %short_id(session_id),
            "Logout cleared the cookie but left the session row active"
        );
        return Ok(());
    }

    if db.revoke_session(session_id, now).await? {
        tracing::info!(session = %short_id(session_id), "Session revoked");
    }
    Ok(())
}

/// SHA-256 (hex) binding the provider refresh token to one session.
///
/// The session ID is mixed in so the stored hash stays unique even when the
/// provider omits or repeats the refresh token.
pub fn hash_refresh_token(session_id: &str, refresh_token: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(session_id.as_bytes());
    hasher.update(b":");
    hasher.update(refresh_token.unwrap_or_default().as_bytes());
    hex::encode(hasher.finalize())
}

/// Prefix of a session ID, safe to log.
fn short_id(session_id: &str) -> &str {
    session_id.get(..8).unwrap_or(session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_refresh_token_is_session_bound() {
        let a = hash_refresh_token("session-a", Some("refresh"));
        let b = hash_refresh_token("session-b", Some("refresh"));

        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert_eq!(a, hash_refresh_token("session-a", Some("refresh")));
        assert_ne!(a, hash_refresh_token("session-a", None));
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
