//! Server-side session backing the `mg_session` cookie.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sessions live for 30 days.
pub const SESSION_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Opaque identifier, also the cookie value
    pub id: String,
    pub user_id: String,
    /// Identity provider that created the session (e.g. "google")
    pub provider: String,
    /// SHA-256 (hex) of the provider refresh token bound to this session
    pub refresh_token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Neither revoked nor expired at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}
