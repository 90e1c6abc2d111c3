// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite database wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, created on first sign-in)
//! - Sessions (server side of the session cookie)
//! - Check-ins (one per user per local date)

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::error::AppError;
use crate::models::{CheckIn, CheckInOutcome, NewCheckIn, NewUser, Session, User};
use crate::time_utils::{format_local_date, parse_local_date};

const MAX_CONNECTIONS: u32 = 8;
const IN_MEMORY_URL: &str = "sqlite::memory:";

/// SQLite database client.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database at `url` and run migrations.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        if url == IN_MEMORY_URL {
            return Self::connect_in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        tracing::info!(url = url, "Connected to SQLite");
        Self::migrate(pool).await
    }

    /// Create a private in-memory database (tests and local experiments).
    ///
    /// Every connection to `:memory:` is a separate database, so the pool is
    /// pinned to one connection that never expires.
    pub async fn connect_in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(IN_MEMORY_URL)?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Migration failed");
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        Ok(Self { pool })
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Whether a nickname is in use, ignoring ASCII case.
    pub async fn nickname_taken(&self, nickname: &str) -> Result<bool, AppError> {
        let matches: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE lower(nickname) = lower(?)")
                .bind(nickname)
                .fetch_one(&self.pool)
                .await?;
        Ok(matches > 0)
    }

    /// Insert a user unless one with the same ID exists. Existing rows are
    /// never updated.
    ///
    /// # Returns
    /// `true` if a row was inserted.
    pub async fn insert_user_if_absent(&self, user: &NewUser) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, email, name, nickname, avatar_url, timezone,
                wake_window_start_min, wake_window_end_min, status, auth_provider,
                last_login_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'active', ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.nickname)
        .bind(&user.avatar_url)
        .bind(&user.timezone)
        .bind(user.wake_window.start_min())
        .bind(user.wake_window.end_min())
        .bind(user.auth_provider)
        .bind(user.created_at)
        .bind(user.created_at)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    // ─── Session Operations ──────────────────────────────────────

    pub async fn create_session(&self, session: &Session) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, user_id, provider, refresh_token_hash, expires_at, revoked_at, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.provider)
        .bind(&session.refresh_token_hash)
        .bind(session.expires_at)
        .bind(session.revoked_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get a session by ID, whatever its state.
    pub async fn get_session(&self, session_id: &str) -> Result<Option<Session>, AppError> {
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(session)
    }

    /// Mark a session revoked.
    ///
    /// # Returns
    /// `true` if an unrevoked session was found and revoked.
    pub async fn revoke_session(
        &self,
        session_id: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE sessions SET revoked_at = ? WHERE id = ? AND revoked_at IS NULL")
                .bind(revoked_at)
                .bind(session_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }

    // ─── Check-in Operations ─────────────────────────────────────

    /// Insert a check-in. A duplicate (user, date) is absorbed by the
    /// unique constraint and reported as [`CheckInOutcome::AlreadyCheckedIn`].
    pub async fn insert_check_in(&self, check_in: &NewCheckIn) -> Result<CheckInOutcome, AppError> {
        if !check_in.is_consistent() {
            return Err(AppError::BadRequest(
                "A verified check-in requires a verified source".to_string(),
            ));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO check_ins (
                id, user_id, date, photo_id, message, captured_at,
                verified_source, verification_reason, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&check_in.user_id)
        .bind(format_local_date(check_in.date))
        .bind(&check_in.photo_id)
        .bind(&check_in.message)
        .bind(check_in.captured_at)
        .bind(check_in.verified_source)
        .bind(check_in.status)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(CheckInOutcome::Created(CheckIn {
                id,
                user_id: check_in.user_id.clone(),
                date: check_in.date,
                photo_id: check_in.photo_id.clone(),
                message: check_in.message.clone(),
                captured_at: check_in.captured_at,
                verified_source: check_in.verified_source,
                verification_reason: None,
                status: check_in.status,
                created_at,
            })),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(CheckInOutcome::AlreadyCheckedIn)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user's check-in for one date.
    pub async fn get_check_in(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<CheckIn>, AppError> {
        let check_in =
            sqlx::query_as::<_, CheckIn>("SELECT * FROM check_ins WHERE user_id = ? AND date = ?")
                .bind(user_id)
                .bind(format_local_date(date))
                .fetch_optional(&self.pool)
                .await?;
        Ok(check_in)
    }

    /// Distinct check-in dates for a user on or after `since`, newest first.
    /// Rows whose date does not parse are skipped.
    pub async fn check_in_dates(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<NaiveDate>, AppError> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT date FROM check_ins WHERE user_id = ? AND date >= ? ORDER BY date DESC",
        )
        .bind(user_id)
        .bind(format_local_date(since))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .filter_map(|raw| {
                let parsed = parse_local_date(raw);
                if parsed.is_none() {
                    tracing::warn!(user_id, date = %raw, "Skipping malformed check-in date");
                }
                parsed
            })
            .collect())
    }

    /// Number of check-ins stored for a user.
    pub async fn count_check_ins(&self, user_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM check_ins WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
