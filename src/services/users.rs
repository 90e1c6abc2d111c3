// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account provisioning on first sign-in.

use chrono::{DateTime, Utc};

use crate::db::Database;
use crate::error::AppError;
use crate::models::user::{fit_nickname, nickname_candidates, DEFAULT_TIMEZONE};
use crate::models::{AuthProvider, NewUser, User, WakeWindow};
use crate::services::google_oauth::GoogleUserInfo;

/// Return the user for a Google profile, creating the row on first sign-in.
///
/// Existing users are returned as stored; profile changes at Google are not
/// copied over.
pub async fn ensure_google_user(
    db: &Database,
    info: &GoogleUserInfo,
    now: DateTime<Utc>,
) -> Result<User, AppError> {
    if let Some(existing) = db.get_user(&info.sub).await? {
        tracing::debug!(user_id = %existing.id, "Returning user signed in");
        return Ok(existing);
    }

    if info.email.is_none() {
        return Err(AppError::GoogleApi(
            "Userinfo response has no email address".to_string(),
        ));
    }

    let base = fit_nickname(&info.preferred_nickname());

    for nickname in nickname_candidates(&base, &info.sub) {
        if db.nickname_taken(&nickname).await? {
            continue;
        }

        let new_user = NewUser {
            id: info.sub.clone(),
            email: info.email.clone(),
            name: info.name.clone(),
            nickname: nickname.clone(),
            avatar_url: info.picture.clone(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            wake_window: WakeWindow::default(),
            auth_provider: AuthProvider::Google,
            created_at: now,
        };

        match db.insert_user_if_absent(&new_user).await {
            Ok(true) => {
                tracing::info!(user_id = %info.sub, nickname = %nickname, "New user created");
                break;
            }
            // Inserted concurrently by another callback for the same account
            Ok(false) => break,
            Err(e) if e.is_unique_violation() => {
                if db.nickname_taken(&nickname).await? {
                    continue;
                }
                return Err(e);
            }
            Err(e) => return Err(e),
        }
    }

    db.get_user(&info.sub).await?.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "No free nickname for new user {}",
            info.sub
        ))
    })
}
