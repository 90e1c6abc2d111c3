// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Home page: streak summary and the post-check-in celebration.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Form, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::{current_session, expired_cookie, sign_out, CELEBRATE_COOKIE};
use crate::routes::{Intent, IntentForm};
use crate::services::{streak_summary, StreakSummary};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(home).post(home_action))
}

/// Data for the home screen.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HomeView {
    pub authenticated: bool,
    pub user_nickname: Option<String>,
    pub streak_count: u32,
    /// Streak after checking in today
    pub next_streak_count: u32,
    pub streak_label: String,
    pub next_streak_label: String,
    /// Streak for the flip clock, at least two digits
    pub clock_value: String,
    pub checked_in_today: bool,
    pub celebrate: bool,
}

impl HomeView {
    fn new(user_nickname: Option<String>, summary: StreakSummary, celebrate: bool) -> Self {
        Self {
            authenticated: user_nickname.is_some(),
            user_nickname,
            streak_count: summary.current,
            next_streak_count: summary.prospective(),
            streak_label: streak_label(summary.current),
            next_streak_label: streak_label(summary.prospective()),
            clock_value: format!("{:02}", summary.current),
            checked_in_today: summary.checked_in_today,
            celebrate,
        }
    }

    fn signed_out() -> Self {
        let summary = StreakSummary {
            current: 0,
            checked_in_today: false,
        };
        Self::new(None, summary, false)
    }
}

/// "연속 N일째" (N days in a row).
pub fn streak_label(days: u32) -> String {
    format!("연속 {}일째", days)
}

#[derive(Debug, Default, Deserialize)]
pub struct HomeParams {
    #[serde(default)]
    celebrate: Option<String>,
}

/// Home loader.
///
/// `celebrate` is only reported when the query flag and the one-shot cookie
/// are both present; the cookie is cleared in the same response.
async fn home(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HomeParams>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<HomeView>)> {
    let has_celebrate_cookie = jar.get(CELEBRATE_COOKIE).is_some();
    let jar = if has_celebrate_cookie {
        jar.add(expired_cookie(CELEBRATE_COOKIE, state.config.production))
    } else {
        jar
    };

    let Some(auth_user) = current_session(&state, &jar).await? else {
        return Ok((jar, Json(HomeView::signed_out())));
    };

    let Some(user) = state.db.get_user(&auth_user.user_id).await? else {
        tracing::warn!(user_id = %auth_user.user_id, "Session refers to a missing user");
        return Ok((jar, Json(HomeView::signed_out())));
    };

    let summary = streak_summary(&state.db, &user.id, state.today()).await?;
    let celebrate = has_celebrate_cookie && params.celebrate.as_deref() == Some("1");

    tracing::debug!(
        user_id = %user.id,
        streak = summary.current,
        celebrate,
        "Home loaded"
    );

    Ok((jar, Json(HomeView::new(Some(user.nickname), summary, celebrate))))
}

/// Home form action. Only logout does anything.
async fn home_action(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<IntentForm>,
) -> Result<(CookieJar, Redirect)> {
    let jar = match form.intent() {
        Intent::Logout => sign_out(&state, jar).await?,
        _ => jar,
    };
    Ok((jar, Redirect::to("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_labels() {
        assert_eq!(streak_label(3), "연속 3일째");
        assert_eq!(streak_label(0), "연속 0일째");
    }

    #[test]
    fn test_home_view_from_summary() {
        let view = HomeView::new(
            Some("아침햇살".to_string()),
            StreakSummary {
                current: 3,
                checked_in_today: true,
            },
            false,
        );

        assert!(view.authenticated);
        assert_eq!(view.streak_count, 3);
        assert_eq!(view.next_streak_count, 4);
        assert_eq!(view.streak_label, "연속 3일째");
        assert_eq!(view.next_streak_label, "연속 4일째");
        assert_eq!(view.clock_value, "03");
    }

    #[test]
    fn test_clock_value_keeps_wide_streaks() {
        let view = HomeView::new(
            None,
            StreakSummary {
                current: 365,
                checked_in_today: true,
            },
            false,
        );
        assert!(!view.authenticated);
        assert_eq!(view.clock_value, "365");
    }
}
