// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Camera page and the daily check-in action.
//! The session middleware is applied in routes/mod.rs for these routes.

use axum::{extract::State, response::Redirect, routing::get, Extension, Form, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::{celebrate_cookie, AuthUser};
use crate::routes::{Intent, IntentForm};
use crate::services::record_daily_check_in;
use crate::time_utils::format_local_date;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/camera", get(camera).post(camera_action))
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CameraView {
    pub ok: bool,
    /// Local date the check-in would be recorded under
    pub today: String,
    pub checked_in_today: bool,
}

async fn camera(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CameraView>> {
    let today = state.today();
    let checked_in_today = state.db.get_check_in(&user.user_id, today).await?.is_some();

    Ok(Json(CameraView {
        ok: true,
        today: format_local_date(today),
        checked_in_today,
    }))
}

/// Record today's check-in and send the user home to celebrate.
///
/// A second check-in on the same day is absorbed and still celebrates.
async fn camera_action(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
    Form(form): Form<IntentForm>,
) -> Result<(CookieJar, Redirect)> {
    if form.intent() != Intent::CheckIn {
        return Ok((jar, Redirect::to("/")));
    }

    record_daily_check_in(&state.db, &user.user_id, state.today(), Utc::now()).await?;

    let jar = jar.add(celebrate_cookie(state.config.production));
    Ok((jar, Redirect::to("/?celebrate=1")))
}
