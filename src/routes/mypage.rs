// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! My page: profile summary and logout.

use axum::{extract::State, response::Redirect, routing::get, Form, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::{current_session, sign_out};
use crate::routes::{Intent, IntentForm};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/mypage", get(mypage).post(mypage_action))
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MyPageView {
    pub authenticated: bool,
    pub nickname: Option<String>,
}

async fn mypage(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<MyPageView>> {
    let nickname = match current_session(&state, &jar).await? {
        Some(auth_user) => state
            .db
            .get_user(&auth_user.user_id)
            .await?
            .map(|u| u.nickname),
        None => None,
    };

    Ok(Json(MyPageView {
        authenticated: nickname.is_some(),
        nickname,
    }))
}

async fn mypage_action(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<IntentForm>,
) -> Result<(CookieJar, Redirect)> {
    match form.intent() {
        Intent::Logout => {
            let jar = sign_out(&state, jar).await?;
            Ok((jar, Redirect::to("/login")))
        }
        _ => Ok((jar, Redirect::to("/mypage"))),
    }
}
