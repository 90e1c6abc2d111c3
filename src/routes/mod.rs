// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod camera;
pub mod forms;
pub mod home;
pub mod mypage;

use crate::middleware::require_session;
use crate::AppState;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Form actions posted by the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    CheckIn,
    Logout,
    Other,
}

/// Body of a page form action (`intent=...`).
#[derive(Debug, Default, Deserialize)]
pub struct IntentForm {
    #[serde(default)]
    pub intent: Option<String>,
}

impl IntentForm {
    pub fn intent(&self) -> Intent {
        match self.intent.as_deref().map(str::trim) {
            Some("checkin") => Intent::CheckIn,
            Some("logout") => Intent::Logout,
            _ => Intent::Other,
        }
    }
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // Pages that work signed in or out
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(home::routes())
        .merge(forms::routes())
        .merge(mypage::routes())
        .merge(auth::routes());

    // Signed-out visitors are redirected home
    let protected_routes = camera::routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(intent: Option<&str>) -> IntentForm {
        IntentForm {
            intent: intent.map(String::from),
        }
    }

    #[test]
    fn test_intent_parsing() {
        assert_eq!(form(Some("checkin")).intent(), Intent::CheckIn);
        assert_eq!(form(Some(" logout ")).intent(), Intent::Logout);
        assert_eq!(form(Some("dance")).intent(), Intent::Other);
        assert_eq!(form(None).intent(), Intent::Other);
    }
}
