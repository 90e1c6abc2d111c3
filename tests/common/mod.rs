// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    routing,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use morning_glory::config::Config;
use morning_glory::db::Database;
use morning_glory::models::{AuthProvider, NewCheckIn, NewUser, WakeWindow};
use morning_glory::routes::create_router;
use morning_glory::services::{session, GoogleOAuthClient};
use morning_glory::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Create a test app over a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config::test_default(), GoogleOAuthClient::new()).await
}

/// Create a test app with a custom config and Google client.
#[allow(dead_code)]
pub async fn create_test_app_with(
    config: Config,
    google: GoogleOAuthClient,
) -> (Router, Arc<AppState>) {
    let db = Database::connect_in_memory()
        .await
        .expect("Failed to create in-memory database");

    let state = Arc::new(AppState { config, db, google });
    (create_router(state.clone()), state)
}

/// Local stand-in for Google's token and userinfo endpoints.
#[allow(dead_code)]
pub struct FakeGoogle {
    pub base_url: String,
    token_calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl FakeGoogle {
    /// Start a fake provider that signs in the given userinfo profile.
    pub async fn start(profile: serde_json::Value) -> Self {
        Self::start_with_token_status(profile, axum::http::StatusCode::OK).await
    }

    /// Start a fake provider whose token endpoint answers with `status`.
    pub async fn start_with_token_status(
        profile: serde_json::Value,
        status: axum::http::StatusCode,
    ) -> Self {
        let token_calls = Arc::new(AtomicUsize::new(0));
        let counter = token_calls.clone();

        let app = Router::new()
            .route(
                "/token",
                routing::post(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        if !status.is_success() {
                            return (status, Json(serde_json::json!({"error": "invalid_grant"})));
                        }
                        (
                            status,
                            Json(serde_json::json!({
                                "access_token": "fake-access-token",
                                "refresh_token": "fake-refresh-token",
                                "expires_in": 3599,
                                "token_type": "Bearer",
                                "scope": "openid email profile"
                            })),
                        )
                    }
                }),
            )
            .route(
                "/userinfo",
                routing::get(move || {
                    let profile = profile.clone();
                    async move { Json(profile) }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake Google");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            token_calls,
        }
    }

    pub fn client(&self) -> GoogleOAuthClient {
        GoogleOAuthClient::with_endpoints(
            format!("{}/auth", self.base_url),
            format!("{}/token", self.base_url),
            format!("{}/userinfo", self.base_url),
        )
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }
}

/// Insert a user row directly.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, id: &str, nickname: &str) {
    let user = NewUser {
        id: id.to_string(),
        email: Some(format!("{}@example.com", id)),
        name: None,
        nickname: nickname.to_string(),
        avatar_url: None,
        timezone: "Asia/Seoul".to_string(),
        wake_window: WakeWindow::default(),
        auth_provider: AuthProvider::Google,
        created_at: Utc::now(),
    };
    assert!(state.db.insert_user_if_absent(&user).await.unwrap());
}

/// Insert a user and an active session; returns the session ID.
#[allow(dead_code)]
pub async fn seed_signed_in_user(state: &AppState, id: &str, nickname: &str) -> String {
    seed_user(state, id, nickname).await;
    session::create_session(&state.db, id, AuthProvider::Google, None, Utc::now())
        .await
        .unwrap()
        .id
}

/// Insert a camera check-in for `date`.
#[allow(dead_code)]
pub async fn seed_check_in(state: &AppState, user_id: &str, date: NaiveDate) {
    let outcome = state
        .db
        .insert_check_in(&NewCheckIn::camera_capture(user_id, date, Utc::now()))
        .await
        .unwrap();
    assert!(outcome.is_created());
}

#[allow(dead_code)]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// POST an urlencoded form.
#[allow(dead_code)]
pub fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
}

#[allow(dead_code)]
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
