// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Streak figures shown on the home page for stored check-in histories.

use chrono::Duration;
use tower::ServiceExt;

mod common;
use common::{body_json, get};

async fn home_for(days_ago: &[i64]) -> serde_json::Value {
    let (app, state) = common::create_test_app().await;
    let session_id = common::seed_signed_in_user(&state, "riser", "riser").await;
    let today = state.today();

    for days in days_ago {
        common::seed_check_in(&state, "riser", today - Duration::days(*days)).await;
    }

    let response = app
        .oneshot(get("/", Some(&format!("mg_session={}", session_id))))
        .await
        .unwrap();
    body_json(response).await
}

#[tokio::test]
async fn test_three_consecutive_days() {
    let body = home_for(&[0, 1, 2]).await;

    assert_eq!(body["authenticated"], true);
    assert_eq!(body["streak_count"], 3);
    assert_eq!(body["next_streak_count"], 4);
    assert_eq!(body["streak_label"], "연속 3일째");
    assert_eq!(body["next_streak_label"], "연속 4일째");
    assert_eq!(body["clock_value"], "03");
    assert_eq!(body["checked_in_today"], true);
}

#[tokio::test]
async fn test_gap_resets_streak() {
    let body = home_for(&[0, 3]).await;

    assert_eq!(body["streak_count"], 1);
    assert_eq!(body["streak_label"], "연속 1일째");
}

#[tokio::test]
async fn test_no_check_in_today_is_zero() {
    let body = home_for(&[1, 2]).await;

    assert_eq!(body["streak_count"], 0);
    assert_eq!(body["next_streak_count"], 1);
    assert_eq!(body["next_streak_label"], "연속 1일째");
    assert_eq!(body["checked_in_today"], false);
}

#[tokio::test]
async fn test_long_history_is_capped() {
    let days: Vec<i64> = (0..400).collect();
    let body = home_for(&days).await;

    assert_eq!(body["streak_count"], 365);
    assert_eq!(body["clock_value"], "365");
}

#[tokio::test]
async fn test_signed_out_home() {
    let (app, _) = common::create_test_app().await;

    let body = body_json(app.oneshot(get("/", None)).await.unwrap()).await;

    assert_eq!(body["authenticated"], false);
    assert!(body["user_nickname"].is_null());
    assert_eq!(body["streak_count"], 0);
    assert_eq!(body["celebrate"], false);
}
