// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily check-in recording and streak lookup.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;

use crate::db::Database;
use crate::error::AppError;
use crate::models::{CheckInOutcome, NewCheckIn};
use crate::services::streak::{lookback_start, streak_length};

/// Streak figures shown on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakSummary {
    /// Consecutive days ending today
    pub current: u32,
    /// Whether today already has a check-in
    pub checked_in_today: bool,
}

impl StreakSummary {
    /// The count the user would reach by checking in now.
    pub fn prospective(&self) -> u32 {
        self.current + 1
    }
}

/// Record today's camera check-in for a user.
///
/// Safe to call repeatedly: a second call on the same date leaves the
/// original row untouched and returns [`CheckInOutcome::AlreadyCheckedIn`].
pub async fn record_daily_check_in(
    db: &Database,
    user_id: &str,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<CheckInOutcome, AppError> {
    let outcome = db
        .insert_check_in(&NewCheckIn::camera_capture(user_id, today, now))
        .await?;

    match &outcome {
        CheckInOutcome::Created(check_in) => tracing::info!(
            user_id,
            date = %check_in.date,
            check_in_id = %check_in.id,
            "Check-in recorded"
        ),
        CheckInOutcome::AlreadyCheckedIn => tracing::debug!(
            user_id,
            date = %today,
            "Duplicate check-in ignored"
        ),
    }

    Ok(outcome)
}

/// Load a user's recent check-in dates and compute the streak ending today.
pub async fn streak_summary(
    db: &Database,
    user_id: &str,
    today: NaiveDate,
) -> Result<StreakSummary, AppError> {
    let dates: HashSet<NaiveDate> = db
        .check_in_dates(user_id, lookback_start(today))
        .await?
        .into_iter()
        .collect();

    Ok(StreakSummary {
        current: streak_length(&dates, today),
        checked_in_today: dates.contains(&today),
    })
}
