// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consecutive-day streak calculation.

use chrono::{Days, NaiveDate};
use std::collections::HashSet;

/// The backward walk stops after this many days; longer streaks report as this.
pub const MAX_STREAK_DAYS: u32 = 365;

/// Count consecutive days with a check-in, ending at `today`.
///
/// Returns 0 when `today` itself has no check-in.
pub fn streak_length(dates: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;

    while streak < MAX_STREAK_DAYS && dates.contains(&day) {
        streak += 1;
        day = match day.checked_sub_days(Days::new(1)) {
            Some(previous) => previous,
            None => break,
        };
    }

    streak
}

/// Earliest date that can still contribute to a streak ending at `today`.
pub fn lookback_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(MAX_STREAK_DAYS) - 1))
        .unwrap_or(NaiveDate::MIN)
}
