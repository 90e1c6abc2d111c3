// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod check_in;
pub mod google_oauth;
pub mod session;
pub mod streak;
pub mod users;

pub use check_in::{record_daily_check_in, streak_summary, StreakSummary};
pub use google_oauth::{GoogleOAuthClient, GoogleUserInfo, TokenResponse};
pub use streak::streak_length;
