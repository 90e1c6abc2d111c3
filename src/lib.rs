// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Morning Glory: a daily wake-up photo check-in service.
//!
//! This crate provides the backend for signing in with Google, recording one
//! camera check-in per local day, and reporting the consecutive-day streak.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::GoogleOAuthClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub google: GoogleOAuthClient,
}

impl AppState {
    /// The local calendar date right now, at the configured offset.
    /// `users.timezone` is not consulted.
    pub fn today(&self) -> chrono::NaiveDate {
        time_utils::local_today(chrono::Utc::now(), self.config.local_utc_offset)
    }
}
