// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod check_in;
pub mod session;
pub mod user;

pub use check_in::{CheckIn, CheckInOutcome, NewCheckIn, VerificationStatus};
pub use session::Session;
pub use user::{AuthProvider, NewUser, User, UserStatus, WakeWindow};
