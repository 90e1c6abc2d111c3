// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Daily check-in model for storage and API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Verification state of a check-in photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

/// Stored check-in record. At most one exists per (user, date).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CheckIn {
    pub id: String,
    pub user_id: String,
    /// Local calendar date of the check-in (`YYYY-MM-DD`)
    pub date: NaiveDate,
    pub photo_id: Option<String>,
    pub message: Option<String>,
    pub captured_at: DateTime<Utc>,
    /// Whether the photo came straight from the in-app camera
    pub verified_source: bool,
    pub verification_reason: Option<String>,
    pub status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}

/// A check-in about to be written.
#[derive(Debug, Clone)]
pub struct NewCheckIn {
    pub user_id: String,
    pub date: NaiveDate,
    pub photo_id: Option<String>,
    pub message: Option<String>,
    pub captured_at: DateTime<Utc>,
    pub verified_source: bool,
    pub status: VerificationStatus,
}

impl NewCheckIn {
    /// A photo taken with the in-app camera, verified on capture.
    pub fn camera_capture(user_id: &str, date: NaiveDate, captured_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            date,
            photo_id: None,
            message: None,
            captured_at,
            verified_source: true,
            status: VerificationStatus::Verified,
        }
    }

    /// `verified` status requires a verified source.
    pub fn is_consistent(&self) -> bool {
        self.status != VerificationStatus::Verified || self.verified_source
    }
}

/// Result of attempting the daily check-in.
#[derive(Debug, Clone)]
pub enum CheckInOutcome {
    /// A new row was written.
    Created(CheckIn),
    /// The user already had a check-in for that date; nothing changed.
    AlreadyCheckedIn,
}

impl CheckInOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, CheckInOutcome::Created(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_capture_is_verified() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let check_in = NewCheckIn::camera_capture("user-1", date, Utc::now());

        assert_eq!(check_in.status, VerificationStatus::Verified);
        assert!(check_in.verified_source);
        assert!(check_in.is_consistent());
    }

    #[test]
    fn test_verified_requires_verified_source() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let mut check_in = NewCheckIn::camera_capture("user-1", date, Utc::now());
        check_in.verified_source = false;
        assert!(!check_in.is_consistent());

        check_in.status = VerificationStatus::Pending;
        assert!(check_in.is_consistent());
    }
}
