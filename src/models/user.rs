//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nickname length bounds, counted in characters.
pub const NICKNAME_MIN_CHARS: usize = 2;
pub const NICKNAME_MAX_CHARS: usize = 20;

/// Timezone assigned to new accounts.
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";

/// Minutes in a day; wake-window bounds are inclusive of it.
pub const MINUTES_PER_DAY: i64 = 1440;

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
    Deleted,
}

/// How the account signs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AuthProvider {
    Email,
    Apple,
    Google,
    Kakao,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Email => "email",
            AuthProvider::Apple => "apple",
            AuthProvider::Google => "google",
            AuthProvider::Kakao => "kakao",
        }
    }
}

/// User profile stored in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Provider subject (Google `sub`), also the primary key
    pub id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Full display name from the provider
    pub name: Option<String>,
    /// Unique (case-insensitive) public nickname
    pub nickname: String,
    pub avatar_url: Option<String>,
    /// IANA timezone name
    pub timezone: String,
    pub wake_window_start_min: i64,
    pub wake_window_end_min: i64,
    pub status: UserStatus,
    pub auth_provider: AuthProvider,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minutes-of-day range in which the morning photo is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeWindow {
    start_min: i64,
    end_min: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WakeWindowError {
    #[error("wake window minute {0} is outside 0..=1440")]
    OutOfRange(i64),
    #[error("wake window starts ({start}) after it ends ({end})")]
    Inverted { start: i64, end: i64 },
}

impl WakeWindow {
    pub fn new(start_min: i64, end_min: i64) -> Result<Self, WakeWindowError> {
        for minute in [start_min, end_min] {
            if !(0..=MINUTES_PER_DAY).contains(&minute) {
                return Err(WakeWindowError::OutOfRange(minute));
            }
        }
        if start_min > end_min {
            return Err(WakeWindowError::Inverted {
                start: start_min,
                end: end_min,
            });
        }
        Ok(Self { start_min, end_min })
    }

    pub fn start_min(&self) -> i64 {
        self.start_min
    }

    pub fn end_min(&self) -> i64 {
        self.end_min
    }
}

impl Default for WakeWindow {
    /// 05:00 to 09:00.
    fn default() -> Self {
        Self {
            start_min: 300,
            end_min: 540,
        }
    }
}

/// Row inserted on first sign-in.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub nickname: String,
    pub avatar_url: Option<String>,
    pub timezone: String,
    pub wake_window: WakeWindow,
    pub auth_provider: AuthProvider,
    pub created_at: DateTime<Utc>,
}

/// Whether `c` may appear in a nickname: ASCII letters and digits,
/// Hangul syllables, `_`, `.` and `-`.
pub fn is_nickname_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('가'..='힣').contains(&c) || matches!(c, '_' | '.' | '-')
}

/// Coerce provider-supplied text into a nickname that satisfies the
/// character set and length rules.
pub fn fit_nickname(raw: &str) -> String {
    let mut nickname: String = raw
        .trim()
        .chars()
        .map(|c| if is_nickname_char(c) { c } else { '_' })
        .take(NICKNAME_MAX_CHARS)
        .collect();

    while nickname.chars().count() < NICKNAME_MIN_CHARS {
        nickname.push('_');
    }
    nickname
}

/// Nicknames to try, in order, when `base` may already be taken.
///
/// `base` must already be fitted. Suffixes come from the account subject so
/// retries are stable for the same user.
pub fn nickname_candidates(base: &str, subject: &str) -> Vec<String> {
    let subject: String = subject.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let mut candidates = vec![base.to_string()];

    let mut push = |candidate: String| {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    };

    for suffix_len in [4usize, 6, 8] {
        let suffix: String = subject.chars().take(suffix_len).collect();
        if suffix.is_empty() {
            break;
        }
        let room = NICKNAME_MAX_CHARS - suffix.len() - 1;
        let stem: String = base.chars().take(room).collect();
        push(format!("{}_{}", stem, suffix));
    }

    let skip = subject.len().saturating_sub(NICKNAME_MAX_CHARS - "user_".len());
    push(fit_nickname(&format!("user_{}", &subject[skip..])));

    candidates
}
