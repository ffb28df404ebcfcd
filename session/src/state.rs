//! Session state types.

use crate::constants::tokens::{MASK_SUFFIX, MASK_VISIBLE_CHARS};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// Tokens
// ═══════════════════════════════════════════════════════════════════════

/// Opaque bearer token identifying a session.
///
/// `Debug` and `Display` print a masked form so tokens never end up in logs
/// by accident. Use [`SessionToken::as_str`] to hand the raw value to the
/// client.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token value received from a client.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the raw token value.
    #[must_use]
    pub fn expose(self) -> String {
        self.0
    }

    /// Masked form suitable for log fields.
    #[must_use]
    pub fn masked(&self) -> String {
        mask_token(&self.0)
    }
}

impl Borrow<str> for SessionToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&self.masked()).finish()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Mask a token for logging: keep a short prefix, hide the rest.
///
/// # Examples
///
/// ```
/// use schoolpulse_session::state::mask_token;
///
/// assert_eq!(mask_token("abcdef0123456789"), "abcdef***");
/// assert_eq!(mask_token("abc"), "***");
/// assert_eq!(mask_token(""), "");
/// ```
#[must_use]
pub fn mask_token(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    // Short values are hidden entirely.
    if raw.chars().count() <= MASK_VISIBLE_CHARS {
        return MASK_SUFFIX.to_string();
    }

    let prefix: String = raw.chars().take(MASK_VISIBLE_CHARS).collect();
    format!("{prefix}{MASK_SUFFIX}")
}

// ═══════════════════════════════════════════════════════════════════════
// Stored Session
// ═══════════════════════════════════════════════════════════════════════

/// One authenticated user's active login, as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
    allowed_students: Vec<String>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl Session {
    /// Start a session at `now`.
    #[must_use]
    pub const fn new(user_id: String, allowed_students: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            allowed_students,
            created_at: now,
            last_activity: now,
        }
    }

    /// Identifier of the authenticated principal.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Students the principal may view, in grant order.
    #[must_use]
    pub fn allowed_students(&self) -> &[String] {
        &self.allowed_students
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last successful refresh (or creation).
    #[must_use]
    pub const fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// `true` once strictly more than `timeout` has passed since the last activity.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now.signed_duration_since(self.last_activity) > timeout
    }

    /// Time left before expiry, clamped to `[0, timeout]`.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>, timeout: Duration) -> Duration {
        let remaining = timeout - now.signed_duration_since(self.last_activity);
        remaining.clamp(Duration::zero(), timeout)
    }

    /// Record activity at `now`.
    ///
    /// A clock that steps backwards never moves `last_activity` before
    /// `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now.max(self.created_at);
    }

    /// Read-only snapshot handed to callers.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            user_id: self.user_id.clone(),
            allowed_students: self.allowed_students.clone(),
            created_at: self.created_at,
            last_activity: self.last_activity,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Caller-facing Views
// ═══════════════════════════════════════════════════════════════════════

/// Snapshot of a valid session returned by lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    /// Identifier of the authenticated principal.
    pub user_id: String,

    /// Students the principal may view.
    pub allowed_students: Vec<String>,

    /// Session creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp at the time of the lookup.
    pub last_activity: DateTime<Utc>,
}

impl SessionView {
    /// Case-insensitive check against the allowed students.
    #[must_use]
    pub fn can_access(&self, student: &str) -> bool {
        let student = student.to_lowercase();
        self.allowed_students
            .iter()
            .any(|allowed| allowed.to_lowercase() == student)
    }
}

/// What the UI should tell the user about the inactivity timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeoutWarning {
    /// Unknown session, or more time left than the warning threshold.
    None,

    /// The session expires soon.
    ExpiresIn {
        /// Whole minutes left, floored (0 means under a minute)
        minutes: i64,
    },

    /// The deadline has passed but the entry has not been purged yet.
    Expired,
}

impl TimeoutWarning {
    /// `true` unless this is [`TimeoutWarning::None`].
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Display-ready summary of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDisplay {
    /// Identifier of the authenticated principal.
    pub user_id: String,

    /// Allowed students joined with `", "`.
    pub students: String,

    /// Creation time formatted as `HH:MM` (UTC).
    pub session_started: String,

    /// `"N min"`, or `"Expired"` when no whole minute is left.
    pub time_remaining: String,
}
