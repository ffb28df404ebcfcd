//! In-memory session store.
//!
//! # Lazy expiry
//!
//! [`SessionStore::validate_session`] and [`SessionStore::refresh_session`]
//! are side-effecting reads: when they find an expired entry they delete it
//! before reporting the session as unusable. Callers that want a pure lookup
//! use [`SessionStore::peek_session`], and reclaim idle entries with
//! [`SessionStore::cleanup_expired_sessions`].
//!
//! Every operation reads the clock and touches the table under a single lock
//! acquisition, so an expiry check and the matching delete can never
//! interleave with a concurrent refresh of the same token.

use crate::config::SessionConfig;
use crate::constants::tokens::MAX_GENERATION_ATTEMPTS;
use crate::environment::{Clock, SystemClock};
use crate::error::{Result, SessionError};
use crate::state::{Session, SessionDisplay, SessionToken, SessionView, TimeoutWarning, mask_token};
use crate::token::generate_token;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Process-wide table of active sessions keyed by token.
///
/// Cloning is cheap and every clone shares the same table.
pub struct SessionStore<C = SystemClock> {
    sessions: Arc<Mutex<HashMap<SessionToken, Session>>>,
    clock: Arc<C>,
    config: SessionConfig,
    generate: fn() -> SessionToken,
}

impl SessionStore<SystemClock> {
    /// Create a store backed by the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: SessionConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for SessionStore<SystemClock> {
    fn default() -> Self {
        Self::from_parts(SessionConfig::default(), SystemClock)
    }
}

impl<C> Clone for SessionStore<C> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            clock: Arc::clone(&self.clock),
            config: self.config,
            generate: self.generate,
        }
    }
}

impl<C> std::fmt::Debug for SessionStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("config", &self.config)
            .field("stored_sessions", &self.stored_session_count())
            .finish_non_exhaustive()
    }
}

impl<C> SessionStore<C> {
    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Number of entries currently held, including expired entries that no
    /// lookup or sweep has purged yet.
    #[must_use]
    pub fn stored_session_count(&self) -> usize {
        self.lock().len()
    }

    /// Replace the token generator.
    #[must_use]
    pub fn with_token_generator(mut self, generate: fn() -> SessionToken) -> Self {
        self.generate = generate;
        self
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionToken, Session>> {
        // Every critical section leaves the table consistent, so a poisoned
        // lock still guards valid data.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock> SessionStore<C> {
    /// Create a store with an injected clock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if `config` fails validation.
    pub fn with_clock(config: SessionConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, clock))
    }

    fn from_parts(config: SessionConfig, clock: C) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            clock: Arc::new(clock),
            config,
            generate: generate_token,
        }
    }

    /// Create a session for an authenticated user and return its token.
    ///
    /// Authentication happens elsewhere; this only issues the token.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `user_id` is empty or blank → [`SessionError::EmptyUserId`]
    /// - `allowed_students` is empty → [`SessionError::NoAllowedStudents`]
    /// - every generated token collided → [`SessionError::TokenGenerationExhausted`]
    pub fn create_session<I, S>(&self, user_id: &str, allowed_students: I) -> Result<SessionToken>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if user_id.trim().is_empty() {
            return Err(SessionError::EmptyUserId);
        }

        let allowed_students: Vec<String> = allowed_students.into_iter().map(Into::into).collect();
        if allowed_students.is_empty() {
            return Err(SessionError::NoAllowedStudents);
        }

        let mut sessions = self.lock();
        let now = self.clock.now();

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let token = (self.generate)();

            if let Entry::Vacant(slot) = sessions.entry(token.clone()) {
                let student_count = allowed_students.len();
                slot.insert(Session::new(user_id.to_string(), allowed_students, now));

                tracing::info!(
                    user_id = %user_id,
                    token = %token,
                    student_count = student_count,
                    "Created session"
                );

                return Ok(token);
            }

            tracing::warn!(token = %token, "Generated session token collided with a live session");
        }

        Err(SessionError::TokenGenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Look up a session, purging it if the inactivity timeout has passed.
    ///
    /// Never extends the session.
    ///
    /// # Returns
    ///
    /// A snapshot of the session, or `None` for an empty, unknown or expired token.
    pub fn validate_session(&self, token: &str) -> Option<SessionView> {
        if token.is_empty() {
            return None;
        }

        let mut sessions = self.lock();
        let now = self.clock.now();
        self.live_entry(&mut sessions, token, now).map(|session| session.view())
    }

    /// Look up a session without purging it.
    ///
    /// # Returns
    ///
    /// A snapshot of the session, or `None` for an empty, unknown or expired token.
    pub fn peek_session(&self, token: &str) -> Option<SessionView> {
        if token.is_empty() {
            return None;
        }

        let sessions = self.lock();
        let now = self.clock.now();
        sessions
            .get(token)
            .filter(|session| !session.is_expired(now, self.config.timeout))
            .map(Session::view)
    }

    /// Extend a session by recording activity now.
    ///
    /// An expired session is purged instead of refreshed.
    ///
    /// # Returns
    ///
    /// `true` if the session was refreshed.
    pub fn refresh_session(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }

        let mut sessions = self.lock();
        let now = self.clock.now();
        match self.live_entry(&mut sessions, token, now) {
            Some(session) => {
                session.touch(now);
                tracing::debug!(token = %mask_token(token), "Refreshed session");
                true
            }
            None => false,
        }
    }

    /// Remove a session.
    ///
    /// # Returns
    ///
    /// `true` if the token was present.
    pub fn logout(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }

        let removed = self.lock().remove(token);
        if let Some(session) = &removed {
            tracing::info!(
                user_id = %session.user_id(),
                token = %mask_token(token),
                "Session logged out"
            );
        }
        removed.is_some()
    }

    /// Whole minutes left before the session expires, floored and clamped at zero.
    ///
    /// Does not purge: an expired entry that nothing has swept yet reports `Some(0)`.
    ///
    /// # Returns
    ///
    /// `None` for an empty or unknown token.
    pub fn get_remaining_minutes(&self, token: &str) -> Option<i64> {
        if token.is_empty() {
            return None;
        }

        let sessions = self.lock();
        let now = self.clock.now();
        sessions
            .get(token)
            .map(|session| session.remaining(now, self.config.timeout).num_minutes())
    }

    /// Whether the UI should warn that the session is about to time out.
    ///
    /// `true` when the remaining minutes are known and at or below the
    /// warning threshold, including `0` for an unpurged expired session.
    pub fn should_warn(&self, token: &str) -> bool {
        self.get_remaining_minutes(token)
            .is_some_and(|minutes| minutes <= self.config.warning_threshold.num_minutes())
    }

    /// Classify the timeout state of a session for the UI.
    ///
    /// Does not purge.
    pub fn timeout_warning(&self, token: &str) -> TimeoutWarning {
        if token.is_empty() {
            return TimeoutWarning::None;
        }

        let sessions = self.lock();
        let now = self.clock.now();
        let Some(session) = sessions.get(token) else {
            return TimeoutWarning::None;
        };

        if session.is_expired(now, self.config.timeout) {
            return TimeoutWarning::Expired;
        }

        let minutes = session.remaining(now, self.config.timeout).num_minutes();
        if minutes <= self.config.warning_threshold.num_minutes() {
            TimeoutWarning::ExpiresIn { minutes }
        } else {
            TimeoutWarning::None
        }
    }

    /// Display-ready summary of a valid session.
    ///
    /// Purges the session if it has expired, like [`SessionStore::validate_session`].
    pub fn session_display(&self, token: &str) -> Option<SessionDisplay> {
        if token.is_empty() {
            return None;
        }

        let mut sessions = self.lock();
        let now = self.clock.now();
        let timeout = self.config.timeout;
        let session = self.live_entry(&mut sessions, token, now)?;
        let remaining = session.remaining(now, timeout).num_minutes();

        Some(SessionDisplay {
            user_id: session.user_id().to_string(),
            students: session.allowed_students().join(", "),
            session_started: session.created_at().format("%H:%M").to_string(),
            time_remaining: if remaining > 0 {
                format!("{remaining} min")
            } else {
                "Expired".to_string()
            },
        })
    }

    /// Whether the session behind `token` may view `student`.
    ///
    /// Validates the session first (purging it if expired); the student name
    /// is compared case-insensitively.
    pub fn can_access_student(&self, token: &str, student: &str) -> bool {
        self.validate_session(token)
            .is_some_and(|view| view.can_access(student))
    }

    /// Remove every expired entry.
    ///
    /// # Returns
    ///
    /// Number of entries removed.
    pub fn cleanup_expired_sessions(&self) -> usize {
        let mut sessions = self.lock();
        let now = self.clock.now();
        self.sweep(&mut sessions, now)
    }

    /// Sweep, then count the remaining sessions.
    ///
    /// This is the admin/monitoring entry point.
    pub fn active_session_count(&self) -> usize {
        let mut sessions = self.lock();
        let now = self.clock.now();
        self.sweep(&mut sessions, now);
        sessions.len()
    }

    fn live_entry<'a>(
        &self,
        sessions: &'a mut HashMap<SessionToken, Session>,
        token: &str,
        now: DateTime<Utc>,
    ) -> Option<&'a mut Session> {
        let expired = sessions.get(token)?.is_expired(now, self.config.timeout);

        if expired {
            if let Some(session) = sessions.remove(token) {
                tracing::debug!(
                    user_id = %session.user_id(),
                    token = %mask_token(token),
                    last_activity = %session.last_activity(),
                    "Session expired after inactivity"
                );
            }
            return None;
        }

        sessions.get_mut(token)
    }

    fn sweep(&self, sessions: &mut HashMap<SessionToken, Session>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.config.timeout));
        let removed = before - sessions.len();

        if removed > 0 {
            tracing::debug!(
                removed = removed,
                remaining = sessions.len(),
                "Cleaned up expired sessions"
            );
        }

        removed
    }
}
