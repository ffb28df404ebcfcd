//! Session store configuration.
//!
//! Both values are expressed in minutes. Defaults follow the compliance
//! policy: 30 minutes of inactivity, warning at 5 minutes remaining.

use crate::constants::{env_vars, timeouts};
use crate::error::{Result, SessionError};
use chrono::Duration;
use std::env;

/// Inactivity timeout and warning threshold for a [`crate::SessionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum allowed gap between refreshes before a session expires.
    ///
    /// Default: 30 minutes
    pub timeout: Duration,

    /// Remaining time at or below which callers should warn the user.
    ///
    /// Default: 5 minutes
    pub warning_threshold: Duration,
}

impl SessionConfig {
    /// Create the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::minutes(timeouts::DEFAULT_TIMEOUT_MINUTES),
            warning_threshold: Duration::minutes(timeouts::DEFAULT_WARNING_THRESHOLD_MINUTES),
        }
    }

    /// Set the inactivity timeout.
    ///
    /// Values beyond what a `Duration` can hold saturate;
    /// [`SessionConfig::validate`] rejects them.
    #[must_use]
    pub const fn with_timeout_minutes(mut self, minutes: i64) -> Self {
        self.timeout = saturating_minutes(minutes);
        self
    }

    /// Set the warning threshold.
    ///
    /// Values beyond what a `Duration` can hold saturate;
    /// [`SessionConfig::validate`] rejects them.
    #[must_use]
    pub const fn with_warning_threshold_minutes(mut self, minutes: i64) -> Self {
        self.warning_threshold = saturating_minutes(minutes);
        self
    }

    /// Load configuration from `SESSION_TIMEOUT_MINUTES` and
    /// `SESSION_WARNING_THRESHOLD_MINUTES`.
    ///
    /// Missing or unparsable values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if the resulting values fail
    /// [`SessionConfig::validate`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if a value does not fit in a
    /// `Duration` or the resulting values fail [`SessionConfig::validate`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let minutes = |key: &str, default: i64| -> Result<Duration> {
            let value = lookup(key)
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(default);

            Duration::try_minutes(value).ok_or_else(|| {
                SessionError::InvalidConfig(format!("{key} is out of range: {value} minutes"))
            })
        };

        let config = Self {
            timeout: minutes(env_vars::TIMEOUT_MINUTES, timeouts::DEFAULT_TIMEOUT_MINUTES)?,
            warning_threshold: minutes(
                env_vars::WARNING_THRESHOLD_MINUTES,
                timeouts::DEFAULT_WARNING_THRESHOLD_MINUTES,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the timeout is positive and at most one week, and that the
    /// threshold lies below it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.timeout <= Duration::zero() {
            return Err(SessionError::InvalidConfig(format!(
                "timeout must be positive, got {} minutes",
                self.timeout.num_minutes()
            )));
        }

        if self.timeout > Duration::minutes(timeouts::MAX_TIMEOUT_MINUTES) {
            return Err(SessionError::InvalidConfig(format!(
                "timeout must be at most {} minutes, got {} minutes",
                timeouts::MAX_TIMEOUT_MINUTES,
                self.timeout.num_minutes()
            )));
        }

        if self.warning_threshold < Duration::zero() {
            return Err(SessionError::InvalidConfig(format!(
                "warning threshold must not be negative, got {} minutes",
                self.warning_threshold.num_minutes()
            )));
        }

        if self.warning_threshold >= self.timeout {
            return Err(SessionError::InvalidConfig(format!(
                "warning threshold ({} minutes) must be below the timeout ({} minutes)",
                self.warning_threshold.num_minutes(),
                self.timeout.num_minutes()
            )));
        }

        Ok(())
    }

    /// Timeout in whole minutes.
    #[must_use]
    pub fn timeout_minutes(&self) -> i64 {
        self.timeout.num_minutes()
    }

    /// Warning threshold in whole minutes.
    #[must_use]
    pub fn warning_threshold_minutes(&self) -> i64 {
        self.warning_threshold.num_minutes()
    }
}

const fn saturating_minutes(minutes: i64) -> Duration {
    match Duration::try_minutes(minutes) {
        Some(duration) => duration,
        None if minutes < 0 => Duration::MIN,
        None => Duration::MAX,
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.timeout_minutes(), 30);
        assert_eq!(config.warning_threshold_minutes(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SessionConfig::new()
            .with_timeout_minutes(15)
            .with_warning_threshold_minutes(2);

        assert_eq!(config.timeout, Duration::minutes(15));
        assert_eq!(config.warning_threshold, Duration::minutes(2));
    }

    #[test]
    fn test_validate_rejects_non_positive_timeout() {
        let config = SessionConfig::new().with_timeout_minutes(0);
        assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_threshold_at_or_above_timeout() {
        let config = SessionConfig::new()
            .with_timeout_minutes(10)
            .with_warning_threshold_minutes(10);
        assert!(config.validate().is_err());

        let config = SessionConfig::new().with_warning_threshold_minutes(-1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = SessionConfig::from_lookup(lookup_from(&[
            ("SESSION_TIMEOUT_MINUTES", "45"),
            ("SESSION_WARNING_THRESHOLD_MINUTES", " 10 "),
        ]))
        .expect("valid config");

        assert_eq!(config.timeout_minutes(), 45);
        assert_eq!(config.warning_threshold_minutes(), 10);
    }

    #[test]
    fn test_from_lookup_falls_back_on_missing_or_garbage() {
        let config =
            SessionConfig::from_lookup(lookup_from(&[("SESSION_TIMEOUT_MINUTES", "thirty")]))
                .expect("defaults are valid");

        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_invalid_combination() {
        let result = SessionConfig::from_lookup(lookup_from(&[
            ("SESSION_TIMEOUT_MINUTES", "3"),
            ("SESSION_WARNING_THRESHOLD_MINUTES", "5"),
        ]));

        assert!(matches!(result, Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_lookup_rejects_out_of_range_minutes() {
        let result = SessionConfig::from_lookup(lookup_from(&[(
            "SESSION_TIMEOUT_MINUTES",
            "9223372036854775807",
        )]));
        assert!(matches!(result, Err(SessionError::InvalidConfig(_))));

        let result = SessionConfig::from_lookup(lookup_from(&[(
            "SESSION_WARNING_THRESHOLD_MINUTES",
            "-9223372036854775808",
        )]));
        assert!(matches!(result, Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_lookup_rejects_timeout_above_one_week() {
        let result = SessionConfig::from_lookup(lookup_from(&[(
            "SESSION_TIMEOUT_MINUTES",
            "10081",
        )]));
        assert!(matches!(result, Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_builders_saturate_instead_of_panicking() {
        let config = SessionConfig::new().with_timeout_minutes(i64::MAX);
        assert_eq!(config.timeout, Duration::MAX);
        assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));

        let config = SessionConfig::new().with_warning_threshold_minutes(i64::MIN);
        assert_eq!(config.warning_threshold, Duration::MIN);
        assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));
    }
}
