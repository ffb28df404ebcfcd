//! Session constants.
//!
//! This module contains constant values used throughout the session store.

/// Inactivity timeout defaults.
pub mod timeouts {
    /// Maximum inactivity before a session expires (compliance requirement).
    pub const DEFAULT_TIMEOUT_MINUTES: i64 = 30;

    /// Remaining minutes at or below which the UI should warn the user.
    pub const DEFAULT_WARNING_THRESHOLD_MINUTES: i64 = 5;

    /// Longest inactivity timeout a configuration may ask for (one week).
    pub const MAX_TIMEOUT_MINUTES: i64 = 7 * 24 * 60;
}

/// Token generation parameters.
pub mod tokens {
    /// Random bytes per token (256 bits of entropy).
    pub const TOKEN_BYTES: usize = 32;

    /// Attempts before giving up on a colliding token.
    pub const MAX_GENERATION_ATTEMPTS: usize = 3;

    /// Characters of a token kept visible in log output.
    pub const MASK_VISIBLE_CHARS: usize = 6;

    /// Suffix appended to a masked token.
    pub const MASK_SUFFIX: &str = "***";
}

/// Background sweeper parameters.
pub mod sweeper {
    use std::time::Duration;

    /// Shortest period a [`crate::sweeper::SessionSweeper`] will tick at.
    pub const MIN_SWEEP_PERIOD: Duration = Duration::from_secs(1);
}

/// Environment variable names read by [`crate::config::SessionConfig::from_env`].
pub mod env_vars {
    /// Inactivity timeout in minutes.
    pub const TIMEOUT_MINUTES: &str = "SESSION_TIMEOUT_MINUTES";

    /// Warning threshold in minutes.
    pub const WARNING_THRESHOLD_MINUTES: &str = "SESSION_WARNING_THRESHOLD_MINUTES";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_defaults() {
        assert_eq!(timeouts::DEFAULT_TIMEOUT_MINUTES, 30);
        assert_eq!(timeouts::DEFAULT_WARNING_THRESHOLD_MINUTES, 5);
        assert!(timeouts::DEFAULT_WARNING_THRESHOLD_MINUTES < timeouts::DEFAULT_TIMEOUT_MINUTES);
        assert!(timeouts::DEFAULT_TIMEOUT_MINUTES <= timeouts::MAX_TIMEOUT_MINUTES);
    }

    #[test]
    fn test_token_entropy_is_256_bits() {
        assert_eq!(tokens::TOKEN_BYTES * 8, 256);
    }
}
