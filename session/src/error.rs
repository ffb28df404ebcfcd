//! Error types for session store construction and session creation.
//!
//! Lookups never fail: unknown, empty and expired tokens all surface as
//! `None`/`false`. Only configuration and session creation return errors.

use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised while configuring the store or creating a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The authenticated principal has no identifier.
    #[error("User ID must not be empty")]
    EmptyUserId,

    /// The principal was granted access to no students.
    #[error("Allowed students must not be empty")]
    NoAllowedStudents,

    /// Every generated token collided with a live session.
    #[error("Failed to generate a unique session token after {attempts} attempts")]
    TokenGenerationExhausted {
        /// Number of attempts made
        attempts: usize,
    },

    /// Configuration rejected by validation.
    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),
}

impl SessionError {
    /// Returns `true` if this error is due to invalid caller input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use schoolpulse_session::SessionError;
    /// assert!(SessionError::EmptyUserId.is_user_error());
    /// assert!(!SessionError::TokenGenerationExhausted { attempts: 3 }.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::EmptyUserId | Self::NoAllowedStudents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(SessionError::EmptyUserId.to_string(), "User ID must not be empty");
        assert_eq!(
            SessionError::TokenGenerationExhausted { attempts: 3 }.to_string(),
            "Failed to generate a unique session token after 3 attempts"
        );
        assert_eq!(
            SessionError::InvalidConfig("timeout must be positive".to_string()).to_string(),
            "Invalid session configuration: timeout must be positive"
        );
    }

    #[test]
    fn test_config_errors_are_not_user_errors() {
        assert!(SessionError::NoAllowedStudents.is_user_error());
        assert!(!SessionError::InvalidConfig(String::new()).is_user_error());
    }
}
