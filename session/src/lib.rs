//! # SchoolPulse Session
//!
//! In-memory session store for the SchoolPulse parent dashboard.
//!
//! The store issues opaque bearer tokens, enforces a 30-minute inactivity
//! timeout, and tells the UI layer when to warn that a session is about to
//! lapse. Authentication, rendering and persistence live elsewhere.
//!
//! ## Lifecycle
//!
//! ```text
//! create_session ──► ACTIVE ──(refresh_session)──► ACTIVE
//!                      │
//!                      ├──(logout)──────────────────────► REMOVED
//!                      └──(timeout, seen by validate/
//!                          refresh/sweep)───────────────► EXPIRED (removed)
//! ```
//!
//! ## Example
//!
//! ```
//! use schoolpulse_session::{SessionConfig, SessionStore};
//!
//! let store = SessionStore::new(SessionConfig::default())?;
//! let token = store.create_session("parent1", ["stu1", "stu2"])?;
//!
//! let session = store.validate_session(token.as_str()).expect("fresh session");
//! assert_eq!(session.user_id, "parent1");
//! // Floored whole minutes: a fresh session may already read 29.
//! assert!(matches!(store.get_remaining_minutes(token.as_str()), Some(29..=30)));
//! assert!(!store.should_warn(token.as_str()));
//!
//! assert!(store.logout(token.as_str()));
//! assert!(store.validate_session(token.as_str()).is_none());
//! # Ok::<(), schoolpulse_session::SessionError>(())
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod state;
pub mod store;
pub mod sweeper;
pub mod token;

// Re-export main types for convenience
pub use config::SessionConfig;
pub use environment::{Clock, SystemClock};
pub use error::{Result, SessionError};
pub use state::{SessionDisplay, SessionToken, SessionView, TimeoutWarning};
pub use store::SessionStore;
pub use sweeper::SessionSweeper;
