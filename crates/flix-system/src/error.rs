//! # Desk Error Types
//!
//! Error types for the rental desk and its configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Desk Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Session      │  │       Engine            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  AdminRequired  │  │  Core(CoreError)        │ │
//! │  │  ConfigLoad     │  │  AlreadyLogged  │  │                         │ │
//! │  │  ConfigSave     │  │  NotLoggedIn    │  │  SerializationFailed    │ │
//! │  │  Io             │  │  LockPoisoned   │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use flix_core::{CoreError, ErrorKind};
use thiserror::Error;

/// Result type alias for desk operations.
pub type DeskResult<T> = Result<T, DeskError>;

/// Everything that can go wrong at the desk.
#[derive(Debug, Error)]
pub enum DeskError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// A configuration value is out of range or unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The config file exists but could not be parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// A view could not be rendered as JSON.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// File system failure while reading the catalog or config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// Directory changes need an administrator session.
    #[error("Administrator session required")]
    AdminRequired,

    /// Someone is already logged in.
    #[error("'{0}' is already logged in")]
    AlreadyLoggedIn(String),

    /// The operation needs a customer session.
    #[error("No customer is logged in")]
    NotLoggedIn,

    /// A thread panicked while holding the desk lock.
    #[error("Desk lock poisoned")]
    LockPoisoned,

    // =========================================================================
    // Engine Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        DeskError::SerializationFailed(err.to_string())
    }
}

impl From<toml::de::Error> for DeskError {
    fn from(err: toml::de::Error) -> Self {
        DeskError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for DeskError {
    fn from(err: toml::ser::Error) -> Self {
        DeskError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl DeskError {
    /// The engine error kind, when this error came from the engine.
    pub fn core_kind(&self) -> Option<ErrorKind> {
        match self {
            DeskError::Core(err) => Some(err.kind()),
            _ => None,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DeskError::InvalidConfig(_)
                | DeskError::ConfigLoadFailed(_)
                | DeskError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if the error is about who is (or isn't) logged in.
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            DeskError::AdminRequired
                | DeskError::AlreadyLoggedIn(_)
                | DeskError::NotLoggedIn
                | DeskError::Core(CoreError::NoActiveSession)
                | DeskError::Core(CoreError::SessionActive(_))
        )
    }
}
