//! # Error Types
//!
//! Domain-specific error types for flix-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  flix-core errors (this file)                                           │
//! │  ├── CoreError        - Allocation and directory failures               │
//! │  └── ValidationError  - Identifier/credential input failures            │
//! │                                                                         │
//! │  flix-system errors (separate crate)                                    │
//! │  └── DeskError        - Sessions, config, file loading                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DeskError → Operator shell         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every core operation either completes fully or fails before mutating
//! anything. Callers branch on [`CoreError::kind`]; message text is for logs.

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core allocation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A position lies outside the bounds of a sequence or queue.
    #[error("Position {position} is out of range for a sequence of length {len}")]
    OutOfRange { position: usize, len: usize },

    /// A required value is absent or unusable.
    ///
    /// ## When This Occurs
    /// - Requesting an item id that the catalog does not know
    /// - Returning from a non-empty active queue at an invalid position
    /// - Registering an account with an empty or whitespace-bearing id
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// An account with the same identifier is already registered.
    #[error("Account '{0}' already exists")]
    DuplicateAccount(String),

    /// The directory has reached its configured capacity.
    #[error("Directory is full (capacity {capacity})")]
    DirectoryFull { capacity: usize },

    /// No registered account matches the identifier.
    #[error("No such account: {0}")]
    NoSuchAccount(String),

    /// The identifier matched but the credential did not.
    #[error("Credential rejected for account '{0}'")]
    BadCredential(String),

    /// A session-bound operation was called with no account in session.
    #[error("No account session is active")]
    NoActiveSession,

    /// A session is already open, or the targeted account is in session.
    #[error("Account '{0}' is in an active session")]
    SessionActive(String),

    /// A non-empty catalog line lacks a parseable leading count or a title.
    ///
    /// ## Line Format
    /// ```text
    /// <signed-integer><whitespace><title>
    ///  "3 Frozen"            ✅
    ///  "-1 Gravity"          ✅ (already over-checked-out)
    ///  "5 10 Angry Men"      ✅ (title is "10 Angry Men")
    ///  "10Angry Men"         ❌
    ///  "The Godfather"       ❌
    /// ```
    #[error("Malformed catalog entry on line {line_number}: '{line}'")]
    MalformedCatalogEntry { line_number: usize, line: String },
}

impl CoreError {
    /// Returns the machine-readable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::OutOfRange { .. } => ErrorKind::OutOfRange,
            CoreError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CoreError::DuplicateAccount(_) => ErrorKind::DuplicateAccount,
            CoreError::DirectoryFull { .. } => ErrorKind::DirectoryFull,
            CoreError::NoSuchAccount(_) => ErrorKind::NoSuchAccount,
            CoreError::BadCredential(_) => ErrorKind::BadCredential,
            CoreError::NoActiveSession => ErrorKind::NoActiveSession,
            CoreError::SessionActive(_) => ErrorKind::SessionActive,
            CoreError::MalformedCatalogEntry { .. } => ErrorKind::MalformedCatalogEntry,
        }
    }

    pub(crate) fn out_of_range(position: usize, len: usize) -> Self {
        CoreError::OutOfRange { position, len }
    }
}

/// Error kinds surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    OutOfRange,
    InvalidArgument,
    DuplicateAccount,
    DirectoryFull,
    NoSuchAccount,
    BadCredential,
    NoActiveSession,
    SessionActive,
    MalformedCatalogEntry,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state changes; always surfaced as
/// [`ErrorKind::InvalidArgument`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty after trimming.
    #[error("{field} is required")]
    Required { field: String },

    /// Field contains whitespace where none is allowed.
    #[error("{field} must not contain whitespace")]
    ContainsWhitespace { field: String },

    /// An item id that does not belong to the catalog.
    #[error("item {0} is not in the catalog")]
    UnknownItem(usize),

    /// The item is already held or waiting for this account.
    #[error("'{title}' is already {state} for this account")]
    AlreadyRequested { title: String, state: String },

    /// Return position outside a non-empty active queue.
    #[error("return position {position} is invalid for {held} held items")]
    InvalidReturnPosition { position: usize, held: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
