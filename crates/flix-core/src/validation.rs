//! # Validation Module
//!
//! Input validation for account identifiers, credentials and limits.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Operator shell                                               │
//! │  └── Token splitting, numeric parsing                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Account::new     → trimmed, non-empty                             │
//! │  └── Directory        → trimmed, non-empty, no inner whitespace        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: AccountDirectory                                             │
//! │  └── Uniqueness and capacity                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use flix_core::validation::{validate_account_id, clamp_limit};
//!
//! assert_eq!(validate_account_id("  alice ").unwrap(), "alice");
//! assert!(validate_account_id("al ice").is_err());
//! assert_eq!(clamp_limit(-3), 0);
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trims `value` and rejects it when nothing is left.
pub fn require_trimmed<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value)
}

fn reject_whitespace<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::ContainsWhitespace {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Validates an account identifier for registration.
///
/// ## Rules
/// - Leading and trailing whitespace is trimmed
/// - Must not be empty after trimming
/// - Must not contain inner whitespace
pub fn validate_account_id(id: &str) -> ValidationResult<&str> {
    let id = require_trimmed("id", id)?;
    reject_whitespace("id", id)
}

/// Validates a credential for registration. Same rules as the identifier.
pub fn validate_credential(credential: &str) -> ValidationResult<&str> {
    let credential = require_trimmed("credential", credential)?;
    reject_whitespace("credential", credential)
}

/// Clamps a requested concurrency limit to the valid range.
///
/// Negative limits become 0; the account can then only wait.
pub fn clamp_limit(limit: i64) -> u32 {
    limit.clamp(0, i64::from(u32::MAX)) as u32
}

// =============================================================================
// Unit Tests
// =============================================================================
