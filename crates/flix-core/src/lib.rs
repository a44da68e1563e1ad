//! # flix-core: Pure Allocation Engine for Flix Rental
//!
//! This crate holds the rental logic: a sorted catalog of titles with copy
//! counters, accounts with per-account limits and two queues, and the
//! waiting-list promotion rules. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Flix Rental Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    flix-cli (operator shell)                    │   │
//! │  │    login ──► catalog ──► reserve / return ──► logout            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                flix-system (config, loader, desk)               │   │
//! │  │    admin gating, catalog file, tracing                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ flix-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ sequence  │  │  catalog  │  │  account  │  │ directory │  │   │
//! │  │   │ Ordered-  │  │  Catalog  │  │  queues   │  │  sorted   │  │   │
//! │  │   │ Sequence  │  │  Item     │  │  limit    │  │  bounded  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                        coordinator                              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO LOGGING • SINGLE SESSION              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`sequence`] - Position-addressable container under everything else
//! - [`catalog`] - Catalog items, line parsing, sorted catalog
//! - [`account`] - Per-account allocation state machine
//! - [`directory`] - Sorted, bounded account roster
//! - [`coordinator`] - Session slot and position-indexed rental operations
//! - [`error`] - Domain error types
//! - [`validation`] - Identifier and limit rules
//!
//! ## Example Usage
//!
//! ```rust
//! use flix_core::{AccountDirectory, Catalog, RentalCoordinator, RentalManager, RequestOutcome};
//!
//! let catalog = Catalog::load(["1 Gravity", "0 Spectre"]).unwrap();
//! let mut rentals = RentalCoordinator::new(catalog, AccountDirectory::new());
//! rentals.register_account("alice", "secret", 1).unwrap();
//!
//! rentals.begin_session("alice", "secret").unwrap();
//! assert_eq!(rentals.reserve_at(0).unwrap(), RequestOutcome::Held);
//! assert_eq!(rentals.reserve_at(1).unwrap(), RequestOutcome::Waiting);
//! assert_eq!(
//!     rentals.list_catalog().unwrap(),
//!     "Gravity (currently unavailable)\nSpectre (currently unavailable)\n"
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod catalog;
pub mod coordinator;
pub mod directory;
pub mod error;
pub mod sequence;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use account::Account;
pub use catalog::{Catalog, CatalogItem};
pub use coordinator::{RentalCoordinator, RentalManager};
pub use directory::AccountDirectory;
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use sequence::OrderedSequence;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Appended to the display name of an item with no copy in.
pub const UNAVAILABLE_SUFFIX: &str = " (currently unavailable)";

/// Directory bound used when no capacity is configured.
pub const DEFAULT_DIRECTORY_CAPACITY: usize = 20;
