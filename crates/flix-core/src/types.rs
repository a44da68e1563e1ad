//! # Shared Types
//!
//! Identifiers and read-only views used throughout Flix Rental.
//!
//! ## View Types
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Read-only Views                                 │
//! │                                                                         │
//! │  ┌──────────────────────┐         ┌──────────────────────┐              │
//! │  │  CatalogEntryView    │         │   AccountSummary     │              │
//! │  │  ──────────────────  │         │  ──────────────────  │              │
//! │  │  title               │         │  id                  │              │
//! │  │  available_copies    │         │  limit               │              │
//! │  │  display_name        │         │  held / waiting      │              │
//! │  └──────────────────────┘         └──────────────────────┘              │
//! │                                                                         │
//! │  Listings: one title/id per line, each line newline-terminated.        │
//! │  An empty listing is `None`, never `Some("")`.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Item Identifier
// =============================================================================

/// Stable reference to a catalog item.
///
/// Assigned when the item enters the catalog and never reused. Account
/// queues hold these; the catalog keeps ownership of the item itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub(crate) usize);

impl ItemId {
    /// Returns the raw index.
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

// =============================================================================
// Request Outcome
// =============================================================================

/// Where a request landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// Checked out immediately into the active queue.
    Held,
    /// Appended to the waiting queue.
    Waiting,
}

/// Per-account state of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Unrequested,
    Waiting,
    Held,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestState::Unrequested => write!(f, "unrequested"),
            RequestState::Waiting => write!(f, "waiting"),
            RequestState::Held => write!(f, "held"),
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// One catalog line as shown to a browsing customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntryView {
    pub title: String,
    pub available_copies: i64,
    /// `title`, or `title (currently unavailable)`.
    pub display_name: String,
}

/// Directory entry as shown to an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub limit: u32,
    pub held: u32,
    pub waiting: u32,
}

// =============================================================================
// Listings
// =============================================================================

/// Joins lines into a newline-terminated listing.
///
/// ## Example
/// ```rust
/// use flix_core::types::render_listing;
///
/// assert_eq!(render_listing(["a", "b"]), Some("a\nb\n".to_string()));
/// assert_eq!(render_listing(Vec::<String>::new()), None);
/// ```
pub fn render_listing<I, S>(lines: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
