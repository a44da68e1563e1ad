//! # Account Allocation State Machine
//!
//! Each account owns two queues of [`ItemId`]s and decides, per request,
//! whether an item is checked out now or queued for later.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Unrequested ──request()──┬── copies > 0 && held < limit ──► Held      │
//! │                            │                                   │        │
//! │                            └── otherwise ──► Waiting           │        │
//! │                                                │               │        │
//! │               return_item() / on_login() scan ─┘               │        │
//! │               (first waiting entry with a copy in)             │        │
//! │                                                                │        │
//! │   cancel_waiting() ◄── Waiting            return_item() ──► Returned    │
//! │   (no catalog change)                     (copies += 1)                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `held_count() == active queue length <= limit()`
//! - An item is in at most one of the two queues of an account
//! - Catalog counters move only on checkout (−1) and return/close (+1)
//!
//! ## Deferred Fulfillment
//! There is no background process. Waiting entries are re-examined only at
//! the two events that can free a slot or a copy: a return by this account
//! and this account logging in. When several accounts wait on the same item,
//! whichever logs in first after a copy comes back gets it.

use std::cmp::Ordering;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::sequence::OrderedSequence;
use crate::types::{render_listing, AccountSummary, ItemId, RequestOutcome, RequestState};
use crate::validation::{clamp_limit, require_trimmed};

/// A registered holder with a personal concurrency limit.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    id: String,
    #[serde(skip)]
    credential: String,
    limit: u32,
    active: OrderedSequence<ItemId>,
    waiting: OrderedSequence<ItemId>,
}

impl Account {
    /// Creates an account with empty queues.
    ///
    /// `id` and `credential` are trimmed and must be non-empty. A negative
    /// `limit` is clamped to 0.
    ///
    /// ## Example
    /// ```rust
    /// use flix_core::Account;
    ///
    /// let account = Account::new(" id1 ", "pw1", -2).unwrap();
    /// assert_eq!(account.id(), "id1");
    /// assert_eq!(account.limit(), 0);
    /// assert!(Account::new("", "pw", 1).is_err());
    /// ```
    pub fn new(id: &str, credential: &str, limit: i64) -> CoreResult<Self> {
        let id = require_trimmed("id", id)?;
        let credential = require_trimmed("credential", credential)?;
        Ok(Account {
            id: id.to_string(),
            credential: credential.to_string(),
            limit: clamp_limit(limit),
            active: OrderedSequence::new(),
            waiting: OrderedSequence::new(),
        })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Maximum number of concurrently held items.
    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items currently held.
    #[inline]
    pub fn held_count(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    fn has_free_slot(&self) -> bool {
        self.active.len() < self.limit as usize
    }

    /// Plaintext comparison against the stored credential, after trimming.
    pub fn verify_credential(&self, candidate: &str) -> bool {
        candidate.trim() == self.credential
    }

    /// Directory ordering key: the lower-cased id.
    pub fn sort_key(&self) -> String {
        self.id.to_lowercase()
    }

    /// Case-insensitive lexicographic comparison of ids.
    pub fn compare_by_id(&self, other: &Account) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }

    /// Where `item` currently stands for this account.
    pub fn state_of(&self, item: ItemId) -> RequestState {
        if self.active.position(|id| *id == item).is_some() {
            RequestState::Held
        } else if self.waiting.position(|id| *id == item).is_some() {
            RequestState::Waiting
        } else {
            RequestState::Unrequested
        }
    }

    /// Items held, oldest first.
    pub fn active_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.active.iter().copied()
    }

    /// Items waited on, in service order.
    pub fn waiting_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.waiting.iter().copied()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Requests `item`: checked out now when a copy is in and a slot is free,
    /// otherwise appended to the waiting queue.
    ///
    /// ## Errors
    /// `InvalidArgument` when the item is unknown to `catalog` or is already
    /// held or waiting for this account.
    pub fn request(&mut self, item: ItemId, catalog: &mut Catalog) -> CoreResult<RequestOutcome> {
        let entry = catalog.item(item)?;
        let state = self.state_of(item);
        if state != RequestState::Unrequested {
            return Err(ValidationError::AlreadyRequested {
                title: entry.title().to_string(),
                state: state.to_string(),
            }
            .into());
        }

        if entry.is_available() && self.has_free_slot() {
            self.check_out(item, catalog)?;
            Ok(RequestOutcome::Held)
        } else {
            self.waiting.push_back(item);
            Ok(RequestOutcome::Waiting)
        }
    }

    /// Moves the waiting entry at `position` one slot toward the front.
    pub fn promote(&mut self, position: usize) -> CoreResult<()> {
        self.waiting.move_toward_front(position)
    }

    /// Drops the waiting entry at `position`. Catalog counters are untouched.
    pub fn cancel_waiting(&mut self, position: usize) -> CoreResult<ItemId> {
        self.waiting.remove_at(position)
    }

    /// Returns the held item at `position` and then tries to fill the freed
    /// slot from the waiting queue.
    ///
    /// An empty active queue makes this a no-op. Returns the item promoted
    /// from the waiting queue, if any.
    ///
    /// ## Errors
    /// `InvalidArgument` when the active queue is non-empty and `position` is
    /// past its end.
    pub fn return_item(
        &mut self,
        position: usize,
        catalog: &mut Catalog,
    ) -> CoreResult<Option<ItemId>> {
        if self.active.is_empty() {
            return Ok(None);
        }
        let item = *self.active.get(position).map_err(|_| {
            CoreError::from(ValidationError::InvalidReturnPosition {
                position,
                held: self.active.len(),
            })
        })?;

        catalog.item_mut(item)?.check_in();
        self.active.remove_at(position)?;
        Ok(self.fill_from_waiting(catalog))
    }

    /// Runs the deferred-fulfillment scan when the account becomes active.
    pub fn on_login(&mut self, catalog: &mut Catalog) -> Option<ItemId> {
        self.fill_from_waiting(catalog)
    }

    /// Puts every held copy back and empties both queues.
    ///
    /// No waiting-list scan runs; the account is going away.
    pub fn close(&mut self, catalog: &mut Catalog) {
        for item in self.active.drain() {
            if let Ok(entry) = catalog.item_mut(item) {
                entry.check_in();
            }
        }
        self.waiting.clear();
    }

    fn check_out(&mut self, item: ItemId, catalog: &mut Catalog) -> CoreResult<()> {
        catalog.item_mut(item)?.check_out();
        self.active.push_back(item);
        Ok(())
    }

    /// Promotes the first waiting entry whose item has a copy in, if a slot
    /// is free. At most one entry moves per call.
    fn fill_from_waiting(&mut self, catalog: &mut Catalog) -> Option<ItemId> {
        if !self.has_free_slot() {
            return None;
        }
        let position = self.waiting.position(|id| {
            catalog
                .item(*id)
                .map(|entry| entry.is_available())
                .unwrap_or(false)
        })?;
        let item = self.waiting.remove_at(position).ok()?;
        self.check_out(item, catalog).ok()?;
        Some(item)
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// Titles of held items, `None` when nothing is held.
    pub fn active_listing(&self, catalog: &Catalog) -> Option<String> {
        render_listing(self.active.iter().map(|id| catalog.title_of(*id)))
    }

    /// Titles of waiting items, `None` when nothing is waiting.
    pub fn waiting_listing(&self, catalog: &Catalog) -> Option<String> {
        render_listing(self.waiting.iter().map(|id| catalog.title_of(*id)))
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id.clone(),
            limit: self.limit,
            held: self.active.len() as u32,
            waiting: self.waiting.len() as u32,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
