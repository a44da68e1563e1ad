//! # Rental Coordinator
//!
//! Binds the single account in session to the catalog.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   begin_session(id, credential)                                         │
//! │        │  authenticate ──► Account::on_login (deferred fulfillment)     │
//! │        ▼                                                                │
//! │   ┌──────────────┐   reserve_at(n)      catalog position n              │
//! │   │  active: id  │   promote_waiting(n) waiting queue position n        │
//! │   │              │   cancel_waiting(n)  waiting queue position n        │
//! │   │              │   return_at(n)       active queue position n         │
//! │   └──────────────┘                                                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   end_session()                                                         │
//! │                                                                         │
//! │   Every position-indexed call with no session → NoActiveSession         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Administrative gating is not handled here; see the desk in `flix-system`.

use crate::account::Account;
use crate::catalog::Catalog;
use crate::directory::AccountDirectory;
use crate::error::{CoreError, CoreResult};
use crate::types::{AccountSummary, ItemId, RequestOutcome};

// =============================================================================
// Rental Manager Trait
// =============================================================================

/// Rental operations available to the account in session.
///
/// Positions are zero-based and refer to whatever list the caller last
/// displayed: the catalog for `reserve_at`, the waiting queue for
/// `promote_waiting`/`cancel_waiting`, the active queue for `return_at`.
pub trait RentalManager {
    /// Requests the catalog item at `position`.
    fn reserve_at(&mut self, position: usize) -> CoreResult<RequestOutcome>;

    /// Moves a waiting entry one slot toward the front.
    fn promote_waiting(&mut self, position: usize) -> CoreResult<()>;

    /// Drops a waiting entry.
    fn cancel_waiting(&mut self, position: usize) -> CoreResult<ItemId>;

    /// Returns a held item; yields the item promoted from waiting, if any.
    fn return_at(&mut self, position: usize) -> CoreResult<Option<ItemId>>;

    /// Catalog in display order. Needs no session.
    fn list_catalog(&self) -> Option<String>;

    fn list_active_queue(&self) -> CoreResult<Option<String>>;

    fn list_waiting_queue(&self) -> CoreResult<Option<String>>;
}

// =============================================================================
// Rental Coordinator
// =============================================================================

/// Owns the catalog, the directory and the session slot.
#[derive(Debug, Clone, Default)]
pub struct RentalCoordinator {
    catalog: Catalog,
    directory: AccountDirectory,
    /// Id of the account in session.
    active: Option<String>,
}

impl RentalCoordinator {
    pub fn new(catalog: Catalog, directory: AccountDirectory) -> Self {
        RentalCoordinator {
            catalog,
            directory,
            active: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn directory(&self) -> &AccountDirectory {
        &self.directory
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Authenticates and opens a session for `id`.
    ///
    /// Runs the account's login scan and returns the item it promoted from
    /// waiting to held, if any.
    ///
    /// ## Errors
    /// - `SessionActive` when any account is already in session
    /// - `NoSuchAccount` / `BadCredential` from authentication
    ///
    /// ## Example
    /// ```rust
    /// use flix_core::{AccountDirectory, Catalog, RentalCoordinator, RentalManager};
    ///
    /// let catalog = Catalog::load(["1 Frozen", "0 Spectre"]).unwrap();
    /// let mut coordinator = RentalCoordinator::new(catalog, AccountDirectory::new());
    /// coordinator.register_account("alice", "pw", 2).unwrap();
    ///
    /// coordinator.begin_session("alice", "pw").unwrap();
    /// coordinator.reserve_at(0).unwrap();
    /// assert_eq!(coordinator.list_active_queue().unwrap().unwrap(), "Frozen\n");
    /// ```
    pub fn begin_session(&mut self, id: &str, credential: &str) -> CoreResult<Option<ItemId>> {
        if let Some(active) = &self.active {
            return Err(CoreError::SessionActive(active.clone()));
        }
        let account = self.directory.authenticate(id, credential)?;
        let promoted = account.on_login(&mut self.catalog);
        self.active = Some(account.id().to_string());
        Ok(promoted)
    }

    /// Closes the session, returning the id that was in session.
    pub fn end_session(&mut self) -> Option<String> {
        self.active.take()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn has_session(&self) -> bool {
        self.active.is_some()
    }

    /// The account in session.
    pub fn active_account(&self) -> CoreResult<&Account> {
        let id = self.active.as_deref().ok_or(CoreError::NoActiveSession)?;
        self.directory.get(id).ok_or(CoreError::NoActiveSession)
    }

    fn session_parts(&mut self) -> CoreResult<(&mut Account, &mut Catalog)> {
        let id = self.active.as_deref().ok_or(CoreError::NoActiveSession)?;
        let account = self
            .directory
            .get_mut(id)
            .ok_or(CoreError::NoActiveSession)?;
        Ok((account, &mut self.catalog))
    }

    // =========================================================================
    // Directory
    // =========================================================================

    /// Registers a new account. Admin gating is the caller's job.
    pub fn register_account(
        &mut self,
        id: &str,
        credential: &str,
        limit: i64,
    ) -> CoreResult<AccountSummary> {
        self.directory
            .register(id, credential, limit)
            .map(Account::summary)
    }

    /// Closes and removes an account, restoring every held copy.
    ///
    /// The account in session cannot be removed.
    pub fn deregister_account(&mut self, id: &str) -> CoreResult<AccountSummary> {
        if let Some(active) = &self.active {
            if active == id.trim() {
                return Err(CoreError::SessionActive(active.clone()));
            }
        }
        self.directory
            .deregister(id, &mut self.catalog)
            .map(|account| account.summary())
    }

    pub fn list_accounts(&self) -> Option<String> {
        self.directory.listing()
    }
}

impl RentalManager for RentalCoordinator {
    fn reserve_at(&mut self, position: usize) -> CoreResult<RequestOutcome> {
        let (account, catalog) = self.session_parts()?;
        let item = catalog.id_at(position)?;
        account.request(item, catalog)
    }

    fn promote_waiting(&mut self, position: usize) -> CoreResult<()> {
        let (account, _) = self.session_parts()?;
        account.promote(position)
    }

    fn cancel_waiting(&mut self, position: usize) -> CoreResult<ItemId> {
        let (account, _) = self.session_parts()?;
        account.cancel_waiting(position)
    }

    fn return_at(&mut self, position: usize) -> CoreResult<Option<ItemId>> {
        let (account, catalog) = self.session_parts()?;
        account.return_item(position, catalog)
    }

    fn list_catalog(&self) -> Option<String> {
        self.catalog.listing()
    }

    fn list_active_queue(&self) -> CoreResult<Option<String>> {
        Ok(self.active_account()?.active_listing(&self.catalog))
    }

    fn list_waiting_queue(&self) -> CoreResult<Option<String>> {
        Ok(self.active_account()?.waiting_listing(&self.catalog))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const MOVIES: [&str; 5] = [
        "1 Frozen",
        "1 Gravity",
        "1 How to Train Your Dragon 2",
        "0 Spectre",
        "0 Warcraft",
    ];

    fn coordinator() -> RentalCoordinator {
        let catalog = Catalog::load(MOVIES).unwrap();
        let mut coordinator = RentalCoordinator::new(catalog, AccountDirectory::new());
        coordinator.register_account("id1", "pw1", 2).unwrap();
        coordinator.register_account("id2", "pw2", 3).unwrap();
        coordinator.register_account("id3", "pw3", 1).unwrap();
        coordinator
    }

    fn copies(coordinator: &RentalCoordinator, position: usize) -> i64 {
        coordinator.catalog().at(position).unwrap().available_copies()
    }

    #[test]
    fn test_no_session_fails_every_session_call() {
        let mut coordinator = coordinator();
        assert_eq!(coordinator.reserve_at(0), Err(CoreError::NoActiveSession));
        assert_eq!(coordinator.promote_waiting(0), Err(CoreError::NoActiveSession));
        assert_eq!(coordinator.cancel_waiting(0), Err(CoreError::NoActiveSession));
        assert_eq!(coordinator.return_at(0), Err(CoreError::NoActiveSession));
        assert_eq!(coordinator.list_active_queue(), Err(CoreError::NoActiveSession));
        assert_eq!(coordinator.list_waiting_queue(), Err(CoreError::NoActiveSession));

        assert!(coordinator.list_catalog().is_some());
        assert_eq!(copies(&coordinator, 0), 1);
    }

    #[test]
    fn test_begin_session_failures() {
        let mut coordinator = coordinator();

        let err = coordinator.begin_session("nobody", "pw").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSuchAccount);
        let err = coordinator.begin_session("id1", "wrong").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadCredential);
        assert!(!coordinator.has_session());

        coordinator.begin_session("id1", "pw1").unwrap();
        assert_eq!(
            coordinator.begin_session("id2", "pw2").unwrap_err(),
            CoreError::SessionActive("id1".to_string())
        );
        assert_eq!(coordinator.active_id(), Some("id1"));

        assert_eq!(coordinator.end_session(), Some("id1".to_string()));
        assert_eq!(coordinator.end_session(), None);
    }

    #[test]
    fn test_rental_flow() {
        let mut coordinator = coordinator();
        coordinator.begin_session("id1", "pw1").unwrap();
        assert_eq!(coordinator.list_active_queue().unwrap(), None);
        assert_eq!(coordinator.list_waiting_queue().unwrap(), None);

        assert_eq!(coordinator.reserve_at(0).unwrap(), RequestOutcome::Held);
        assert_eq!(coordinator.reserve_at(3).unwrap(), RequestOutcome::Waiting);
        assert_eq!(coordinator.reserve_at(1).unwrap(), RequestOutcome::Held);
        assert_eq!(coordinator.reserve_at(2).unwrap(), RequestOutcome::Waiting);

        assert_eq!(
            coordinator.list_active_queue().unwrap().unwrap(),
            "Frozen\nGravity\n"
        );
        assert_eq!(
            coordinator.list_waiting_queue().unwrap().unwrap(),
            "Spectre\nHow to Train Your Dragon 2\n"
        );
        assert_eq!(
            coordinator.list_catalog().unwrap(),
            "Frozen (currently unavailable)\n\
             Gravity (currently unavailable)\n\
             How to Train Your Dragon 2\n\
             Spectre (currently unavailable)\n\
             Warcraft (currently unavailable)\n"
        );

        coordinator.promote_waiting(1).unwrap();
        assert_eq!(
            coordinator.list_waiting_queue().unwrap().unwrap(),
            "How to Train Your Dragon 2\nSpectre\n"
        );

        // Returning Frozen frees a slot; HTTYD2 has a copy in and is promoted.
        let promoted = coordinator.return_at(0).unwrap();
        let httyd = coordinator.catalog().id_at(2).unwrap();
        assert_eq!(promoted, Some(httyd));
        assert_eq!(
            coordinator.list_active_queue().unwrap().unwrap(),
            "Gravity\nHow to Train Your Dragon 2\n"
        );
        assert_eq!(coordinator.list_waiting_queue().unwrap().unwrap(), "Spectre\n");
        assert_eq!(copies(&coordinator, 0), 1);
        assert_eq!(copies(&coordinator, 2), 0);

        let spectre = coordinator.catalog().id_at(3).unwrap();
        assert_eq!(coordinator.cancel_waiting(0).unwrap(), spectre);
        assert_eq!(coordinator.list_waiting_queue().unwrap(), None);
        assert_eq!(copies(&coordinator, 3), 0);
    }

    #[test]
    fn test_position_errors() {
        let mut coordinator = coordinator();
        coordinator.begin_session("id2", "pw2").unwrap();

        assert_eq!(coordinator.reserve_at(5).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(coordinator.promote_waiting(0), Ok(()));
        assert_eq!(
            coordinator.promote_waiting(1).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(
            coordinator.cancel_waiting(0).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );

        // Empty active queue: lenient no-op.
        assert_eq!(coordinator.return_at(4), Ok(None));

        coordinator.reserve_at(0).unwrap();
        assert_eq!(
            coordinator.return_at(1).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            coordinator.reserve_at(0).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(copies(&coordinator, 0), 0);
    }

    #[test]
    fn test_deferred_fulfillment_first_login_wins() {
        let catalog = Catalog::load(["1 Spectre", "2 Frozen"]).unwrap();
        let mut coordinator = RentalCoordinator::new(catalog, AccountDirectory::new());
        for id in ["a", "b", "c"] {
            coordinator.register_account(id, "pw", 2).unwrap();
        }
        let spectre = coordinator.catalog().id_at(1).unwrap();

        coordinator.begin_session("c", "pw").unwrap();
        assert_eq!(coordinator.reserve_at(1).unwrap(), RequestOutcome::Held);
        coordinator.end_session();

        for id in ["a", "b"] {
            coordinator.begin_session(id, "pw").unwrap();
            assert_eq!(coordinator.reserve_at(1).unwrap(), RequestOutcome::Waiting);
            coordinator.end_session();
        }

        coordinator.begin_session("c", "pw").unwrap();
        assert_eq!(coordinator.return_at(0).unwrap(), None);
        coordinator.end_session();
        assert_eq!(copies(&coordinator, 1), 1);

        assert_eq!(coordinator.begin_session("b", "pw").unwrap(), Some(spectre));
        assert_eq!(coordinator.list_active_queue().unwrap().unwrap(), "Spectre\n");
        coordinator.end_session();
        assert_eq!(copies(&coordinator, 1), 0);

        assert_eq!(coordinator.begin_session("a", "pw").unwrap(), None);
        assert_eq!(coordinator.list_waiting_queue().unwrap().unwrap(), "Spectre\n");
        assert_eq!(coordinator.list_active_queue().unwrap(), None);
    }

    #[test]
    fn test_deregister_account() {
        let mut coordinator = coordinator();
        coordinator.begin_session("id1", "pw1").unwrap();
        coordinator.reserve_at(0).unwrap();
        coordinator.reserve_at(1).unwrap();

        assert_eq!(
            coordinator.deregister_account(" id1 ").unwrap_err(),
            CoreError::SessionActive("id1".to_string())
        );
        coordinator.end_session();

        let summary = coordinator.deregister_account("id1").unwrap();
        assert_eq!(summary.held, 0);
        assert_eq!(copies(&coordinator, 0), 1);
        assert_eq!(copies(&coordinator, 1), 1);
        assert_eq!(coordinator.list_accounts().unwrap(), "id2\nid3\n");

        assert_eq!(
            coordinator.deregister_account("id1").unwrap_err().kind(),
            ErrorKind::NoSuchAccount
        );
    }

    #[test]
    fn test_register_account_summary() {
        let mut coordinator = RentalCoordinator::default();
        let summary = coordinator.register_account("  zed ", "pw", -4).unwrap();
        assert_eq!(summary.id, "zed");
        assert_eq!(summary.limit, 0);
        assert_eq!(coordinator.list_accounts().unwrap(), "zed\n");
    }
}
