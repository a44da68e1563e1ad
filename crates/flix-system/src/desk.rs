//! # Rental Desk
//!
//! Session handling on top of the rental engine: one administrator or one
//! customer at a time, directory changes gated on the administrator.
//!
//! ## Session States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │              login(admin id, admin credential)                          │
//! │      ┌──────────────────────────────────────────────► Admin             │
//! │      │                                                 │                │
//! │    Idle ◄──────────────── logout() ────────────────────┤                │
//! │      │                                                 │                │
//! │      └──────────────────────────────────────────────► Customer          │
//! │              login(account id, credential)                              │
//! │              + deferred fulfillment scan                                │
//! │                                                                         │
//! │  Admin:    add_account, cancel_account                                  │
//! │  Customer: reserve, promote, unreserve, return, home/waiting listings   │
//! │  Anyone:   catalog listing, account listing                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use flix_core::{
    AccountDirectory, AccountSummary, Catalog, CatalogEntryView, ItemId, RentalCoordinator,
    RentalManager, RequestOutcome,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{AdminSettings, DeskConfig};
use crate::error::{DeskError, DeskResult};
use crate::loader::load_catalog;

// =============================================================================
// Session
// =============================================================================

/// Who is logged in, with a per-login id for correlating log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub user: String,
    pub started_at: DateTime<Utc>,
}

impl SessionInfo {
    fn open(user: &str) -> Self {
        SessionInfo {
            session_id: Uuid::new_v4(),
            user: user.to_string(),
            started_at: Utc::now(),
        }
    }
}

/// The desk's session slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Idle,
    Admin(SessionInfo),
    Customer(SessionInfo),
}

impl Session {
    pub fn info(&self) -> Option<&SessionInfo> {
        match self {
            Session::Idle => None,
            Session::Admin(info) | Session::Customer(info) => Some(info),
        }
    }

    pub fn role(&self) -> Option<SessionRole> {
        match self {
            Session::Idle => None,
            Session::Admin(_) => Some(SessionRole::Admin),
            Session::Customer(_) => Some(SessionRole::Customer),
        }
    }
}

/// Which kind of session a login opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionRole {
    Admin,
    Customer,
}

// =============================================================================
// Account Manager Trait
// =============================================================================

/// Login and account administration.
pub trait AccountManager {
    /// Opens an administrator or customer session.
    ///
    /// ## Errors
    /// - `AlreadyLoggedIn` when anyone is logged in
    /// - `Core(NoSuchAccount | BadCredential)` for unknown customers
    fn login(&mut self, id: &str, credential: &str) -> DeskResult<SessionRole>;

    /// Ends whichever session is active. No-op when idle.
    fn logout(&mut self) -> Option<SessionInfo>;

    fn is_admin_logged_in(&self) -> bool;

    fn is_customer_logged_in(&self) -> bool;

    /// Registers an account. Administrator only.
    fn add_account(&mut self, id: &str, credential: &str, limit: i64)
        -> DeskResult<AccountSummary>;

    /// Removes an account and restores its held copies. Administrator only.
    fn cancel_account(&mut self, id: &str) -> DeskResult<AccountSummary>;

    /// Account ids, one per line; `None` when there are none.
    fn list_accounts(&self) -> Option<String>;
}

// =============================================================================
// Rental Desk
// =============================================================================

/// The rental engine plus its session slot.
#[derive(Debug, Clone)]
pub struct RentalDesk {
    admin: AdminSettings,
    rentals: RentalCoordinator,
    session: Session,
}

impl RentalDesk {
    /// Builds a desk over `catalog` with an empty directory sized by `config`.
    pub fn new(catalog: Catalog, config: &DeskConfig) -> Self {
        RentalDesk {
            admin: config.admin.clone(),
            rentals: RentalCoordinator::new(
                catalog,
                AccountDirectory::with_capacity(config.capacity()),
            ),
            session: Session::Idle,
        }
    }

    /// Loads the configured catalog file and builds a desk over it.
    pub fn from_config(config: &DeskConfig) -> DeskResult<Self> {
        let catalog = load_catalog(config.catalog_path())?;
        Ok(Self::new(catalog, config))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn rentals(&self) -> &RentalCoordinator {
        &self.rentals
    }

    fn session_id(&self) -> Option<Uuid> {
        self.session.info().map(|info| info.session_id)
    }

    fn title_of(&self, item: ItemId) -> &str {
        self.rentals
            .catalog()
            .item(item)
            .map(|entry| entry.title())
            .unwrap_or("?")
    }

    fn require_admin(&self) -> DeskResult<()> {
        match self.session {
            Session::Admin(_) => Ok(()),
            _ => Err(DeskError::AdminRequired),
        }
    }

    fn require_customer(&self) -> DeskResult<()> {
        match self.session {
            Session::Customer(_) => Ok(()),
            _ => Err(DeskError::NotLoggedIn),
        }
    }

    // =========================================================================
    // Rental Operations
    // =========================================================================

    /// Requests the catalog item at `position`.
    pub fn reserve(&mut self, position: usize) -> DeskResult<RequestOutcome> {
        self.require_customer()?;
        let outcome = self.rentals.reserve_at(position)?;
        let item = self.rentals.catalog().id_at(position)?;
        info!(
            session_id = ?self.session_id(),
            title = %self.title_of(item),
            outcome = ?outcome,
            "Reservation placed"
        );
        Ok(outcome)
    }

    /// Moves a waiting entry one slot toward the front.
    pub fn promote(&mut self, position: usize) -> DeskResult<()> {
        self.require_customer()?;
        self.rentals.promote_waiting(position)?;
        debug!(session_id = ?self.session_id(), position, "Waiting entry promoted");
        Ok(())
    }

    /// Drops a waiting entry.
    pub fn unreserve(&mut self, position: usize) -> DeskResult<()> {
        self.require_customer()?;
        let item = self.rentals.cancel_waiting(position)?;
        info!(
            session_id = ?self.session_id(),
            title = %self.title_of(item),
            "Reservation cancelled"
        );
        Ok(())
    }

    /// Returns a held item. Yields the item promoted from waiting, if any.
    pub fn return_item(&mut self, position: usize) -> DeskResult<Option<ItemId>> {
        self.require_customer()?;
        let promoted = self.rentals.return_at(position)?;
        info!(session_id = ?self.session_id(), position, "Item returned");
        if let Some(item) = promoted {
            info!(
                session_id = ?self.session_id(),
                title = %self.title_of(item),
                "Waiting request fulfilled"
            );
        }
        Ok(promoted)
    }

    // =========================================================================
    // Listings
    // =========================================================================

    pub fn catalog_listing(&self) -> Option<String> {
        self.rentals.list_catalog()
    }

    /// Held titles of the logged-in customer.
    pub fn active_listing(&self) -> DeskResult<Option<String>> {
        self.require_customer()?;
        Ok(self.rentals.list_active_queue()?)
    }

    /// Waiting titles of the logged-in customer.
    pub fn waiting_listing(&self) -> DeskResult<Option<String>> {
        self.require_customer()?;
        Ok(self.rentals.list_waiting_queue()?)
    }

    pub fn catalog_entries(&self) -> Vec<CatalogEntryView> {
        self.rentals.catalog().entries()
    }

    /// Directory summaries. Administrator only.
    pub fn account_summaries(&self) -> DeskResult<Vec<AccountSummary>> {
        self.require_admin()?;
        Ok(self.rentals.directory().summaries())
    }

    /// Catalog entries as pretty JSON.
    pub fn catalog_json(&self) -> DeskResult<String> {
        Ok(serde_json::to_string_pretty(&self.catalog_entries())?)
    }
}

impl AccountManager for RentalDesk {
    fn login(&mut self, id: &str, credential: &str) -> DeskResult<SessionRole> {
        if let Some(current) = self.session.info() {
            warn!(user = %id, current = %current.user, "Login refused, session already open");
            return Err(DeskError::AlreadyLoggedIn(current.user.clone()));
        }

        if self.admin.matches(id, credential) {
            let info = SessionInfo::open(id);
            info!(session_id = %info.session_id, "Administrator logged in");
            self.session = Session::Admin(info);
            return Ok(SessionRole::Admin);
        }

        let promoted = self.rentals.begin_session(id, credential).map_err(|e| {
            warn!(user = %id, error = %e, "Login rejected");
            DeskError::from(e)
        })?;
        let user = self.rentals.active_id().unwrap_or(id).to_string();
        let info = SessionInfo::open(&user);
        info!(session_id = %info.session_id, account = %user, "Customer logged in");
        let session_id = info.session_id;
        self.session = Session::Customer(info);

        if let Some(item) = promoted {
            info!(
                session_id = %session_id,
                title = %self.title_of(item),
                "Waiting request fulfilled at login"
            );
        }
        Ok(SessionRole::Customer)
    }

    fn logout(&mut self) -> Option<SessionInfo> {
        match std::mem::take(&mut self.session) {
            Session::Idle => None,
            Session::Admin(info) => {
                info!(session_id = %info.session_id, "Administrator logged out");
                Some(info)
            }
            Session::Customer(info) => {
                self.rentals.end_session();
                info!(session_id = %info.session_id, account = %info.user, "Customer logged out");
                Some(info)
            }
        }
    }

    fn is_admin_logged_in(&self) -> bool {
        matches!(self.session, Session::Admin(_))
    }

    fn is_customer_logged_in(&self) -> bool {
        matches!(self.session, Session::Customer(_))
    }

    fn add_account(
        &mut self,
        id: &str,
        credential: &str,
        limit: i64,
    ) -> DeskResult<AccountSummary> {
        self.require_admin()?;
        let summary = self.rentals.register_account(id, credential, limit)?;
        info!(
            session_id = ?self.session_id(),
            account = %summary.id,
            limit = summary.limit,
            "Account registered"
        );
        Ok(summary)
    }

    fn cancel_account(&mut self, id: &str) -> DeskResult<AccountSummary> {
        self.require_admin()?;
        let summary = self.rentals.deregister_account(id)?;
        info!(session_id = ?self.session_id(), account = %summary.id, "Account cancelled");
        Ok(summary)
    }

    fn list_accounts(&self) -> Option<String> {
        self.rentals.list_accounts()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use flix_core::{CoreError, ErrorKind};
    use std::io::Write;

    const MOVIES: [&str; 5] = [
        "1 Frozen",
        "1 Gravity",
        "1 How to Train Your Dragon 2",
        "0 Spectre",
        "0 Warcraft",
    ];

    fn desk() -> RentalDesk {
        let catalog = Catalog::load(MOVIES).unwrap();
        let mut desk = RentalDesk::new(catalog, &DeskConfig::default());
        desk.login("admin", "admin").unwrap();
        desk.add_account("id1", "pw1", 2).unwrap();
        desk.add_account("id2", "pw2", 3).unwrap();
        desk.logout();
        desk
    }

    #[test]
    fn test_admin_session() {
        let mut desk = desk();
        assert!(!desk.is_admin_logged_in());
        assert_eq!(desk.login("admin", "admin").unwrap(), SessionRole::Admin);
        assert!(desk.is_admin_logged_in());
        assert!(!desk.is_customer_logged_in());

        desk.add_account("id3", "pw3", 1).unwrap();
        assert_eq!(desk.list_accounts().unwrap(), "id1\nid2\nid3\n");
        assert_eq!(desk.account_summaries().unwrap().len(), 3);

        let info = desk.logout().unwrap();
        assert_eq!(info.user, "admin");
        assert!(!desk.is_admin_logged_in());
        assert!(desk.logout().is_none());
    }

    #[test]
    fn test_directory_changes_need_admin() {
        let mut desk = desk();
        assert!(matches!(
            desk.add_account("id3", "pw3", 1),
            Err(DeskError::AdminRequired)
        ));

        desk.login("id1", "pw1").unwrap();
        assert!(matches!(
            desk.cancel_account("id2"),
            Err(DeskError::AdminRequired)
        ));
        assert!(matches!(desk.account_summaries(), Err(DeskError::AdminRequired)));
        assert_eq!(desk.list_accounts().unwrap(), "id1\nid2\n");
    }

    #[test]
    fn test_single_session() {
        let mut desk = desk();
        desk.login("id1", "pw1").unwrap();
        assert!(matches!(
            desk.login("admin", "admin"),
            Err(DeskError::AlreadyLoggedIn(user)) if user == "id1"
        ));
        desk.logout();
        desk.login("admin", "admin").unwrap();
        assert!(matches!(
            desk.login("id2", "pw2"),
            Err(DeskError::AlreadyLoggedIn(_))
        ));
    }

    #[test]
    fn test_bad_login_leaves_desk_idle() {
        let mut desk = desk();
        let err = desk.login("id1", "nope").unwrap_err();
        assert_eq!(err.core_kind(), Some(ErrorKind::BadCredential));
        let err = desk.login("ghost", "pw").unwrap_err();
        assert_eq!(err.core_kind(), Some(ErrorKind::NoSuchAccount));
        assert_eq!(desk.session(), &Session::Idle);

        // Admin credentials are exact.
        let err = desk.login("admin", "Admin").unwrap_err();
        assert_eq!(err.core_kind(), Some(ErrorKind::NoSuchAccount));
    }

    #[test]
    fn test_customer_rentals() {
        let mut desk = desk();
        assert_eq!(desk.login("id1", "pw1").unwrap(), SessionRole::Customer);

        assert_eq!(desk.reserve(0).unwrap(), RequestOutcome::Held);
        assert_eq!(desk.reserve(1).unwrap(), RequestOutcome::Held);
        assert_eq!(desk.reserve(2).unwrap(), RequestOutcome::Waiting);
        assert_eq!(desk.reserve(3).unwrap(), RequestOutcome::Waiting);
        assert_eq!(desk.active_listing().unwrap().unwrap(), "Frozen\nGravity\n");
        assert_eq!(
            desk.waiting_listing().unwrap().unwrap(),
            "How to Train Your Dragon 2\nSpectre\n"
        );

        desk.promote(1).unwrap();
        desk.unreserve(1).unwrap();
        assert_eq!(desk.waiting_listing().unwrap().unwrap(), "Spectre\n");

        // Spectre still has no copy in, so nothing is promoted.
        assert_eq!(desk.return_item(0).unwrap(), None);
        assert_eq!(desk.active_listing().unwrap().unwrap(), "Gravity\n");
        assert!(desk.catalog_listing().unwrap().starts_with("Frozen\n"));
    }

    #[test]
    fn test_rentals_need_customer() {
        let mut desk = desk();
        assert!(matches!(desk.reserve(0), Err(DeskError::NotLoggedIn)));
        assert!(matches!(desk.active_listing(), Err(DeskError::NotLoggedIn)));

        desk.login("admin", "admin").unwrap();
        assert!(matches!(desk.return_item(0), Err(DeskError::NotLoggedIn)));
        assert!(matches!(desk.waiting_listing(), Err(DeskError::NotLoggedIn)));
        assert!(desk.catalog_listing().is_some());
    }

    #[test]
    fn test_engine_errors_pass_through() {
        let mut desk = desk();
        desk.login("id2", "pw2").unwrap();
        assert_eq!(desk.reserve(9).unwrap_err().core_kind(), Some(ErrorKind::OutOfRange));
        assert_eq!(desk.unreserve(0).unwrap_err().core_kind(), Some(ErrorKind::OutOfRange));
        desk.reserve(0).unwrap();
        assert!(matches!(
            desk.reserve(0),
            Err(DeskError::Core(CoreError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn test_cancel_account_restores_copies() {
        let mut desk = desk();
        desk.login("id1", "pw1").unwrap();
        desk.reserve(0).unwrap();
        desk.reserve(1).unwrap();
        desk.logout();
        assert_eq!(desk.rentals().catalog().at(0).unwrap().available_copies(), 0);

        desk.login("admin", "admin").unwrap();
        let summary = desk.cancel_account("id1").unwrap();
        assert_eq!(summary.id, "id1");
        assert_eq!(desk.rentals().catalog().at(0).unwrap().available_copies(), 1);
        assert_eq!(desk.rentals().catalog().at(1).unwrap().available_copies(), 1);
        assert_eq!(desk.list_accounts().unwrap(), "id2\n");
    }

    #[test]
    fn test_login_fulfills_waiting_request() {
        let mut desk = desk();
        desk.login("id1", "pw1").unwrap();
        desk.reserve(0).unwrap();
        desk.logout();

        desk.login("id2", "pw2").unwrap();
        assert_eq!(desk.reserve(0).unwrap(), RequestOutcome::Waiting);
        desk.logout();

        desk.login("id1", "pw1").unwrap();
        desk.return_item(0).unwrap();
        desk.logout();

        desk.login("id2", "pw2").unwrap();
        assert_eq!(desk.active_listing().unwrap().unwrap(), "Frozen\n");
        assert_eq!(desk.waiting_listing().unwrap(), None);
    }

    #[test]
    fn test_configured_capacity() {
        let mut config = DeskConfig::default();
        config.directory.capacity = 1;
        let mut desk = RentalDesk::new(Catalog::new(), &config);
        desk.login("admin", "admin").unwrap();
        desk.add_account("a", "pw", 1).unwrap();
        assert_eq!(
            desk.add_account("b", "pw", 1).unwrap_err().core_kind(),
            Some(ErrorKind::DirectoryFull)
        );
    }

    #[test]
    fn test_from_config_reads_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "2 Gravity").unwrap();
        writeln!(file, "1 Frozen").unwrap();

        let mut config = DeskConfig::default();
        config.catalog.path = file.path().to_path_buf();
        let desk = RentalDesk::from_config(&config).unwrap();
        assert_eq!(desk.catalog_listing().unwrap(), "Frozen\nGravity\n");
    }

    #[test]
    fn test_json_views() {
        let mut desk = desk();
        let json: serde_json::Value = serde_json::from_str(&desk.catalog_json().unwrap()).unwrap();
        assert_eq!(json[3]["displayName"], "Spectre (currently unavailable)");

        desk.login("id1", "pw1").unwrap();
        let session = serde_json::to_value(desk.session()).unwrap();
        assert_eq!(session["role"], "customer");
        assert_eq!(session["user"], "id1");
    }
}
