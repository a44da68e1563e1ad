//! # flix-system: Rental Desk for Flix Rental
//!
//! Everything around the pure engine that touches the outside world:
//! configuration, the catalog file, and the session desk.
//!
//! ## Module Organization
//! ```text
//! flix_system/
//! ├── config.rs   ◄─── DeskConfig (defaults → TOML → env)
//! ├── loader.rs   ◄─── catalog file → Catalog
//! ├── desk.rs     ◄─── RentalDesk, AccountManager, sessions
//! ├── shared.rs   ◄─── SharedDesk (Arc<Mutex<RentalDesk>>)
//! └── error.rs    ◄─── DeskError
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use flix_system::{AccountManager, DeskConfig, RentalDesk};
//!
//! let config = DeskConfig::load_or_default(None);
//! let mut desk = RentalDesk::from_config(&config)?;
//!
//! desk.login("admin", "admin")?;
//! desk.add_account("alice", "secret", 2)?;
//! desk.logout();
//!
//! desk.login("alice", "secret")?;
//! desk.reserve(0)?;
//! println!("{}", desk.active_listing()?.unwrap_or_default());
//! # Ok::<(), flix_system::DeskError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod desk;
pub mod error;
pub mod loader;
pub mod shared;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AdminSettings, DeskConfig};
pub use desk::{AccountManager, RentalDesk, Session, SessionInfo, SessionRole};
pub use error::{DeskError, DeskResult};
pub use loader::{load_catalog, parse_catalog};
pub use shared::SharedDesk;
