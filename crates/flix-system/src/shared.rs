//! # Shared Desk
//!
//! Thread-safe handle to a [`RentalDesk`].
//!
//! `request`, `return` and the login scan read then write the shared copy
//! counters, so every call runs under one lock.
//!
//! ```text
//! thread A ──┐
//! thread B ──┼──► Arc<Mutex<RentalDesk>> ──► one operation at a time
//! thread C ──┘
//! ```

use std::sync::{Arc, Mutex};

use crate::desk::RentalDesk;
use crate::error::{DeskError, DeskResult};

/// Cloneable handle; all clones share one desk.
#[derive(Debug, Clone)]
pub struct SharedDesk {
    desk: Arc<Mutex<RentalDesk>>,
}

impl SharedDesk {
    pub fn new(desk: RentalDesk) -> Self {
        SharedDesk {
            desk: Arc::new(Mutex::new(desk)),
        }
    }

    /// Executes a function with read access to the desk.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let listing = shared.with_desk(|desk| desk.catalog_listing())?;
    /// ```
    pub fn with_desk<F, R>(&self, f: F) -> DeskResult<R>
    where
        F: FnOnce(&RentalDesk) -> R,
    {
        let desk = self.desk.lock().map_err(|_| DeskError::LockPoisoned)?;
        Ok(f(&desk))
    }

    /// Executes a function with write access to the desk.
    pub fn with_desk_mut<F, R>(&self, f: F) -> DeskResult<R>
    where
        F: FnOnce(&mut RentalDesk) -> R,
    {
        let mut desk = self.desk.lock().map_err(|_| DeskError::LockPoisoned)?;
        Ok(f(&mut desk))
    }
}

impl From<RentalDesk> for SharedDesk {
    fn from(desk: RentalDesk) -> Self {
        SharedDesk::new(desk)
    }
}
