//! # Account Directory
//!
//! Bounded roster of accounts, kept in case-insensitive id order.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  register(id, credential, limit)                                        │
//! │    validate → duplicate? → full? → sorted insert (key: id lower-case)   │
//! │                                                                         │
//! │  authenticate(id, credential)                                           │
//! │    exact id match → NoSuchAccount | BadCredential | &mut Account        │
//! │                                                                         │
//! │  deregister(id, catalog)                                                │
//! │    exact id match → Account::close (copies back) → remove & compact     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::account::Account;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::sequence::OrderedSequence;
use crate::types::{render_listing, AccountSummary};
use crate::validation::{validate_account_id, validate_credential};
use crate::DEFAULT_DIRECTORY_CAPACITY;

/// The sorted, bounded account roster.
#[derive(Debug, Clone)]
pub struct AccountDirectory {
    accounts: OrderedSequence<Account>,
    capacity: usize,
}

impl Default for AccountDirectory {
    fn default() -> Self {
        AccountDirectory::with_capacity(DEFAULT_DIRECTORY_CAPACITY)
    }
}

impl AccountDirectory {
    /// Creates an empty directory with the default capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty directory holding at most `capacity` accounts.
    pub fn with_capacity(capacity: usize) -> Self {
        AccountDirectory {
            accounts: OrderedSequence::new(),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Registers a new account.
    ///
    /// ## Example
    /// ```rust
    /// use flix_core::AccountDirectory;
    ///
    /// let mut directory = AccountDirectory::new();
    /// directory.register("b", "pw2", 3).unwrap();
    /// directory.register("A", "pw1", 5).unwrap();
    /// assert_eq!(directory.listing().unwrap(), "A\nb\n");
    /// assert!(directory.register("b", "other", 1).is_err());
    /// ```
    pub fn register(&mut self, id: &str, credential: &str, limit: i64) -> CoreResult<&Account> {
        let id = validate_account_id(id)?;
        let credential = validate_credential(credential)?;

        if self.find(id).is_some() {
            return Err(CoreError::DuplicateAccount(id.to_string()));
        }
        if self.accounts.len() >= self.capacity {
            return Err(CoreError::DirectoryFull {
                capacity: self.capacity,
            });
        }

        let account = Account::new(id, credential, limit)?;
        let position = self
            .accounts
            .insert_sorted_by(account, |a, b| a.compare_by_id(b));
        self.accounts.get(position)
    }

    /// Checks credentials and hands back the matching account.
    pub fn authenticate(&mut self, id: &str, credential: &str) -> CoreResult<&mut Account> {
        let position = self
            .find(id)
            .ok_or_else(|| CoreError::NoSuchAccount(id.to_string()))?;
        let account = self.accounts.get_mut(position)?;
        if !account.verify_credential(credential) {
            return Err(CoreError::BadCredential(id.to_string()));
        }
        Ok(account)
    }

    /// Closes and removes the account with `id`, returning it.
    ///
    /// Every held copy is back in `catalog` before the account leaves.
    pub fn deregister(&mut self, id: &str, catalog: &mut Catalog) -> CoreResult<Account> {
        let position = self
            .find(id)
            .ok_or_else(|| CoreError::NoSuchAccount(id.to_string()))?;
        self.accounts.get_mut(position)?.close(catalog);
        self.accounts.remove_at(position)
    }

    /// Position of the account with exactly this (trimmed) id.
    pub fn find(&self, id: &str) -> Option<usize> {
        let id = id.trim();
        self.accounts.position(|account| account.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&Account> {
        let position = self.find(id)?;
        self.accounts.get(position).ok()
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Account> {
        let position = self.find(id)?;
        self.accounts.get_mut(position).ok()
    }

    /// Account at directory `position`.
    pub fn at(&self, position: usize) -> CoreResult<&Account> {
        self.accounts.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Account> {
        self.accounts.iter()
    }

    /// Ids one per line, `None` when no account is registered.
    pub fn listing(&self) -> Option<String> {
        render_listing(self.accounts.iter().map(Account::id))
    }

    pub fn summaries(&self) -> Vec<AccountSummary> {
        self.accounts.iter().map(Account::summary).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
