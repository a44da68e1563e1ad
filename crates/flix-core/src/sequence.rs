//! # Ordered Sequence
//!
//! The single position-addressable container that the catalog ordering, the
//! account directory and every per-account queue are built on.
//!
//! ## Position Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  position:    0        1        2        3                              │
//! │             ┌────┐   ┌────┐   ┌────┐   ┌────┐                           │
//! │             │ A  │   │ B  │   │ C  │   │ D  │                           │
//! │             └────┘   └────┘   └────┘   └────┘                           │
//! │                                                                         │
//! │  insert_at(1, X)      → A X B C D   (B, C, D shift back one slot)       │
//! │  remove_at(1)         → A C D       (C, D shift forward one slot)       │
//! │  move_toward_front(2) → A C B D     (swap with position 1)              │
//! │  move_toward_front(0) → A B C D     (no-op, never an error)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Traversal is index based: [`OrderedSequence::iter`] hands out an ordinary
//! borrowing iterator, so any number of passes may run side by side and the
//! borrow checker rules out mutation during a pass.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// An insertion-ordered, position-addressable sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderedSequence<T> {
    items: Vec<T>,
}

impl<T> Default for OrderedSequence<T> {
    fn default() -> Self {
        OrderedSequence { items: Vec::new() }
    }
}

impl<T> OrderedSequence<T> {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the element at `position`.
    ///
    /// ## Example
    /// ```rust
    /// use flix_core::OrderedSequence;
    ///
    /// let mut seq = OrderedSequence::new();
    /// seq.push_back("Frozen");
    /// assert_eq!(seq.get(0), Ok(&"Frozen"));
    /// assert!(seq.get(1).is_err());
    /// ```
    pub fn get(&self, position: usize) -> CoreResult<&T> {
        self.items
            .get(position)
            .ok_or_else(|| CoreError::out_of_range(position, self.items.len()))
    }

    /// Mutable access to the element at `position`.
    pub fn get_mut(&mut self, position: usize) -> CoreResult<&mut T> {
        let len = self.items.len();
        self.items
            .get_mut(position)
            .ok_or_else(|| CoreError::out_of_range(position, len))
    }

    /// Inserts `value` at `position`, shifting later elements back.
    ///
    /// `position == len()` appends.
    pub fn insert_at(&mut self, position: usize, value: T) -> CoreResult<()> {
        if position > self.items.len() {
            return Err(CoreError::out_of_range(position, self.items.len()));
        }
        self.items.insert(position, value);
        Ok(())
    }

    /// Appends `value` at the rear.
    pub fn push_back(&mut self, value: T) {
        self.items.push(value);
    }

    /// Removes and returns the element at `position`, shifting later
    /// elements forward.
    pub fn remove_at(&mut self, position: usize) -> CoreResult<T> {
        if position >= self.items.len() {
            return Err(CoreError::out_of_range(position, self.items.len()));
        }
        Ok(self.items.remove(position))
    }

    /// Swaps the element at `position` with its predecessor.
    ///
    /// Position 0 is a no-op, even on an empty sequence.
    pub fn move_toward_front(&mut self, position: usize) -> CoreResult<()> {
        if position == 0 {
            return Ok(());
        }
        if position >= self.items.len() {
            return Err(CoreError::out_of_range(position, self.items.len()));
        }
        self.items.swap(position - 1, position);
        Ok(())
    }

    /// Position of the first element matching `predicate`.
    pub fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().position(predicate)
    }

    /// Inserts `value` before the first element that compares greater.
    ///
    /// Linear scan; elements that compare equal keep insertion order.
    /// Returns the position the value landed at.
    pub fn insert_sorted_by<F>(&mut self, value: T, mut compare: F) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let position = self
            .items
            .iter()
            .position(|existing| compare(existing, &value) == Ordering::Greater)
            .unwrap_or(self.items.len());
        self.items.insert(position, value);
        position
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drains all elements front to back.
    pub fn drain(&mut self) -> std::vec::Drain<'_, T> {
        self.items.drain(..)
    }

    /// Restartable front-to-back traversal.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<'a, T> IntoIterator for &'a OrderedSequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> FromIterator<T> for OrderedSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        OrderedSequence {
            items: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
