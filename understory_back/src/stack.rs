// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler stack: the ordered set of registered back handlers.
//!
//! ## Ordering
//!
//! Position `0` is the front of the stack: the most recently pushed handler that has not been
//! removed. It is the only handler that receives back requests. Older handlers keep their
//! relative order and resume control as the ones above them are removed.
//!
//! ## Identity
//!
//! Lookups go through [`HandlerRef::same_handler`], so two handles are "the same" only when
//! they point at the same handler object. Duplicates are allowed; removal takes the
//! front-most match.
//!
//! ## Minimal example
//!
//! ```
//! use std::rc::Rc;
//! use understory_back::stack::BackStack;
//! use understory_back::types::BackHandler;
//!
//! let a: Rc<dyn BackHandler> = Rc::new(|| {});
//! let b: Rc<dyn BackHandler> = Rc::new(|| {});
//!
//! let mut stack = BackStack::new();
//! stack.push(a.clone());
//! stack.push(b.clone());
//! assert!(Rc::ptr_eq(stack.current().unwrap(), &b));
//!
//! stack.remove(&b);
//! assert!(Rc::ptr_eq(stack.current().unwrap(), &a));
//! ```

use alloc::vec::Vec;

use crate::types::HandlerRef;

/// Ordered stack of handler handles, front first.
///
/// This is plain data: it does not touch the input signal or notify anyone.
/// [`BackRegistry`](crate::registry::BackRegistry) layers those effects on top.
#[derive(Clone, Debug)]
pub struct BackStack<H> {
    // Stored oldest first so that pushing is amortized O(1); public indices count from the front.
    entries: Vec<H>,
}

impl<H> Default for BackStack<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> BackStack<H> {
    /// Create an empty stack.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of registered entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The active handler, if any.
    pub fn current(&self) -> Option<&H> {
        self.entries.last()
    }

    /// The entry at `index`, counting from the front (`0` is the active handler).
    pub fn get(&self, index: usize) -> Option<&H> {
        let len = self.entries.len();
        if index >= len {
            return None;
        }
        self.entries.get(len - 1 - index)
    }

    /// Push `handler` to the front, making it the active handler.
    pub fn push(&mut self, handler: H) {
        self.entries.push(handler);
    }

    /// Iterate entries from the front (newest) to the back (oldest).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &H> + ExactSizeIterator + '_ {
        self.entries.iter().rev()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<H: HandlerRef> BackStack<H> {
    /// Front-based index of the first entry that is the same handler as `handler`.
    pub fn position(&self, handler: &H) -> Option<usize> {
        self.iter().position(|h| h.same_handler(handler))
    }

    /// Returns `true` if `handler` is registered at least once.
    pub fn contains(&self, handler: &H) -> bool {
        self.position(handler).is_some()
    }

    /// Remove the front-most entry that is the same handler as `handler`.
    ///
    /// Returns the removed handle, or `None` if `handler` was not registered.
    /// Any further duplicates stay where they are.
    pub fn remove(&mut self, handler: &H) -> Option<H> {
        let from_back = self.entries.iter().rposition(|h| h.same_handler(handler))?;
        Some(self.entries.remove(from_back))
    }
}
