// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer list for registry notifications.
//!
//! Observers are plain callbacks keyed by an [`ObserverId`]. They can listen to every
//! [`RegistryEvent`] or to a single [`EventKind`].
//!
//! Delivery always goes through a [snapshot](Observers::snapshot) of the list, taken before
//! the first callback runs. Observers added or removed while a notification is in flight
//! take effect from the next notification onward.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::types::{EventKind, RegistryEvent};

/// Shared observer callback.
pub type Callback<H> = Rc<dyn Fn(&RegistryEvent<H>)>;

/// Identifier returned when subscribing; pass it back to unsubscribe.
///
/// Identifiers increase monotonically and are never reused by the same list.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

struct Entry<H> {
    id: ObserverId,
    filter: Option<EventKind>,
    callback: Callback<H>,
}

/// Ordered list of observers, in subscription order.
pub struct Observers<H> {
    next: u64,
    entries: Vec<Entry<H>>,
}

impl<H> core::fmt::Debug for Observers<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<H> Default for Observers<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Observers<H> {
    /// Create an empty observer list.
    pub const fn new() -> Self {
        Self {
            next: 0,
            entries: Vec::new(),
        }
    }

    /// Number of subscribed observers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subscribe `callback`.
    ///
    /// With `filter` set, the callback only receives events of that kind.
    pub fn subscribe(
        &mut self,
        filter: Option<EventKind>,
        callback: impl Fn(&RegistryEvent<H>) + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.next);
        self.next += 1;
        self.entries.push(Entry {
            id,
            filter,
            callback: Rc::new(callback),
        });
        id
    }

    /// Remove the observer with `id`. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let Some(i) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        self.entries.remove(i);
        true
    }

    /// Callbacks interested in `kind`, in subscription order.
    pub fn snapshot(&self, kind: EventKind) -> Vec<Callback<H>> {
        self.entries
            .iter()
            .filter(|e| e.filter.is_none_or(|f| f == kind))
            .map(|e| e.callback.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::RefCell;

    fn deliver(obs: &Observers<u32>, event: &RegistryEvent<u32>) {
        for f in obs.snapshot(event.kind()) {
            f(event);
        }
    }

    #[test]
    fn filters_by_kind() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut obs: Observers<u32> = Observers::new();
        {
            let seen = seen.clone();
            obs.subscribe(Some(EventKind::Registered), move |e| {
                seen.borrow_mut().push(("reg", *e.handler()));
            });
        }
        {
            let seen = seen.clone();
            obs.subscribe(Some(EventKind::Unregistered), move |e| {
                seen.borrow_mut().push(("unreg", *e.handler()));
            });
        }
        {
            let seen = seen.clone();
            obs.subscribe(None, move |e| {
                seen.borrow_mut().push(("any", *e.handler()));
            });
        }

        deliver(&obs, &RegistryEvent::Registered(1));
        deliver(&obs, &RegistryEvent::Unregistered(2));
        assert_eq!(
            *seen.borrow(),
            vec![("reg", 1), ("any", 1), ("unreg", 2), ("any", 2)]
        );
    }

    #[test]
    fn unsubscribe_by_id() {
        let hits = Rc::new(RefCell::new(0));
        let mut obs: Observers<u32> = Observers::new();
        let id = {
            let hits = hits.clone();
            obs.subscribe(None, move |_| *hits.borrow_mut() += 1)
        };
        deliver(&obs, &RegistryEvent::Registered(0));
        assert!(obs.unsubscribe(id));
        assert!(!obs.unsubscribe(id));
        deliver(&obs, &RegistryEvent::Registered(0));
        assert_eq!(*hits.borrow(), 1);
        assert!(obs.is_empty());
    }

    #[test]
    fn ids_are_not_reused() {
        let mut obs: Observers<u32> = Observers::new();
        let a = obs.subscribe(None, |_| {});
        obs.unsubscribe(a);
        let b = obs.subscribe(None, |_| {});
        assert_ne!(a, b);
        assert!(b > a);
    }

    // Snapshots are detached from later list changes.
    #[test]
    fn snapshot_is_stable() {
        let mut obs: Observers<u32> = Observers::new();
        let id = obs.subscribe(None, |_| {});
        let snap = obs.snapshot(EventKind::Registered);
        obs.unsubscribe(id);
        obs.subscribe(None, |_| {});
        obs.subscribe(None, |_| {});
        assert_eq!(snap.len(), 1);
        assert_eq!(obs.len(), 2);
    }
}
