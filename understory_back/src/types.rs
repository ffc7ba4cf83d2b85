// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for back dispatch: handlers, handles, the input signal, and observer events.
//!
//! ## Overview
//!
//! These types describe the boundary of the registry.
//! A [`BackHandler`] is the capability being dispatched to, a [`HandlerRef`] is how the
//! [registry](crate::registry::BackRegistry) holds on to one without owning it, and a
//! [`BackSignal`] is the externally owned input source whose listening state the registry drives.

use alloc::rc::Rc;
use alloc::sync::Arc;
use core::cell::RefCell;

/// A consumer that can react to a back request.
///
/// Calling [`on_back`](BackHandler::on_back) is a side-effecting request (close a dialog,
/// pop a navigation level, ...), not a query. What happens is entirely up to the implementer.
///
/// Any `Fn()` closure is a handler, which is handy for small hosts and tests:
///
/// ```
/// use std::rc::Rc;
/// use understory_back::types::{BackHandler, HandlerRef};
///
/// let handler: Rc<dyn BackHandler> = Rc::new(|| println!("back"));
/// handler.on_back();
/// assert!(handler.same_handler(&handler.clone()));
/// ```
pub trait BackHandler {
    /// React to a back request.
    fn on_back(&self);
}

impl<F: Fn()> BackHandler for F {
    #[inline]
    fn on_back(&self) {
        self();
    }
}

/// A cheap, cloneable handle to a [`BackHandler`] that the registry can store.
///
/// The registry never owns handlers; it stores handles and compares them by identity.
/// Two handles are the same handler when they point at the same object, regardless of
/// whether the objects would compare equal by value.
///
/// Implemented for `Rc<T>`, `Arc<T>` and `&T` where `T: BackHandler + ?Sized`.
///
/// Note: identity is address based, so distinct zero-sized handlers borrowed as `&T`
/// may compare as the same handler. Give such handlers a field or use `Rc`.
pub trait HandlerRef: Clone {
    /// Forward a back request to the referenced handler.
    fn on_back(&self);

    /// Returns `true` if `self` and `other` refer to the same handler object.
    fn same_handler(&self, other: &Self) -> bool;
}

impl<T: BackHandler + ?Sized> HandlerRef for Rc<T> {
    #[inline]
    fn on_back(&self) {
        T::on_back(self);
    }

    #[inline]
    fn same_handler(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: BackHandler + ?Sized> HandlerRef for Arc<T> {
    #[inline]
    fn on_back(&self) {
        T::on_back(self);
    }

    #[inline]
    fn same_handler(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: BackHandler + ?Sized> HandlerRef for &T {
    #[inline]
    fn on_back(&self) {
        T::on_back(self);
    }

    #[inline]
    fn same_handler(&self, other: &Self) -> bool {
        core::ptr::addr_eq(*self as *const T, *other as *const T)
    }
}

/// The external back input (hardware button, escape key, platform gesture).
///
/// The registry enables the signal whenever a handler is registered and disables it when
/// the last handler goes away. Occurrences of the signal are delivered by the host calling
/// [`BackRegistry::back_performed`](crate::registry::BackRegistry::back_performed).
///
/// Both calls may be repeated; implementations must treat them as idempotent.
/// Implementations must not call back into the registry.
pub trait BackSignal {
    /// Start listening for the back input.
    fn enable(&mut self);
    /// Stop listening for the back input.
    fn disable(&mut self);
}

impl<S: BackSignal + ?Sized> BackSignal for &mut S {
    #[inline]
    fn enable(&mut self) {
        S::enable(self);
    }

    #[inline]
    fn disable(&mut self) {
        S::disable(self);
    }
}

/// Shares a signal that the host keeps polling while the registry toggles it.
impl<S: BackSignal + ?Sized> BackSignal for Rc<RefCell<S>> {
    fn enable(&mut self) {
        self.borrow_mut().enable();
    }

    fn disable(&mut self) {
        self.borrow_mut().disable();
    }
}

/// A signal with no listening state, for hosts that deliver back unconditionally.
impl BackSignal for () {
    #[inline]
    fn enable(&mut self) {}

    #[inline]
    fn disable(&mut self) {}
}

/// Strategy used by [`late_dispose`](crate::registry::BackRegistry::late_dispose) to
/// unregister whatever is still registered at shutdown.
///
/// The choice changes which unregister notifications shutdown emits.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DrainPolicy {
    /// Unregister from the front until the stack is empty.
    ///
    /// Every remaining handler is notified, newest first, and the signal ends up disabled.
    #[default]
    Full,
    /// Walk ascending indices over the stack while it shrinks.
    ///
    /// Every removal shifts the rest down by one, so this skips every other handler.
    /// With `A`, `B`, `C` registered in that order (stack `[C, B, A]`), only `C` and `A`
    /// are unregistered; `B` stays registered and the signal stays enabled.
    /// Kept for hosts that depend on the historical notification sequence.
    Alternating,
}

/// Subscription state of the registry's dispatch callback.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Binding {
    /// Constructed, not yet initialized. Back occurrences are ignored.
    #[default]
    Unbound,
    /// Initialized. Back occurrences are dispatched.
    Bound,
    /// Disposed. Back occurrences are ignored for good.
    Released,
}

/// Payload-free discriminant of a [`RegistryEvent`], used to filter observers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// A handler was registered.
    Registered,
    /// A handler was unregistered.
    Unregistered,
}

/// Notification delivered to registry observers.
///
/// Emitted after the stack and the signal have been updated.
#[derive(Clone, Debug)]
pub enum RegistryEvent<H> {
    /// `H` was pushed to the front and is now the active handler.
    Registered(H),
    /// `H` was removed from the stack.
    Unregistered(H),
}

impl<H> RegistryEvent<H> {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Registered(_) => EventKind::Registered,
            Self::Unregistered(_) => EventKind::Unregistered,
        }
    }

    /// The handler affected by this event.
    pub fn handler(&self) -> &H {
        match self {
            Self::Registered(h) | Self::Unregistered(h) => h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct Counter(Cell<u32>);

    impl BackHandler for Counter {
        fn on_back(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn rc_identity_ignores_value_equality() {
        let a: Rc<dyn BackHandler> = Rc::new(Counter(Cell::new(0)));
        let b: Rc<dyn BackHandler> = Rc::new(Counter(Cell::new(0)));
        assert!(a.same_handler(&a.clone()));
        assert!(!a.same_handler(&b));
    }

    #[test]
    fn arc_identity() {
        let a = Arc::new(Counter(Cell::new(0)));
        let b = Arc::new(Counter(Cell::new(0)));
        assert!(a.same_handler(&Arc::clone(&a)));
        assert!(!a.same_handler(&b));
    }

    #[test]
    fn borrowed_identity_and_forwarding() {
        let a = Counter(Cell::new(0));
        let b = Counter(Cell::new(0));
        let ra: &dyn BackHandler = &a;
        let rb: &dyn BackHandler = &b;
        assert!(ra.same_handler(&ra));
        assert!(!ra.same_handler(&rb));

        HandlerRef::on_back(&ra);
        HandlerRef::on_back(&ra);
        assert_eq!(a.0.get(), 2);
        assert_eq!(b.0.get(), 0);
    }

    #[test]
    fn closures_are_handlers() {
        let hits = Rc::new(Cell::new(0));
        let h = {
            let hits = hits.clone();
            Rc::new(move || hits.set(hits.get() + 1))
        };
        HandlerRef::on_back(&h);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn shared_signal_forwards() {
        #[derive(Default)]
        struct Flag(bool);
        impl BackSignal for Flag {
            fn enable(&mut self) {
                self.0 = true;
            }
            fn disable(&mut self) {
                self.0 = false;
            }
        }

        let shared = Rc::new(RefCell::new(Flag::default()));
        let mut handle = shared.clone();
        handle.enable();
        assert!(shared.borrow().0);
        handle.disable();
        assert!(!shared.borrow().0);

        let mut owned = Flag::default();
        {
            let mut by_ref = &mut owned;
            BackSignal::enable(&mut by_ref);
        }
        assert!(owned.0);
    }

    #[test]
    fn event_accessors() {
        let e = RegistryEvent::Registered(7_u32);
        assert_eq!(e.kind(), EventKind::Registered);
        assert_eq!(*e.handler(), 7);
        let e = RegistryEvent::Unregistered(9_u32);
        assert_eq!(e.kind(), EventKind::Unregistered);
        assert_eq!(*e.handler(), 9);
    }

    #[test]
    fn defaults() {
        assert_eq!(DrainPolicy::default(), DrainPolicy::Full);
        assert_eq!(Binding::default(), Binding::Unbound);
    }
}
