// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Back registry implementation.
//!
//! ## Overview
//!
//! Keeps the [handler stack](crate::stack::BackStack), forwards each back occurrence to the
//! active handler, and keeps the input signal listening only while something is registered.
//!
//! ## Signal
//!
//! - Every [`register`](BackRegistry::register) calls [`BackSignal::enable`], not just the
//!   first one. Enabling is idempotent.
//! - [`unregister`](BackRegistry::unregister) calls [`BackSignal::disable`] when it empties
//!   the stack.
//!
//! ## Lifecycle
//!
//! - [`initialize`](BackRegistry::initialize) subscribes the dispatch callback. Before that,
//!   registration works but [`back_performed`](BackRegistry::back_performed) does nothing.
//! - [`late_dispose`](BackRegistry::late_dispose) unsubscribes it and unregisters what is left
//!   according to the [`DrainPolicy`].
//!
//! ## Re-entrancy
//!
//! No internal borrow is held while a handler, an observer, or the signal runs. A handler may
//! unregister itself from `on_back`, and observers may register or unregister from inside a
//! notification.
//!
//! ## Example
//!
//! ```
//! use std::cell::{Cell, RefCell};
//! use std::rc::Rc;
//! use understory_back::registry::BackRegistry;
//! use understory_back::types::{BackHandler, BackSignal};
//!
//! #[derive(Default)]
//! struct Escape {
//!     enabled: bool,
//! }
//!
//! impl BackSignal for Escape {
//!     fn enable(&mut self) { self.enabled = true; }
//!     fn disable(&mut self) { self.enabled = false; }
//! }
//!
//! let escape = Rc::new(RefCell::new(Escape::default()));
//! let registry = BackRegistry::new(escape.clone());
//! registry.initialize().unwrap();
//!
//! let closed = Rc::new(Cell::new(0));
//! let dialog: Rc<dyn BackHandler> = {
//!     let closed = closed.clone();
//!     Rc::new(move || closed.set(closed.get() + 1))
//! };
//!
//! registry.register(dialog.clone());
//! assert!(escape.borrow().enabled);
//!
//! // The host's input loop forwards each escape press.
//! registry.back_performed();
//! assert_eq!(closed.get(), 1);
//!
//! registry.unregister(&dialog);
//! assert!(!escape.borrow().enabled);
//! ```

use alloc::vec::Vec;
use core::cell::{Cell, Ref, RefCell};

use tracing::{debug, trace};

use crate::error::LifecycleError;
use crate::observer::{ObserverId, Observers};
use crate::stack::BackStack;
use crate::types::{BackSignal, Binding, DrainPolicy, EventKind, HandlerRef, RegistryEvent};

/// Registry deciding which handler receives the back input.
///
/// ## Usage
///
/// - Construct once with [`BackRegistry::new`], handing over the signal to drive, and share
///   it (typically as an `Rc`) with every component that needs to register.
/// - Call [`BackRegistry::initialize`] at startup.
/// - Components call [`BackRegistry::register`] when they appear and
///   [`BackRegistry::unregister`] when they go away.
/// - Call [`BackRegistry::back_performed`] each time the signal fires.
/// - Call [`BackRegistry::late_dispose`] at shutdown.
///
/// `H` is a [`HandlerRef`] such as `Rc<dyn BackHandler>`; `S` is the [`BackSignal`].
pub struct BackRegistry<H, S> {
    stack: RefCell<BackStack<H>>,
    signal: RefCell<S>,
    observers: RefCell<Observers<H>>,
    binding: Cell<Binding>,
    drain_policy: DrainPolicy,
}

impl<H, S> core::fmt::Debug for BackRegistry<H, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BackRegistry")
            .field("binding", &self.binding.get())
            .field("drain_policy", &self.drain_policy)
            .finish_non_exhaustive()
    }
}

impl<H: HandlerRef, S: BackSignal> BackRegistry<H, S> {
    /// Create an empty, unbound registry driving `signal`.
    pub fn new(signal: S) -> Self {
        Self {
            stack: RefCell::new(BackStack::new()),
            signal: RefCell::new(signal),
            observers: RefCell::new(Observers::new()),
            binding: Cell::new(Binding::Unbound),
            drain_policy: DrainPolicy::default(),
        }
    }

    /// Use `policy` for the shutdown drain.
    pub fn with_drain_policy(mut self, policy: DrainPolicy) -> Self {
        self.drain_policy = policy;
        self
    }

    /// Set the policy used by [`late_dispose`](Self::late_dispose).
    pub fn set_drain_policy(&mut self, policy: DrainPolicy) {
        self.drain_policy = policy;
    }

    /// The policy used by [`late_dispose`](Self::late_dispose).
    pub fn drain_policy(&self) -> DrainPolicy {
        self.drain_policy
    }

    /// Current subscription state of the dispatch callback.
    pub fn binding(&self) -> Binding {
        self.binding.get()
    }

    /// Borrow the signal.
    ///
    /// Do not hold the guard across calls that register or unregister.
    pub fn signal(&self) -> Ref<'_, S> {
        self.signal.borrow()
    }

    /// Consume the registry and hand the signal back.
    pub fn into_signal(self) -> S {
        self.signal.into_inner()
    }

    /// The active handler: the most recently registered one still registered.
    pub fn current_handler(&self) -> Option<H> {
        self.stack.borrow().current().cloned()
    }

    /// Snapshot of every registered handle, active first.
    pub fn handlers(&self) -> Vec<H> {
        self.stack.borrow().iter().cloned().collect()
    }

    /// Number of registered entries, duplicates included.
    pub fn len(&self) -> usize {
        self.stack.borrow().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.stack.borrow().is_empty()
    }

    /// Returns `true` if `handler` is registered.
    pub fn contains(&self, handler: &H) -> bool {
        self.stack.borrow().contains(handler)
    }

    /// Make `handler` the active handler.
    ///
    /// The previous active handler stays registered and takes over again once `handler` is
    /// unregistered. Registering the same handle twice stores it twice.
    pub fn register(&self, handler: H) {
        let depth = {
            let mut stack = self.stack.borrow_mut();
            stack.push(handler.clone());
            stack.len()
        };
        self.signal.borrow_mut().enable();
        debug!(depth, "registered back handler");
        self.notify(RegistryEvent::Registered(handler));
    }

    /// Remove the front-most registration of `handler`.
    ///
    /// `None`, or a handle that is not registered, is ignored and returns `false` without
    /// notifying anyone. Disables the signal when the stack becomes empty.
    pub fn unregister<'a>(&self, handler: impl Into<Option<&'a H>>) -> bool
    where
        H: 'a,
    {
        let Some(handler) = handler.into() else {
            trace!("ignored unregister of absent handler");
            return false;
        };
        let (removed, depth) = {
            let mut stack = self.stack.borrow_mut();
            let removed = stack.remove(handler);
            (removed, stack.len())
        };
        let Some(removed) = removed else {
            trace!(depth, "ignored unregister of unknown handler");
            return false;
        };
        if depth == 0 {
            self.signal.borrow_mut().disable();
        }
        debug!(depth, "unregistered back handler");
        self.notify(RegistryEvent::Unregistered(removed));
        true
    }

    /// Subscribe the dispatch callback to the back signal.
    pub fn initialize(&self) -> Result<(), LifecycleError> {
        match self.binding.get() {
            Binding::Unbound => {
                self.binding.set(Binding::Bound);
                debug!(depth = self.len(), "back registry initialized");
                Ok(())
            }
            Binding::Bound => Err(LifecycleError::AlreadyInitialized),
            Binding::Released => Err(LifecycleError::Disposed),
        }
    }

    /// Unsubscribe the dispatch callback, then unregister what is left.
    ///
    /// Which handlers get unregistered, and therefore which notifications go out, depends on
    /// the [`DrainPolicy`]. Returns the number of handlers unregistered.
    ///
    /// Observers that keep registering handlers in response to unregister notifications
    /// prevent [`DrainPolicy::Full`] from ever finishing.
    pub fn late_dispose(&self) -> Result<usize, LifecycleError> {
        if self.binding.get() == Binding::Released {
            return Err(LifecycleError::AlreadyDisposed);
        }
        self.binding.set(Binding::Released);

        let drained = match self.drain_policy {
            DrainPolicy::Full => self.drain_full(),
            DrainPolicy::Alternating => self.drain_alternating(),
        };
        debug!(
            drained,
            remaining = self.len(),
            policy = ?self.drain_policy,
            "back registry disposed"
        );
        Ok(drained)
    }

    /// Deliver one back occurrence to the active handler.
    ///
    /// This is the callback the signal is bound to; the host calls it each time the signal
    /// fires. Returns the handler that was asked, or `None` when nothing is registered or the
    /// registry is not [bound](Binding::Bound).
    pub fn back_performed(&self) -> Option<H> {
        if self.binding.get() != Binding::Bound {
            trace!(binding = ?self.binding.get(), "back ignored by unbound registry");
            return None;
        }
        let Some(handler) = self.current_handler() else {
            trace!("back ignored, no handler registered");
            return None;
        };
        trace!(depth = self.len(), "dispatching back");
        handler.on_back();
        Some(handler)
    }

    /// Observe every registration and unregistration.
    pub fn subscribe(&self, observer: impl Fn(&RegistryEvent<H>) + 'static) -> ObserverId {
        self.observers.borrow_mut().subscribe(None, observer)
    }

    /// Observe registrations only.
    pub fn on_registered(&self, observer: impl Fn(&H) + 'static) -> ObserverId {
        self.observers
            .borrow_mut()
            .subscribe(Some(EventKind::Registered), move |e| observer(e.handler()))
    }

    /// Observe unregistrations only.
    pub fn on_unregistered(&self, observer: impl Fn(&H) + 'static) -> ObserverId {
        self.observers
            .borrow_mut()
            .subscribe(Some(EventKind::Unregistered), move |e| observer(e.handler()))
    }

    /// Remove an observer. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.observers.borrow_mut().unsubscribe(id)
    }

    fn notify(&self, event: RegistryEvent<H>) {
        let targets = self.observers.borrow().snapshot(event.kind());
        for observer in targets {
            observer(&event);
        }
    }

    fn handler_at(&self, index: usize) -> Option<H> {
        self.stack.borrow().get(index).cloned()
    }

    fn drain_full(&self) -> usize {
        let mut drained = 0;
        while let Some(front) = self.current_handler() {
            if self.unregister(&front) {
                drained += 1;
            }
        }
        drained
    }

    // Ascending index over a shrinking stack; see `DrainPolicy::Alternating`.
    fn drain_alternating(&self) -> usize {
        let mut drained = 0;
        let mut index = 0;
        while let Some(handler) = self.handler_at(index) {
            if self.unregister(&handler) {
                drained += 1;
            }
            index += 1;
        }
        drained
    }
}
