// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_back --heading-base-level=0

//! Understory Back: a `no_std` registry deciding who answers the back input.
//!
//! ## Overview
//!
//! Dialogs, panels, and navigation screens can all want the hardware back button, the escape
//! key, or a platform back gesture at the same time. This crate keeps them in a stack ordered by
//! activation recency and hands each back occurrence to exactly one of them: the most recently
//! registered handler that is still registered.
//! It does not decide what back does; it only decides who is asked.
//!
//! ## Pieces
//!
//! - [`BackHandler`](crate::types::BackHandler) is the single-method capability being asked.
//! - [`HandlerRef`](crate::types::HandlerRef) is how the registry holds a handler without owning
//!   it: `Rc<T>`, `Arc<T>`, or `&T`, compared by identity.
//! - [`BackSignal`](crate::types::BackSignal) is the externally owned input source. The registry
//!   enables it while anything is registered and disables it when the stack empties.
//! - [`BackStack`](crate::stack::BackStack) is the ordered stack on its own, without side effects.
//! - [`BackRegistry`](crate::registry::BackRegistry) ties them together and adds observers for
//!   registrations and unregistrations.
//!
//! ## Workflow
//!
//! 1) Construct one [`BackRegistry`](crate::registry::BackRegistry) with the signal and pass a
//!    handle to it to whatever needs to register. There is no global instance.
//! 2) Call [`initialize`](crate::registry::BackRegistry::initialize) at startup.
//! 3) Components [`register`](crate::registry::BackRegistry::register) when they become active
//!    and [`unregister`](crate::registry::BackRegistry::unregister) when they close. The
//!    previously active component takes over again automatically.
//! 4) Each time the signal fires, call
//!    [`back_performed`](crate::registry::BackRegistry::back_performed).
//! 5) Call [`late_dispose`](crate::registry::BackRegistry::late_dispose) at shutdown. What it
//!    unregisters depends on the [`DrainPolicy`](crate::types::DrainPolicy).
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_back::registry::BackRegistry;
//! use understory_back::types::BackHandler;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let handler = |name: &'static str| -> Rc<dyn BackHandler> {
//!     let log = log.clone();
//!     Rc::new(move || log.borrow_mut().push(name))
//! };
//!
//! let registry = BackRegistry::new(());
//! registry.initialize().unwrap();
//!
//! let (screen, dialog) = (handler("screen"), handler("dialog"));
//! registry.register(screen.clone());
//! registry.register(dialog.clone());
//!
//! registry.back_performed();
//! registry.unregister(&dialog);
//! registry.back_performed();
//!
//! assert_eq!(*log.borrow(), ["dialog", "screen"]);
//! ```
//!
//! ## Threading
//!
//! The registry is meant to be driven from the application's main loop. It uses `RefCell`
//! internally and is neither `Send` nor `Sync`, so it cannot be shared across threads by
//! accident. Handlers may unregister themselves from inside `on_back`.
//!
//! ## Logging
//!
//! Registry activity is reported through [`tracing`] at `debug` and `trace` level.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod error;
pub mod observer;
pub mod registry;
pub mod stack;
pub mod types;
