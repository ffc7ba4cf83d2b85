// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shutdown drain policies and self-closing handlers.
//!
//! Handlers that close themselves on back, observers watching the stack, and the difference
//! between the two shutdown drain policies.
//!
//! Run:
//! - `cargo run -p understory_back_demos --example back_shutdown`

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing_subscriber::EnvFilter;
use understory_back::registry::BackRegistry;
use understory_back::types::{BackHandler, DrainPolicy, RegistryEvent};

type Handle = Rc<dyn BackHandler>;
type Registry = BackRegistry<Handle, ()>;

/// A popup that closes itself when back is pressed.
struct Popup {
    name: &'static str,
    registry: Weak<Registry>,
    me: RefCell<Weak<Popup>>,
}

impl Popup {
    fn open(name: &'static str, registry: &Rc<Registry>) -> Rc<Self> {
        let popup = Rc::new(Self {
            name,
            registry: Rc::downgrade(registry),
            me: RefCell::new(Weak::new()),
        });
        *popup.me.borrow_mut() = Rc::downgrade(&popup);
        registry.register(popup.clone());
        popup
    }
}

impl BackHandler for Popup {
    fn on_back(&self) {
        println!("  {} closes itself", self.name);
        let me = self.me.borrow().upgrade();
        if let (Some(registry), Some(me)) = (self.registry.upgrade(), me) {
            let me: Handle = me;
            registry.unregister(&me);
        }
    }
}

fn run(policy: DrainPolicy) {
    println!("== {policy:?} ==");
    let registry = Rc::new(BackRegistry::new(()).with_drain_policy(policy));
    registry.subscribe(|event: &RegistryEvent<Handle>| match event {
        RegistryEvent::Registered(_) => println!("  + registered"),
        RegistryEvent::Unregistered(_) => println!("  - unregistered"),
    });
    registry
        .initialize()
        .expect("fresh registry initializes once");

    let popups: Vec<_> = ["A", "B", "C", "D"]
        .into_iter()
        .map(|name| Popup::open(name, &registry))
        .collect();
    println!("  {} open", popups.len());

    // D closes itself and C becomes active.
    registry.back_performed();
    println!("  {} left", registry.len());

    let drained = registry.late_dispose().expect("disposed once");
    println!("  shutdown unregistered {drained}, {} remain", registry.len());
    for popup in &popups {
        let handle: Handle = popup.clone();
        if registry.contains(&handle) {
            println!("  still registered: {}", popup.name);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    run(DrainPolicy::Full);
    run(DrainPolicy::Alternating);
}
