// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Back registry basics.
//!
//! A screen and two stacked dialogs register for back. Each simulated escape press reaches
//! only the top-most one, and closing it hands control back to whatever was open before.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_back_demos --example back_basics`

use std::cell::RefCell;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use understory_back::registry::BackRegistry;
use understory_back::types::{BackHandler, BackSignal};

/// Stand-in for a platform input action.
#[derive(Debug, Default)]
struct EscapeKey {
    enabled: bool,
}

impl EscapeKey {
    /// A key press only reaches the app while the action is enabled.
    fn press(&self) -> bool {
        self.enabled
    }
}

impl BackSignal for EscapeKey {
    fn enable(&mut self) {
        self.enabled = true;
    }
    fn disable(&mut self) {
        self.enabled = false;
    }
}

struct Panel {
    title: &'static str,
}

impl BackHandler for Panel {
    fn on_back(&self) {
        println!("  back -> {}", self.title);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let escape = Rc::new(RefCell::new(EscapeKey::default()));
    let registry: BackRegistry<Rc<dyn BackHandler>, _> = BackRegistry::new(escape.clone());
    registry
        .initialize()
        .expect("fresh registry initializes once");

    let press = || {
        if escape.borrow().press() {
            registry.back_performed();
        } else {
            println!("  (escape disabled, press ignored)");
        }
    };

    let screen: Rc<dyn BackHandler> = Rc::new(Panel { title: "main screen" });
    let settings: Rc<dyn BackHandler> = Rc::new(Panel { title: "settings dialog" });
    let confirm: Rc<dyn BackHandler> = Rc::new(Panel { title: "confirm dialog" });

    println!("== Nothing registered ==");
    press();

    println!("== Screen, settings, confirm ==");
    registry.register(screen.clone());
    registry.register(settings.clone());
    registry.register(confirm.clone());
    press();

    println!("== Confirm closed ==");
    registry.unregister(&confirm);
    press();

    println!("== Settings closed ==");
    registry.unregister(&settings);
    press();

    println!("== Screen gone ==");
    registry.unregister(&screen);
    press();

    let drained = registry.late_dispose().expect("disposed once");
    println!("== Disposed, {drained} handler(s) left behind ==");
}
