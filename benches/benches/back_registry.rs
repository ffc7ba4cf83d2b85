// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_back::registry::BackRegistry;
use understory_back::types::{BackHandler, DrainPolicy};

type Handle = Rc<dyn BackHandler>;

struct Counter(Cell<u64>);

impl BackHandler for Counter {
    fn on_back(&self) {
        self.0.set(self.0.get() + 1);
    }
}

fn gen_handlers(n: usize) -> Vec<Handle> {
    (0..n)
        .map(|_| Rc::new(Counter(Cell::new(0))) as Handle)
        .collect()
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

// Fisher-Yates with a fixed seed so every run unregisters in the same order.
fn shuffled(handlers: &[Handle], seed: u64) -> Vec<Handle> {
    let mut out = handlers.to_vec();
    let mut rng = Rng::new(seed);
    for i in (1..out.len()).rev() {
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        out.swap(i, j);
    }
    out
}

fn filled(handlers: &[Handle], policy: DrainPolicy) -> BackRegistry<Handle, ()> {
    let registry = BackRegistry::new(()).with_drain_policy(policy);
    registry.initialize().unwrap();
    for h in handlers {
        registry.register(h.clone());
    }
    registry
}

fn bench_register_unregister(c: &mut Criterion) {
    let mut group = c.benchmark_group("back_register_unregister");
    for &n in &[8_usize, 64, 512] {
        let handlers = gen_handlers(n);
        let order = shuffled(&handlers, 0x9E37_79B9_7F4A_7C15);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("lifo_n{}", n), |b| {
            b.iter_batched(
                || BackRegistry::<Handle, ()>::new(()),
                |registry| {
                    for h in &handlers {
                        registry.register(h.clone());
                    }
                    for h in handlers.iter().rev() {
                        black_box(registry.unregister(h));
                    }
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("shuffled_n{}", n), |b| {
            b.iter_batched(
                || BackRegistry::<Handle, ()>::new(()),
                |registry| {
                    for h in &handlers {
                        registry.register(h.clone());
                    }
                    for h in &order {
                        black_box(registry.unregister(h));
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("back_dispatch");
    for &n in &[1_usize, 64, 512] {
        let handlers = gen_handlers(n);
        let registry = filled(&handlers, DrainPolicy::Full);
        group.bench_function(format!("back_performed_n{}", n), |b| {
            b.iter(|| black_box(registry.back_performed()));
        });
    }
    group.finish();
}

fn bench_dispose(c: &mut Criterion) {
    let mut group = c.benchmark_group("back_dispose");
    for &n in &[64_usize, 512] {
        let handlers = gen_handlers(n);
        group.throughput(Throughput::Elements(n as u64));
        for policy in [DrainPolicy::Full, DrainPolicy::Alternating] {
            group.bench_function(format!("{:?}_n{}", policy, n), |b| {
                b.iter_batched(
                    || filled(&handlers, policy),
                    |registry| black_box(registry.late_dispose()),
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_register_unregister,
    bench_dispatch,
    bench_dispose
);
criterion_main!(benches);
