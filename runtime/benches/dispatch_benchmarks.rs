//! Dispatch Performance Benchmarks
//!
//! These benchmarks track the cost of the dispatch path:
//! - Folding: one action through a five-store tree
//! - Batching: flattening nested arguments before the fold
//! - Pipeline: middleware stages and subscriber fan-out per dispatch
//!
//! Run with: `cargo bench`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use composable_flux_core::{Action, Mapware, Reducer, StateTree, flatten_actions};
use composable_flux_runtime::{Flux, FluxConfig};
use composable_flux_testing::fixtures::{self, X_A, Y_A, Z};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::sync::Arc;

fn quiet_flux() -> Flux {
    Flux::with_config(fixtures::sample_tree(), FluxConfig::default().with_metrics(false))
}

/// Benchmark the tree fold in isolation (no Flux overhead)
fn benchmark_tree_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_reduce");
    group.throughput(Throughput::Elements(1));

    let tree = fixtures::sample_tree();
    let state = tree.initial_state();

    group.bench_function("handled_by_every_store", |b| {
        let action = Action::new(Y_A);
        b.iter(|| tree.reduce(black_box(&state), black_box(&action)));
    });

    group.bench_function("handled_by_no_store", |b| {
        let action = Action::new(Z);
        b.iter(|| tree.reduce(black_box(&state), black_box(&action)));
    });

    group.finish();
}

/// Benchmark flattening nested dispatch arguments
fn benchmark_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    for size in [1_usize, 16, 256] {
        let args: Vec<Value> = (0..size)
            .map(|i| {
                if i % 4 == 0 {
                    json!([[{ "type": X_A }], null])
                } else {
                    json!({ "type": Y_A })
                }
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &args, |b, args| {
            b.iter(|| flatten_actions(black_box(args.clone())));
        });
    }

    group.finish();
}

/// Benchmark whole dispatches (actions/sec)
fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    group.bench_function("bare", |b| {
        let mut flux = quiet_flux();
        b.iter(|| {
            flux.dispatch_actions([black_box(Action::new(X_A))])
                .expect("dispatch failed");
        });
    });

    group.bench_function("with_pipeline", |b| {
        let mut flux = quiet_flux();
        flux.proxy(Mapware::middleware().on(X_A, |_| json!({ "stamped": true })));
        flux.proxy(Mapware::middleware().on(Z, |_| json!({ "extra": "ex" })));
        for _ in 0..8 {
            flux.hook(Arc::new(|_: &[Action], state: &Arc<StateTree>| {
                black_box(state.pointer("/storeA/propAA"));
            }));
        }

        b.iter(|| {
            flux.dispatch_actions([black_box(Action::new(X_A))])
                .expect("dispatch failed");
        });
    });

    group.bench_function("with_metrics", |b| {
        let mut flux = Flux::new(fixtures::sample_tree());
        b.iter(|| {
            flux.dispatch_actions([black_box(Action::new(X_A))])
                .expect("dispatch failed");
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_tree_reduce,
    benchmark_flatten,
    benchmark_dispatch,
);
criterion_main!(benches);
