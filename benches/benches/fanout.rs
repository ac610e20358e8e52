// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use scribe_recorder::{Channel, Payload, Recorder, RecorderEvent, Site};
use scribe_registry::Registry;
use scribe_scope::ScopeTree;

fn deep_scope_tree(depth: usize) -> (ScopeTree<u64>, scribe_scope::ScopeId) {
    let mut tree = ScopeTree::new();
    let mut id = tree.insert(None, 0);
    for level in 1..depth {
        id = tree.insert(Some(id), level as u64);
    }
    (tree, id)
}

fn bench_chain_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("scope_chain");
    for depth in [4_usize, 16, 64] {
        let (tree, leaf) = deep_scope_tree(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("values_depth_{depth}"), |b| {
            b.iter(|| black_box(tree.values(black_box(leaf))).len());
        });
    }
    group.finish();
}

fn bench_registry_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_emit");
    for listeners in [4_usize, 32, 256] {
        let registry: Registry<u64> = Registry::new();
        let subs: Vec<_> = (0..listeners)
            .map(|i| {
                let channel = if i % 2 == 0 {
                    Channel::CatchAll
                } else {
                    Channel::named("clicks")
                };
                registry.subscribe(Some(channel), |event: &u64| {
                    black_box(*event);
                })
            })
            .collect();
        group.throughput(Throughput::Elements(listeners as u64));
        group.bench_function(format!("emit_{listeners}_listeners"), |b| {
            b.iter(|| registry.emit(black_box(&7), Some(&Channel::named("clicks"))));
        });
        drop(subs);
    }
    group.finish();
}

fn bench_event_creation(c: &mut Criterion) {
    let recorder = Recorder::new();
    let root = recorder.listener_scope(Site::default(), Some(Channel::CatchAll), |_| {});
    let mid = recorder.context_scope(root.site(), Payload::new());
    let leaf = recorder.context_scope(mid.site(), Payload::new());
    let factory = recorder.events_at(leaf.site());

    c.bench_function("factory_create_and_trigger", |b| {
        b.iter_batched(
            Payload::new,
            |payload| {
                let event: RecorderEvent = factory.create(payload);
                black_box(event.trigger(None))
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_chain_resolution,
    bench_registry_emit,
    bench_event_creation
);
criterion_main!(benches);
