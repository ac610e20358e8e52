// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The registry strategy: a live listener set instead of chain snapshots.
//!
//! One registry per top-level provider mount; descendants hold weak
//! `Emitter` handles and deliver into whatever is subscribed *right now*.
//! Compare with `button_events`, where events capture the listener chain at
//! creation time.
//!
//! Run:
//! - `cargo run -p scribe_demos --example registry_pubsub`

use std::cell::Cell;
use std::rc::Rc;

use scribe_recorder::{Payload, RecorderEvent, RecorderRegistry};
use scribe_registry::Channel;
use serde_json::json;

fn event(action: &str) -> RecorderEvent {
    RecorderEvent::new(
        json!({ "action": action })
            .as_object()
            .cloned()
            .expect("demo literals are objects"),
    )
}

fn main() {
    // Owned by the subtree's top-level provider.
    let registry = RecorderRegistry::new();

    let clicks_seen = Rc::new(Cell::new(0));
    let everything_seen = Rc::new(Cell::new(0));

    // Subscriptions are RAII guards: dropping one deregisters exactly that
    // listener, so disposal follows component lifetime.
    let clicks = {
        let clicks_seen = Rc::clone(&clicks_seen);
        registry.subscribe(Some(Channel::named("clicks")), move |event: &RecorderEvent| {
            clicks_seen.set(clicks_seen.get() + 1);
            println!("clicks listener: {}", event.to_record());
        })
    };
    let _all = {
        let everything_seen = Rc::clone(&everything_seen);
        registry.subscribe(Some(Channel::CatchAll), move |_: &RecorderEvent| {
            everything_seen.set(everything_seen.get() + 1);
        })
    };

    // A descendant far from the registry emits through a weak handle.
    let emitter = registry.emitter();
    emitter
        .emit(&event("click"), Some(&Channel::named("clicks")))
        .expect("registry is alive");
    emitter
        .emit(&event("scroll"), Some(&Channel::named("wheel")))
        .expect("registry is alive");

    assert_eq!(clicks_seen.get(), 1, "named subscription filters by channel");
    assert_eq!(everything_seen.get(), 2, "catch-all sees every delivery");

    // Unmount the clicks listener; the live set shrinks immediately.
    drop(clicks);
    let delivered = emitter
        .emit(&event("click"), Some(&Channel::named("clicks")))
        .expect("registry is alive");
    assert_eq!(delivered, 1, "only the catch-all remains");

    // Once the owning subtree unmounts, the handle fails loudly instead of
    // silently dropping events.
    drop(registry);
    let error = emitter
        .emit(&event("click"), Some(&Channel::named("clicks")))
        .expect_err("the registry is gone");
    println!("after unmount: {error}");

    let mut payload = Payload::new();
    payload.insert("orphaned".into(), json!(true));
    // Creating events without any registry or scope is still fine.
    assert_eq!(RecorderEvent::new(payload).trigger(None), 0);
}
