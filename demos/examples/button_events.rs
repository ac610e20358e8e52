// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end instrumentation of a toy widget tree.
//!
//! This example shows how to combine:
//! - `scribe_recorder` for context/listener scopes and the event factory,
//! - `scribe_enhance` for intercepting a widget's callbacks,
//!
//! the way a host toolkit would: mount scopes as providers mount, thread the
//! `Site` down the tree, and let the enhancer append events to callbacks.
//!
//! Run:
//! - `cargo run -p scribe_demos --example button_events`

use std::cell::RefCell;
use std::rc::Rc;

use scribe_enhance::{AutoTrigger, EnhanceConfig, Enhancer, NameFilter};
use scribe_recorder::{Channel, Payload, Recorder, RecorderEvent, Site};
use serde_json::{Value, json};

/// Props of the widget being instrumented.
struct SaveButton {
    label: &'static str,
}

/// The pointer data the host passes to click callbacks.
struct ClickArgs {
    x: f64,
    y: f64,
}

fn object(value: Value) -> Payload {
    value.as_object().cloned().expect("demo literals are objects")
}

fn main() {
    let recorder = Recorder::new();
    let records: Rc<RefCell<Vec<Value>>> = Rc::new(RefCell::new(Vec::new()));

    // The app root collects every recorded event from its subtree.
    let sink = {
        let records = Rc::clone(&records);
        recorder.listener_scope(Site::default(), Some(Channel::CatchAll), move |event| {
            records.borrow_mut().push(event.to_record());
        })
    };

    // The settings screen tags everything below it.
    let screen = recorder.context_scope(sink.site(), object(json!({ "screen": "settings" })));

    // Wrap the button: its click callback is intercepted, and the event is
    // delivered automatically before the callback runs.
    let config = EnhanceConfig::new()
        .on_with("on_click", |factory, props: &SaveButton| {
            factory.create(object(json!({ "action": "click", "label": props.label })))
        })
        .auto_trigger(AutoTrigger::Include(NameFilter::names(["on_click"])));
    let enhancer = Enhancer::new(
        "SaveButton",
        recorder.events_at(screen.site()),
        config,
        Rc::new(SaveButton { label: "Save" }),
    );

    // The component's own callback stays free of recording concerns; the
    // event just arrives as the final argument.
    let on_click: Rc<dyn Fn(&ClickArgs, &RecorderEvent)> = Rc::new(|args, event| {
        println!(
            "clicked at ({}, {}) -> {}",
            args.x,
            args.y,
            event.to_record()
        );
    });
    let wrapped = enhancer
        .enhance("on_click", on_click)
        .expect("on_click is configured");

    // Two clicks, two fresh events, two deliveries to the sink.
    wrapped.call(&ClickArgs { x: 12.0, y: 8.0 });
    wrapped.call(&ClickArgs { x: 40.0, y: 22.0 });

    println!("--- recorded by the app root ---");
    for record in records.borrow().iter() {
        println!("{record}");
    }
    assert_eq!(records.borrow().len(), 2);
    assert_eq!(
        records.borrow()[0],
        json!({
            "payload": { "action": "click", "label": "Save" },
            "context": [{ "screen": "settings" }],
        })
    );
}
