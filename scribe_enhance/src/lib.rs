// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scribe Enhance: decorator-style wiring of recorder events into component
//! callbacks.
//!
//! ## Overview
//!
//! Hand-instrumenting every callback drowns component code in recording
//! concerns. This crate keeps components oblivious: an
//! [`Enhancer`](crate::enhance::Enhancer) wraps a component instance and
//! intercepts a configured subset of its callback props, so each invocation
//! receives a freshly created
//! [`RecorderEvent`](scribe_recorder::RecorderEvent) as its final argument.
//! When the auto-trigger policy selects the callback, the event is also
//! delivered before the original callback runs.
//!
//! The interception wrapper for a given callback is cached by callback
//! identity, so re-enhancing an unchanged callback across renders returns
//! the identical wrapper; hosts that compare prop identity to skip work see
//! a stable value.
//!
//! ## Auto-trigger policy
//!
//! [`AutoTrigger`](crate::auto_trigger::AutoTrigger) is a boolean toggle or
//! an include/exclude filter over callback names; the two filter forms are
//! separate variants and cannot be combined. Policies can also be read from
//! loose config data via `TryFrom<&serde_json::Value>`, where an invalid
//! shape fails loudly instead of defaulting.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use scribe_enhance::{EnhanceConfig, Enhancer};
//! use scribe_recorder::{Recorder, RecorderEvent, Site};
//! use serde_json::json;
//!
//! struct SaveButton {
//!     label: &'static str,
//! }
//!
//! let recorder = Recorder::new();
//! let config = EnhanceConfig::new()
//!     .on_with("on_click", |factory, props: &SaveButton| {
//!         factory.create(
//!             json!({ "action": "click", "label": props.label })
//!                 .as_object()
//!                 .cloned()
//!                 .unwrap(),
//!         )
//!     });
//! let enhancer = Enhancer::new(
//!     "SaveButton",
//!     recorder.events_at(Site::default()),
//!     config,
//!     Rc::new(SaveButton { label: "Save" }),
//! );
//!
//! let on_click: Rc<dyn Fn(&u32, &RecorderEvent)> = Rc::new(|clicks, event| {
//!     assert_eq!(event.payload["label"], json!("Save"));
//!     assert_eq!(*clicks, 1);
//! });
//! let wrapped = enhancer.enhance("on_click", on_click).unwrap();
//! wrapped.call(&1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod auto_trigger;
mod context;
mod enhance;

pub use auto_trigger::{AutoTrigger, EnhanceError, NameFilter, is_auto_triggered};
pub use context::{ContextWrapper, WrappedContext, with_events_context};
pub use enhance::{EnhanceConfig, Enhanced, Enhancer, EventSpec};
