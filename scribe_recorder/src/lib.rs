// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scribe Recorder: interaction events for retained-mode UI trees.
//!
//! ## Overview
//!
//! Components deep in a UI tree create *recorder events*, open payloads
//! describing an interaction, without knowing who is interested in them.
//! Ancestors declare two kinds of scope around their subtrees:
//!
//! - **Context scopes** contribute metadata mappings; an event records the
//!   ordered chain of every enclosing contribution.
//! - **Listener scopes** declare channel-filtered handlers; triggering an
//!   event fans it out to the chain of enclosing listeners.
//!
//! A [`Recorder`] owns both provider trees. Hosts thread a [`Site`] down
//! their component tree, mount scopes as provider components mount (the
//! returned guards unmount on drop), and hand components an
//! [`EventFactory`] for their site. Every [`EventFactory::create`] captures
//! a fresh snapshot of the site's chains, so each event reflects the tree at
//! the moment of its own creation; the snapshots never change afterwards.
//!
//! ## Delivery
//!
//! [`RecorderEvent::trigger`] is synchronous and in-memory: it walks the
//! captured listener snapshot and delivers to every listener whose channel
//! filter matches. [`Channel::CatchAll`](scribe_registry::Channel::CatchAll)
//! listeners receive everything; named listeners receive exact matches only.
//! There is no queueing, persistence, or cross-tree routing.
//!
//! ## Example
//!
//! ```
//! use core::cell::RefCell;
//! use std::rc::Rc;
//!
//! use scribe_recorder::{Recorder, Site};
//! use scribe_registry::Channel;
//! use serde_json::{Value, json};
//!
//! let recorder = Recorder::new();
//! let records: Rc<RefCell<Vec<Value>>> = Rc::new(RefCell::new(Vec::new()));
//!
//! // An ancestor collects every event from its subtree.
//! let sink = {
//!     let records = Rc::clone(&records);
//!     recorder.listener_scope(Site::default(), Some(Channel::CatchAll), move |event| {
//!         records.borrow_mut().push(event.to_record());
//!     })
//! };
//! // A nested ancestor tags the subtree with screen metadata.
//! let screen = recorder.context_scope(
//!     sink.site(),
//!     json!({ "screen": "settings" }).as_object().cloned().unwrap(),
//! );
//!
//! // A leaf component records a click.
//! let factory = recorder.events_at(screen.site());
//! let event = factory.create(json!({ "action": "click" }).as_object().cloned().unwrap());
//! event.trigger(None);
//!
//! assert_eq!(
//!     records.borrow()[0],
//!     json!({
//!         "payload": { "action": "click" },
//!         "context": [{ "screen": "settings" }],
//!     })
//! );
//! ```
//!
//! ## Registry strategy
//!
//! The chain snapshot above is one of two equivalent wirings. The other is a
//! live listener set per subtree: [`RecorderRegistry`] (a
//! [`scribe_registry::Registry`] over [`RecorderEvent`]) gives descendants
//! weak emitter handles instead of snapshots. Chains favor "deliver to what
//! enclosed me at creation time"; the registry favors "deliver to whoever is
//! listening right now". Both apply the same channel-matching rule.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod event;
mod listener;
mod recorder;

pub use event::{ContextValue, Payload, RecorderEvent};
pub use listener::Listener;
pub use recorder::{ContextScope, EventFactory, ListenerScope, Recorder, Site};
pub use scribe_registry::Channel;

/// The registry-strategy wiring: a live, subtree-owned listener set over
/// [`RecorderEvent`]s. See [`scribe_registry`] for the ownership model.
pub type RecorderRegistry = scribe_registry::Registry<RecorderEvent>;
