// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recorder event: an open payload plus immutable scope snapshots.

use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use scribe_registry::Channel;
use serde_json::{Map, Value};

use crate::listener::Listener;

/// Open string-keyed payload carried by a [`RecorderEvent`].
pub type Payload = Map<String, Value>;

/// One ancestor-contributed metadata mapping.
pub type ContextValue = Map<String, Value>;

/// An interaction event on its way to being recorded.
///
/// The payload is mutable for the event's whole lifetime; the listener and
/// context snapshots are captured at construction and never change. An event
/// created outside every scope simply has no snapshots; that is a supported
/// use (tests, non-UI callers), not an error.
///
/// ## Example
///
/// ```
/// use scribe_recorder::RecorderEvent;
/// use serde_json::json;
///
/// let mut event = RecorderEvent::new(
///     json!({ "action": "click", "attempt": 1 })
///         .as_object()
///         .cloned()
///         .unwrap(),
/// );
/// event
///     .update(json!({ "attempt": 2 }).as_object().cloned().unwrap())
///     .update_with(|mut payload| {
///         payload.insert("reviewed".into(), json!(true));
///         payload
///     });
///
/// assert_eq!(event.payload["action"], json!("click"));
/// assert_eq!(event.payload["attempt"], json!(2));
/// // No scopes were captured, so delivery is a no-op rather than a failure.
/// assert_eq!(event.trigger(None), 0);
/// ```
pub struct RecorderEvent {
    /// Open payload; mutable during the event's lifetime.
    pub payload: Payload,
    listeners: Option<Vec<Listener>>,
    context: Option<Vec<ContextValue>>,
}

impl core::fmt::Debug for RecorderEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecorderEvent")
            .field("payload", &self.payload)
            .field("listeners", &self.listeners.as_ref().map(Vec::len))
            .field("context", &self.context.as_ref().map(Vec::len))
            .finish()
    }
}

impl RecorderEvent {
    /// Create a standalone event with no captured scopes.
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            listeners: None,
            context: None,
        }
    }

    /// Create an event bound to snapshots of the scopes it was created in.
    ///
    /// This is what [`EventFactory::create`](crate::EventFactory::create)
    /// calls; direct construction is for hosts that assemble their own
    /// snapshots.
    pub fn with_snapshots(
        payload: Payload,
        listeners: Option<Vec<Listener>>,
        context: Option<Vec<ContextValue>>,
    ) -> Self {
        Self {
            payload,
            listeners,
            context,
        }
    }

    /// Shallow-merge `patch` into the payload; later keys win.
    ///
    /// Returns the event for chaining.
    pub fn update(&mut self, patch: Payload) -> &mut Self {
        for (key, value) in patch {
            self.payload.insert(key, value);
        }
        self
    }

    /// Replace the payload with `f(payload)`.
    ///
    /// The replacement form of [`RecorderEvent::update`], for callers that
    /// need to derive the next payload from the previous one. Returns the
    /// event for chaining.
    pub fn update_with(&mut self, f: impl FnOnce(Payload) -> Payload) -> &mut Self {
        let previous = mem::take(&mut self.payload);
        self.payload = f(previous);
        self
    }

    /// Deliver the event to every snapshot listener whose channel filter
    /// matches `channel`, and return how many were invoked.
    ///
    /// No-op (returns 0) when no listener snapshot was captured. Delivery is
    /// neither idempotent nor deduplicated: calling `trigger` again
    /// re-delivers to every matching listener. A panicking listener unwinds
    /// to the caller; later listeners are skipped.
    pub fn trigger(&self, channel: Option<&Channel>) -> usize {
        let Some(listeners) = &self.listeners else {
            return 0;
        };
        listeners
            .iter()
            .filter(|listener| listener.deliver(self, channel))
            .count()
    }

    /// The captured ancestor context chain, root→leaf, if any.
    pub fn context(&self) -> Option<&[ContextValue]> {
        self.context.as_deref()
    }

    /// Serialize the event for export: the payload, plus the context chain
    /// when one was captured. Listeners are runtime-only and do not appear.
    pub fn to_record(&self) -> Value {
        let mut record = Map::new();
        record.insert("payload".into(), Value::Object(self.payload.clone()));
        if let Some(context) = &self.context {
            record.insert(
                "context".into(),
                Value::Array(context.iter().cloned().map(Value::Object).collect()),
            );
        }
        Value::Object(record)
    }
}
