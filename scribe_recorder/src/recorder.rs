// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recorder world: provider scopes, call sites, and the event factory.
//!
//! ## Model
//!
//! A [`Recorder`] owns two independent provider trees, one for contextual
//! metadata and one for listeners, mirroring the provider components of the
//! host UI tree. Hosts thread a [`Site`] down through their tree: mounting a
//! provider yields a guard whose [`site()`](ContextScope::site) children
//! render under, and any component can turn its site into an
//! [`EventFactory`] with [`Recorder::events_at`].
//!
//! ## Ordering
//!
//! Provider mounts and unmounts are host-driven mutations; perform them
//! between deliveries (after the host tree commits), not from inside a
//! listener. Scope guards remove their nodes on drop, so disposal follows
//! host lifetime automatically.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use scribe_registry::Channel;
use scribe_scope::{ScopeId, ScopeTree};

use crate::event::{ContextValue, Payload, RecorderEvent};
use crate::listener::Listener;

struct World {
    contexts: ScopeTree<ContextValue>,
    listeners: ScopeTree<Listener>,
}

/// Shared handle to one UI tree's recorder state.
///
/// Cloning is cheap and every clone addresses the same provider trees.
/// Everything is single-threaded: the recorder lives on the UI thread and is
/// driven by render commits and input callbacks.
#[derive(Clone)]
pub struct Recorder {
    world: Rc<RefCell<World>>,
}

impl core::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let world = self.world.borrow();
        f.debug_struct("Recorder")
            .field("context_scopes", &world.contexts.len())
            .field("listener_scopes", &world.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

/// A position in the host tree, as seen by the recorder: the nearest
/// enclosing context provider and the nearest enclosing listener provider.
///
/// `Site::default()` is "outside every scope": a valid place to create
/// events from, yielding events with no snapshots.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Site {
    context: Option<ScopeId>,
    listeners: Option<ScopeId>,
}

impl Recorder {
    /// Create a recorder with no mounted scopes.
    pub fn new() -> Self {
        Self {
            world: Rc::new(RefCell::new(World {
                contexts: ScopeTree::new(),
                listeners: ScopeTree::new(),
            })),
        }
    }

    /// Mount a context provider contributing `value` to every descendant.
    ///
    /// Nested providers compose: descendants observe the ordered chain of
    /// all ancestor contributions, root→leaf. The scope unmounts when the
    /// returned guard drops.
    #[must_use = "dropping the guard immediately unmounts the scope"]
    pub fn context_scope(&self, site: Site, value: ContextValue) -> ContextScope {
        let id = self
            .world
            .borrow_mut()
            .contexts
            .insert(site.context, value);
        ContextScope {
            world: Rc::downgrade(&self.world),
            id,
            site: Site {
                context: Some(id),
                listeners: site.listeners,
            },
        }
    }

    /// Mount a listener provider receiving descendant events that match
    /// `channel`.
    ///
    /// The handler receives each delivered event; channel filtering has
    /// already been applied. The scope unmounts when the returned guard
    /// drops.
    #[must_use = "dropping the guard immediately unmounts the scope"]
    pub fn listener_scope(
        &self,
        site: Site,
        channel: Option<Channel>,
        on_event: impl Fn(&RecorderEvent) + 'static,
    ) -> ListenerScope {
        let id = self
            .world
            .borrow_mut()
            .listeners
            .insert(site.listeners, Listener::new(channel, on_event));
        ListenerScope {
            world: Rc::downgrade(&self.world),
            id,
            site: Site {
                context: site.context,
                listeners: Some(id),
            },
        }
    }

    /// The event factory for a call site.
    ///
    /// The factory is a stable handle; each [`EventFactory::create`] call
    /// captures a fresh snapshot of whatever the site's scopes hold at that
    /// moment.
    pub fn events_at(&self, site: Site) -> EventFactory {
        EventFactory {
            world: Rc::downgrade(&self.world),
            site,
        }
    }
}

/// Guard for a mounted context provider. Unmounts (with its subtree) on drop.
pub struct ContextScope {
    world: Weak<RefCell<World>>,
    id: ScopeId,
    site: Site,
}

impl core::fmt::Debug for ContextScope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ContextScope").field("id", &self.id).finish()
    }
}

impl ContextScope {
    /// The site children of this provider render under.
    pub fn site(&self) -> Site {
        self.site
    }

    /// Replace this provider's contributed value.
    ///
    /// Events created after this call observe the new value; snapshots
    /// already captured are unaffected.
    pub fn set_value(&self, value: ContextValue) {
        if let Some(world) = self.world.upgrade() {
            world.borrow_mut().contexts.set_value(self.id, value);
        }
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        if let Some(world) = self.world.upgrade() {
            world.borrow_mut().contexts.remove(self.id);
        }
    }
}

/// Guard for a mounted listener provider. Unmounts (with its subtree) on
/// drop; events that already captured the listener keep delivering to it.
pub struct ListenerScope {
    world: Weak<RefCell<World>>,
    id: ScopeId,
    site: Site,
}

impl core::fmt::Debug for ListenerScope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerScope").field("id", &self.id).finish()
    }
}

impl ListenerScope {
    /// The site children of this provider render under.
    pub fn site(&self) -> Site {
        self.site
    }

    /// Replace this provider's handler and channel filter.
    ///
    /// The host calls this when the declared handler or channel identity
    /// changes across renders; events created afterwards capture the new
    /// listener.
    pub fn set_listener(
        &self,
        channel: Option<Channel>,
        on_event: impl Fn(&RecorderEvent) + 'static,
    ) {
        if let Some(world) = self.world.upgrade() {
            world
                .borrow_mut()
                .listeners
                .set_value(self.id, Listener::new(channel, on_event));
        }
    }
}

impl Drop for ListenerScope {
    fn drop(&mut self) {
        if let Some(world) = self.world.upgrade() {
            world.borrow_mut().listeners.remove(self.id);
        }
    }
}

/// Creates recorder events bound to one call site.
///
/// Cloneable and cheap to pass into callbacks. Each [`EventFactory::create`]
/// reads the site's scope chains afresh; nothing is memoized across calls,
/// so every event reflects the tree at the moment of its own creation.
#[derive(Clone)]
pub struct EventFactory {
    world: Weak<RefCell<World>>,
    site: Site,
}

impl core::fmt::Debug for EventFactory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventFactory")
            .field("site", &self.site)
            .field("live", &(self.world.strong_count() > 0))
            .finish()
    }
}

impl EventFactory {
    /// Create an event carrying `payload` plus fresh snapshots of the
    /// site's listener and context chains.
    ///
    /// A site outside every scope (or a factory that outlived its
    /// [`Recorder`]) yields an event with no snapshots; that is "no
    /// context", not an error.
    pub fn create(&self, payload: Payload) -> RecorderEvent {
        let Some(world) = self.world.upgrade() else {
            return RecorderEvent::new(payload);
        };
        let world = world.borrow();
        let listeners = self
            .site
            .listeners
            .map(|id| {
                world
                    .listeners
                    .values(id)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<Listener>>()
            })
            .filter(|chain| !chain.is_empty());
        let context = self
            .site
            .context
            .map(|id| {
                world
                    .contexts
                    .values(id)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<ContextValue>>()
            })
            .filter(|chain| !chain.is_empty());
        RecorderEvent::with_snapshots(payload, listeners, context)
    }

    /// Wrap `f` so each invocation receives a freshly created event from
    /// `payload` as its final argument, returning `f`'s value unchanged.
    pub fn callback<A, R>(
        &self,
        payload: Payload,
        f: impl Fn(&A, &RecorderEvent) -> R,
    ) -> impl Fn(&A) -> R {
        let factory = self.clone();
        move |args| f(args, &factory.create(payload.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell as CoreRefCell};
    use serde_json::{Value, json};

    fn object(value: Value) -> Payload {
        value.as_object().cloned().expect("test literal is an object")
    }

    fn counting_listener() -> (Rc<Cell<usize>>, impl Fn(&RecorderEvent) + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        (count, move |_: &RecorderEvent| handle.set(handle.get() + 1))
    }

    #[test]
    fn context_chain_accumulates_root_to_leaf() {
        let recorder = Recorder::new();
        let outer = recorder.context_scope(Site::default(), object(json!({ "foo": "bar" })));
        let inner = recorder.context_scope(outer.site(), object(json!({ "baz": "qux" })));

        let event = recorder.events_at(inner.site()).create(Payload::new());
        let context: Vec<Value> = event
            .context()
            .expect("two providers enclose the site")
            .iter()
            .cloned()
            .map(Value::Object)
            .collect();
        assert_eq!(context, [json!({ "foo": "bar" }), json!({ "baz": "qux" })]);
    }

    #[test]
    fn listener_chain_fans_out_to_every_ancestor() {
        let recorder = Recorder::new();
        let (a, on_a) = counting_listener();
        let (b, on_b) = counting_listener();
        let (c, on_c) = counting_listener();
        let root = recorder.listener_scope(Site::default(), Some(Channel::CatchAll), on_a);
        let mid = recorder.listener_scope(root.site(), Some(Channel::CatchAll), on_b);
        let leaf = recorder.listener_scope(mid.site(), Some(Channel::CatchAll), on_c);

        let event = recorder.events_at(leaf.site()).create(Payload::new());
        assert_eq!(event.trigger(None), 3);
        assert_eq!((a.get(), b.get(), c.get()), (1, 1, 1));
    }

    #[test]
    fn channel_filters_select_listeners_on_trigger() {
        let recorder = Recorder::new();
        let (wild, on_wild) = counting_listener();
        let (named, on_named) = counting_listener();
        let root = recorder.listener_scope(Site::default(), Some(Channel::CatchAll), on_wild);
        let leaf = recorder.listener_scope(root.site(), Some(Channel::named("clicks")), on_named);

        let factory = recorder.events_at(leaf.site());
        factory.create(Payload::new()).trigger(Some(&Channel::named("clicks")));
        factory.create(Payload::new()).trigger(Some(&Channel::named("keys")));
        factory.create(Payload::new()).trigger(None);

        assert_eq!(wild.get(), 3, "catch-all listener sees every trigger");
        assert_eq!(named.get(), 1, "named listener sees its channel only");
    }

    #[test]
    fn each_create_captures_a_fresh_listener_snapshot() {
        let recorder = Recorder::new();
        let (old_count, on_old) = counting_listener();
        let scope = recorder.listener_scope(Site::default(), Some(Channel::CatchAll), on_old);
        let factory = recorder.events_at(scope.site());

        let before = factory.create(Payload::new());
        let (new_count, on_new) = counting_listener();
        scope.set_listener(Some(Channel::CatchAll), on_new);
        let after = factory.create(Payload::new());

        before.trigger(None);
        after.trigger(None);
        assert_eq!(old_count.get(), 1, "earlier event keeps its snapshot");
        assert_eq!(new_count.get(), 1, "later event sees the replacement");
    }

    #[test]
    fn unmount_keeps_captured_snapshots_but_not_new_ones() {
        let recorder = Recorder::new();
        let (count, on_event) = counting_listener();
        let scope = recorder.listener_scope(Site::default(), Some(Channel::CatchAll), on_event);
        let factory = recorder.events_at(scope.site());

        let captured = factory.create(Payload::new());
        drop(scope);

        assert_eq!(captured.trigger(None), 1, "snapshot outlives the scope");
        assert_eq!(count.get(), 1);
        let fresh = factory.create(Payload::new());
        assert_eq!(fresh.trigger(None), 0, "unmounted scope contributes nothing");
    }

    #[test]
    fn context_snapshots_are_insulated_from_set_value() {
        let recorder = Recorder::new();
        let scope = recorder.context_scope(Site::default(), object(json!({ "v": 1 })));
        let factory = recorder.events_at(scope.site());

        let before = factory.create(Payload::new());
        scope.set_value(object(json!({ "v": 2 })));
        let after = factory.create(Payload::new());

        assert_eq!(before.context().unwrap()[0]["v"], json!(1));
        assert_eq!(after.context().unwrap()[0]["v"], json!(2));
    }

    #[test]
    fn site_outside_all_scopes_yields_bare_events() {
        let recorder = Recorder::new();
        let event = recorder.events_at(Site::default()).create(Payload::new());
        assert_eq!(event.trigger(None), 0);
        assert_eq!(event.context(), None);
    }

    #[test]
    fn factory_outliving_the_recorder_yields_bare_events() {
        let recorder = Recorder::new();
        let scope = recorder.context_scope(Site::default(), object(json!({ "k": "v" })));
        let factory = recorder.events_at(scope.site());
        drop(scope);
        drop(recorder);

        let event = factory.create(object(json!({ "action": "click" })));
        assert_eq!(event.context(), None);
        assert_eq!(event.trigger(None), 0);
    }

    #[test]
    fn context_and_listener_scopes_nest_independently() {
        let recorder = Recorder::new();
        let (count, on_event) = counting_listener();
        let ctx = recorder.context_scope(Site::default(), object(json!({ "screen": "home" })));
        let listeners = recorder.listener_scope(ctx.site(), Some(Channel::CatchAll), on_event);
        let ctx_inner =
            recorder.context_scope(listeners.site(), object(json!({ "widget": "button" })));

        let event = recorder
            .events_at(ctx_inner.site())
            .create(object(json!({ "action": "click" })));
        assert_eq!(event.context().map(<[ContextValue]>::len), Some(2));
        assert_eq!(event.trigger(None), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn callback_appends_a_fresh_event_per_invocation() {
        let recorder = Recorder::new();
        let seen: Rc<CoreRefCell<Vec<Value>>> = Rc::new(CoreRefCell::new(Vec::new()));
        let scope = recorder.context_scope(Site::default(), object(json!({ "screen": "home" })));
        let factory = recorder.events_at(scope.site());

        let on_click = {
            let seen = Rc::clone(&seen);
            factory.callback(object(json!({ "action": "click" })), move |clicks: &u32, event| {
                seen.borrow_mut().push(event.to_record());
                *clicks + 1
            })
        };

        assert_eq!(on_click(&1), 2, "return value passes through unchanged");
        assert_eq!(on_click(&5), 6);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2, "one fresh event per invocation");
        assert_eq!(
            seen[0],
            json!({
                "payload": { "action": "click" },
                "context": [{ "screen": "home" }],
            })
        );
    }
}
