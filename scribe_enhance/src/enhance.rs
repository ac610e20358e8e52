// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Callback interception: wrap a component's event callbacks so each
//! invocation receives a freshly created recorder event.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::any::Any;
use core::cell::RefCell;

use hashbrown::HashMap;
use scribe_recorder::{Channel, EventFactory, Payload, RecorderEvent};

use crate::auto_trigger::{AutoTrigger, is_auto_triggered};

/// How the enhancer builds the event for one configured callback name.
pub enum EventSpec<P> {
    /// A static payload; the event is `factory.create(payload.clone())`.
    Payload(Payload),
    /// Computed at call time from the factory and the component's props.
    Create(Rc<dyn Fn(&EventFactory, &P) -> RecorderEvent>),
}

impl<P> core::fmt::Debug for EventSpec<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Payload(payload) => f.debug_tuple("Payload").field(payload).finish(),
            Self::Create(_) => f.debug_tuple("Create").finish_non_exhaustive(),
        }
    }
}

/// Per-component enhancer configuration: which callback names get events,
/// and whether/where those events auto-trigger.
pub struct EnhanceConfig<P> {
    events: HashMap<String, EventSpec<P>>,
    auto_trigger: Option<AutoTrigger>,
    channel: Option<Channel>,
}

impl<P> core::fmt::Debug for EnhanceConfig<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EnhanceConfig")
            .field("events", &self.events)
            .field("auto_trigger", &self.auto_trigger)
            .field("channel", &self.channel)
            .finish()
    }
}

impl<P> Default for EnhanceConfig<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> EnhanceConfig<P> {
    /// Empty configuration: no callback is intercepted.
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
            auto_trigger: None,
            channel: None,
        }
    }

    /// Intercept `name` with a static payload.
    pub fn on(mut self, name: impl Into<String>, payload: Payload) -> Self {
        self.events.insert(name.into(), EventSpec::Payload(payload));
        self
    }

    /// Intercept `name` with an event computed at call time.
    pub fn on_with(
        mut self,
        name: impl Into<String>,
        create: impl Fn(&EventFactory, &P) -> RecorderEvent + 'static,
    ) -> Self {
        self.events
            .insert(name.into(), EventSpec::Create(Rc::new(create)));
        self
    }

    /// Deliver events immediately for the callbacks this policy selects,
    /// before the original callback runs.
    pub fn auto_trigger(mut self, option: impl Into<AutoTrigger>) -> Self {
        self.auto_trigger = Some(option.into());
        self
    }

    /// The channel used when auto-triggering.
    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Whether `name` is configured for interception.
    pub fn intercepts(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }
}

/// An intercepted callback: same external signature as the original, with
/// the recorder event appended internally.
pub struct Enhanced<A, R = ()> {
    inner: Rc<dyn Fn(&A) -> R>,
}

impl<A, R> Clone for Enhanced<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A, R> core::fmt::Debug for Enhanced<A, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Enhanced").finish_non_exhaustive()
    }
}

impl<A, R> Enhanced<A, R> {
    /// Invoke the callback as the host would invoke the original.
    pub fn call(&self, args: &A) -> R {
        (self.inner)(args)
    }

    /// Whether two handles share one wrapper (referential stability).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Wraps one component instance's callbacks with recorder-event injection.
///
/// The enhancer plays the role of a wrapping component: the host forwards
/// props and references to the target unchanged, routes each *configured*
/// callback through [`Enhancer::enhance`], and passes
/// [`Enhancer::factory`] through as the injected event-creation capability.
/// Unconfigured callbacks (and configured names whose prop is not a
/// callback) are simply not routed here and pass through unmodified.
///
/// Wrappers are cached per configured name and underlying callback
/// identity, so re-enhancing an unchanged callback across renders returns
/// the identical wrapper and downstream identity checks stay stable.
pub struct Enhancer<P> {
    component: Cow<'static, str>,
    factory: EventFactory,
    config: Rc<EnhanceConfig<P>>,
    props: Rc<P>,
    cache: RefCell<HashMap<(String, usize), Box<dyn Any>>>,
}

impl<P> core::fmt::Debug for Enhancer<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "with_recorder_events({})", self.component)
    }
}

impl<P: 'static> Enhancer<P> {
    /// Wrap the component named `component` (used for debug labels) with
    /// `config`, creating events through `factory`.
    ///
    /// `props` are the wrapped component's props as of mounting; call-time
    /// event specs receive them. Wrappers capture these props for their
    /// lifetime; replacing props without remounting does not re-run
    /// interception, mirroring the wrapper cache's identity guarantee.
    pub fn new(
        component: impl Into<Cow<'static, str>>,
        factory: EventFactory,
        config: EnhanceConfig<P>,
        props: Rc<P>,
    ) -> Self {
        Self {
            component: component.into(),
            factory,
            config: Rc::new(config),
            props,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// The injected event-creation capability (the `create_recorder_event`
    /// prop of the wrapped component).
    pub fn factory(&self) -> &EventFactory {
        &self.factory
    }

    /// Create an ad-hoc event outside the configured callback set.
    pub fn create(&self, payload: Payload) -> RecorderEvent {
        self.factory.create(payload)
    }

    /// Intercept `callback`, configured under `name`.
    ///
    /// Returns `None` when `name` is not configured; the host keeps the
    /// original callback untouched. Otherwise the returned wrapper, per
    /// invocation: builds the event from the configured spec, delivers it
    /// immediately if the auto-trigger policy selects `name` (on the
    /// configured channel), then invokes `callback` with the original
    /// argument plus the event, returning its value unchanged.
    ///
    /// Enhancing the same `callback` under the same `name` again returns
    /// the cached wrapper ([`Enhanced::ptr_eq`] holds).
    pub fn enhance<A: 'static, R: 'static>(
        &self,
        name: &str,
        callback: Rc<dyn Fn(&A, &RecorderEvent) -> R>,
    ) -> Option<Enhanced<A, R>> {
        if !self.config.intercepts(name) {
            return None;
        }
        let key = (
            String::from(name),
            Rc::as_ptr(&callback).cast::<()>() as usize,
        );
        if let Some(cached) = self.cache.borrow().get(&key) {
            return cached.downcast_ref::<Enhanced<A, R>>().cloned();
        }

        let wrapper = {
            let factory = self.factory.clone();
            let config = Rc::clone(&self.config);
            let props = Rc::clone(&self.props);
            let name = String::from(name);
            Enhanced {
                inner: Rc::new(move |args: &A| {
                    let spec = config.events.get(&name).expect("name checked at enhance time");
                    let event = match spec {
                        EventSpec::Payload(payload) => factory.create(payload.clone()),
                        EventSpec::Create(create) => create(&factory, &props),
                    };
                    if is_auto_triggered(&name, config.auto_trigger.as_ref()) {
                        event.trigger(config.channel.as_ref());
                    }
                    callback(args, &event)
                }),
            }
        };
        self.cache
            .borrow_mut()
            .insert(key, Box::new(wrapper.clone()));
        Some(wrapper)
    }
}
