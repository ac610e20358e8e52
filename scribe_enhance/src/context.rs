// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context wrapping: nest every mount of a component inside a context
//! provider carrying a fixed value.

use alloc::borrow::Cow;

use scribe_recorder::{ContextScope, ContextValue, Recorder, Site};

/// Wrap components so each mount contributes `value` to its subtree.
///
/// See [`ContextWrapper`].
pub fn with_events_context(value: ContextValue) -> ContextWrapper {
    ContextWrapper { value }
}

/// A reusable wrapping recipe: one fixed context value, applied to any
/// number of components.
#[derive(Clone, Debug)]
pub struct ContextWrapper {
    value: ContextValue,
}

impl ContextWrapper {
    /// Mount the wrapped component named `component` at `site`.
    ///
    /// The host forwards props and references to the target unchanged and
    /// renders it under [`WrappedContext::site`]; the provider unmounts with
    /// the returned guard.
    pub fn mount(
        &self,
        recorder: &Recorder,
        site: Site,
        component: impl Into<Cow<'static, str>>,
    ) -> WrappedContext {
        WrappedContext {
            component: component.into(),
            scope: recorder.context_scope(site, self.value.clone()),
        }
    }
}

/// One mounted instance of a context-wrapped component.
pub struct WrappedContext {
    component: Cow<'static, str>,
    scope: ContextScope,
}

impl core::fmt::Debug for WrappedContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "with_events_context({})", self.component)
    }
}

impl WrappedContext {
    /// The site the wrapped component renders under.
    pub fn site(&self) -> Site {
        self.scope.site()
    }
}
