// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Channel-filtering listener entries collected along provider chains.

use alloc::rc::Rc;

use scribe_registry::{Channel, channel_matches};

use crate::event::RecorderEvent;

/// A listener declared by an ancestor scope: a handler plus the channel
/// filter it was declared with.
///
/// Cloning shares the handler, so chain snapshots held by events stay cheap
/// and a listener keeps delivering for events that captured it even after
/// its providing scope unmounts.
pub struct Listener {
    channel: Option<Channel>,
    on_event: Rc<dyn Fn(&RecorderEvent)>,
}

impl Clone for Listener {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
            on_event: Rc::clone(&self.on_event),
        }
    }
}

impl core::fmt::Debug for Listener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listener")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

impl Listener {
    /// Create a listener filtering on `channel`.
    pub fn new(channel: Option<Channel>, on_event: impl Fn(&RecorderEvent) + 'static) -> Self {
        Self {
            channel,
            on_event: Rc::new(on_event),
        }
    }

    /// The channel filter this listener was declared with.
    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    /// Deliver `event` if this listener's filter accepts `channel`.
    ///
    /// Returns whether the handler ran.
    pub fn deliver(&self, event: &RecorderEvent, channel: Option<&Channel>) -> bool {
        if channel_matches(self.channel.as_ref(), channel) {
            (self.on_event)(event);
            true
        } else {
            false
        }
    }
}
