// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delivery channels and the matching rule.

use alloc::string::String;

/// A logical delivery topic.
///
/// Channels name the audience of a delivery: a subscription filtered on a
/// channel, and a delivery tagged with one. [`Channel::CatchAll`] is a
/// dedicated wildcard variant rather than a reserved string, so it cannot
/// collide with any user-chosen name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Wildcard: a subscription on this channel accepts every delivery.
    CatchAll,
    /// A named topic; matches only the identical name.
    Named(String),
}

impl Channel {
    /// Create a named channel.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Whether a subscription on this channel accepts a delivery tagged with
    /// `delivered`.
    ///
    /// [`Channel::CatchAll`] accepts everything; a named channel accepts only
    /// the exact same name. The relation is deliberately asymmetric: a named
    /// subscription does not accept a [`Channel::CatchAll`] delivery.
    pub fn accepts(&self, delivered: Option<&Self>) -> bool {
        match self {
            Self::CatchAll => true,
            Self::Named(_) => delivered == Some(self),
        }
    }
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for Channel {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CatchAll => f.write_str("*"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// The single matching rule applied by every delivery path.
///
/// A subscription with no channel accepts only deliveries with no channel;
/// otherwise the subscription's channel decides via [`Channel::accepts`].
///
/// ```
/// use scribe_registry::{Channel, channel_matches};
///
/// let clicks = Channel::named("clicks");
/// assert!(channel_matches(Some(&Channel::CatchAll), Some(&clicks)));
/// assert!(channel_matches(Some(&clicks), Some(&clicks)));
/// assert!(!channel_matches(Some(&clicks), Some(&Channel::named("keys"))));
/// assert!(!channel_matches(Some(&clicks), None));
/// assert!(channel_matches(None, None));
/// assert!(!channel_matches(None, Some(&clicks)));
/// ```
pub fn channel_matches(subscribed: Option<&Channel>, delivered: Option<&Channel>) -> bool {
    match subscribed {
        Some(channel) => channel.accepts(delivered),
        None => delivered.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catch_all_accepts_everything() {
        let wildcard = Channel::CatchAll;
        assert!(wildcard.accepts(None));
        assert!(wildcard.accepts(Some(&Channel::named("a"))));
        assert!(wildcard.accepts(Some(&Channel::CatchAll)));
    }

    #[test]
    fn named_accepts_exact_name_only() {
        let a = Channel::named("a");
        assert!(a.accepts(Some(&Channel::named("a"))));
        assert!(!a.accepts(Some(&Channel::named("b"))));
        assert!(!a.accepts(None));
        // Asymmetry: a named subscription never matches a wildcard delivery.
        assert!(!a.accepts(Some(&Channel::CatchAll)));
    }

    #[test]
    fn wildcard_cannot_be_spelled_as_a_name() {
        // "*" as a name is just a name; the wildcard is its own variant.
        let star = Channel::named("*");
        assert_ne!(star, Channel::CatchAll);
        assert!(!star.accepts(Some(&Channel::CatchAll)));
        assert!(Channel::CatchAll.accepts(Some(&star)));
    }

    #[test]
    fn unchanneled_subscription_matches_unchanneled_delivery() {
        assert!(channel_matches(None, None));
        assert!(!channel_matches(None, Some(&Channel::named("a"))));
        assert!(!channel_matches(None, Some(&Channel::CatchAll)));
    }
}
