// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scribe Registry: a channel-aware listener registry scoped to a UI subtree.
//!
//! ## Overview
//!
//! A [`Registry`](crate::registry::Registry) is the live set of listeners for
//! one subtree: the top-level provider of the subtree owns it, descendants
//! hold non-owning [`Emitter`](crate::registry::Emitter) handles, and every
//! registration is paired with an RAII [`Subscription`](crate::registry::Subscription)
//! guard whose drop removes exactly that entry. Disposal is therefore tied to
//! host lifetime rather than left as a caller obligation, and a forgotten
//! unsubscribe cannot accumulate listeners forever.
//!
//! ## Channels
//!
//! Every subscription carries an optional [`Channel`](crate::channel::Channel)
//! filter and every delivery an optional channel argument. A
//! [`Channel::CatchAll`](crate::channel::Channel::CatchAll) subscription
//! accepts every delivery; a named subscription accepts only the exact same
//! named delivery; an unchanneled subscription accepts only unchanneled
//! deliveries. The wildcard is a dedicated variant, so it can never collide
//! with a user-chosen channel name.
//!
//! ## Delivery
//!
//! [`Registry::emit`](crate::registry::Registry::emit) snapshots the matching
//! handlers before the first one runs, then invokes the snapshot. Handlers
//! may subscribe, unsubscribe, or emit reentrantly; the in-flight pass is
//! unaffected. Handlers are infallible closures, so delivery is fail-fast: a
//! panicking handler unwinds to the caller and later handlers do not run.
//!
//! ## Example
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//!
//! use scribe_registry::{Channel, Registry};
//!
//! let registry: Registry<&str> = Registry::new();
//! let seen = Rc::new(Cell::new(0));
//!
//! let on_any = {
//!     let seen = Rc::clone(&seen);
//!     registry.subscribe(Some(Channel::CatchAll), move |_event| {
//!         seen.set(seen.get() + 1);
//!     })
//! };
//! let on_clicks = registry.subscribe(Some(Channel::named("clicks")), |event: &&str| {
//!     assert_eq!(*event, "pressed");
//! });
//!
//! // The catch-all sees both deliveries; "clicks" sees only its own.
//! assert_eq!(registry.emit(&"pressed", Some(&Channel::named("clicks"))), 2);
//! assert_eq!(registry.emit(&"scrolled", Some(&Channel::named("wheel"))), 1);
//! assert_eq!(seen.get(), 2);
//!
//! // Dropping a guard deregisters exactly that listener.
//! drop(on_any);
//! assert_eq!(registry.emit(&"pressed", Some(&Channel::named("clicks"))), 1);
//! # drop(on_clicks);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod channel;
mod registry;

pub use channel::{Channel, channel_matches};
pub use registry::{Emitter, Registry, RegistryError, Subscription};
