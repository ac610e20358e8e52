// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scribe Scope: a generic tree-scoped value collector.
//!
//! ## Overview
//!
//! Retained-mode UI trees often need *scoped* values: an ancestor declares a
//! contribution, and every descendant can read the ordered chain of all
//! ancestor contributions. This crate models exactly that and nothing more.
//! A [`ScopeTree<T>`](crate::tree::ScopeTree) holds one node per *provider*
//! in the host tree; non-provider hosts do not appear. A descendant that sits
//! inside at least one provider holds the [`ScopeId`](crate::types::ScopeId)
//! of its nearest enclosing provider and resolves the full chain on demand.
//!
//! ## Resolution
//!
//! [`ScopeTree::values`](crate::tree::ScopeTree::values) walks the parent
//! chain once and returns the contributions ordered root→leaf, including the
//! queried node's own value. Nesting two providers composes: the inner chain
//! is the outer chain with the inner value appended, never a replacement.
//! Resolution is fresh on every call; there is no caching that could serve a
//! stale chain to a different descendant.
//!
//! ## Lifecycle
//!
//! Identifiers are generational: removing a node frees its slot for reuse,
//! and ids from before the reuse can never alias the new occupant. Removal
//! takes the whole subtree and is idempotent, so host unmount order does not
//! matter. A consumer outside every provider simply holds no [`ScopeId`];
//! that is "no contributions", not an error.
//!
//! ## Example
//!
//! ```
//! use scribe_scope::{ScopeId, ScopeTree};
//!
//! let mut tree: ScopeTree<&str> = ScopeTree::new();
//! let app = tree.insert(None, "app");
//! let page = tree.insert(Some(app), "page");
//! let dialog = tree.insert(Some(page), "dialog");
//!
//! // A consumer under `dialog` sees every ancestor contribution, root→leaf.
//! let chain: Vec<&str> = tree.values(dialog).into_iter().copied().collect();
//! assert_eq!(chain, ["app", "page", "dialog"]);
//!
//! // Unmounting the page removes its whole subtree.
//! tree.remove(page);
//! assert!(!tree.is_alive(dialog));
//! assert!(tree.values(dialog).is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::{Ancestors, ScopeTree};
pub use types::ScopeId;
