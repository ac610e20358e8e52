// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scope tree: node identifiers.

/// Identifier for a provider node in a scope tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ScopeId(pub(crate) u32, pub(crate) u32);

impl ScopeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}
