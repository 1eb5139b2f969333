//! Per-call-site widget identity.
//!
//! Widgets are not objects; a widget "exists" in a frame because some code
//! called into the core with a label. [`IdStack`] turns that call into a
//! [`WidgetId`] by hashing three things together:
//!
//! - the identity of the innermost open scope (`WidgetId::ROOT` when none),
//! - a per-frame call counter, incremented on every call,
//! - the label (or an integer index for loop items).
//!
//! Because the counter takes part, calling `id("ok")` twice in the same scope
//! yields two different identities. The flip side: an identity is only stable
//! across frames while the sequence of calls before it is unchanged. Hiding a
//! widget early in the frame renumbers everything after it.
//!
//! ```rust
//! use ember_core::id::IdStack;
//!
//! let mut ids = IdStack::new();
//! let a = ids.id("row");
//! let b = ids.id("row");
//! assert_ne!(a, b);
//!
//! ids.reset();
//! assert_eq!(ids.id("row"), a);
//! ```

use std::hash::BuildHasher;

use smallvec::SmallVec;

/// Stable key correlating a widget across frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl WidgetId {
    /// Parent of every top-level identity.
    pub const ROOT: WidgetId = WidgetId(0);

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:016x}", self.0)
    }
}

const KIND_LABEL: u8 = 0;
const KIND_INDEX: u8 = 1;
const KIND_SCOPE: u8 = 2;

// Fixed seeds so identities do not depend on per-process randomness.
const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

pub struct IdStack {
    hasher: ahash::RandomState,
    scopes: SmallVec<[WidgetId; 16]>,
    counter: u64,
}

impl Default for IdStack {
    fn default() -> Self {
        Self::new()
    }
}

impl IdStack {
    pub fn new() -> Self {
        Self {
            hasher: ahash::RandomState::with_seeds(SEEDS[0], SEEDS[1], SEEDS[2], SEEDS[3]),
            scopes: SmallVec::new(),
            counter: 0,
        }
    }

    /// Frame start: counter back to zero, scope stack emptied.
    pub fn reset(&mut self) {
        if !self.scopes.is_empty() {
            log::warn!(
                "IdStack::reset: {} scope(s) still open at frame start; discarding",
                self.scopes.len()
            );
            self.scopes.clear();
        }
        self.counter = 0;
    }

    pub fn current_scope(&self) -> WidgetId {
        self.scopes.last().copied().unwrap_or(WidgetId::ROOT)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Calls made so far this frame.
    pub fn calls(&self) -> u64 {
        self.counter
    }

    pub fn id(&mut self, label: &str) -> WidgetId {
        let (parent, n) = self.next();
        self.finish(self.hasher.hash_one((parent.0, n, KIND_LABEL, label)))
    }

    /// Identity for array/loop items; skips string hashing.
    pub fn id_index(&mut self, index: u64) -> WidgetId {
        let (parent, n) = self.next();
        self.finish(self.hasher.hash_one((parent.0, n, KIND_INDEX, index)))
    }

    /// Open a nested scope; subsequent identities are derived from it.
    pub fn push_scope(&mut self, label: &str) -> WidgetId {
        let (parent, n) = self.next();
        let id = self.finish(self.hasher.hash_one((parent.0, n, KIND_SCOPE, label)));
        self.scopes.push(id);
        id
    }

    /// Open a scope rooted at an identity the caller already has.
    pub fn push_id(&mut self, id: WidgetId) {
        self.scopes.push(id);
    }

    pub fn pop_scope(&mut self) -> Option<WidgetId> {
        let popped = self.scopes.pop();
        if popped.is_none() {
            log::warn!("IdStack::pop_scope with empty stack");
        }
        popped
    }

    pub fn with_scope<R>(&mut self, label: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push_scope(label);
        let depth = self.scopes.len();
        let out = f(self);
        // Inner code may have leaked pushes; unwind to our own level.
        self.scopes.truncate(depth);
        self.pop_scope();
        out
    }

    fn next(&mut self) -> (WidgetId, u64) {
        let n = self.counter;
        self.counter += 1;
        (self.current_scope(), n)
    }

    fn finish(&self, h: u64) -> WidgetId {
        // 0 is reserved for the root.
        WidgetId(if h == 0 { 1 } else { h })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ids: &mut IdStack) -> Vec<WidgetId> {
        ids.reset();
        let mut out = vec![ids.id("toolbar")];
        ids.with_scope("list", |ids| {
            for i in 0..3 {
                out.push(ids.id_index(i));
            }
            out.push(ids.id("footer"));
        });
        out.push(ids.id("status"));
        out
    }

    #[test]
    fn identities_are_stable_across_frames() {
        let mut ids = IdStack::new();
        let first = frame(&mut ids);
        let second = frame(&mut ids);
        assert_eq!(first, second);
    }

    #[test]
    fn same_label_same_scope_differs_within_frame() {
        let mut ids = IdStack::new();
        let a = ids.id("x");
        let b = ids.id("x");
        assert_ne!(a, b);
    }

    #[test]
    fn scope_rebases_identities() {
        let mut a = IdStack::new();
        let mut b = IdStack::new();
        // Same counter position, different parent scope.
        a.push_id(WidgetId(7));
        b.push_id(WidgetId(8));
        assert_ne!(a.id("x"), b.id("x"));
    }

    #[test]
    fn changed_call_sequence_shifts_later_identities() {
        let mut ids = IdStack::new();
        ids.id("maybe");
        let with = ids.id("after");
        ids.reset();
        let without = ids.id("after");
        assert_ne!(with, without);
    }

    #[test]
    fn pop_on_empty_stack_is_harmless() {
        let mut ids = IdStack::new();
        assert_eq!(ids.pop_scope(), None);
        assert_eq!(ids.current_scope(), WidgetId::ROOT);
    }
}
