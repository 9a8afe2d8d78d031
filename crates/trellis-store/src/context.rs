//! Reusable traversal state for ordered store scans.
//!
//! An `IterContext` is owned by one row cursor and passed by reference into
//! the store's traversal calls. It must be initialized before first use and
//! before every fresh scan; releasing it frees the backing storage. Reuse is
//! arena-style: initialization resets fields without reallocating.

use trellis_common::types::TrieNodeId;

/// Cursor-local traversal state consumed by a store's ordered-next and seek
/// operations.
///
/// The adapter reads only `current_node()` (rowid derivation for ordered
/// scans); the remaining accessors exist for store implementations to record
/// their position between calls.
#[derive(Debug, Default)]
pub struct IterContext {
    /// Node ids from the trie root down to the current leaf.
    node_path: Vec<TrieNodeId>,
    /// Index of the current node within `node_path`.
    cur_idx: usize,
    /// Store-private ordered-scan position.
    pos: usize,
    /// Store-usable key reconstruction scratch.
    key_scratch: Vec<u8>,
    /// Set between `init` and `release`.
    initialized: bool,
}

impl IterContext {
    /// Creates an uninitialized context. `init` must be called before the
    /// context is handed to any traversal call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes the context for a fresh scan.
    ///
    /// Sizing comes from the table's maxima: `max_key_len` bounds the key
    /// scratch, `max_level` bounds the node path depth. Calling `init` on an
    /// already-initialized context resets it in place without shrinking the
    /// existing allocations.
    pub fn init(&mut self, max_key_len: usize, max_level: usize) {
        self.node_path.clear();
        self.node_path.reserve(max_level);
        self.key_scratch.clear();
        self.key_scratch.reserve(max_key_len);
        self.cur_idx = 0;
        self.pos = 0;
        self.initialized = true;
    }

    /// Releases the backing storage. The context must be re-initialized
    /// before any further use.
    pub fn release(&mut self) {
        self.node_path = Vec::new();
        self.key_scratch = Vec::new();
        self.cur_idx = 0;
        self.pos = 0;
        self.initialized = false;
    }

    /// Returns true between `init` and `release`.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the node id at the current path index, or the invalid
    /// sentinel when the context is not positioned on a node.
    #[must_use]
    pub fn current_node(&self) -> TrieNodeId {
        self.node_path
            .get(self.cur_idx)
            .copied()
            .unwrap_or(TrieNodeId::INVALID)
    }

    // =========================================================================
    // Store-facing accessors
    // =========================================================================

    /// Returns the store-private scan position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Sets the store-private scan position.
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Records the leaf the traversal currently rests on, replacing the
    /// node path.
    pub fn set_leaf(&mut self, node: TrieNodeId) {
        self.node_path.clear();
        self.node_path.push(node);
        self.cur_idx = 0;
    }

    /// Returns the store-usable key reconstruction scratch.
    #[inline]
    pub fn key_scratch(&mut self) -> &mut Vec<u8> {
        &mut self.key_scratch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_and_release() {
        let mut ctx = IterContext::new();
        assert!(!ctx.is_initialized());
        assert_eq!(ctx.current_node(), TrieNodeId::INVALID);

        ctx.init(16, 4);
        assert!(ctx.is_initialized());

        ctx.set_leaf(TrieNodeId::new(7));
        assert_eq!(ctx.current_node(), TrieNodeId::new(7));

        ctx.release();
        assert!(!ctx.is_initialized());
        assert_eq!(ctx.current_node(), TrieNodeId::INVALID);
    }

    #[test]
    fn test_reinit_resets_position() {
        let mut ctx = IterContext::new();
        ctx.init(16, 4);
        ctx.set_position(5);
        ctx.set_leaf(TrieNodeId::new(3));

        ctx.init(16, 4);
        assert_eq!(ctx.position(), 0);
        assert_eq!(ctx.current_node(), TrieNodeId::INVALID);
    }
}
