//! The store capability interface.
//!
//! `Dictionary` is what the adapter requires of the external trie store:
//! structural queries answered at connect time, ordered traversal driven
//! through an [`IterContext`], and per-column value fetches gated by a
//! sequential [`ColumnOffset`] cursor.

use std::path::Path;

use trellis_common::types::TrieNodeId;

use crate::context::IterContext;
use crate::error::StoreResult;
use crate::type_code::TypeCode;

/// Per-column cached value-fetch cursor.
///
/// Value storage is delta/offset-encoded internally, so fetches for one
/// column must proceed forward through node ids. The offset records the last
/// node fetched and the bit position its value started at; a store accepts a
/// fetch when the offset is reset or the requested node is at or past the
/// recorded one, and must reject anything earlier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnOffset {
    state: Option<(TrieNodeId, u64)>,
}

impl ColumnOffset {
    /// Creates a reset offset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the cached position; the next fetch recomputes from scratch.
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Returns true when no position is cached.
    #[inline]
    #[must_use]
    pub fn is_reset(&self) -> bool {
        self.state.is_none()
    }

    /// Returns the last node fetched through this offset, if any.
    #[must_use]
    pub fn last_node(&self) -> Option<TrieNodeId> {
        self.state.map(|(node, _)| node)
    }

    /// Returns the cached bit position, if any.
    #[must_use]
    pub fn bit_offset(&self) -> Option<u64> {
        self.state.map(|(_, bits)| bits)
    }

    /// Records the node just fetched and the bit position its value started
    /// at. Called by the store after every successful fetch.
    pub fn record(&mut self, node: TrieNodeId, bit_offset: u64) {
        self.state = Some((node, bit_offset));
    }
}

/// Required capability set of the external trie store.
///
/// The store is read-only for the adapter's entire lifetime. Traversal calls
/// must be reentrant for distinct contexts: multiple cursors may scan one
/// store concurrently, each with its own `IterContext` and buffers.
pub trait Dictionary: Sized {
    /// Opens a store from a path. Fails when the path is missing or the
    /// store is malformed.
    fn open(path: &Path) -> StoreResult<Self>;

    // =========================================================================
    // Structural queries
    // =========================================================================

    /// The table name embedded in the store. Stores built without a name
    /// carry an anonymous placeholder.
    fn table_name(&self) -> &str;

    /// Number of columns.
    fn column_count(&self) -> usize;

    /// Name of column `i`.
    fn column_name(&self, i: usize) -> &str;

    /// Type code of column `i`.
    fn column_type(&self, i: usize) -> TypeCode;

    /// Maximum key length in bytes.
    fn max_key_len(&self) -> usize;

    /// Maximum value length in bytes across all columns.
    fn max_val_len(&self) -> usize;

    /// Maximum value length in bytes for column `i`. Zero for the key
    /// column of a keyed store (the key-as-column convention).
    fn col_max_val_len(&self, i: usize) -> usize;

    /// Maximum traversal depth of the trie.
    fn max_level(&self) -> usize;

    /// Number of indexed keys. Zero means the store has no key index and is
    /// addressed purely by node id.
    fn key_count(&self) -> u64;

    /// Total number of nodes.
    fn node_count(&self) -> u64;

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Seeks to the key exactly equal to `key`. Returns whether it was
    /// found; when found, the context is left positioned so that the next
    /// [`next`](Dictionary::next) call yields the matched key.
    fn seek_exact(&self, key: &[u8], ctx: &mut IterContext) -> bool;

    /// Advances the ordered traversal, writing the next key into `key_buf`
    /// and returning its length. Returns `None` when the traversal is
    /// exhausted; `Some(0)` is a valid empty key, distinct from exhaustion.
    ///
    /// `key_buf` must hold at least [`max_key_len`](Dictionary::max_key_len)
    /// bytes.
    fn next(&self, ctx: &mut IterContext, key_buf: &mut [u8]) -> Option<usize>;

    /// Reconstructs the key for `node`, writing it into `key_buf` and
    /// returning its length, or `None` when the node has no key (keyless
    /// store or out-of-range node).
    fn reverse_lookup(&self, node: TrieNodeId, key_buf: &mut [u8]) -> Option<usize>;

    /// Fetches the raw value bytes of column `col` for `node` into
    /// `val_buf`, returning the value length.
    ///
    /// `offset` is the column's cached fetch cursor and must be passed back
    /// unchanged between fetches for the same column; a fetch behind the
    /// cached position fails with `NonSequentialRead`.
    fn fetch_column(
        &self,
        node: TrieNodeId,
        col: usize,
        val_buf: &mut [u8],
        offset: &mut ColumnOffset,
    ) -> StoreResult<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_offset_lifecycle() {
        let mut off = ColumnOffset::new();
        assert!(off.is_reset());
        assert_eq!(off.last_node(), None);

        off.record(TrieNodeId::new(3), 128);
        assert!(!off.is_reset());
        assert_eq!(off.last_node(), Some(TrieNodeId::new(3)));
        assert_eq!(off.bit_offset(), Some(128));

        off.reset();
        assert!(off.is_reset());
    }
}
