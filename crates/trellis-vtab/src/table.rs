//! Table handle: connect, schema ownership, cursor creation.

use std::path::Path;

use tracing::debug;
use trellis_common::config::ConnectOptions;
use trellis_common::error::TrellisResult;
use trellis_store::Dictionary;

use crate::cursor::TrieCursor;
use crate::planner::{plan_index, IndexConstraint, IndexPlan};
use crate::schema::TableSchema;

/// One opened virtual table backed by a trie store.
///
/// The handle owns the dictionary, opened once at connect time, and the
/// schema derived from it. It outlives every cursor opened against it; each
/// cursor borrows the handle for the duration of its scan.
#[derive(Debug)]
pub struct TrieTable<D: Dictionary> {
    dict: D,
    schema: TableSchema,
}

impl<D: Dictionary> TrieTable<D> {
    /// Opens the store at `path` and derives the table schema.
    ///
    /// Fails with `StoreOpen` when the path is missing or the store is
    /// malformed; on failure no handle exists and nothing needs releasing.
    pub fn connect(path: &Path, options: &ConnectOptions) -> TrellisResult<Self> {
        let dict = D::open(path)?;
        let schema = TableSchema::from_dictionary(&dict, options);
        debug!(ddl = %schema.ddl(), "connected trie table");
        Ok(Self { dict, schema })
    }

    /// Wraps an already-opened dictionary. Used by callers that manage store
    /// lifetimes themselves.
    pub fn from_dictionary(dict: D, options: &ConnectOptions) -> Self {
        let schema = TableSchema::from_dictionary(&dict, options);
        debug!(ddl = %schema.ddl(), "connected trie table");
        Self { dict, schema }
    }

    /// Returns the derived schema.
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Returns the underlying dictionary.
    #[inline]
    #[must_use]
    pub fn dictionary(&self) -> &D {
        &self.dict
    }

    /// Returns the schema column holding the store's indexed key: the first
    /// column with zero max value length, present only on keyed stores.
    #[must_use]
    pub fn key_column(&self) -> Option<usize> {
        if self.dict.key_count() == 0 {
            return None;
        }
        self.schema
            .columns()
            .iter()
            .position(|c| c.max_val_len == 0)
    }

    /// Returns the designated value column for value-equality scans: the
    /// first column with a nonzero max value length.
    #[must_use]
    pub fn value_column(&self) -> Option<usize> {
        self.schema
            .columns()
            .iter()
            .position(|c| c.max_val_len > 0)
    }

    /// Negotiates an index plan for the given candidate constraints.
    ///
    /// The engine may call this any number of times per compilation; the
    /// answer depends only on the constraint list and the immutable schema.
    #[must_use]
    pub fn best_index(&self, constraints: &[IndexConstraint]) -> IndexPlan {
        debug!(candidates = constraints.len(), "negotiating index plan");
        plan_index(self.key_column(), constraints)
    }

    /// Opens a row cursor against this table.
    pub fn open_cursor(&self) -> TrellisResult<TrieCursor<'_, D>> {
        TrieCursor::open(self)
    }

    /// Releases the dictionary and the handle. Called once, after all
    /// cursors are closed; the borrow checker enforces the ordering.
    pub fn disconnect(self) {
        debug!(table = %self.schema.name(), "disconnecting trie table");
        drop(self);
    }
}
