//! # trellis-testkit
//!
//! Test support for the Trellis adapter:
//!
//! - **`MemoryDictionary`**: a complete in-memory [`Dictionary`] that honors
//!   every contract of the trait, including the sequential value-fetch rule
//! - **`DictionaryBuilder`**: assembles a store from typed row literals,
//!   encoding cells through the adapter's own writer-side codec
//! - snapshots: a built store can be saved to disk and reopened through
//!   `Dictionary::open`, which exercises the connect path end to end
//!
//! Node ids are assigned densely in key order, `0..row_count`, for keyed and
//! keyless stores alike.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use trellis_common::constants::ANONYMOUS_TABLE_PREFIX;
use trellis_common::error::TrellisResult;
use trellis_common::types::TrieNodeId;
use trellis_store::{ColumnOffset, Dictionary, IterContext, StoreError, StoreResult, TypeCode};
use trellis_vtab::value::{encode_cell, ColumnValue};

// =========================================================================
// Snapshot wire format
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
struct ColumnSnapshot {
    name: String,
    type_code: char,
    max_val_len: usize,
}

/// On-disk form of a built store. The format is private to the test kit;
/// production stores have their own.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    name: String,
    columns: Vec<ColumnSnapshot>,
    keyed: bool,
    keys: Vec<Vec<u8>>,
    /// `cells[col][row]`, already in stored-byte form.
    cells: Vec<Vec<Vec<u8>>>,
}

// =========================================================================
// MemoryDictionary
// =========================================================================

#[derive(Debug, Clone)]
struct ColumnMeta {
    name: String,
    type_code: TypeCode,
    max_val_len: usize,
}

/// An in-memory trie store standing in for the production format.
///
/// Rows live sorted by key; the "trie" is flat, but every observable
/// contract holds: ordered traversal yields keys in byte order, node ids are
/// dense and stable, and value fetches enforce forward-only access per
/// column through the caller's [`ColumnOffset`].
#[derive(Debug)]
pub struct MemoryDictionary {
    name: String,
    columns: Vec<ColumnMeta>,
    keyed: bool,
    keys: Vec<Vec<u8>>,
    cells: Vec<Vec<Vec<u8>>>,
    /// `bit_starts[col][row]`: bit position each stored value begins at,
    /// mirroring what an offset-encoded store would report.
    bit_starts: Vec<Vec<u64>>,
    max_key_len: usize,
    max_val_len: usize,
}

impl MemoryDictionary {
    fn from_snapshot(snap: Snapshot) -> Self {
        let columns: Vec<ColumnMeta> = snap
            .columns
            .into_iter()
            .map(|c| ColumnMeta {
                name: c.name,
                type_code: TypeCode::new(c.type_code),
                max_val_len: c.max_val_len,
            })
            .collect();
        let bit_starts = snap
            .cells
            .iter()
            .map(|col| {
                let mut starts = Vec::with_capacity(col.len());
                let mut bits = 0u64;
                for cell in col {
                    starts.push(bits);
                    bits += cell.len() as u64 * 8;
                }
                starts
            })
            .collect();
        let max_key_len = snap.keys.iter().map(Vec::len).max().unwrap_or(0);
        let max_val_len = columns.iter().map(|c| c.max_val_len).max().unwrap_or(0);
        Self {
            name: snap.name,
            columns,
            keyed: snap.keyed,
            keys: snap.keys,
            cells: snap.cells,
            bit_starts,
            max_key_len,
            max_val_len,
        }
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            name: self.name.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| ColumnSnapshot {
                    name: c.name.clone(),
                    type_code: c.type_code.as_char(),
                    max_val_len: c.max_val_len,
                })
                .collect(),
            keyed: self.keyed,
            keys: self.keys.clone(),
            cells: self.cells.clone(),
        }
    }

    /// Writes the store to `path` so it can be reopened through
    /// [`Dictionary::open`].
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let bytes = bincode::serialize(&self.to_snapshot())
            .map_err(|e| StoreError::corrupt(e.to_string()))?;
        fs::write(path, bytes)?;
        Ok(())
    }

    fn row_count(&self) -> usize {
        if self.keyed {
            self.keys.len()
        } else {
            self.cells.first().map_or(0, Vec::len)
        }
    }

    fn check_node(&self, node: TrieNodeId) -> StoreResult<usize> {
        let row = node.as_u32() as usize;
        if !node.is_valid() || row >= self.row_count() {
            return Err(StoreError::NodeOutOfRange { node });
        }
        Ok(row)
    }
}

impl Dictionary for MemoryDictionary {
    fn open(path: &Path) -> StoreResult<Self> {
        let bytes =
            fs::read(path).map_err(|e| StoreError::open(path, e.to_string()))?;
        let snap: Snapshot = bincode::deserialize(&bytes)
            .map_err(|e| StoreError::open(path, format!("malformed snapshot: {e}")))?;
        Ok(Self::from_snapshot(snap))
    }

    fn table_name(&self) -> &str {
        &self.name
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, i: usize) -> &str {
        &self.columns[i].name
    }

    fn column_type(&self, i: usize) -> TypeCode {
        self.columns[i].type_code
    }

    fn max_key_len(&self) -> usize {
        self.max_key_len
    }

    fn max_val_len(&self) -> usize {
        self.max_val_len
    }

    fn col_max_val_len(&self, i: usize) -> usize {
        self.columns[i].max_val_len
    }

    fn max_level(&self) -> usize {
        // A flat store walks at most one level per key byte.
        self.max_key_len.max(1)
    }

    fn key_count(&self) -> u64 {
        if self.keyed {
            self.keys.len() as u64
        } else {
            0
        }
    }

    fn node_count(&self) -> u64 {
        self.row_count() as u64
    }

    fn seek_exact(&self, key: &[u8], ctx: &mut IterContext) -> bool {
        if !self.keyed {
            return false;
        }
        match self.keys.binary_search_by(|k| k.as_slice().cmp(key)) {
            Ok(row) => {
                ctx.set_position(row);
                true
            }
            Err(_) => false,
        }
    }

    fn next(&self, ctx: &mut IterContext, key_buf: &mut [u8]) -> Option<usize> {
        if !self.keyed {
            return None;
        }
        let row = ctx.position();
        let key = self.keys.get(row)?;
        key_buf[..key.len()].copy_from_slice(key);
        ctx.set_leaf(TrieNodeId::new(row as u32));
        ctx.set_position(row + 1);
        Some(key.len())
    }

    fn reverse_lookup(&self, node: TrieNodeId, key_buf: &mut [u8]) -> Option<usize> {
        if !self.keyed {
            return None;
        }
        let key = self.keys.get(node.as_u32() as usize)?;
        key_buf[..key.len()].copy_from_slice(key);
        Some(key.len())
    }

    fn fetch_column(
        &self,
        node: TrieNodeId,
        col: usize,
        val_buf: &mut [u8],
        offset: &mut ColumnOffset,
    ) -> StoreResult<usize> {
        if col >= self.columns.len() {
            return Err(StoreError::ColumnOutOfRange {
                column: col,
                count: self.columns.len(),
            });
        }
        let row = self.check_node(node)?;
        if let Some(last) = offset.last_node() {
            if node < last {
                return Err(StoreError::NonSequentialRead { column: col, node });
            }
        }
        let cell = &self.cells[col][row];
        if cell.len() > val_buf.len() {
            return Err(StoreError::BufferTooSmall {
                needed: cell.len(),
                available: val_buf.len(),
            });
        }
        val_buf[..cell.len()].copy_from_slice(cell);
        offset.record(node, self.bit_starts[col][row]);
        Ok(cell.len())
    }
}

// =========================================================================
// DictionaryBuilder
// =========================================================================

#[derive(Debug, Clone)]
struct ColumnSpec {
    name: String,
    type_code: TypeCode,
    is_key: bool,
}

/// Assembles a [`MemoryDictionary`] from typed rows.
///
/// Cells are encoded through the adapter's writer-side codec, so whatever
/// the builder stores, the cursor's read path decodes back exactly. Column
/// maxima are computed from the data.
#[derive(Debug)]
pub struct DictionaryBuilder {
    name: String,
    columns: Vec<ColumnSpec>,
    rows: Vec<(Vec<u8>, Vec<ColumnValue>)>,
    keyed: bool,
}

impl DictionaryBuilder {
    /// Starts a builder for a named store.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            rows: Vec::new(),
            keyed: false,
        }
    }

    /// Starts a builder whose store carries an anonymous placeholder name,
    /// the way stores built without a name do.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(&format!("{ANONYMOUS_TABLE_PREFIX}_mem"))
    }

    /// Declares the key column. At most one; its stored max value length is
    /// zero and its cells are served from the key index.
    #[must_use]
    pub fn key_column(mut self, name: &str, type_code: char) -> Self {
        assert!(
            !self.keyed,
            "a store has at most one key column"
        );
        self.keyed = true;
        self.columns.push(ColumnSpec {
            name: name.to_string(),
            type_code: TypeCode::new(type_code),
            is_key: true,
        });
        self
    }

    /// Declares a value column.
    #[must_use]
    pub fn column(mut self, name: &str, type_code: char) -> Self {
        self.columns.push(ColumnSpec {
            name: name.to_string(),
            type_code: TypeCode::new(type_code),
            is_key: false,
        });
        self
    }

    /// Appends a keyed row. `values` covers the value columns only, in
    /// declaration order.
    #[must_use]
    pub fn row(mut self, key: &str, values: &[ColumnValue]) -> Self {
        assert!(self.keyed, "keyed row on a keyless builder");
        assert_eq!(
            values.len(),
            self.columns.len() - 1,
            "row width must match the declared value columns"
        );
        self.rows.push((key.as_bytes().to_vec(), values.to_vec()));
        self
    }

    /// Appends a keyless row covering every declared column.
    #[must_use]
    pub fn keyless_row(mut self, values: &[ColumnValue]) -> Self {
        assert!(!self.keyed, "keyless row on a keyed builder");
        assert_eq!(
            values.len(),
            self.columns.len(),
            "row width must match the declared columns"
        );
        self.rows.push((Vec::new(), values.to_vec()));
        self
    }

    /// Encodes and sorts everything into a finished store.
    pub fn build(mut self) -> TrellisResult<MemoryDictionary> {
        if self.keyed {
            self.rows.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let mut cells: Vec<Vec<Vec<u8>>> = vec![Vec::with_capacity(self.rows.len()); self.columns.len()];
        for (_, values) in &self.rows {
            let mut vals = values.iter();
            for (col, spec) in self.columns.iter().enumerate() {
                if spec.is_key {
                    cells[col].push(Vec::new());
                    continue;
                }
                let value = vals.next().unwrap_or(&ColumnValue::Null);
                cells[col].push(encode_cell(spec.type_code, value)?);
            }
        }

        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(col, spec)| ColumnSnapshot {
                name: spec.name.clone(),
                type_code: spec.type_code.as_char(),
                max_val_len: if spec.is_key {
                    0
                } else {
                    cells[col].iter().map(Vec::len).max().unwrap_or(0)
                },
            })
            .collect();

        let keys = if self.keyed {
            self.rows.into_iter().map(|(k, _)| k).collect()
        } else {
            Vec::new()
        };

        Ok(MemoryDictionary::from_snapshot(Snapshot {
            name: self.name,
            columns,
            keyed: self.keyed,
            keys,
            cells,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_store() -> MemoryDictionary {
        DictionaryBuilder::new("fruits")
            .key_column("name", 't')
            .column("rank", '0')
            .row("banana", &[ColumnValue::Integer(2)])
            .row("apple", &[ColumnValue::Integer(1)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_rows_sort_by_key() {
        let dict = fruit_store();
        assert_eq!(dict.key_count(), 2);
        assert_eq!(dict.node_count(), 2);

        let mut ctx = IterContext::new();
        ctx.init(dict.max_key_len(), dict.max_level());
        let mut buf = vec![0u8; dict.max_key_len()];

        let len = dict.next(&mut ctx, &mut buf).unwrap();
        assert_eq!(&buf[..len], b"apple");
        assert_eq!(ctx.current_node(), TrieNodeId::new(0));

        let len = dict.next(&mut ctx, &mut buf).unwrap();
        assert_eq!(&buf[..len], b"banana");
        assert_eq!(ctx.current_node(), TrieNodeId::new(1));

        assert!(dict.next(&mut ctx, &mut buf).is_none());
    }

    #[test]
    fn test_seek_exact_positions_on_match() {
        let dict = fruit_store();
        let mut ctx = IterContext::new();
        ctx.init(dict.max_key_len(), dict.max_level());
        let mut buf = vec![0u8; dict.max_key_len()];

        assert!(dict.seek_exact(b"banana", &mut ctx));
        let len = dict.next(&mut ctx, &mut buf).unwrap();
        assert_eq!(&buf[..len], b"banana");

        ctx.init(dict.max_key_len(), dict.max_level());
        assert!(!dict.seek_exact(b"cherry", &mut ctx));
    }

    #[test]
    fn test_reverse_lookup() {
        let dict = fruit_store();
        let mut buf = vec![0u8; dict.max_key_len()];
        let len = dict.reverse_lookup(TrieNodeId::new(1), &mut buf).unwrap();
        assert_eq!(&buf[..len], b"banana");
        assert!(dict.reverse_lookup(TrieNodeId::new(9), &mut buf).is_none());
    }

    #[test]
    fn test_backward_fetch_is_rejected() {
        let dict = fruit_store();
        let mut buf = vec![0u8; dict.max_val_len()];
        let mut off = ColumnOffset::new();

        dict.fetch_column(TrieNodeId::new(1), 1, &mut buf, &mut off)
            .unwrap();
        // Same node again is fine; one step back is not.
        dict.fetch_column(TrieNodeId::new(1), 1, &mut buf, &mut off)
            .unwrap();
        let err = dict
            .fetch_column(TrieNodeId::new(0), 1, &mut buf, &mut off)
            .unwrap_err();
        assert!(matches!(err, StoreError::NonSequentialRead { .. }));

        // A reset offset starts over.
        off.reset();
        dict.fetch_column(TrieNodeId::new(0), 1, &mut buf, &mut off)
            .unwrap();
    }

    #[test]
    fn test_fetch_bounds() {
        let dict = fruit_store();
        let mut buf = vec![0u8; dict.max_val_len()];
        let mut off = ColumnOffset::new();

        let err = dict
            .fetch_column(TrieNodeId::new(0), 5, &mut buf, &mut off)
            .unwrap_err();
        assert!(matches!(err, StoreError::ColumnOutOfRange { .. }));

        let err = dict
            .fetch_column(TrieNodeId::new(7), 1, &mut buf, &mut off)
            .unwrap_err();
        assert!(matches!(err, StoreError::NodeOutOfRange { .. }));

        let mut small = [0u8; 1];
        let err = dict
            .fetch_column(TrieNodeId::new(0), 1, &mut small, &mut off)
            .unwrap_err();
        assert!(matches!(err, StoreError::BufferTooSmall { .. }));
    }

    #[test]
    fn test_keyless_store() {
        let dict = DictionaryBuilder::new("log")
            .column("line", 't')
            .keyless_row(&[ColumnValue::Text("first".into())])
            .keyless_row(&[ColumnValue::Text("second".into())])
            .build()
            .unwrap();

        assert_eq!(dict.key_count(), 0);
        assert_eq!(dict.node_count(), 2);

        let mut ctx = IterContext::new();
        ctx.init(dict.max_key_len(), dict.max_level());
        let mut buf = vec![0u8; dict.max_key_len().max(1)];
        assert!(dict.next(&mut ctx, &mut buf).is_none());
        assert!(!dict.seek_exact(b"first", &mut ctx));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fruits.tlx");
        fruit_store().save(&path).unwrap();

        let dict = MemoryDictionary::open(&path).unwrap();
        assert_eq!(dict.table_name(), "fruits");
        assert_eq!(dict.column_count(), 2);
        assert_eq!(dict.column_name(0), "name");
        assert_eq!(dict.col_max_val_len(0), 0);
        assert_eq!(dict.key_count(), 2);

        let missing = dir.path().join("nope.tlx");
        assert!(matches!(
            MemoryDictionary::open(&missing).unwrap_err(),
            StoreError::Open { .. }
        ));
    }

    #[test]
    fn test_bit_starts_advance_with_values() {
        let dict = fruit_store();
        let mut buf = vec![0u8; dict.max_val_len()];
        let mut off = ColumnOffset::new();

        dict.fetch_column(TrieNodeId::new(0), 1, &mut buf, &mut off)
            .unwrap();
        let first = off.bit_offset().unwrap();
        dict.fetch_column(TrieNodeId::new(1), 1, &mut buf, &mut off)
            .unwrap();
        assert!(off.bit_offset().unwrap() > first);
    }
}
