//! The row cursor state machine.
//!
//! One cursor per active scan. A `filter` call selects the scan mode from
//! the negotiated plan tag, positions the store, and immediately advances
//! onto the first row (or to end-of-data) so the engine never has to issue a
//! separate initial advance. Every later `advance` dispatches on the mode.
//!
//! The cursor reconciles the engine rowid, the store node id, and the
//! iteration context's cursor index by resolving all of them from a single
//! `cur_node` field written exactly once per advance.

use bytes::BytesMut;
use tracing::debug;
use trellis_common::error::{TrellisError, TrellisResult};
use trellis_common::types::TrieNodeId;
use trellis_store::{ColumnOffset, Dictionary, IterContext};

use crate::table::TrieTable;
use crate::value::{decode_cell, encode_cell, ColumnValue};

/// Scan mode selected by `filter`, read-only until the next `filter` call.
///
/// The set is closed; `advance` and `column` dispatch on it with exhaustive
/// matches so adding a mode is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Iterate every key in the store's native order.
    FullScan,
    /// Exact-key seek; at most one row.
    PointLookup,
    /// Linear node scan emitting rows whose designated value column equals
    /// the probe argument.
    ValueScan {
        /// The column compared against the probe.
        column: usize,
    },
}

/// A cursor scanning rows of one trie-backed table.
///
/// Scratch buffers are sized once at open from the schema-derived maxima and
/// reused across rows; they are never resized per row. The cursor is not
/// shared across callers (host contract), so no locking is involved.
#[derive(Debug)]
pub struct TrieCursor<'t, D: Dictionary> {
    table: &'t TrieTable<D>,
    ctx: IterContext,
    key_buf: BytesMut,
    val_buf: BytesMut,
    probe_buf: BytesMut,
    probe_len: usize,
    col_offsets: Vec<ColumnOffset>,
    mode: ScanMode,
    /// Key length of the current row, when the row has a reconstructed key.
    key_len: Option<usize>,
    /// Node backing the current row; rowid and column fetches derive from it.
    cur_node: TrieNodeId,
    /// Next node for synthetic (keyless) and value scans.
    next_node: TrieNodeId,
    /// Point lookup: the seeked row has not been emitted yet.
    pending_seek: bool,
    /// Authoritative end-of-data flag.
    at_end: bool,
}

impl<'t, D: Dictionary> TrieCursor<'t, D> {
    /// Creates a cursor with freshly initialized context and buffers.
    pub(crate) fn open(table: &'t TrieTable<D>) -> TrellisResult<Self> {
        let dict = table.dictionary();
        debug!(
            max_key_len = dict.max_key_len(),
            max_val_len = dict.max_val_len(),
            max_level = dict.max_level(),
            columns = dict.column_count(),
            "opening cursor"
        );
        let mut ctx = IterContext::new();
        ctx.init(dict.max_key_len(), dict.max_level());
        Ok(Self {
            table,
            ctx,
            key_buf: BytesMut::zeroed(dict.max_key_len()),
            val_buf: BytesMut::zeroed(dict.max_val_len()),
            probe_buf: BytesMut::zeroed(dict.max_val_len()),
            probe_len: 0,
            col_offsets: vec![ColumnOffset::new(); dict.column_count()],
            mode: ScanMode::FullScan,
            key_len: None,
            cur_node: TrieNodeId::INVALID,
            next_node: TrieNodeId::FIRST,
            pending_seek: false,
            at_end: false,
        })
    }

    /// Begins a fresh scan.
    ///
    /// Resets the iteration context and all per-column fetch offsets,
    /// selects the mode from the plan tag, performs the mode's initial
    /// positioning, and advances onto the first row. After `filter` returns,
    /// the cursor is either on a row or at end-of-data.
    pub fn filter(
        &mut self,
        tag: crate::planner::PlanTag,
        args: &[ColumnValue],
    ) -> TrellisResult<()> {
        use crate::planner::PlanTag;

        let dict = self.table.dictionary();
        debug!(tag = tag.to_raw(), argc = args.len(), "filtering cursor");

        self.ctx.init(dict.max_key_len(), dict.max_level());
        for offset in &mut self.col_offsets {
            offset.reset();
        }
        self.key_len = None;
        self.cur_node = TrieNodeId::INVALID;
        self.next_node = TrieNodeId::FIRST;
        self.probe_len = 0;
        self.pending_seek = false;
        self.at_end = false;

        match tag {
            PlanTag::KeyLookup { .. } if dict.key_count() > 0 => {
                self.mode = ScanMode::PointLookup;
                let arg = args.first().ok_or(TrellisError::MissingArgument { slot: 0 })?;
                let probe = arg.as_key_bytes();
                if dict.seek_exact(&probe, &mut self.ctx) {
                    self.pending_seek = true;
                } else {
                    // Not-found is end-of-data with zero rows, same as an
                    // empty store.
                    self.at_end = true;
                }
            }
            // Exact-key pushdown against a keyless store degenerates to a
            // plain node scan.
            PlanTag::KeyLookup { .. } | PlanTag::FullScan => {
                self.mode = ScanMode::FullScan;
            }
            PlanTag::ValueEquality => match self.table.value_column() {
                Some(column) => {
                    self.mode = ScanMode::ValueScan { column };
                    let arg = args.first().ok_or(TrellisError::MissingArgument { slot: 0 })?;
                    let code = self
                        .table
                        .schema()
                        .column(column)
                        .map(|c| c.type_code)
                        .ok_or(TrellisError::ColumnOutOfRange {
                            column,
                            count: self.table.schema().column_count(),
                        })?;
                    let probe = encode_cell(code, arg)?;
                    if probe.len() > self.probe_buf.len() {
                        // Longer than any stored value; nothing can match.
                        self.at_end = true;
                    } else {
                        self.probe_buf[..probe.len()].copy_from_slice(&probe);
                        self.probe_len = probe.len();
                    }
                }
                None => {
                    self.at_end = true;
                }
            },
        }

        if self.at_end {
            return Ok(());
        }
        self.advance()
    }

    /// Moves the cursor to its next row of output.
    pub fn advance(&mut self) -> TrellisResult<()> {
        let dict = self.table.dictionary();
        match self.mode {
            ScanMode::FullScan => {
                if dict.key_count() > 0 {
                    match dict.next(&mut self.ctx, &mut self.key_buf) {
                        Some(len) => {
                            self.key_len = Some(len);
                            self.cur_node = self.ctx.current_node();
                        }
                        None => self.at_end = true,
                    }
                } else if u64::from(self.next_node.as_u32()) >= dict.node_count() {
                    self.at_end = true;
                } else {
                    self.cur_node = self.next_node;
                    self.next_node = self.next_node.next();
                }
            }
            ScanMode::PointLookup => {
                if !self.pending_seek {
                    // The single result row was produced by the seek; a
                    // point lookup never yields more than one row.
                    self.at_end = true;
                    return Ok(());
                }
                self.pending_seek = false;
                match dict.next(&mut self.ctx, &mut self.key_buf) {
                    Some(len) => {
                        self.key_len = Some(len);
                        self.cur_node = self.ctx.current_node();
                    }
                    None => self.at_end = true,
                }
            }
            ScanMode::ValueScan { column } => loop {
                if u64::from(self.next_node.as_u32()) >= dict.node_count() {
                    self.at_end = true;
                    break;
                }
                let node = self.next_node;
                self.next_node = self.next_node.next();
                let len = dict.fetch_column(
                    node,
                    column,
                    &mut self.val_buf,
                    &mut self.col_offsets[column],
                )?;
                if self.val_buf[..len] == self.probe_buf[..self.probe_len] {
                    if dict.key_count() > 0 {
                        self.key_len = dict.reverse_lookup(node, &mut self.key_buf);
                    }
                    self.cur_node = node;
                    break;
                }
            },
        }
        Ok(())
    }

    /// Returns true once the cursor has moved past the last row.
    #[inline]
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.at_end
    }

    /// Returns the scan mode selected by the last `filter`.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Returns the engine-visible row identifier of the current row.
    ///
    /// For ordered scans this is the store's node id for the current key;
    /// for keyless stores it is the synthetic scan counter.
    pub fn rowid(&self) -> TrellisResult<i64> {
        if self.at_end {
            return Err(TrellisError::CursorNotPositioned);
        }
        Ok(self.cur_node.as_row_id())
    }

    /// Materializes column `i` of the current row.
    ///
    /// A column with zero max value length on a keyed store is the current
    /// row's key (the key-as-column convention); anything else is fetched
    /// from the store through the column's cached offset and decoded by its
    /// type code.
    pub fn column(&mut self, i: usize) -> TrellisResult<ColumnValue> {
        if self.at_end {
            return Err(TrellisError::CursorNotPositioned);
        }
        let dict = self.table.dictionary();
        let col = self
            .table
            .schema()
            .column(i)
            .ok_or(TrellisError::ColumnOutOfRange {
                column: i,
                count: self.table.schema().column_count(),
            })?;
        let code = col.type_code;

        if col.max_val_len == 0 && dict.key_count() > 0 {
            let len = self.key_len.ok_or(TrellisError::CursorNotPositioned)?;
            return decode_cell(code, &self.key_buf[..len]);
        }

        let len = dict.fetch_column(self.cur_node, i, &mut self.val_buf, &mut self.col_offsets[i])?;
        decode_cell(code, &self.val_buf[..len])
    }

    /// Releases the iteration context and the cursor. Consuming `self` makes
    /// further calls impossible.
    pub fn close(mut self) {
        self.ctx.release();
        debug!("cursor closed");
    }
}
