//! # trellis-vtab
//!
//! Virtual-table adapter over static trie-encoded key/value stores.
//!
//! This crate translates between a relational engine's pull-based row-cursor
//! protocol and a trie store's lazy, key-ordered traversal:
//!
//! - **Table handle** (`TrieTable`): owns the store, derives the schema once
//!   at connect time
//! - **Index planner** (`best_index`): decides whether a query becomes a
//!   full ordered scan, an exact-key point lookup, or a value-equality scan
//! - **Row cursor** (`TrieCursor`): drives the store's iteration context for
//!   the selected mode
//! - **Typed column decoding** (`ColumnValue`): materializes stored bytes
//!   into SQL-visible values, including the reserved NULL sentinels
//!
//! The adapter is read-only and single-threaded per cursor; multiple
//! cursors may scan one table concurrently.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cursor;
pub mod planner;
pub mod schema;
pub mod table;
pub mod value;

pub use cursor::{ScanMode, TrieCursor};
pub use planner::{ConstraintOp, IndexConstraint, IndexPlan, PlanTag};
pub use schema::{ColumnDef, TableSchema};
pub use table::TrieTable;
pub use value::ColumnValue;
