//! Error handling for Trellis.
//!
//! This module provides the unified error type and result alias used across
//! the adapter crates. No operation is retried: every failure propagates
//! synchronously to the immediate caller, with no partial-success states.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Trellis operations.
pub type TrellisResult<T> = std::result::Result<T, TrellisError>;

/// The main error type for the Trellis adapter.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// The store at the given path is missing or malformed. Fatal at connect
    /// time; the table cannot be created.
    #[error("cannot open store at {path}: {reason}")]
    StoreOpen {
        /// Path the open was attempted against.
        path: PathBuf,
        /// Store-reported failure reason.
        reason: String,
    },

    /// Scratch buffer or iteration context allocation failed. Fatal; the
    /// object is left unusable.
    #[error("allocation failed for {what}")]
    Allocation {
        /// What was being allocated.
        what: &'static str,
    },

    /// Unrecognized column type code during a column read. Unreachable for
    /// schemas derived from the same store; if triggered it indicates
    /// schema/store inconsistency.
    #[error("cannot decode column value with type code {type_code:?}")]
    Decoding {
        /// The offending type code character.
        type_code: char,
    },

    /// The cursor is past the last row; rowid and column reads are invalid.
    #[error("cursor is not positioned on a row")]
    CursorNotPositioned,

    /// Column index outside the table's schema.
    #[error("column index {column} out of range (table has {count} columns)")]
    ColumnOutOfRange {
        /// Requested column index.
        column: usize,
        /// Number of columns in the schema.
        count: usize,
    },

    /// A filter call did not supply the execution-time argument its plan
    /// requires.
    #[error("filter argument slot {slot} missing")]
    MissingArgument {
        /// The empty argument slot.
        slot: usize,
    },

    /// A raw plan tag outside the wire encoding.
    #[error("invalid plan tag {raw}")]
    InvalidPlanTag {
        /// The raw tag value received.
        raw: i32,
    },

    /// Error reported by the underlying store during traversal or value
    /// fetches.
    #[error("store error: {message}")]
    Store {
        /// Store-reported message.
        message: String,
    },
}

impl TrellisError {
    /// Creates a `StoreOpen` error.
    pub fn store_open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::StoreOpen {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error was fatal at connect time.
    #[must_use]
    pub fn is_connect_failure(&self) -> bool {
        matches!(self, Self::StoreOpen { .. })
    }
}
