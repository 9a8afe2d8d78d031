//! Store error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use trellis_common::error::TrellisError;
use trellis_common::types::TrieNodeId;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors reported by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file is missing or could not be read.
    #[error("cannot open store at {path}: {reason}")]
    Open {
        /// Path the open was attempted against.
        path: PathBuf,
        /// Underlying failure reason.
        reason: String,
    },

    /// Underlying I/O failure.
    #[error("store I/O error: {source}")]
    Io {
        /// Source I/O error.
        #[from]
        source: io::Error,
    },

    /// The store's contents are inconsistent with its own structure.
    #[error("store corrupt: {message}")]
    Corrupt {
        /// Description of the inconsistency.
        message: String,
    },

    /// Column index outside the store's column count.
    #[error("column index {column} out of range (store has {count} columns)")]
    ColumnOutOfRange {
        /// Requested column index.
        column: usize,
        /// Store column count.
        count: usize,
    },

    /// Node id outside the store's node count.
    #[error("node id {node} out of range")]
    NodeOutOfRange {
        /// Requested node.
        node: TrieNodeId,
    },

    /// A value fetch moved backward relative to its cached offset. Value
    /// storage is delta/offset-encoded; random re-fetch without the cached
    /// offset is unsupported and fails loudly rather than returning wrong
    /// data.
    #[error("non-sequential value fetch for column {column} at node {node}")]
    NonSequentialRead {
        /// Column being fetched.
        column: usize,
        /// Node the fetch was attempted for.
        node: TrieNodeId,
    },

    /// Output buffer smaller than the value being fetched.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes available in the output buffer.
        available: usize,
    },

    /// An iteration context was used before `init`.
    #[error("iteration context not initialized")]
    ContextNotInitialized,
}

impl StoreError {
    /// Creates an `Open` error.
    pub fn open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `Corrupt` error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}

impl From<StoreError> for TrellisError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Open { path, reason } => TrellisError::StoreOpen { path, reason },
            other => TrellisError::Store {
                message: other.to_string(),
            },
        }
    }
}
