//! Core identifier types for Trellis.
//!
//! These types provide type-safe wrappers around numeric identifiers,
//! preventing accidental misuse of different ID spaces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier - the store's stable identifier for a key/record.
///
/// Node ids are assigned by the trie store when it is built and never change
/// afterward. For stores with a key index, the ordered traversal yields node
/// ids that double as the engine-visible row identifiers.
///
/// # Example
///
/// ```rust
/// use trellis_common::types::TrieNodeId;
///
/// let node = TrieNodeId::new(42);
/// assert_eq!(node.as_u32(), 42);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TrieNodeId(u32);

impl TrieNodeId {
    /// Invalid node ID constant, used as a sentinel value.
    pub const INVALID: Self = Self(u32::MAX);

    /// First node ID in a store.
    pub const FIRST: Self = Self(0);

    /// Creates a new `TrieNodeId` from a raw u32 value.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the node id as an engine-visible row identifier.
    #[inline]
    #[must_use]
    pub const fn as_row_id(self) -> i64 {
        self.0 as i64
    }

    /// Returns the next node ID.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Checks if this is a valid node ID.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }

    /// Creates a TrieNodeId from bytes (big-endian).
    #[inline]
    #[must_use]
    pub fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    /// Converts to bytes (big-endian).
    #[inline]
    #[must_use]
    pub fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Debug for TrieNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "TrieNodeId(INVALID)")
        } else {
            write!(f, "TrieNodeId({})", self.0)
        }
    }
}

impl fmt::Display for TrieNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TrieNodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

impl From<TrieNodeId> for u32 {
    #[inline]
    fn from(id: TrieNodeId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let node = TrieNodeId::new(42);
        assert_eq!(node.as_u32(), 42);
        assert_eq!(node.as_row_id(), 42);
        assert!(node.is_valid());
        assert!(!TrieNodeId::INVALID.is_valid());

        let next = node.next();
        assert_eq!(next.as_u32(), 43);

        // Byte conversion
        let bytes = node.to_be_bytes();
        assert_eq!(TrieNodeId::from_be_bytes(bytes), node);
    }

    #[test]
    fn test_node_id_ordering() {
        assert!(TrieNodeId::new(1) < TrieNodeId::new(2));
        assert!(TrieNodeId::FIRST < TrieNodeId::INVALID);
    }
}
