//! # trellis-store
//!
//! Capability interface of the external trie store backing Trellis tables.
//!
//! This crate defines what the adapter requires of a store, without
//! implementing one:
//!
//! - **`Dictionary`**: the trait a store must satisfy (structural queries,
//!   ordered traversal, exact-key seek, per-column value fetches)
//! - **`IterContext`**: reusable cursor-local traversal state
//! - **`ColumnOffset`**: the per-column cached fetch cursor that enforces
//!   sequential value access
//! - **`TypeCode`**: the store's single-character column type codes
//!
//! The store itself is read-only for the adapter's entire lifetime; no
//! writer coexists with it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod dictionary;
pub mod error;
pub mod type_code;

pub use context::IterContext;
pub use dictionary::{ColumnOffset, Dictionary};
pub use error::{StoreError, StoreResult};
pub use type_code::TypeCode;
