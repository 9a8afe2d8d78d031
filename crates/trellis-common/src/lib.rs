//! # trellis-common
//!
//! Common types, errors, and configuration for Trellis.
//!
//! This crate provides the foundational pieces shared by the Trellis
//! adapter crates:
//!
//! - **Types**: the store-internal node identifier (`TrieNodeId`)
//! - **Errors**: unified error handling with `TrellisError`
//! - **Config**: connect-time options
//! - **Constants**: reserved sentinels and planner estimates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at the crate root
pub use config::ConnectOptions;
pub use constants::*;
pub use error::{TrellisError, TrellisResult};
pub use types::TrieNodeId;
