//! Shared constants for Trellis.
//!
//! These are the reserved sentinel values and fixed planner estimates the
//! adapter and the store writer side must agree on.

// =============================================================================
// NULL Sentinels
// =============================================================================

/// Reserved byte sequence that marks SQL NULL in a textual column.
///
/// A textual column whose stored value equals this exact sequence decodes to
/// NULL. The writer side never stores a genuine one-byte `0x00` text value.
pub const NULL_MARKER: &[u8] = &[0x00];

/// Leading byte reserved to mark SQL NULL in a fixed-width numeric column.
///
/// A numeric column whose stored value starts with this byte decodes to NULL.
/// Genuine numeric values carry a nonzero presence byte ahead of the payload,
/// an invariant enforced by the store writer, not by the adapter.
pub const NUMERIC_NULL_BYTE: u8 = 0x00;

/// Nonzero presence byte the writer places ahead of a numeric payload.
pub const NUMERIC_PRESENT_BYTE: u8 = 0x01;

/// Stored length of a non-NULL fixed-width numeric value: one presence byte
/// followed by an 8-byte little-endian payload.
pub const NUMERIC_VALUE_LEN: usize = 9;

// =============================================================================
// Table Naming
// =============================================================================

/// Prefix of the placeholder name the store engine embeds for anonymous
/// tables. When a store's table name starts with this prefix, connect falls
/// back to the caller-supplied name instead.
pub const ANONYMOUS_TABLE_PREFIX: &str = "vtab";

/// Default table name used when neither the store nor the caller supplies one.
pub const DEFAULT_TABLE_NAME: &str = "trellis";

// =============================================================================
// Planner Estimates
// =============================================================================

/// Constant estimated cost reported for every plan.
///
/// The store exposes no statistics, so the planner does not attempt
/// cost-based differentiation between plans.
pub const ESTIMATED_SCAN_COST: f64 = 10.0;

/// Constant estimated row count reported for every plan.
pub const ESTIMATED_SCAN_ROWS: u64 = 10;
