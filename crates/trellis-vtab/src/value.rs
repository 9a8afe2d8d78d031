//! Typed column values and the stored byte codecs.
//!
//! `decode_cell` is the read path the cursor uses to materialize a column;
//! `encode_cell` is the matching writer-side encoding, exposed so store
//! builders (the test kit's in particular) produce bytes this adapter reads
//! back exactly.
//!
//! # Stored forms
//!
//! - textual columns store raw bytes; the reserved [`NULL_MARKER`] sequence
//!   means SQL NULL
//! - fixed-width numeric columns store a nonzero presence byte followed by
//!   an 8-byte little-endian payload; a leading `0x00` byte means SQL NULL.
//!   The presence byte keeps a genuine numeric zero representable: the
//!   writer side never emits a value whose first byte is zero.

use std::fmt;

use trellis_common::constants::{
    NULL_MARKER, NUMERIC_NULL_BYTE, NUMERIC_PRESENT_BYTE, NUMERIC_VALUE_LEN,
};
use trellis_common::error::{TrellisError, TrellisResult};
use trellis_store::TypeCode;

/// A materialized column value handed back to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// SQL NULL.
    Null,
    /// Text value.
    Text(String),
    /// Opaque byte blob.
    Blob(Vec<u8>),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point.
    Double(f64),
}

impl ColumnValue {
    /// Returns true if this value is NULL.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts to an i64, if the value is numeric.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Double(d) => Some(*d as i64),
            _ => None,
        }
    }

    /// Converts to an f64, if the value is numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value as probe key bytes for an exact-key seek. Keys are
    /// textual, so numerics probe by their decimal rendering; NULL probes as
    /// the empty key.
    #[must_use]
    pub fn as_key_bytes(&self) -> Vec<u8> {
        match self {
            Self::Null => Vec::new(),
            Self::Text(s) => s.as_bytes().to_vec(),
            Self::Blob(b) => b.clone(),
            Self::Integer(i) => i.to_string().into_bytes(),
            Self::Double(d) => d.to_string().into_bytes(),
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Blob(b) => write!(f, "{} bytes", b.len()),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
        }
    }
}

/// Returns true when the stored bytes are the reserved NULL sentinel for
/// this type code.
#[must_use]
pub fn is_null_sentinel(code: TypeCode, bytes: &[u8]) -> bool {
    if code.is_numeric() {
        bytes.first() == Some(&NUMERIC_NULL_BYTE)
    } else if code.is_textual() {
        bytes == NULL_MARKER
    } else {
        false
    }
}

/// Decodes stored bytes into a typed value.
///
/// NULL sentinels are checked first; otherwise the bytes decode according to
/// the type code. An unrecognized code, or a numeric payload shorter than
/// its fixed width, surfaces as a `Decoding` error; it indicates
/// schema/store inconsistency and is never swallowed.
pub fn decode_cell(code: TypeCode, bytes: &[u8]) -> TrellisResult<ColumnValue> {
    if is_null_sentinel(code, bytes) {
        return Ok(ColumnValue::Null);
    }
    if code.is_text() {
        let text = String::from_utf8(bytes.to_vec()).map_err(|_| TrellisError::Decoding {
            type_code: code.as_char(),
        })?;
        return Ok(ColumnValue::Text(text));
    }
    if code.is_blob() {
        return Ok(ColumnValue::Blob(bytes.to_vec()));
    }
    if code.is_numeric() {
        let payload = numeric_payload(code, bytes)?;
        return Ok(if code.is_integer() {
            ColumnValue::Integer(i64::from_le_bytes(payload))
        } else {
            ColumnValue::Double(f64::from_le_bytes(payload))
        });
    }
    Err(TrellisError::Decoding {
        type_code: code.as_char(),
    })
}

/// Encodes a typed value into its stored form. This is the writer-side
/// counterpart of [`decode_cell`].
pub fn encode_cell(code: TypeCode, value: &ColumnValue) -> TrellisResult<Vec<u8>> {
    match value {
        ColumnValue::Null => Ok(if code.is_numeric() {
            vec![NUMERIC_NULL_BYTE]
        } else {
            NULL_MARKER.to_vec()
        }),
        ColumnValue::Text(s) if code.is_text() => Ok(s.as_bytes().to_vec()),
        ColumnValue::Blob(b) if code.is_blob() => Ok(b.clone()),
        ColumnValue::Integer(i) if code.is_integer() => Ok(numeric_bytes(i.to_le_bytes())),
        ColumnValue::Integer(i) if code.is_double() => Ok(numeric_bytes((*i as f64).to_le_bytes())),
        ColumnValue::Double(d) if code.is_double() => Ok(numeric_bytes(d.to_le_bytes())),
        _ => Err(TrellisError::Decoding {
            type_code: code.as_char(),
        }),
    }
}

fn numeric_bytes(payload: [u8; 8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(NUMERIC_VALUE_LEN);
    out.push(NUMERIC_PRESENT_BYTE);
    out.extend_from_slice(&payload);
    out
}

fn numeric_payload(code: TypeCode, bytes: &[u8]) -> TrellisResult<[u8; 8]> {
    if bytes.len() < NUMERIC_VALUE_LEN {
        return Err(TrellisError::Decoding {
            type_code: code.as_char(),
        });
    }
    let mut payload = [0u8; 8];
    payload.copy_from_slice(&bytes[1..NUMERIC_VALUE_LEN]);
    Ok(payload)
}
