//! Column type codes.
//!
//! The store records one character per column describing how its values are
//! encoded. The adapter maps each code onto one of three SQL-visible
//! domains: textual, fixed-width signed integer, or floating point.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A store column's single-character type code.
///
/// Codes and their SQL-visible domains:
///
/// | code                                  | domain  | SQL type  |
/// |---------------------------------------|---------|-----------|
/// | `t`                                   | text    | `text`    |
/// | `*`                                   | binary  | `varchar` |
/// | `0`, `i`                              | integer | `integer` |
/// | `1`-`9`, `j`-`r`, `x`, `X`, `y`, `Y`  | numeric | `double`  |
/// | anything else                         | text    | `text`    |
///
/// Unrecognized codes advertise as `text` in the derived schema but are a
/// decoding error when a value with such a code is actually read.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TypeCode(char);

impl TypeCode {
    /// Textual column code.
    pub const TEXT: Self = Self('t');

    /// Binary (blob) column code, advertised as `varchar`.
    pub const VARCHAR: Self = Self('*');

    /// Fixed-width signed integer column code.
    pub const INTEGER: Self = Self('0');

    /// Creates a type code from its raw character.
    #[inline]
    #[must_use]
    pub const fn new(code: char) -> Self {
        Self(code)
    }

    /// Returns the raw character.
    #[inline]
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0
    }

    /// Returns true for the fixed-width signed integer codes.
    #[inline]
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self.0, '0' | 'i')
    }

    /// Returns true for the numeric-variant codes that decode as doubles.
    #[inline]
    #[must_use]
    pub const fn is_double(self) -> bool {
        matches!(self.0, '1'..='9' | 'j'..='r' | 'x' | 'X' | 'y' | 'Y')
    }

    /// Returns true for any fixed-width numeric code (integer or double).
    #[inline]
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_double()
    }

    /// Returns true for the textual code.
    #[inline]
    #[must_use]
    pub const fn is_text(self) -> bool {
        self.0 == 't'
    }

    /// Returns true for the binary (blob) code.
    #[inline]
    #[must_use]
    pub const fn is_blob(self) -> bool {
        self.0 == '*'
    }

    /// Returns true for codes whose stored values are textual byte sequences
    /// (text or binary), the ones checked against the reserved NULL marker.
    #[inline]
    #[must_use]
    pub const fn is_textual(self) -> bool {
        self.is_text() || self.is_blob()
    }

    /// Returns the SQL type name this code advertises in the derived schema.
    ///
    /// Unrecognized codes default to `text`.
    #[must_use]
    pub const fn sql_type_name(self) -> &'static str {
        match self.0 {
            't' => "text",
            '*' => "varchar",
            '0' | 'i' => "integer",
            '1'..='9' | 'j'..='r' | 'x' | 'X' | 'y' | 'Y' => "double",
            _ => "text",
        }
    }

    /// Returns true if values of this code have a fixed stored width.
    #[inline]
    #[must_use]
    pub const fn is_fixed_width(self) -> bool {
        self.is_numeric()
    }
}

impl fmt::Debug for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeCode({:?})", self.0)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<char> for TypeCode {
    #[inline]
    fn from(code: char) -> Self {
        Self::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_codes() {
        assert!(TypeCode::new('0').is_integer());
        assert!(TypeCode::new('i').is_integer());
        assert!(!TypeCode::new('1').is_integer());
        assert_eq!(TypeCode::new('i').sql_type_name(), "integer");
    }

    #[test]
    fn test_double_codes() {
        for c in ['1', '5', '9', 'j', 'n', 'r', 'x', 'X', 'y', 'Y'] {
            let code = TypeCode::new(c);
            assert!(code.is_double(), "{c} should map to double");
            assert_eq!(code.sql_type_name(), "double");
        }
        assert!(!TypeCode::new('s').is_double());
        assert!(!TypeCode::new('z').is_double());
    }

    #[test]
    fn test_textual_codes() {
        assert_eq!(TypeCode::TEXT.sql_type_name(), "text");
        assert_eq!(TypeCode::VARCHAR.sql_type_name(), "varchar");
        assert!(TypeCode::TEXT.is_textual());
        assert!(TypeCode::VARCHAR.is_textual());
        assert!(!TypeCode::TEXT.is_fixed_width());
    }

    #[test]
    fn test_unrecognized_code_defaults_to_text() {
        let code = TypeCode::new('z');
        assert_eq!(code.sql_type_name(), "text");
        assert!(!code.is_numeric());
        assert!(!code.is_textual());
    }
}
