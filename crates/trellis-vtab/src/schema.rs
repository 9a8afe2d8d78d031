//! Table schema derivation.
//!
//! The schema is derived from the dictionary exactly once, at connect time,
//! and is immutable afterward: column count and order never change for the
//! lifetime of the table handle.

use trellis_common::config::ConnectOptions;
use trellis_common::constants::ANONYMOUS_TABLE_PREFIX;
use trellis_store::{Dictionary, TypeCode};

/// One column of the derived schema.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Column name as stored.
    pub name: String,
    /// The store's type code for this column.
    pub type_code: TypeCode,
    /// Maximum stored value length; zero marks the key-as-column convention
    /// on keyed stores.
    pub max_val_len: usize,
}

impl ColumnDef {
    /// Returns true if values of this column have a fixed stored width.
    #[inline]
    #[must_use]
    pub fn is_fixed_width(&self) -> bool {
        self.type_code.is_fixed_width()
    }
}

/// The externally visible schema of a trie-backed table.
#[derive(Debug, Clone)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Derives the schema from an opened dictionary.
    ///
    /// The advertised table name is the store's embedded name, unless that
    /// name starts with the anonymous placeholder prefix, in which case the
    /// configured fallback name is used.
    pub fn from_dictionary<D: Dictionary>(dict: &D, options: &ConnectOptions) -> Self {
        let stored = dict.table_name();
        let name = if stored.starts_with(ANONYMOUS_TABLE_PREFIX) {
            options.fallback_table_name.clone()
        } else {
            stored.to_string()
        };

        let columns = (0..dict.column_count())
            .map(|i| ColumnDef {
                name: dict.column_name(i).to_string(),
                type_code: dict.column_type(i),
                max_val_len: dict.col_max_val_len(i),
            })
            .collect();

        Self { name, columns }
    }

    /// Returns the advertised table name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of columns.
    #[inline]
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns column `i`, if in range.
    #[must_use]
    pub fn column(&self, i: usize) -> Option<&ColumnDef> {
        self.columns.get(i)
    }

    /// Returns all columns in schema order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Builds the column-definition string the engine is told about.
    ///
    /// Each type code maps onto one of three SQL-visible domains; codes the
    /// mapping does not recognize default to `text`.
    #[must_use]
    pub fn ddl(&self) -> String {
        let mut ddl = format!("CREATE TABLE {} (", self.name);
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                ddl.push_str(", ");
            }
            ddl.push_str(&col.name);
            ddl.push(' ');
            ddl.push_str(col.type_code.sql_type_name());
        }
        ddl.push(')');
        ddl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(name: &str, cols: &[(&str, char, usize)]) -> TableSchema {
        TableSchema {
            name: name.to_string(),
            columns: cols
                .iter()
                .map(|&(n, c, len)| ColumnDef {
                    name: n.to_string(),
                    type_code: TypeCode::new(c),
                    max_val_len: len,
                })
                .collect(),
        }
    }

    #[test]
    fn test_ddl_type_mapping() {
        let s = schema(
            "fruits",
            &[("a", 't', 0), ("b", '0', 9), ("c", '5', 9), ("d", '*', 16)],
        );
        assert_eq!(
            s.ddl(),
            "CREATE TABLE fruits (a text, b integer, c double, d varchar)"
        );
    }

    #[test]
    fn test_ddl_unrecognized_code_defaults_to_text() {
        let s = schema("t", &[("x", 'z', 4)]);
        assert_eq!(s.ddl(), "CREATE TABLE t (x text)");
    }

    #[test]
    fn test_fixed_width() {
        let s = schema("t", &[("a", 't', 0), ("b", 'i', 9)]);
        assert!(!s.column(0).unwrap().is_fixed_width());
        assert!(s.column(1).unwrap().is_fixed_width());
        assert!(s.column(2).is_none());
    }
}
