//! Connect-time configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TABLE_NAME;

/// Options consumed when a table handle is connected to a store.
///
/// # Example
///
/// ```rust
/// use trellis_common::config::ConnectOptions;
///
/// let opts = ConnectOptions::default();
/// assert_eq!(opts.fallback_table_name, "trellis");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectOptions {
    /// Table name advertised when the store's embedded name is the anonymous
    /// placeholder. Typically the name the engine declared the table under.
    pub fallback_table_name: String,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            fallback_table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

impl ConnectOptions {
    /// Creates options advertising the given fallback table name.
    #[must_use]
    pub fn with_table_name(name: impl Into<String>) -> Self {
        Self {
            fallback_table_name: name.into(),
        }
    }

    /// Creates options for testing.
    #[must_use]
    pub fn for_testing() -> Self {
        Self::with_table_name("test_table")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ConnectOptions::default();
        assert_eq!(opts.fallback_table_name, DEFAULT_TABLE_NAME);
    }

    #[test]
    fn test_with_table_name() {
        let opts = ConnectOptions::with_table_name("fruits");
        assert_eq!(opts.fallback_table_name, "fruits");
    }
}
