use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Declarative differ configuration.
///
/// Marker-type ignores and ownership registrations refer to Rust types and
/// are therefore configured in code on the [`GraphDiffer`](crate::GraphDiffer)
/// itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferConfig {
    /// Field names ignored on every type.
    pub ignored_fields: Vec<String>,
    /// Build the parent type's schema when ownership is registered, so a
    /// broken self-description fails at registration instead of first diff.
    pub prewarm_on_register: bool,
}

impl DifferConfig {
    /// Parse a configuration from TOML.
    ///
    /// ```rust
    /// use changeset_diff::DifferConfig;
    ///
    /// let config = DifferConfig::from_toml_str(
    ///     r#"
    ///     ignored_fields = ["updated_at", "updated_by"]
    ///     prewarm_on_register = true
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.ignored_fields.len(), 2);
    /// ```
    pub fn from_toml_str(source: &str) -> DiffResult<Self> {
        toml::from_str(source).map_err(|e| DiffError::Config(e.to_string()))
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> DiffResult<String> {
        toml::to_string(self).map_err(|e| DiffError::Config(e.to_string()))
    }
}
