//! Record configuration via `recordwire.toml`
//!
//! Controls what export embeds and which schema dialects derivation may
//! use. A missing key takes its default, so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use recordwire_core::{Error, Result};
use recordwire_schema::{DialectPreference, SchemaDeriver};

use crate::codec::ExportOptions;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "recordwire.toml";

/// Configuration loaded from `recordwire.toml`.
///
/// # Example
///
/// ```toml
/// embed_schema = true
/// schema_dialect = "auto"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Attempt to embed a JSON Schema document on export
    #[serde(default = "default_embed_schema")]
    pub embed_schema: bool,
    /// `"auto"`, `"draft-2020-12"` or `"draft-07"`
    #[serde(default = "default_schema_dialect")]
    pub schema_dialect: String,
}

fn default_embed_schema() -> bool {
    true
}

fn default_schema_dialect() -> String {
    DialectPreference::Auto.as_str().to_string()
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            embed_schema: default_embed_schema(),
            schema_dialect: default_schema_dialect(),
        }
    }
}

impl RecordConfig {
    /// Parse the dialect string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an unknown dialect.
    pub fn dialect(&self) -> Result<DialectPreference> {
        self.schema_dialect.parse()
    }

    /// Deriver honouring the dialect preference
    pub fn schema_deriver(&self) -> Result<SchemaDeriver> {
        Ok(SchemaDeriver::for_preference(self.dialect()?))
    }

    /// Export options matching this config
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            embed_schema: self.embed_schema,
            ..ExportOptions::default()
        }
    }

    /// Default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# recordwire configuration
#
# Embed the record's JSON Schema document in exported envelopes (default: true).
# Export still succeeds when no schema can be derived.
embed_schema = true

# Schema dialect: "auto" (default), "draft-2020-12" or "draft-07"
#   "auto" = draft 2020-12, falling back to draft-07 for shapes it rejects
schema_dialect = "auto"
"#
    }

    /// Parse and validate config text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the text is not valid TOML or holds an
    /// invalid value.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RecordConfig = toml::from_str(text)
            .map_err(|e| Error::InvalidConfig(format!("Failed to parse config: {}", e)))?;
        config.dialect()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `InvalidConfig` if it
    /// cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::InvalidConfig(msg) => {
                Error::InvalidConfig(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to `path`
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
