//! Message envelope
//!
//! The envelope is the unit of exchange: record content plus the metadata
//! needed to rebuild the record on the other side.
//!
//! ```text
//! {
//!   "format": "typed_dict",
//!   "content": { ...fields... },
//!   "metadata": {
//!     "current_format": "typed_dict",
//!     "source_cls_name": "RecordInstance",
//!     "source_cls_module": "recordwire_record::instance",
//!     "properties": {
//!       "type_def_module": "app::models",
//!       "type_def_name": "User",
//!       "schema_document": { ... }        // only when derivable
//!     },
//!     ...caller metadata...
//!   }
//! }
//! ```
//!
//! `metadata.properties` is the extension point for self-describing
//! round-trip data. Its name is part of the wire format.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::Result;
use crate::value::Content;

/// Property holding the defining module of the record type
pub const PROP_TYPE_DEF_MODULE: &str = "type_def_module";

/// Property holding the record type name
pub const PROP_TYPE_DEF_NAME: &str = "type_def_name";

/// Property holding the JSON Schema document, when one could be derived
pub const PROP_SCHEMA_DOCUMENT: &str = "schema_document";

/// Envelope metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMetadata {
    /// Format the content is currently in
    #[serde(default)]
    pub current_format: String,
    /// Name of the instance type that produced the envelope
    #[serde(default)]
    pub source_cls_name: String,
    /// Module path of the instance type that produced the envelope
    #[serde(default)]
    pub source_cls_module: String,
    /// Self-describing round-trip data
    #[serde(default)]
    pub properties: Map<String, JsonValue>,
    /// Any other metadata set by callers
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl EnvelopeMetadata {
    /// A string-valued property
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(JsonValue::as_str)
    }

    /// The stashed `(type_def_module, type_def_name)` pair, if both are present
    pub fn type_def_names(&self) -> Option<(&str, &str)> {
        let module = self.property_str(PROP_TYPE_DEF_MODULE).filter(|s| !s.is_empty())?;
        let name = self.property_str(PROP_TYPE_DEF_NAME).filter(|s| !s.is_empty())?;
        Some((module, name))
    }

    /// The stashed schema document, if any
    pub fn schema_document(&self) -> Option<&JsonValue> {
        self.properties.get(PROP_SCHEMA_DOCUMENT)
    }
}

/// The canonical serialization unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// Record format / kind
    pub format: String,
    /// Raw field data
    pub content: Content,
    /// Self-describing metadata
    pub metadata: EnvelopeMetadata,
}

impl MessageEnvelope {
    /// Serialize to JSON text
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON text
    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Assemble an envelope from its parts
pub fn create_envelope(
    format: impl Into<String>,
    content: Content,
    metadata: EnvelopeMetadata,
) -> MessageEnvelope {
    MessageEnvelope {
        format: format.into(),
        content,
        metadata,
    }
}
