//! Envelope export and import for records
//!
//! Export stashes the record's `(module_path, type_name)` in
//! `metadata.properties` so import can find the definition again in a type
//! registry. The JSON Schema document rides along when one can be derived;
//! it is informational and import never reads it.

use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use tracing::{debug, warn};

use recordwire_core::{
    create_envelope, EnvelopeMetadata, Error, MessageEnvelope, Result, TypeDefinition,
    TypeRegistry, PROP_SCHEMA_DOCUMENT, PROP_TYPE_DEF_MODULE, PROP_TYPE_DEF_NAME,
};
use recordwire_schema::SchemaDeriver;

use crate::instance::{RecordInstance, RecordOptions};
use crate::message::{ImportFromEnvelope, MessageInstance, MessageType};

/// Options for [`MessageInstance::export_to_envelope`]
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Try to embed the JSON Schema document
    pub embed_schema: bool,
    /// Extra metadata, applied after the instance's own
    pub metadata: Map<String, JsonValue>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            embed_schema: true,
            metadata: Map::new(),
        }
    }
}

impl ExportOptions {
    /// Add one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Options for [`ImportFromEnvelope::import_from_envelope`]
#[derive(Debug, Default, Clone)]
pub struct ImportOptions<'a> {
    /// Definition to use; skips lookup when set
    pub type_def: Option<Arc<dyn TypeDefinition>>,
    /// Registry to look the definition up in; `None` means the global one
    pub registry: Option<&'a TypeRegistry>,
    /// Metadata for the new instance
    pub metadata: Map<String, JsonValue>,
    /// Deriver for the new instance
    pub deriver: Option<Arc<SchemaDeriver>>,
}

impl<'a> ImportOptions<'a> {
    /// Import with an explicit definition
    pub fn with_type_def(type_def: Arc<dyn TypeDefinition>) -> Self {
        Self {
            type_def: Some(type_def),
            ..Self::default()
        }
    }

    /// Resolve definitions in `registry` instead of the global one
    pub fn with_registry(registry: &'a TypeRegistry) -> Self {
        Self {
            registry: Some(registry),
            ..Self::default()
        }
    }
}

/// Keys with a fixed place in [`EnvelopeMetadata`]
const FIXED_KEYS: [&str; 4] = ["current_format", "source_cls_name", "source_cls_module", "properties"];

/// Fold caller metadata into `metadata`.
///
/// The fixed keys are overridable when given as strings and a `properties`
/// object is merged key by key. A fixed key holding any other JSON type is
/// dropped, since `extra` is flattened next to the fixed keys on the wire.
/// Everything else lands in `extra`.
fn merge_metadata(metadata: &mut EnvelopeMetadata, overrides: &Map<String, JsonValue>) {
    for (key, value) in overrides {
        match (key.as_str(), value) {
            ("current_format", JsonValue::String(s)) => metadata.current_format = s.clone(),
            ("source_cls_name", JsonValue::String(s)) => metadata.source_cls_name = s.clone(),
            ("source_cls_module", JsonValue::String(s)) => metadata.source_cls_module = s.clone(),
            ("properties", JsonValue::Object(props)) => {
                metadata
                    .properties
                    .extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            (fixed, _) if FIXED_KEYS.contains(&fixed) => {
                warn!(key = fixed, value = %value, "Ignoring metadata entry of the wrong type");
            }
            _ => {
                metadata.extra.insert(key.clone(), value.clone());
            }
        }
    }
}

pub(crate) fn export_record(record: &RecordInstance, options: &ExportOptions) -> Result<MessageEnvelope> {
    let content = record.content();
    let type_def = record.type_def();

    let schema = if options.embed_schema {
        match record.json_schema() {
            Ok(schema) => Some(schema),
            Err(e) if e.is_schema_unavailable() => {
                debug!(
                    type_name = %type_def.qualified_name(),
                    error = %e,
                    "Exporting without schema document"
                );
                None
            }
            Err(e) => return Err(e),
        }
    } else {
        None
    };

    let mut metadata = record.base_metadata();
    merge_metadata(&mut metadata, record.metadata());
    merge_metadata(&mut metadata, &options.metadata);

    let properties = &mut metadata.properties;
    properties.insert(PROP_TYPE_DEF_MODULE.to_string(), type_def.module_path().into());
    properties.insert(PROP_TYPE_DEF_NAME.to_string(), type_def.type_name().into());
    if let Some(schema) = schema {
        properties.insert(PROP_SCHEMA_DOCUMENT.to_string(), (*schema).clone());
    }

    Ok(create_envelope(record.message_type().as_str(), content, metadata))
}

fn resolve_type_def(
    metadata: &EnvelopeMetadata,
    registry: &TypeRegistry,
) -> Result<Arc<dyn TypeDefinition>> {
    let (module, name) = metadata.type_def_names().ok_or_else(|| Error::TypeResolutionFailed {
        message: format!(
            "Envelope metadata carries no record type information ('{}' and '{}' in properties); \
             pass `type_def` in ImportOptions",
            PROP_TYPE_DEF_MODULE, PROP_TYPE_DEF_NAME
        ),
        source: None,
    })?;

    registry.resolve(module, name).map_err(|e| Error::TypeResolutionFailed {
        message: format!(
            "Unable to resolve record type '{}::{}' from envelope metadata; \
             pass `type_def` in ImportOptions to import it explicitly",
            module, name
        ),
        source: Some(e),
    })
}

impl ImportFromEnvelope for RecordInstance {
    fn import_from_envelope(envelope: &MessageEnvelope, options: ImportOptions<'_>) -> Result<Self> {
        if envelope.format != MessageType::TypedDict.as_str() {
            warn!(
                format = %envelope.format,
                expected = MessageType::TypedDict.as_str(),
                "Importing envelope of unexpected format"
            );
        }

        let type_def = match options.type_def {
            Some(type_def) => type_def,
            None => resolve_type_def(
                &envelope.metadata,
                options.registry.unwrap_or(TypeRegistry::global()),
            )?,
        };

        RecordInstance::with_options(
            envelope.content.clone(),
            type_def,
            RecordOptions {
                metadata: options.metadata,
                deriver: options.deriver,
            },
        )
    }
}
