//! Annotation to JSON Schema rendering
//!
//! Shared by both dialects. Nested records are emitted once under the
//! dialect's definitions keyword and referenced with `$ref`, so recursive
//! shapes terminate.

use serde_json::{json, Map, Value as JsonValue};
use std::collections::HashSet;
use tracing::debug;

use recordwire_core::json::value_to_json;
use recordwire_core::{Error, Result, StructuralType, TypeAnnotation, TypeDefinition, TypeRegistry};

use crate::adapter::{Dialect, ModelField};

/// Resolve forward references, replacing the ones that fail with `Any`.
pub(crate) fn resolve_lenient(
    field: &str,
    annotation: &TypeAnnotation,
    registry: &TypeRegistry,
) -> TypeAnnotation {
    let all = |items: &[TypeAnnotation]| -> Vec<TypeAnnotation> {
        items
            .iter()
            .map(|a| resolve_lenient(field, a, registry))
            .collect()
    };

    match annotation {
        TypeAnnotation::ForwardRef(reference) => {
            annotation.resolve(field, registry).unwrap_or_else(|e| {
                debug!(field = %field, reference = %reference, error = %e, "Degrading unresolved reference to any");
                TypeAnnotation::Any
            })
        }
        TypeAnnotation::List(inner) => TypeAnnotation::list(resolve_lenient(field, inner, registry)),
        TypeAnnotation::Optional(inner) => {
            TypeAnnotation::optional(resolve_lenient(field, inner, registry))
        }
        TypeAnnotation::Dict(key, value) => TypeAnnotation::dict(
            resolve_lenient(field, key, registry),
            resolve_lenient(field, value, registry),
        ),
        TypeAnnotation::Tuple(items) => TypeAnnotation::Tuple(all(items)),
        TypeAnnotation::Union(members) => TypeAnnotation::Union(all(members)),
        other => other.clone(),
    }
}

/// Compile the fields of `def` for `dialect`.
///
/// Draft 2020-12 resolves strictly; draft-07 degrades what it cannot resolve.
pub(crate) fn compile_fields(dialect: Dialect, def: &dyn StructuralType) -> Result<Vec<ModelField>> {
    let registry = TypeRegistry::global();
    def.declared_annotations()
        .iter()
        .map(|(name, declared)| {
            let annotation = match dialect {
                Dialect::Draft202012 => declared.resolve(name, registry)?,
                Dialect::Draft07 => resolve_lenient(name, declared, registry),
            };
            Ok(ModelField {
                required: def.required_keys().contains(name),
                name: name.clone(),
                annotation,
            })
        })
        .collect()
}

/// Writes one schema document
pub(crate) struct SchemaWriter {
    dialect: Dialect,
    defs: Map<String, JsonValue>,
    in_progress: HashSet<String>,
}

impl SchemaWriter {
    pub(crate) fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            defs: Map::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Render the top-level document for a record named `title`
    pub(crate) fn document(mut self, title: &str, fields: &[ModelField]) -> Result<JsonValue> {
        let mut root = Map::new();
        root.insert("$schema".to_string(), self.dialect.schema_uri().into());
        root.extend(self.object_schema(title, fields)?);
        if !self.defs.is_empty() {
            let defs = std::mem::take(&mut self.defs);
            root.insert(self.dialect.defs_keyword().to_string(), JsonValue::Object(defs));
        }
        Ok(JsonValue::Object(root))
    }

    fn object_schema(&mut self, title: &str, fields: &[ModelField]) -> Result<Map<String, JsonValue>> {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in fields {
            properties.insert(field.name.clone(), self.fragment(&field.name, &field.annotation)?);
            if field.required {
                required.push(field.name.clone());
            }
        }
        required.sort();

        let mut schema = Map::new();
        schema.insert("title".to_string(), title.into());
        schema.insert("type".to_string(), "object".into());
        schema.insert("properties".to_string(), JsonValue::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), required.into());
        }
        schema.insert("additionalProperties".to_string(), false.into());
        Ok(schema)
    }

    fn fragment(&mut self, field: &str, annotation: &TypeAnnotation) -> Result<JsonValue> {
        let modern = self.dialect == Dialect::Draft202012;

        Ok(match annotation {
            TypeAnnotation::Any => json!({}),
            TypeAnnotation::None => json!({ "type": "null" }),
            TypeAnnotation::Bool => json!({ "type": "boolean" }),
            TypeAnnotation::Int => json!({ "type": "integer" }),
            TypeAnnotation::Float => json!({ "type": "number" }),
            TypeAnnotation::Str => json!({ "type": "string" }),
            TypeAnnotation::Bytes if modern => {
                json!({ "type": "string", "contentEncoding": "base64" })
            }
            TypeAnnotation::Bytes => json!({ "type": "string", "format": "binary" }),
            TypeAnnotation::List(inner) => {
                json!({ "type": "array", "items": self.fragment(field, inner)? })
            }
            TypeAnnotation::Tuple(items) => {
                let rendered = items
                    .iter()
                    .map(|item| self.fragment(field, item))
                    .collect::<Result<Vec<_>>>()?;
                let mut schema = Map::new();
                schema.insert("type".to_string(), "array".into());
                if modern {
                    schema.insert("prefixItems".to_string(), rendered.into());
                    schema.insert("items".to_string(), false.into());
                } else {
                    schema.insert("items".to_string(), rendered.into());
                }
                schema.insert("minItems".to_string(), items.len().into());
                schema.insert("maxItems".to_string(), items.len().into());
                JsonValue::Object(schema)
            }
            TypeAnnotation::Dict(key, value) => {
                if !matches!(**key, TypeAnnotation::Str | TypeAnnotation::Any) {
                    if modern {
                        return Err(Error::UnsupportedAnnotation {
                            field: field.to_string(),
                            reason: format!("object keys must be strings, not {}", key),
                        });
                    }
                    debug!(field = %field, key = %key, "Rendering non-string dictionary keys as string keys");
                }
                json!({ "type": "object", "additionalProperties": self.fragment(field, value)? })
            }
            TypeAnnotation::Optional(inner) => {
                json!({ "anyOf": [self.fragment(field, inner)?, { "type": "null" }] })
            }
            TypeAnnotation::Union(members) => {
                let rendered = members
                    .iter()
                    .map(|member| self.fragment(field, member))
                    .collect::<Result<Vec<_>>>()?;
                json!({ "anyOf": rendered })
            }
            TypeAnnotation::Literal(values) => {
                let values: Vec<JsonValue> = values.iter().map(value_to_json).collect();
                json!({ "enum": values })
            }
            TypeAnnotation::Record(def) => self.reference(&**def)?,
            TypeAnnotation::ForwardRef(reference) => {
                if modern {
                    return Err(Error::AnnotationResolution {
                        field: field.to_string(),
                        reference: reference.clone(),
                    });
                }
                json!({})
            }
        })
    }

    fn reference(&mut self, def: &dyn TypeDefinition) -> Result<JsonValue> {
        let key = def.qualified_name();
        let pointer = json!({ "$ref": format!("#/{}/{}", self.dialect.defs_keyword(), key) });
        if self.defs.contains_key(&key) || self.in_progress.contains(&key) {
            return Ok(pointer);
        }

        let structural = def.as_structural().ok_or_else(|| Error::ExtractionFailed {
            message: format!("'{}' declares no fields and cannot be nested as a record", key),
            source: None,
        })?;

        self.in_progress.insert(key.clone());
        let fields = compile_fields(self.dialect, structural)?;
        let schema = self.object_schema(def.type_name(), &fields)?;
        self.in_progress.remove(&key);
        self.defs.insert(key, JsonValue::Object(schema));
        Ok(pointer)
    }
}
