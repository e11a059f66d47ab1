//! Adapter seam between record shapes and schema models
//!
//! A [`ModelAdapter`] turns a structural definition into a [`SchemaModel`],
//! the compiled form JSON Schema documents are extracted from. Each adapter
//! targets one [`Dialect`].

use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

use recordwire_core::{Result, StructuralType, TypeAnnotation};

use crate::render::SchemaWriter;

/// JSON Schema dialect an adapter emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Draft 2020-12
    Draft202012,
    /// Draft-07
    Draft07,
}

impl Dialect {
    /// Value of the `$schema` keyword
    pub const fn schema_uri(&self) -> &'static str {
        match self {
            Dialect::Draft202012 => "https://json-schema.org/draft/2020-12/schema",
            Dialect::Draft07 => "http://json-schema.org/draft-07/schema#",
        }
    }

    /// Keyword nested definitions live under
    pub const fn defs_keyword(&self) -> &'static str {
        match self {
            Dialect::Draft202012 => "$defs",
            Dialect::Draft07 => "definitions",
        }
    }

    /// Short identifier, also the config spelling
    pub const fn id(&self) -> &'static str {
        match self {
            Dialect::Draft202012 => "draft-2020-12",
            Dialect::Draft07 => "draft-07",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One field of a compiled model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelField {
    /// Field name
    pub name: String,
    /// Annotation after adapter preprocessing (references resolved)
    pub annotation: TypeAnnotation,
    /// Whether the field must be present
    pub required: bool,
}

/// A compiled, dialect-specific model of a record shape
pub trait SchemaModel: fmt::Debug + Send + Sync {
    /// Dialect of the extracted document
    fn dialect(&self) -> Dialect;

    /// Name of the modelled record type
    fn title(&self) -> &str;

    /// Compiled fields, sorted by name
    fn fields(&self) -> &[ModelField];

    /// Extract the JSON Schema document
    fn json_schema(&self) -> Result<JsonValue>;
}

/// Builds [`SchemaModel`]s from structural definitions
pub trait ModelAdapter: fmt::Debug + Send + Sync {
    /// Adapter name, used in logs and errors
    fn name(&self) -> &'static str;

    /// Dialect of the models this adapter builds
    fn dialect(&self) -> Dialect;

    /// Compile `def` into a model
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot express the shape.
    fn build_model(&self, def: &dyn StructuralType) -> Result<Arc<dyn SchemaModel>>;
}

/// The model both built-in adapters produce
///
/// Adapters differ in how they preprocess annotations before compiling;
/// extraction is shared and driven by the dialect.
#[derive(Debug, Clone)]
pub struct CompiledModel {
    dialect: Dialect,
    title: String,
    fields: Vec<ModelField>,
}

impl CompiledModel {
    /// Assemble a model; fields are sorted by name
    pub fn new(dialect: Dialect, title: impl Into<String>, mut fields: Vec<ModelField>) -> Self {
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            dialect,
            title: title.into(),
            fields,
        }
    }
}

impl SchemaModel for CompiledModel {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn fields(&self) -> &[ModelField] {
        &self.fields
    }

    fn json_schema(&self) -> Result<JsonValue> {
        SchemaWriter::new(self.dialect).document(&self.title, &self.fields)
    }
}
