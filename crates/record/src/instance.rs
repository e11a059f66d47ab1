//! Record instances
//!
//! A [`RecordInstance`] binds one structural definition to one content
//! mapping. The definition is fixed for the life of the instance; content
//! can only be updated through [`RecordInstance::set_content`], which never
//! adds keys.
//!
//! ## Derived Artifacts
//!
//! The schema model and JSON Schema document are derived on first
//! successful request and cached. A failed derivation is not cached, so a
//! later call tries again.
//!
//! ```
//! use recordwire_core::{RecordShape, TypeAnnotation, Value};
//! use recordwire_record::RecordInstance;
//!
//! let user = RecordShape::builder(module_path!(), "User")
//!     .required("id", TypeAnnotation::Int)
//!     .build();
//! let mut content = std::collections::HashMap::new();
//! content.insert("id".to_string(), Value::Int(7));
//!
//! let record = RecordInstance::new(content, user).unwrap();
//! assert_eq!(record.root_accessor().full_path_from_root(), "User");
//! ```

use once_cell::sync::OnceCell;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use tracing::{debug, warn};

use recordwire_core::{
    require_structural, ConstraintType, Content, FieldAccessor, FieldAnnotations, MessageEnvelope,
    OriginalType, Result, StandardType, StructuralType, TypeDefinition, TypeInfo, Value,
};
use recordwire_schema::{SchemaDeriver, SchemaModel};

use crate::codec::{export_record, ExportOptions};
use crate::message::{MessageInstance, MessageType};

/// Description attached to `Required` constraints
pub const REQUIRED_NOTE: &str = "Field is required by the record definition";

/// Construction options
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    /// Caller metadata, copied into every exported envelope
    pub metadata: Map<String, JsonValue>,
    /// Deriver for schema artifacts; `None` uses [`SchemaDeriver::detected`]
    pub deriver: Option<Arc<SchemaDeriver>>,
}

/// A structural record and its content
#[derive(Debug)]
pub struct RecordInstance {
    type_def: Arc<dyn TypeDefinition>,
    content: Content,
    metadata: Map<String, JsonValue>,
    deriver: Arc<SchemaDeriver>,
    model: OnceCell<Arc<dyn SchemaModel>>,
    schema: OnceCell<Arc<JsonValue>>,
}

impl RecordInstance {
    /// Bind `content` to `type_def` with default options
    pub fn new(content: Content, type_def: Arc<dyn TypeDefinition>) -> Result<Self> {
        Self::with_options(content, type_def, RecordOptions::default())
    }

    /// Bind `content` to `type_def`.
    ///
    /// # Errors
    ///
    /// Returns `NotAStructuralType` if `type_def` does not describe a
    /// well-formed record shape.
    pub fn with_options(
        content: Content,
        type_def: Arc<dyn TypeDefinition>,
        options: RecordOptions,
    ) -> Result<Self> {
        warn!(
            type_name = %type_def.qualified_name(),
            "RecordInstance is experimental; its envelope layout may change"
        );

        require_structural(&*type_def)?;

        Ok(Self {
            type_def,
            content,
            metadata: options.metadata,
            deriver: options.deriver.unwrap_or_else(SchemaDeriver::detected),
            model: OnceCell::new(),
            schema: OnceCell::new(),
        })
    }

    /// The bound definition
    pub fn type_def(&self) -> &Arc<dyn TypeDefinition> {
        &self.type_def
    }

    /// The deriver schema artifacts come from
    pub fn deriver(&self) -> &Arc<SchemaDeriver> {
        &self.deriver
    }

    /// Borrow the content without copying
    pub fn content_ref(&self) -> &Content {
        &self.content
    }

    /// Update existing fields from `source`; unknown keys are ignored.
    ///
    /// Returns the number of values written.
    pub fn set_content(&mut self, source: &Content) -> usize {
        FieldAccessor::update_from_map(&mut self.content, source)
    }

    /// Accessor for the record root, named after the record type
    pub fn root_accessor(&self) -> FieldAccessor {
        FieldAccessor::root(self.type_def.type_name())
    }

    fn structural(&self) -> Result<&dyn StructuralType> {
        require_structural(&*self.type_def)
    }

    // =========================================================================
    // Schema artifacts
    // =========================================================================

    /// Schema model for the bound definition, built once
    pub fn model(&self) -> Result<Arc<dyn SchemaModel>> {
        self.model
            .get_or_try_init(|| self.deriver.derive_model(self.structural()?))
            .map(Arc::clone)
    }

    /// JSON Schema document for the bound definition, built once
    pub fn json_schema(&self) -> Result<Arc<JsonValue>> {
        self.schema
            .get_or_try_init(|| {
                let model = self.model()?;
                SchemaDeriver::extract_schema(&*model, &self.type_def.qualified_name())
                    .map(Arc::new)
            })
            .map(Arc::clone)
    }

    /// Schema model for `def`, uncached
    pub fn model_for(def: &dyn TypeDefinition) -> Result<Arc<dyn SchemaModel>> {
        SchemaDeriver::detected().derive_model(require_structural(def)?)
    }

    /// JSON Schema document for `def`, uncached
    pub fn json_schema_for(def: &dyn TypeDefinition) -> Result<JsonValue> {
        SchemaDeriver::detected().derive_schema(require_structural(def)?)
    }

    // =========================================================================
    // Type info
    // =========================================================================

    /// Type information for `field_name` holding `value`, under `parent`.
    ///
    /// Declared annotations win over the runtime type. If the annotations
    /// cannot be resolved the field is described from its value alone.
    pub fn field_type_info(&self, field_name: &str, value: &Value, parent: &FieldAccessor) -> TypeInfo {
        let structural = self.type_def.as_structural();
        let annotations = structural
            .map(|s| {
                s.annotations().unwrap_or_else(|e| {
                    debug!(
                        type_name = %self.type_def.qualified_name(),
                        error = %e,
                        "Annotations unavailable, using runtime types"
                    );
                    FieldAnnotations::new()
                })
            })
            .unwrap_or_default();

        let runtime_type = value.runtime_type();
        let (standard_type, original_type) = match annotations.get(field_name) {
            Some(declared) => (
                StandardType::from_annotation(declared),
                OriginalType::Declared(declared.clone()),
            ),
            None => (
                StandardType::from_runtime(runtime_type),
                OriginalType::Runtime(runtime_type),
            ),
        };

        let mut info = TypeInfo {
            field_name: field_name.to_string(),
            field_path: parent.child(field_name).full_path_from_root(),
            standard_type,
            runtime_type,
            original_type,
            current_value: value.clone(),
            is_array: runtime_type.is_sequence(),
            is_object: runtime_type.is_mapping(),
            constraints: Vec::new(),
        };

        if structural.map_or(false, |s| s.required_keys().contains(field_name)) {
            info.add_constraint(ConstraintType::Required, true, Some(REQUIRED_NOTE));
        }
        info
    }

    /// Type information for every top-level field, sorted by name
    pub fn field_type_infos(&self) -> Vec<TypeInfo> {
        let root = self.root_accessor();
        let mut names: Vec<&String> = self.content.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| self.field_type_info(name, &self.content[name], &root))
            .collect()
    }
}

impl MessageInstance for RecordInstance {
    fn message_type(&self) -> MessageType {
        MessageType::TypedDict
    }

    fn content(&self) -> Content {
        self.content.clone()
    }

    fn metadata(&self) -> &Map<String, JsonValue> {
        &self.metadata
    }

    fn export_to_envelope(&self, options: &ExportOptions) -> Result<MessageEnvelope> {
        export_record(self, options)
    }
}
