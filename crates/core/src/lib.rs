//! Core types and traits for recordwire
//!
//! This crate defines the foundational types used throughout the workspace:
//! - Value: Unified value enum for record content
//! - TypeAnnotation: Declared field types
//! - TypeDefinition / StructuralType: Record shape interfaces, RecordShape
//! - TypeRegistry: `(module_path, type_name)` -> definition lookup
//! - StandardType: Normalized type tags
//! - TypeInfo: Per-field type information
//! - FieldAccessor: Field paths and existing-keys-only bulk updates
//! - MessageEnvelope: The wire-level unit of exchange
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod annotation;
pub mod envelope;
pub mod error;
pub mod field_accessor;
pub mod json;
pub mod registry;
pub mod standard_type;
pub mod structural;
pub mod type_info;
pub mod value;

pub use annotation::{FieldAnnotations, TypeAnnotation};
pub use envelope::{
    create_envelope, EnvelopeMetadata, MessageEnvelope, PROP_SCHEMA_DOCUMENT,
    PROP_TYPE_DEF_MODULE, PROP_TYPE_DEF_NAME,
};
pub use error::{BoxError, Error, RegistryError, Result};
pub use field_accessor::FieldAccessor;
pub use json::{json_to_value, value_to_json};
pub use registry::{register_type, resolve_type, TypeRegistry};
pub use standard_type::StandardType;
pub use structural::{
    require_structural, same_shape, MappingType, RecordShape, RecordShapeBuilder,
    StructuralType, TypeDefinition,
};
pub use type_info::{ConstraintType, OriginalType, TypeConstraint, TypeInfo};
pub use value::{Content, RuntimeType, Value};
