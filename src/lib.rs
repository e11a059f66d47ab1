//! recordwire - Structural records with self-describing envelopes
//!
//! Bind a key/value record to a structural type definition, derive per-field
//! type information, and move records in and out of a canonical envelope
//! that carries enough metadata to rebuild them.
//!
//! # Quick Start
//!
//! ```
//! use recordwire::{
//!     register_type, ExportOptions, ImportFromEnvelope, ImportOptions, MessageInstance,
//!     RecordInstance, RecordShape, TypeAnnotation, Value,
//! };
//!
//! let user = register_type(
//!     RecordShape::builder(module_path!(), "User")
//!         .required("id", TypeAnnotation::Int)
//!         .optional("name", TypeAnnotation::Str)
//!         .build(),
//! );
//!
//! let mut content = std::collections::HashMap::new();
//! content.insert("id".to_string(), Value::Int(7));
//! let record = RecordInstance::new(content, user)?;
//!
//! let envelope = record.export_to_envelope(&ExportOptions::default())?;
//! let restored = RecordInstance::import_from_envelope(&envelope, ImportOptions::default())?;
//! assert_eq!(restored.content(), record.content());
//! # Ok::<(), recordwire::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `recordwire-core`: values, annotations, definitions, registry, envelope
//! - `recordwire-schema`: JSON Schema adapters and derivation
//! - `recordwire-record`: record instances, envelope codec, configuration

pub use recordwire_core::*;
pub use recordwire_record::*;
pub use recordwire_schema::*;
