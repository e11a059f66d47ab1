//! Structural type definitions
//!
//! A structural type definition declares the shape of a record: named
//! fields, each with a [`TypeAnnotation`], partitioned into required and
//! optional subsets.
//!
//! ## The Two Traits
//!
//! - [`TypeDefinition`]: anything with an identity, `(module_path, type_name)`.
//!   Registries store these.
//! - [`StructuralType`]: a definition that also exposes field annotations, a
//!   totality flag, and the required/optional key sets. Only these can back
//!   a record instance.
//!
//! A definition opts into the structural view through
//! [`TypeDefinition::as_structural`]; [`require_structural`] is the single
//! conformance check construction runs.
//!
//! ## Example
//!
//! ```
//! use recordwire_core::{RecordShape, StructuralType, TypeAnnotation};
//!
//! let user = RecordShape::builder(module_path!(), "User")
//!     .required("id", TypeAnnotation::Int)
//!     .optional("name", TypeAnnotation::Str)
//!     .build();
//! assert!(user.required_keys().contains("id"));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::annotation::{FieldAnnotations, TypeAnnotation};
use crate::error::{Error, Result};
use crate::registry::TypeRegistry;

/// A named type known to the process
pub trait TypeDefinition: fmt::Debug + Send + Sync {
    /// Path of the module that defines the type (`module_path!()`)
    fn module_path(&self) -> &str;

    /// Type name within its module
    fn type_name(&self) -> &str;

    /// `module_path::type_name`
    fn qualified_name(&self) -> String {
        format!("{}::{}", self.module_path(), self.type_name())
    }

    /// Structural view, if this definition declares a record shape
    fn as_structural(&self) -> Option<&dyn StructuralType> {
        None
    }
}

/// A definition that declares a record shape
pub trait StructuralType: TypeDefinition {
    /// Declared annotations exactly as written (forward references intact)
    fn declared_annotations(&self) -> &FieldAnnotations;

    /// Whether fields declared without an explicit classification are required
    fn is_total(&self) -> bool;

    /// Names of required fields
    fn required_keys(&self) -> &BTreeSet<String>;

    /// Names of optional fields
    fn optional_keys(&self) -> &BTreeSet<String>;

    /// Annotations with forward references resolved through the global registry
    ///
    /// # Errors
    ///
    /// Returns `AnnotationResolution` if any reference names an
    /// unregistered type.
    fn annotations(&self) -> Result<FieldAnnotations> {
        let registry = TypeRegistry::global();
        self.declared_annotations()
            .iter()
            .map(|(name, ann)| ann.resolve(name, registry).map(|a| (name.clone(), a)))
            .collect()
    }
}

/// Check that `def` describes a well-formed record shape.
///
/// The definition must expose the structural view, its required and
/// optional sets must not overlap, and together they must cover exactly the
/// declared fields.
///
/// # Errors
///
/// Returns `NotAStructuralType` describing the first violation.
pub fn require_structural(def: &dyn TypeDefinition) -> Result<&dyn StructuralType> {
    let not_structural = |reason: String| Error::NotAStructuralType {
        type_name: def.qualified_name(),
        reason,
    };

    let structural = def.as_structural().ok_or_else(|| {
        not_structural("definition exposes no field annotations or required/optional key sets".to_string())
    })?;

    let required = structural.required_keys();
    let optional = structural.optional_keys();
    if let Some(both) = required.intersection(optional).next() {
        return Err(not_structural(format!(
            "field '{}' is both required and optional",
            both
        )));
    }

    let declared: BTreeSet<&str> = structural
        .declared_annotations()
        .keys()
        .map(String::as_str)
        .collect();
    let classified: BTreeSet<&str> = required
        .iter()
        .chain(optional.iter())
        .map(String::as_str)
        .collect();
    if declared != classified {
        let stray: Vec<&str> = declared.symmetric_difference(&classified).copied().collect();
        return Err(not_structural(format!(
            "fields {:?} are not both declared and classified",
            stray
        )));
    }

    Ok(structural)
}

/// Whether two definitions declare the same field shape
pub fn same_shape(a: &dyn StructuralType, b: &dyn StructuralType) -> bool {
    a.is_total() == b.is_total()
        && a.required_keys() == b.required_keys()
        && a.optional_keys() == b.optional_keys()
        && a.declared_annotations() == b.declared_annotations()
}

// =============================================================================
// RecordShape
// =============================================================================

/// A declared record shape
///
/// Immutable once built; share it as `Arc<dyn TypeDefinition>`.
#[derive(Debug, Clone)]
pub struct RecordShape {
    module_path: String,
    type_name: String,
    total: bool,
    annotations: FieldAnnotations,
    required: BTreeSet<String>,
    optional: BTreeSet<String>,
}

impl RecordShape {
    /// Start declaring a shape. Totality defaults to `true`.
    pub fn builder(module_path: impl Into<String>, type_name: impl Into<String>) -> RecordShapeBuilder {
        RecordShapeBuilder {
            shape: RecordShape {
                module_path: module_path.into(),
                type_name: type_name.into(),
                total: true,
                annotations: FieldAnnotations::new(),
                required: BTreeSet::new(),
                optional: BTreeSet::new(),
            },
        }
    }

    /// Number of declared fields
    pub fn field_count(&self) -> usize {
        self.annotations.len()
    }
}

impl TypeDefinition for RecordShape {
    fn module_path(&self) -> &str {
        &self.module_path
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn as_structural(&self) -> Option<&dyn StructuralType> {
        Some(self)
    }
}

impl StructuralType for RecordShape {
    fn declared_annotations(&self) -> &FieldAnnotations {
        &self.annotations
    }

    fn is_total(&self) -> bool {
        self.total
    }

    fn required_keys(&self) -> &BTreeSet<String> {
        &self.required
    }

    fn optional_keys(&self) -> &BTreeSet<String> {
        &self.optional
    }
}

/// Builder for [`RecordShape`]
///
/// Declaring a field twice keeps the last declaration.
#[derive(Debug)]
pub struct RecordShapeBuilder {
    shape: RecordShape,
}

impl RecordShapeBuilder {
    /// Set the totality flag used by [`field`](Self::field).
    ///
    /// Only affects fields declared after this call.
    pub fn total(mut self, total: bool) -> Self {
        self.shape.total = total;
        self
    }

    /// Declare a field classified by the totality flag
    pub fn field(self, name: impl Into<String>, annotation: TypeAnnotation) -> Self {
        if self.shape.total {
            self.required(name, annotation)
        } else {
            self.optional(name, annotation)
        }
    }

    /// Declare a required field
    pub fn required(mut self, name: impl Into<String>, annotation: TypeAnnotation) -> Self {
        let name = name.into();
        self.shape.optional.remove(&name);
        self.shape.required.insert(name.clone());
        self.shape.annotations.insert(name, annotation);
        self
    }

    /// Declare an optional field
    pub fn optional(mut self, name: impl Into<String>, annotation: TypeAnnotation) -> Self {
        let name = name.into();
        self.shape.required.remove(&name);
        self.shape.optional.insert(name.clone());
        self.shape.annotations.insert(name, annotation);
        self
    }

    /// Inherit every field of `parent` with its classification
    pub fn extends(mut self, parent: &dyn StructuralType) -> Self {
        for (name, annotation) in parent.declared_annotations() {
            self = if parent.required_keys().contains(name) {
                self.required(name.clone(), annotation.clone())
            } else {
                self.optional(name.clone(), annotation.clone())
            };
        }
        self
    }

    /// Finish the shape
    pub fn build(self) -> Arc<RecordShape> {
        Arc::new(self.shape)
    }
}

// =============================================================================
// MappingType
// =============================================================================

/// An open `str -> value` mapping type
///
/// Registrable and nameable, but it declares no fields, so it cannot back
/// a record instance.
#[derive(Debug, Clone)]
pub struct MappingType {
    module_path: String,
    type_name: String,
    value_type: TypeAnnotation,
}

impl MappingType {
    /// Declare a mapping type whose values have `value_type`
    pub fn new(
        module_path: impl Into<String>,
        type_name: impl Into<String>,
        value_type: TypeAnnotation,
    ) -> Arc<Self> {
        Arc::new(Self {
            module_path: module_path.into(),
            type_name: type_name.into(),
            value_type,
        })
    }

    /// Declared value type
    pub fn value_type(&self) -> &TypeAnnotation {
        &self.value_type
    }
}

impl TypeDefinition for MappingType {
    fn module_path(&self) -> &str {
        &self.module_path
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}
