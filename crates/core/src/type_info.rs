//! Per-field type information
//!
//! A [`TypeInfo`] combines what a structural definition declares about a
//! field with what the field actually holds right now. It is derived on
//! demand and never cached, since the value may change between calls.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::annotation::TypeAnnotation;
use crate::standard_type::StandardType;
use crate::value::{RuntimeType, Value};

/// Kinds of constraint a field can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintType {
    /// Field must be present
    Required,
    /// Inclusive lower bound for numbers
    MinValue,
    /// Inclusive upper bound for numbers
    MaxValue,
    /// Minimum length of strings and sequences
    MinLength,
    /// Maximum length of strings and sequences
    MaxLength,
    /// Regular expression strings must match
    Pattern,
    /// Closed set of accepted values
    Enum,
}

/// A constraint attached to a field
#[derive(Debug, Clone, PartialEq)]
pub struct TypeConstraint {
    /// What is constrained
    pub kind: ConstraintType,
    /// Constraint parameter (`true` for `Required`)
    pub value: Value,
    /// Human-readable explanation
    pub description: Option<String>,
}

/// Where `TypeInfo::original_type` came from
#[derive(Debug, Clone, PartialEq)]
pub enum OriginalType {
    /// The definition declared this annotation
    Declared(TypeAnnotation),
    /// No declaration; the runtime kind of the value
    Runtime(RuntimeType),
}

impl fmt::Display for OriginalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginalType::Declared(annotation) => write!(f, "{}", annotation),
            OriginalType::Runtime(runtime) => write!(f, "{}", runtime),
        }
    }
}

/// Type information for one field
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    /// Field name
    pub field_name: String,
    /// Dotted path from the record root
    pub field_path: String,
    /// Normalized type
    pub standard_type: StandardType,
    /// Runtime kind of `current_value`
    pub runtime_type: RuntimeType,
    /// Declared annotation if any, else the runtime kind
    pub original_type: OriginalType,
    /// The value at derivation time
    pub current_value: Value,
    /// Value is a sequence container
    pub is_array: bool,
    /// Value is a mapping
    pub is_object: bool,
    /// Attached constraints
    pub constraints: Vec<TypeConstraint>,
}

impl TypeInfo {
    /// Attach a constraint, replacing any earlier one of the same kind
    pub fn add_constraint(
        &mut self,
        kind: ConstraintType,
        value: impl Into<Value>,
        description: Option<&str>,
    ) {
        self.constraints.retain(|c| c.kind != kind);
        self.constraints.push(TypeConstraint {
            kind,
            value: value.into(),
            description: description.map(str::to_string),
        });
    }

    /// The constraint of `kind`, if attached
    pub fn get_constraint(&self, kind: ConstraintType) -> Option<&TypeConstraint> {
        self.constraints.iter().find(|c| c.kind == kind)
    }

    /// Whether a constraint of `kind` is attached
    pub fn has_constraint(&self, kind: ConstraintType) -> bool {
        self.get_constraint(kind).is_some()
    }

    /// Whether the field carries a `Required` constraint
    pub fn is_required(&self) -> bool {
        self.has_constraint(ConstraintType::Required)
    }

    /// Whether the type came from a declaration rather than the value
    pub fn is_declared(&self) -> bool {
        matches!(self.original_type, OriginalType::Declared(_))
    }
}
