//! Standard type mapping
//!
//! [`StandardType`] is a normalized, format-agnostic type tag. Both declared
//! annotations and runtime values map onto it, so type info from different
//! sources can be compared directly.
//!
//! The mapping is total: anything it cannot classify becomes
//! [`StandardType::Unknown`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::annotation::TypeAnnotation;
use crate::value::{RuntimeType, Value};

/// Normalized type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardType {
    /// Null / none
    Null,
    /// Boolean
    Boolean,
    /// Integer
    Integer,
    /// Floating point
    Float,
    /// Text
    String,
    /// Raw bytes
    Bytes,
    /// Ordered sequence (lists and tuples)
    Array,
    /// Key/value mapping (dicts and nested records)
    Object,
    /// Accepts any value
    Any,
    /// Could not be classified
    Unknown,
}

impl StandardType {
    /// Short identifier (for serialization, logs, etc.)
    pub const fn id(&self) -> &'static str {
        match self {
            StandardType::Null => "null",
            StandardType::Boolean => "boolean",
            StandardType::Integer => "integer",
            StandardType::Float => "float",
            StandardType::String => "string",
            StandardType::Bytes => "bytes",
            StandardType::Array => "array",
            StandardType::Object => "object",
            StandardType::Any => "any",
            StandardType::Unknown => "unknown",
        }
    }

    /// Whether values of this type hold other values
    pub const fn is_container(&self) -> bool {
        matches!(self, StandardType::Array | StandardType::Object)
    }

    /// Map a runtime value kind
    pub const fn from_runtime(runtime: RuntimeType) -> Self {
        match runtime {
            RuntimeType::Null => StandardType::Null,
            RuntimeType::Bool => StandardType::Boolean,
            RuntimeType::Int => StandardType::Integer,
            RuntimeType::Float => StandardType::Float,
            RuntimeType::String => StandardType::String,
            RuntimeType::Bytes => StandardType::Bytes,
            RuntimeType::Array => StandardType::Array,
            RuntimeType::Object => StandardType::Object,
        }
    }

    /// Map a declared annotation
    ///
    /// `Optional(T)` maps as `T`. A union maps to its single non-null member
    /// type when all members agree, and to `Any` otherwise. An unresolved
    /// forward reference is `Unknown`.
    pub fn from_annotation(annotation: &TypeAnnotation) -> Self {
        match annotation {
            TypeAnnotation::Any => StandardType::Any,
            TypeAnnotation::None => StandardType::Null,
            TypeAnnotation::Bool => StandardType::Boolean,
            TypeAnnotation::Int => StandardType::Integer,
            TypeAnnotation::Float => StandardType::Float,
            TypeAnnotation::Str => StandardType::String,
            TypeAnnotation::Bytes => StandardType::Bytes,
            TypeAnnotation::List(_) | TypeAnnotation::Tuple(_) => StandardType::Array,
            TypeAnnotation::Dict(_, _) | TypeAnnotation::Record(_) => StandardType::Object,
            TypeAnnotation::Optional(inner) => Self::from_annotation(inner),
            TypeAnnotation::Union(members) => Self::agree(
                members
                    .iter()
                    .filter(|m| !matches!(m, TypeAnnotation::None))
                    .map(Self::from_annotation),
            ),
            TypeAnnotation::Literal(values) => Self::agree(
                values
                    .iter()
                    .filter(|v| !v.is_null())
                    .map(|v| Self::from_runtime(v.runtime_type())),
            ),
            TypeAnnotation::ForwardRef(_) => StandardType::Unknown,
        }
    }

    /// Map whatever a value currently holds
    pub fn of_value(value: &Value) -> Self {
        Self::from_runtime(value.runtime_type())
    }

    fn agree(mut types: impl Iterator<Item = StandardType>) -> Self {
        let Some(first) = types.next() else {
            return StandardType::Null;
        };
        if types.all(|t| t == first) {
            first
        } else {
            StandardType::Any
        }
    }
}

impl fmt::Display for StandardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
