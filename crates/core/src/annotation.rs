//! Declared field types
//!
//! A [`TypeAnnotation`] is what a structural type definition says a field
//! holds. It is compared against the runtime [`Value`](crate::Value) when
//! type info is derived, and rendered into JSON Schema by the schema crate.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::registry::TypeRegistry;
use crate::structural::TypeDefinition;
use crate::value::Value;

/// Declared annotations keyed by field name
pub type FieldAnnotations = BTreeMap<String, TypeAnnotation>;

/// Declared type of a record field
#[derive(Debug, Clone)]
pub enum TypeAnnotation {
    /// Anything goes
    Any,
    /// Only null
    None,
    /// Boolean
    Bool,
    /// Integer
    Int,
    /// Floating point number
    Float,
    /// Text
    Str,
    /// Raw bytes
    Bytes,
    /// Homogeneous sequence
    List(Box<TypeAnnotation>),
    /// Fixed-length positional sequence
    Tuple(Vec<TypeAnnotation>),
    /// Mapping with the given key and value types
    Dict(Box<TypeAnnotation>, Box<TypeAnnotation>),
    /// The inner type or null
    Optional(Box<TypeAnnotation>),
    /// Any one of the listed types
    Union(Vec<TypeAnnotation>),
    /// One of the listed constant values
    Literal(Vec<Value>),
    /// Another registered record type
    Record(Arc<dyn TypeDefinition>),
    /// A `module::Name` reference resolved through the type registry
    ForwardRef(String),
}

impl TypeAnnotation {
    /// `List(inner)`
    pub fn list(inner: TypeAnnotation) -> Self {
        TypeAnnotation::List(Box::new(inner))
    }

    /// `Dict(key, value)`
    pub fn dict(key: TypeAnnotation, value: TypeAnnotation) -> Self {
        TypeAnnotation::Dict(Box::new(key), Box::new(value))
    }

    /// `Optional(inner)`
    pub fn optional(inner: TypeAnnotation) -> Self {
        TypeAnnotation::Optional(Box::new(inner))
    }

    /// `ForwardRef("module::Name")`
    pub fn forward_ref(reference: impl Into<String>) -> Self {
        TypeAnnotation::ForwardRef(reference.into())
    }

    /// `Record(def)`
    pub fn record(def: Arc<dyn TypeDefinition>) -> Self {
        TypeAnnotation::Record(def)
    }

    /// Whether null is an accepted value
    pub fn is_nullable(&self) -> bool {
        match self {
            TypeAnnotation::Any | TypeAnnotation::None | TypeAnnotation::Optional(_) => true,
            TypeAnnotation::Union(members) => members.iter().any(|m| m.is_nullable()),
            TypeAnnotation::Literal(values) => values.iter().any(Value::is_null),
            _ => false,
        }
    }

    /// Replace every forward reference with the registered definition.
    ///
    /// `field` is only used to name the culprit in the error.
    pub fn resolve(&self, field: &str, registry: &TypeRegistry) -> Result<TypeAnnotation> {
        let resolve_all = |items: &[TypeAnnotation]| -> Result<Vec<TypeAnnotation>> {
            items.iter().map(|a| a.resolve(field, registry)).collect()
        };

        Ok(match self {
            TypeAnnotation::ForwardRef(reference) => {
                let (module, name) =
                    split_reference(reference).ok_or_else(|| Error::AnnotationResolution {
                        field: field.to_string(),
                        reference: reference.clone(),
                    })?;
                let def = registry
                    .resolve(module, name)
                    .map_err(|_| Error::AnnotationResolution {
                        field: field.to_string(),
                        reference: reference.clone(),
                    })?;
                TypeAnnotation::Record(def)
            }
            TypeAnnotation::List(inner) => TypeAnnotation::list(inner.resolve(field, registry)?),
            TypeAnnotation::Optional(inner) => {
                TypeAnnotation::optional(inner.resolve(field, registry)?)
            }
            TypeAnnotation::Dict(key, value) => TypeAnnotation::dict(
                key.resolve(field, registry)?,
                value.resolve(field, registry)?,
            ),
            TypeAnnotation::Tuple(items) => TypeAnnotation::Tuple(resolve_all(items)?),
            TypeAnnotation::Union(members) => TypeAnnotation::Union(resolve_all(members)?),
            other => other.clone(),
        })
    }
}

/// Split `a::b::Name` into (`a::b`, `Name`)
pub(crate) fn split_reference(reference: &str) -> Option<(&str, &str)> {
    let (module, name) = reference.rsplit_once("::")?;
    if module.is_empty() || name.is_empty() {
        return None;
    }
    Some((module, name))
}

impl PartialEq for TypeAnnotation {
    fn eq(&self, other: &Self) -> bool {
        use TypeAnnotation::*;
        match (self, other) {
            (Any, Any) | (None, None) | (Bool, Bool) | (Int, Int) | (Float, Float) => true,
            (Str, Str) | (Bytes, Bytes) => true,
            (List(a), List(b)) | (Optional(a), Optional(b)) => a == b,
            (Tuple(a), Tuple(b)) | (Union(a), Union(b)) => a == b,
            (Dict(ka, va), Dict(kb, vb)) => ka == kb && va == vb,
            (Literal(a), Literal(b)) => a == b,
            // Records are nominal: same module path and name
            (Record(a), Record(b)) => {
                a.module_path() == b.module_path() && a.type_name() == b.type_name()
            }
            (ForwardRef(a), ForwardRef(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[TypeAnnotation]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            TypeAnnotation::Any => f.write_str("any"),
            TypeAnnotation::None => f.write_str("none"),
            TypeAnnotation::Bool => f.write_str("bool"),
            TypeAnnotation::Int => f.write_str("int"),
            TypeAnnotation::Float => f.write_str("float"),
            TypeAnnotation::Str => f.write_str("str"),
            TypeAnnotation::Bytes => f.write_str("bytes"),
            TypeAnnotation::List(inner) => write!(f, "list<{}>", inner),
            TypeAnnotation::Tuple(items) => {
                f.write_str("tuple<")?;
                join(f, items)?;
                f.write_str(">")
            }
            TypeAnnotation::Dict(k, v) => write!(f, "dict<{}, {}>", k, v),
            TypeAnnotation::Optional(inner) => write!(f, "optional<{}>", inner),
            TypeAnnotation::Union(members) => {
                f.write_str("union<")?;
                join(f, members)?;
                f.write_str(">")
            }
            TypeAnnotation::Literal(values) => {
                f.write_str("literal<")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", crate::json::value_to_json(v))?;
                }
                f.write_str(">")
            }
            TypeAnnotation::Record(def) => write!(f, "record<{}>", def.qualified_name()),
            TypeAnnotation::ForwardRef(reference) => write!(f, "ref<{}>", reference),
        }
    }
}
