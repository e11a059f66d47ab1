//! Draft 2020-12 adapter
//!
//! The strict path. Every forward reference must resolve and every
//! annotation must be expressible exactly, otherwise model construction
//! fails and the deriver falls back to the legacy adapter.

use std::collections::HashSet;
use std::sync::Arc;

use recordwire_core::{Error, Result, StructuralType, TypeAnnotation};

use crate::adapter::{CompiledModel, Dialect, ModelAdapter, SchemaModel};
use crate::render::compile_fields;

/// Builds draft 2020-12 models
#[derive(Debug, Default, Clone, Copy)]
pub struct Draft202012Adapter;

impl ModelAdapter for Draft202012Adapter {
    fn name(&self) -> &'static str {
        "draft-2020-12"
    }

    fn dialect(&self) -> Dialect {
        Dialect::Draft202012
    }

    fn build_model(&self, def: &dyn StructuralType) -> Result<Arc<dyn SchemaModel>> {
        let fields = compile_fields(Dialect::Draft202012, def)?;
        let mut visited = HashSet::from([def.qualified_name()]);
        for field in &fields {
            check_expressible(&field.name, &field.annotation, &mut visited)?;
        }
        Ok(Arc::new(CompiledModel::new(
            Dialect::Draft202012,
            def.type_name(),
            fields,
        )))
    }
}

/// Reject what draft 2020-12 cannot express, nested records included.
///
/// `visited` holds the records already walked, so recursive shapes stop.
fn check_expressible(
    field: &str,
    annotation: &TypeAnnotation,
    visited: &mut HashSet<String>,
) -> Result<()> {
    match annotation {
        TypeAnnotation::Dict(key, value) => {
            if !matches!(**key, TypeAnnotation::Str | TypeAnnotation::Any) {
                return Err(Error::UnsupportedAnnotation {
                    field: field.to_string(),
                    reason: format!("object keys must be strings, not {}", key),
                });
            }
            check_expressible(field, value, visited)
        }
        TypeAnnotation::List(inner) | TypeAnnotation::Optional(inner) => {
            check_expressible(field, inner, visited)
        }
        TypeAnnotation::Tuple(items) | TypeAnnotation::Union(items) => items
            .iter()
            .try_for_each(|item| check_expressible(field, item, visited)),
        TypeAnnotation::Record(def) => {
            if !visited.insert(def.qualified_name()) {
                return Ok(());
            }
            // Non-structural records are reported at extraction time
            let Some(structural) = def.as_structural() else {
                return Ok(());
            };
            for nested in compile_fields(Dialect::Draft202012, structural)? {
                let path = format!("{}.{}", field, nested.name);
                check_expressible(&path, &nested.annotation, visited)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
