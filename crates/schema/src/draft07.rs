//! Draft-07 adapter
//!
//! The lenient path: unresolved references degrade to `{}` and dictionaries
//! with non-string keys are rendered as plain objects.

use std::sync::Arc;

use recordwire_core::{Result, StructuralType};

use crate::adapter::{CompiledModel, Dialect, ModelAdapter, SchemaModel};
use crate::render::compile_fields;

/// Builds draft-07 models
#[derive(Debug, Default, Clone, Copy)]
pub struct Draft07Adapter;

impl ModelAdapter for Draft07Adapter {
    fn name(&self) -> &'static str {
        "draft-07"
    }

    fn dialect(&self) -> Dialect {
        Dialect::Draft07
    }

    fn build_model(&self, def: &dyn StructuralType) -> Result<Arc<dyn SchemaModel>> {
        let fields = compile_fields(Dialect::Draft07, def)?;
        Ok(Arc::new(CompiledModel::new(Dialect::Draft07, def.type_name(), fields)))
    }
}
