//! Shared test utilities for the integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

pub use recordwire::{
    Content, Error, ExportOptions, FieldAccessor, ImportFromEnvelope, ImportOptions,
    MessageEnvelope, MessageInstance, RecordInstance, RecordOptions, RecordShape, Result,
    StructuralType, TypeAnnotation, TypeDefinition, TypeRegistry, Value,
};
pub use recordwire::{Dialect, ModelAdapter, SchemaDeriver, SchemaModel};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// A module path no other test uses, so registrations never collide
pub fn unique_module(prefix: &str) -> String {
    format!("tests::{}::m{}", prefix, COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// `User { id: int (required), name: str (optional), tags: list<str> (required) }`
pub fn user_shape(module: &str) -> Arc<dyn TypeDefinition> {
    RecordShape::builder(module, "User")
        .required("id", TypeAnnotation::Int)
        .optional("name", TypeAnnotation::Str)
        .required("tags", TypeAnnotation::list(TypeAnnotation::Str))
        .build()
}

pub fn content_of(pairs: &[(&str, Value)]) -> Content {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn user_content() -> Content {
    content_of(&[
        ("id", Value::Int(42)),
        ("name", Value::from("Ada")),
        ("tags", Value::Array(vec![Value::from("admin")])),
    ])
}

/// Record using a deriver with the given adapters
pub fn record_with(
    content: Content,
    def: Arc<dyn TypeDefinition>,
    deriver: SchemaDeriver,
) -> RecordInstance {
    RecordInstance::with_options(
        content,
        def,
        RecordOptions {
            deriver: Some(Arc::new(deriver)),
            ..RecordOptions::default()
        },
    )
    .unwrap()
}

// ============================================================================
// Test adapters
// ============================================================================

/// Delegates to `inner` and counts model builds
#[derive(Debug)]
pub struct CountingAdapter {
    pub calls: AtomicUsize,
    inner: Arc<dyn ModelAdapter>,
}

impl CountingAdapter {
    pub fn wrap(inner: Arc<dyn ModelAdapter>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            inner,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ModelAdapter for CountingAdapter {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }

    fn build_model(&self, def: &dyn StructuralType) -> Result<Arc<dyn SchemaModel>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.build_model(def)
    }
}

/// Always fails model construction
#[derive(Debug)]
pub struct FailingAdapter(pub Dialect);

impl ModelAdapter for FailingAdapter {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn dialect(&self) -> Dialect {
        self.0
    }

    fn build_model(&self, def: &dyn StructuralType) -> Result<Arc<dyn SchemaModel>> {
        Err(Error::UnsupportedAnnotation {
            field: def.type_name().to_string(),
            reason: "adapter disabled for this test".to_string(),
        })
    }
}
