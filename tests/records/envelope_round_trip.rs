//! Export then import returns the same record

use crate::common::*;
use proptest::prelude::*;
use std::sync::Arc;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (prop::num::f64::NORMAL
            | prop::num::f64::SUBNORMAL
            | prop::num::f64::ZERO
            | prop::num::f64::INFINITE
            | prop::num::f64::POSITIVE
            | prop::num::f64::NEGATIVE)
            .prop_map(Value::Float),
        "[a-z$ ]{0,12}".prop_map(Value::from),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::hash_map("\\$?(bytes|f64|object|[a-z]{1,4})", inner, 0..4).prop_map(Value::Object),
        ]
    })
}

fn content() -> impl Strategy<Value = Content> {
    prop::collection::hash_map("\\$?[a-z]{1,8}", value(), 0..6)
}

fn open_shape(module: &str, content: &Content) -> Arc<dyn TypeDefinition> {
    content
        .keys()
        .fold(RecordShape::builder(module, "Open"), |b, k| {
            b.optional(k.clone(), TypeAnnotation::Any)
        })
        .build()
}

proptest! {
    /// Property: content survives export, JSON text, and import unchanged
    #[test]
    fn content_round_trips_through_json_text(content in content()) {
        let registry = TypeRegistry::new();
        let def = registry.register(open_shape(&unique_module("roundtrip"), &content));
        let record = RecordInstance::new(content.clone(), def.clone()).unwrap();

        let text = record
            .export_to_envelope(&ExportOptions::default())
            .unwrap()
            .to_json_string()
            .unwrap();
        let envelope = MessageEnvelope::from_json_str(&text).unwrap();
        let restored =
            RecordInstance::import_from_envelope(&envelope, ImportOptions::with_registry(&registry))
                .unwrap();

        prop_assert_eq!(restored.content(), content);
        prop_assert!(Arc::ptr_eq(restored.type_def(), &def));
    }
}

#[test]
fn round_trip_through_global_registry() {
    let module = unique_module("roundtrip");
    let def = recordwire::register_type(user_shape(&module));
    let record = RecordInstance::new(user_content(), def.clone()).unwrap();

    let envelope = record.export_to_envelope(&ExportOptions::default()).unwrap();
    let restored = RecordInstance::import_from_envelope(&envelope, ImportOptions::default()).unwrap();

    assert_eq!(restored.content(), record.content());
    assert_eq!(restored.type_def().module_path(), module);
    assert_eq!(restored.type_def().type_name(), "User");
    assert!(Arc::ptr_eq(restored.type_def(), &def));
}

#[test]
fn export_leaves_record_untouched() {
    let record = RecordInstance::new(user_content(), user_shape(&unique_module("roundtrip"))).unwrap();
    let mut envelope = record.export_to_envelope(&ExportOptions::default()).unwrap();
    envelope.content.insert("id".to_string(), Value::Int(-1));
    assert_eq!(record.content()["id"], Value::Int(42));
}

#[test]
fn import_forwards_options_to_construction() {
    let def = user_shape(&unique_module("roundtrip"));
    let record = RecordInstance::new(user_content(), def.clone()).unwrap();
    let envelope = record.export_to_envelope(&ExportOptions::default()).unwrap();

    let mut metadata = serde_json::Map::new();
    metadata.insert("origin".to_string(), "import".into());
    let options = ImportOptions {
        metadata,
        deriver: Some(Arc::new(SchemaDeriver::unavailable())),
        ..ImportOptions::with_type_def(def)
    };
    let restored = RecordInstance::import_from_envelope(&envelope, options).unwrap();

    assert_eq!(restored.metadata()["origin"], "import");
    assert!(!restored.deriver().is_available());
    let again = restored.export_to_envelope(&ExportOptions::default()).unwrap();
    assert_eq!(again.metadata.extra["origin"], "import");
    assert!(again.metadata.schema_document().is_none());
}
