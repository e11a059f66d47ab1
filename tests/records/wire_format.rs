//! JSON text layout of exported envelopes

use crate::common::*;
use serde_json::Value as JsonValue;

#[test]
fn special_values_survive_json_text() {
    let shape = RecordShape::builder(unique_module("wire"), "Sample")
        .required("raw", TypeAnnotation::Bytes)
        .required("inf", TypeAnnotation::Float)
        .required("neg_zero", TypeAnnotation::Float)
        .build();
    let content = content_of(&[
        ("raw", Value::Bytes(vec![0, 255, 7])),
        ("inf", Value::Float(f64::NEG_INFINITY)),
        ("neg_zero", Value::Float(-0.0)),
    ]);
    let def = shape.clone();
    let record = RecordInstance::new(content.clone(), shape).unwrap();

    let text = record
        .export_to_envelope(&ExportOptions::default())
        .unwrap()
        .to_json_string()
        .unwrap();

    let raw: JsonValue = serde_json::from_str(&text).unwrap();
    assert_eq!(raw["content"]["raw"]["$bytes"], "AP8H");
    assert_eq!(raw["content"]["inf"]["$f64"], "-Inf");
    assert_eq!(raw["content"]["neg_zero"]["$f64"], "-0.0");

    let envelope = MessageEnvelope::from_json_str(&text).unwrap();
    let restored =
        RecordInstance::import_from_envelope(&envelope, ImportOptions::with_type_def(def)).unwrap();
    match restored.content()["neg_zero"] {
        Value::Float(f) => assert!(f == 0.0 && f.is_sign_negative()),
        ref other => panic!("expected float, got {:?}", other),
    }
    assert_eq!(restored.content(), content);
}

#[test]
fn ints_and_floats_stay_distinct() {
    let shape = RecordShape::builder(unique_module("wire"), "Numbers")
        .required("i", TypeAnnotation::Int)
        .required("f", TypeAnnotation::Float)
        .build();
    let content = content_of(&[("i", Value::Int(1)), ("f", Value::Float(1.0))]);
    let record = RecordInstance::new(content, shape.clone()).unwrap();

    let text = record
        .export_to_envelope(&ExportOptions::default())
        .unwrap()
        .to_json_string()
        .unwrap();
    let envelope = MessageEnvelope::from_json_str(&text).unwrap();

    assert_eq!(envelope.content["i"], Value::Int(1));
    assert_eq!(envelope.content["f"], Value::Float(1.0));
}

#[test]
fn envelope_top_level_keys() {
    let record = RecordInstance::new(user_content(), user_shape(&unique_module("wire"))).unwrap();
    let options = ExportOptions::default().with_metadata("trace_id", "t-1");
    let text = record.export_to_envelope(&options).unwrap().to_json_string().unwrap();
    let raw: JsonValue = serde_json::from_str(&text).unwrap();

    let keys: Vec<&String> = raw.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["content", "format", "metadata"]);
    assert_eq!(raw["format"], "typed_dict");
    assert_eq!(raw["metadata"]["current_format"], "typed_dict");
    assert_eq!(raw["metadata"]["source_cls_name"], "RecordInstance");
    assert_eq!(raw["metadata"]["trace_id"], "t-1");
    assert_eq!(raw["metadata"]["properties"]["type_def_name"], "User");
    assert!(raw["metadata"]["properties"]["schema_document"].is_object());
}
