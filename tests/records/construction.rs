//! Construction validation

use crate::common::*;
use recordwire::MappingType;

#[test]
fn structural_shape_accepted() {
    let record = RecordInstance::new(user_content(), user_shape(&unique_module("construct"))).unwrap();
    assert_eq!(record.type_def().type_name(), "User");
    assert_eq!(record.content(), user_content());
}

#[test]
fn mapping_type_rejected() {
    let headers = MappingType::new(unique_module("construct"), "Headers", TypeAnnotation::Str);
    match RecordInstance::new(Content::new(), headers).unwrap_err() {
        Error::NotAStructuralType { type_name, .. } => assert!(type_name.ends_with("::Headers")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn content_need_not_match_shape() {
    // construction checks the definition, never the values
    let content = content_of(&[("id", Value::from("forty-two")), ("extra", Value::Null)]);
    assert!(RecordInstance::new(content, user_shape(&unique_module("construct"))).is_ok());
}

#[test]
fn bulk_update_keeps_key_set() {
    let mut record =
        RecordInstance::new(user_content(), user_shape(&unique_module("construct"))).unwrap();
    let before: std::collections::BTreeSet<String> = record.content().into_keys().collect();

    record.set_content(&content_of(&[
        ("name", Value::from("Grace")),
        ("email", Value::from("g@example.com")),
    ]));

    let after: std::collections::BTreeSet<String> = record.content().into_keys().collect();
    assert_eq!(before, after);
    assert_eq!(record.content()["name"], Value::from("Grace"));
}
