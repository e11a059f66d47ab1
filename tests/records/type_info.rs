//! Per-field type information

use crate::common::*;
use recordwire::{ConstraintType, OriginalType, RuntimeType, StandardType, REQUIRED_NOTE};

fn record() -> RecordInstance {
    RecordInstance::new(user_content(), user_shape(&unique_module("typeinfo"))).unwrap()
}

#[test]
fn required_fields_carry_constraint() {
    let record = record();
    let root = record.root_accessor();

    for field in ["id", "tags"] {
        let info = record.field_type_info(field, &record.content()[field], &root);
        let required = info.get_constraint(ConstraintType::Required).unwrap();
        assert_eq!(required.value, Value::Bool(true));
        assert_eq!(required.description.as_deref(), Some(REQUIRED_NOTE));
    }

    let name = record.field_type_info("name", &Value::from("Ada"), &root);
    assert!(!name.is_required());
}

#[test]
fn total_false_fields_are_optional() {
    let partial = RecordShape::builder(unique_module("typeinfo"), "Partial")
        .total(false)
        .field("a", TypeAnnotation::Int)
        .field("b", TypeAnnotation::Str)
        .build();
    let record = RecordInstance::new(Content::new(), partial).unwrap();
    let root = record.root_accessor();
    assert!(!record.field_type_info("a", &Value::Int(1), &root).is_required());
}

#[test]
fn paths_hang_off_the_record_name() {
    let record = record();
    let root = record.root_accessor();
    assert_eq!(root.full_path_from_root(), "User");

    let info = record.field_type_info("id", &Value::Int(1), &root);
    assert_eq!(info.field_path, "User.id");

    let nested = root.child("address");
    let city = record.field_type_info("city", &Value::from("Oslo"), &nested);
    assert_eq!(city.field_path, "User.address.city");
}

#[test]
fn container_flags_are_shallow() {
    let record = record();
    let root = record.root_accessor();

    let nested = Value::Array(vec![Value::Object(Content::new())]);
    let info = record.field_type_info("tags", &nested, &root);
    assert!(info.is_array);
    assert!(!info.is_object);
    assert_eq!(info.standard_type, StandardType::Array);

    let info = record.field_type_info("meta", &Value::Object(Content::new()), &root);
    assert!(info.is_object);
    assert_eq!(info.original_type, OriginalType::Runtime(RuntimeType::Object));

    for scalar in [Value::from("text"), Value::Bytes(b"raw".to_vec()), Value::Null] {
        let info = record.field_type_info("s", &scalar, &root);
        assert!(!info.is_array && !info.is_object);
    }
}

#[test]
fn optional_annotation_maps_to_inner_type() {
    let shape = RecordShape::builder(unique_module("typeinfo"), "Profile")
        .optional("nick", TypeAnnotation::optional(TypeAnnotation::Str))
        .build();
    let record = RecordInstance::new(Content::new(), shape).unwrap();
    let info = record.field_type_info("nick", &Value::Null, &record.root_accessor());
    assert_eq!(info.standard_type, StandardType::String);
    assert_eq!(info.runtime_type, RuntimeType::Null);
    assert!(info.is_declared());
}

#[test]
fn unresolved_reference_degrades_to_runtime_types() {
    let module = unique_module("typeinfo");
    let shape = RecordShape::builder(module.as_str(), "Order")
        .required("id", TypeAnnotation::Int)
        .required("customer", TypeAnnotation::forward_ref(format!("{}::Customer", module)))
        .build();
    let record = RecordInstance::new(content_of(&[("id", Value::Int(9))]), shape).unwrap();

    let info = record.field_type_info("id", &Value::Int(9), &record.root_accessor());
    assert!(!info.is_declared());
    assert_eq!(info.standard_type, StandardType::Integer);
    assert!(info.is_required());
}

#[test]
fn forward_reference_resolves_once_registered() {
    let module = unique_module("typeinfo");
    let shape = RecordShape::builder(module.as_str(), "Order")
        .required("customer", TypeAnnotation::forward_ref(format!("{}::Customer", module)))
        .build();
    let record = RecordInstance::new(Content::new(), shape).unwrap();
    let customer = Value::Object(content_of(&[("name", Value::from("Ada"))]));

    let before = record.field_type_info("customer", &customer, &record.root_accessor());
    assert!(!before.is_declared());

    recordwire::register_type(
        RecordShape::builder(module.as_str(), "Customer")
            .required("name", TypeAnnotation::Str)
            .build(),
    );

    let after = record.field_type_info("customer", &customer, &record.root_accessor());
    assert!(after.is_declared());
    assert_eq!(after.standard_type, StandardType::Object);
}

#[test]
fn all_fields_in_name_order() {
    let infos = record().field_type_infos();
    let names: Vec<&str> = infos.iter().map(|i| i.field_name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "tags"]);
    assert!(infos.iter().all(|i| i.field_path.starts_with("User.")));
}
