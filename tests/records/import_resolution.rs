//! How import finds the record definition

use crate::common::*;
use recordwire::{
    create_envelope, EnvelopeMetadata, RegistryError, PROP_TYPE_DEF_MODULE, PROP_TYPE_DEF_NAME,
};
use std::error::Error as _;
use std::sync::Arc;

fn exported(def: Arc<dyn TypeDefinition>) -> MessageEnvelope {
    RecordInstance::new(user_content(), def)
        .unwrap()
        .export_to_envelope(&ExportOptions::default())
        .unwrap()
}

#[test]
fn explicit_definition_beats_metadata() {
    let registry = TypeRegistry::new();
    let stashed = registry.register(user_shape(&unique_module("resolve")));
    let explicit = user_shape(&unique_module("resolve"));

    let options = ImportOptions {
        registry: Some(&registry),
        ..ImportOptions::with_type_def(explicit.clone())
    };
    let restored = RecordInstance::import_from_envelope(&exported(stashed), options).unwrap();

    assert!(Arc::ptr_eq(restored.type_def(), &explicit));
}

#[test]
fn explicit_definition_needs_no_metadata() {
    let def = user_shape(&unique_module("resolve"));
    let envelope = create_envelope("typed_dict", user_content(), EnvelopeMetadata::default());
    let restored =
        RecordInstance::import_from_envelope(&envelope, ImportOptions::with_type_def(def)).unwrap();
    assert_eq!(restored.content(), user_content());
}

#[test]
fn missing_type_info_fails() {
    let envelope = create_envelope("typed_dict", user_content(), EnvelopeMetadata::default());
    let err = RecordInstance::import_from_envelope(&envelope, ImportOptions::default()).unwrap_err();
    assert!(matches!(err, Error::TypeResolutionFailed { source: None, .. }));
}

#[test]
fn half_of_the_names_is_not_enough() {
    let mut envelope = exported(user_shape(&unique_module("resolve")));
    envelope.metadata.properties.remove(PROP_TYPE_DEF_MODULE);
    let err = RecordInstance::import_from_envelope(&envelope, ImportOptions::default()).unwrap_err();
    assert!(matches!(err, Error::TypeResolutionFailed { source: None, .. }));
}

#[test]
fn non_string_names_count_as_missing() {
    let mut envelope = exported(user_shape(&unique_module("resolve")));
    envelope
        .metadata
        .properties
        .insert(PROP_TYPE_DEF_NAME.to_string(), serde_json::json!(7));
    let err = RecordInstance::import_from_envelope(&envelope, ImportOptions::default()).unwrap_err();
    assert!(matches!(err, Error::TypeResolutionFailed { source: None, .. }));
}

#[test]
fn unknown_module_fails_with_hint() {
    let module = unique_module("resolve");
    let envelope = exported(user_shape(&module));
    let err = RecordInstance::import_from_envelope(&envelope, ImportOptions::default()).unwrap_err();

    let message = err.to_string();
    assert!(message.contains(&format!("{}::User", module)));
    assert!(message.contains("type_def"));
    assert_eq!(
        err.source().and_then(|s| s.downcast_ref::<RegistryError>()),
        Some(&RegistryError::ModuleNotFound(module))
    );
}

#[test]
fn unknown_name_in_known_module_fails() {
    let registry = TypeRegistry::new();
    let module = unique_module("resolve");
    registry.register(
        RecordShape::builder(module.as_str(), "Account")
            .required("id", TypeAnnotation::Int)
            .build(),
    );
    let envelope = exported(user_shape(&module));

    let err = RecordInstance::import_from_envelope(&envelope, ImportOptions::with_registry(&registry))
        .unwrap_err();
    match err.source().and_then(|s| s.downcast_ref::<RegistryError>()) {
        Some(RegistryError::NameNotFound { name, .. }) => assert_eq!(name, "User"),
        other => panic!("unexpected source: {:?}", other),
    }
}

#[test]
fn stale_registry_entry_for_non_record_fails_construction() {
    let registry = TypeRegistry::new();
    let module = unique_module("resolve");
    registry.register(recordwire::MappingType::new(module.as_str(), "User", TypeAnnotation::Str));
    let envelope = exported(user_shape(&module));

    let err = RecordInstance::import_from_envelope(&envelope, ImportOptions::with_registry(&registry))
        .unwrap_err();
    assert!(matches!(err, Error::NotAStructuralType { .. }));
}
