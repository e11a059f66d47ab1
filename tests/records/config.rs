//! `recordwire.toml` driving export behaviour

use crate::common::*;
use recordwire::{RecordConfig, CONFIG_FILE_NAME};
use std::sync::Arc;
use tempfile::TempDir;

fn configured_record(config: &RecordConfig) -> RecordInstance {
    RecordInstance::with_options(
        user_content(),
        user_shape(&unique_module("config")),
        RecordOptions {
            deriver: Some(Arc::new(config.schema_deriver().unwrap())),
            ..RecordOptions::default()
        },
    )
    .unwrap()
}

#[test]
#[cfg(feature = "draft-2020-12")]
fn default_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    RecordConfig::write_default_if_missing(&path).unwrap();

    let config = RecordConfig::from_file(&path).unwrap();
    let record = configured_record(&config);
    let envelope = record.export_to_envelope(&config.export_options()).unwrap();
    assert_eq!(
        envelope.metadata.schema_document().unwrap()["$schema"],
        Dialect::Draft202012.schema_uri()
    );
}

#[test]
#[cfg(feature = "draft-07")]
fn legacy_dialect_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "schema_dialect = \"draft-07\"\n").unwrap();

    let config = RecordConfig::from_file(&path).unwrap();
    let record = configured_record(&config);
    let envelope = record.export_to_envelope(&config.export_options()).unwrap();
    assert_eq!(
        envelope.metadata.schema_document().unwrap()["$schema"],
        Dialect::Draft07.schema_uri()
    );
}

#[test]
fn embed_schema_off() {
    let config = RecordConfig::from_toml_str("embed_schema = false").unwrap();
    let record = configured_record(&config);
    let envelope = record.export_to_envelope(&config.export_options()).unwrap();
    assert!(envelope.metadata.schema_document().is_none());
    assert!(envelope.metadata.type_def_names().is_some());
}

#[test]
fn bad_dialect_in_file_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "schema_dialect = \"draft-03\"\n").unwrap();

    match RecordConfig::from_file(&path).unwrap_err() {
        Error::InvalidConfig(msg) => {
            assert!(msg.contains("draft-03"));
            assert!(msg.contains(CONFIG_FILE_NAME));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
