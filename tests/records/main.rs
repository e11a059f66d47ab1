//! Record Integration Tests
//!
//! Envelope round trips, schema embedding, type resolution on import,
//! per-field type info and configuration.

#[path = "../common/mod.rs"]
mod common;

mod config;
mod construction;
mod envelope_round_trip;
mod import_resolution;
mod type_info;
mod wire_format;
