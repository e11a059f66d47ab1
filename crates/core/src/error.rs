//! Error types for recordwire
//!
//! This module defines all error types used throughout the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Recoverability
//!
//! | Variant | Raised by | Posture |
//! |---------|-----------|---------|
//! | `NotAStructuralType` | record construction | fatal, caller input is malformed |
//! | `DependencyMissing` | schema derivation | optional during export |
//! | `ModelConstructionFailed` | schema derivation | optional during export |
//! | `ExtractionFailed` | schema derivation | optional during export |
//! | `TypeResolutionFailed` | envelope import | fatal for that import |
//!
//! Nothing here is retried: every failure is deterministic for its inputs.

use std::io;
use thiserror::Error;

/// Boxed cause carried by wrapping variants
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for recordwire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Lookup failures from a type registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No type was ever registered under this module path
    #[error("module '{0}' has no registered types")]
    ModuleNotFound(String),

    /// The module is known but holds no type with this name
    #[error("module '{module}' has no type named '{name}'")]
    NameNotFound {
        /// Module path that was searched
        module: String,
        /// Type name that was not found
        name: String,
    },
}

/// Error types for recordwire
#[derive(Debug, Error)]
pub enum Error {
    /// The type definition does not describe a structural record shape
    #[error("Expected a structural record type, got '{type_name}': {reason}")]
    NotAStructuralType {
        /// Qualified name of the offending definition
        type_name: String,
        /// What is missing or inconsistent
        reason: String,
    },

    /// No schema-model adapter is available
    #[error("Dependency missing: {message}")]
    DependencyMissing {
        /// Installation hint
        message: String,
        /// Failure of the adapter that was available, if any
        #[source]
        source: Option<BoxError>,
    },

    /// A schema-model adapter could not build a model for the definition
    #[error("Failed to build schema model with the {adapter} adapter: {source}")]
    ModelConstructionFailed {
        /// Adapter that failed last
        adapter: &'static str,
        /// Underlying failure
        #[source]
        source: BoxError,
    },

    /// A model was built but no schema document could be pulled from it
    #[error("Failed to generate JSON schema: {message}")]
    ExtractionFailed {
        /// Description of the failure
        message: String,
        /// Underlying failure, if any
        #[source]
        source: Option<BoxError>,
    },

    /// Envelope import could not determine the record type
    #[error("{message}")]
    TypeResolutionFailed {
        /// Description including the remediation hint
        message: String,
        /// Registry lookup failure, if a lookup was attempted
        #[source]
        source: Option<RegistryError>,
    },

    /// A forward reference in a field annotation did not resolve
    #[error("field '{field}' references unknown type '{reference}'")]
    AnnotationResolution {
        /// Field whose annotation failed
        field: String,
        /// The unresolved `module::Name` reference
        reference: String,
    },

    /// An adapter cannot express this annotation
    #[error("field '{field}' cannot be expressed: {reason}")]
    UnsupportedAnnotation {
        /// Offending field
        field: String,
        /// Why the adapter rejected it
        reason: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error (config file reads and writes)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build an `ExtractionFailed` wrapping `source`
    pub fn extraction<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::ExtractionFailed {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Failures that mean "no schema for this record", not "bad record"
    ///
    /// Export skips the schema document on these and carries on.
    pub fn is_schema_unavailable(&self) -> bool {
        matches!(
            self,
            Error::DependencyMissing { .. }
                | Error::ModelConstructionFailed { .. }
                | Error::ExtractionFailed { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
