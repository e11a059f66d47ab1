//! Message instance traits
//!
//! A message instance wraps some typed payload and knows how to move it in
//! and out of a [`MessageEnvelope`]. [`RecordInstance`](crate::RecordInstance)
//! is the structural-record implementation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

use recordwire_core::{Content, EnvelopeMetadata, MessageEnvelope, Result};

use crate::codec::{ExportOptions, ImportOptions};

/// Kind of payload a message instance carries
///
/// The string form is the envelope `format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum MessageType {
    /// Structural record (string-keyed fields with declared types)
    TypedDict,
}

impl MessageType {
    /// Envelope spelling
    pub const fn as_str(&self) -> &'static str {
        match self {
            MessageType::TypedDict => "typed_dict",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common behaviour of message instances
pub trait MessageInstance {
    /// Payload kind
    fn message_type(&self) -> MessageType;

    /// Copy of the current content
    fn content(&self) -> Content;

    /// Caller metadata attached at construction
    fn metadata(&self) -> &Map<String, JsonValue>;

    /// Produce an envelope carrying the content and enough metadata to
    /// rebuild the instance.
    fn export_to_envelope(&self, options: &ExportOptions) -> Result<MessageEnvelope>;

    /// Metadata every envelope from this instance starts with
    fn base_metadata(&self) -> EnvelopeMetadata {
        let path = std::any::type_name::<Self>();
        let (module, name) = path.rsplit_once("::").unwrap_or(("", path));
        EnvelopeMetadata {
            current_format: self.message_type().as_str().to_string(),
            source_cls_name: name.to_string(),
            source_cls_module: module.to_string(),
            ..EnvelopeMetadata::default()
        }
    }
}

/// Rebuild an instance from an envelope
pub trait ImportFromEnvelope: Sized {
    /// Reconstruct from `envelope`.
    ///
    /// # Errors
    ///
    /// Fails if the payload type cannot be determined or the content does
    /// not fit it.
    fn import_from_envelope(envelope: &MessageEnvelope, options: ImportOptions<'_>) -> Result<Self>;
}
