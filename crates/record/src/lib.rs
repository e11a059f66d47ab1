//! Structural record instances
//!
//! - [`RecordInstance`]: one structural definition bound to one content map
//! - [`MessageInstance`] / [`ImportFromEnvelope`]: envelope round trip
//! - [`RecordConfig`]: `recordwire.toml`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod instance;
pub mod message;

pub use codec::{ExportOptions, ImportOptions};
pub use config::{RecordConfig, CONFIG_FILE_NAME};
pub use instance::{RecordInstance, RecordOptions, REQUIRED_NOTE};
pub use message::{ImportFromEnvelope, MessageInstance, MessageType};
