//! JSON Schema derivation for record shapes
//!
//! Two adapters turn a [`StructuralType`](recordwire_core::StructuralType)
//! into a JSON Schema document:
//! - [`Draft202012Adapter`] (feature `draft-2020-12`): strict, preferred
//! - [`Draft07Adapter`] (feature `draft-07`): lenient, used as fallback
//!
//! [`SchemaDeriver`] picks between them and classifies failures.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod deriver;
mod render;

#[cfg(feature = "draft-2020-12")]
pub mod draft2020;
#[cfg(feature = "draft-07")]
pub mod draft07;

pub use adapter::{CompiledModel, Dialect, ModelAdapter, ModelField, SchemaModel};
pub use deriver::{DialectPreference, SchemaDeriver};

#[cfg(feature = "draft-2020-12")]
pub use draft2020::Draft202012Adapter;
#[cfg(feature = "draft-07")]
pub use draft07::Draft07Adapter;
