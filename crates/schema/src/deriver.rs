//! Schema derivation with adapter fallback
//!
//! ## Adapter Selection
//!
//! A deriver holds at most one modern (draft 2020-12) and one legacy
//! (draft-07) adapter. Which ones exist is fixed when the deriver is built:
//! [`SchemaDeriver::detected`] uses whatever the crate features compiled in,
//! [`SchemaDeriver::for_preference`] narrows that to one dialect, and
//! [`SchemaDeriver::new`] takes adapters explicitly.
//!
//! ## Fallback
//!
//! | modern | legacy | result |
//! |--------|--------|--------|
//! | builds | any | modern model |
//! | fails | builds | legacy model, after a warning |
//! | fails | fails | `ModelConstructionFailed` (legacy cause) |
//! | fails | absent | `DependencyMissing` (modern cause) |
//! | absent | builds | legacy model |
//! | absent | absent | `DependencyMissing` |

use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use recordwire_core::{Error, Result, StructuralType};

use crate::adapter::{ModelAdapter, SchemaModel};

/// Which dialects a deriver may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialectPreference {
    /// Modern first, legacy as fallback
    #[default]
    Auto,
    /// Modern only
    Draft202012,
    /// Legacy only
    Draft07,
}

impl DialectPreference {
    /// Config spelling
    pub const fn as_str(&self) -> &'static str {
        match self {
            DialectPreference::Auto => "auto",
            DialectPreference::Draft202012 => "draft-2020-12",
            DialectPreference::Draft07 => "draft-07",
        }
    }
}

impl fmt::Display for DialectPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectPreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(DialectPreference::Auto),
            "draft-2020-12" => Ok(DialectPreference::Draft202012),
            "draft-07" => Ok(DialectPreference::Draft07),
            other => Err(Error::InvalidConfig(format!(
                "unknown schema dialect '{}', expected \"auto\", \"draft-2020-12\" or \"draft-07\"",
                other
            ))),
        }
    }
}

static DETECTED: Lazy<Arc<SchemaDeriver>> = Lazy::new(|| {
    let deriver = SchemaDeriver::for_preference(DialectPreference::Auto);
    info!(
        modern = deriver.modern().map(|a| a.name()).unwrap_or("none"),
        legacy = deriver.legacy().map(|a| a.name()).unwrap_or("none"),
        "Schema adapters selected"
    );
    Arc::new(deriver)
});

#[cfg(feature = "draft-2020-12")]
fn compiled_modern() -> Option<Arc<dyn ModelAdapter>> {
    Some(Arc::new(crate::draft2020::Draft202012Adapter))
}

#[cfg(not(feature = "draft-2020-12"))]
fn compiled_modern() -> Option<Arc<dyn ModelAdapter>> {
    None
}

#[cfg(feature = "draft-07")]
fn compiled_legacy() -> Option<Arc<dyn ModelAdapter>> {
    Some(Arc::new(crate::draft07::Draft07Adapter))
}

#[cfg(not(feature = "draft-07"))]
fn compiled_legacy() -> Option<Arc<dyn ModelAdapter>> {
    None
}

/// Derives schema models and documents from structural definitions
#[derive(Debug, Clone, Default)]
pub struct SchemaDeriver {
    modern: Option<Arc<dyn ModelAdapter>>,
    legacy: Option<Arc<dyn ModelAdapter>>,
}

impl SchemaDeriver {
    /// Deriver with exactly these adapters
    pub fn new(
        modern: Option<Arc<dyn ModelAdapter>>,
        legacy: Option<Arc<dyn ModelAdapter>>,
    ) -> Self {
        Self { modern, legacy }
    }

    /// Deriver with no adapters; every derivation reports `DependencyMissing`
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Process-wide deriver built once from the compiled features
    pub fn detected() -> Arc<SchemaDeriver> {
        Arc::clone(&DETECTED)
    }

    /// Deriver limited to `preference`, among the compiled adapters
    pub fn for_preference(preference: DialectPreference) -> Self {
        match preference {
            DialectPreference::Auto => Self::new(compiled_modern(), compiled_legacy()),
            DialectPreference::Draft202012 => Self::new(compiled_modern(), None),
            DialectPreference::Draft07 => Self::new(None, compiled_legacy()),
        }
    }

    /// The modern adapter, if any
    pub fn modern(&self) -> Option<&dyn ModelAdapter> {
        self.modern.as_deref()
    }

    /// The legacy adapter, if any
    pub fn legacy(&self) -> Option<&dyn ModelAdapter> {
        self.legacy.as_deref()
    }

    /// Whether any adapter is present
    pub fn is_available(&self) -> bool {
        self.modern.is_some() || self.legacy.is_some()
    }

    /// Build a model for `def`, falling back from modern to legacy.
    ///
    /// # Errors
    ///
    /// `DependencyMissing` when no adapter can take the definition (none
    /// compiled in, or the modern one failed with no legacy behind it), and
    /// `ModelConstructionFailed` when the legacy adapter fails.
    pub fn derive_model(&self, def: &dyn StructuralType) -> Result<Arc<dyn SchemaModel>> {
        let mut modern_failure = None;

        if let Some(modern) = &self.modern {
            match modern.build_model(def) {
                Ok(model) => return Ok(model),
                Err(e) => {
                    warn!(
                        type_name = %def.qualified_name(),
                        adapter = modern.name(),
                        error = %e,
                        "Model construction failed, falling back to legacy adapter"
                    );
                    modern_failure = Some((modern.name(), e));
                }
            }
        }

        match (&self.legacy, modern_failure) {
            (Some(legacy), _) => {
                legacy
                    .build_model(def)
                    .map_err(|e| Error::ModelConstructionFailed {
                        adapter: legacy.name(),
                        source: Box::new(e),
                    })
            }
            (None, Some((adapter, e))) => Err(Error::DependencyMissing {
                message: format!(
                    "the {} adapter rejected '{}' and no legacy adapter is available; \
                     enable the \"draft-07\" feature",
                    adapter,
                    def.qualified_name()
                ),
                source: Some(Box::new(e)),
            }),
            (None, None) => Err(Error::DependencyMissing {
                message: "no schema adapter is compiled in; enable the \"draft-2020-12\" or \"draft-07\" feature".to_string(),
                source: None,
            }),
        }
    }

    /// Build a model for `def` and extract its JSON Schema document.
    ///
    /// # Errors
    ///
    /// As [`derive_model`](Self::derive_model), plus `ExtractionFailed` when
    /// the model cannot produce a document.
    pub fn derive_schema(&self, def: &dyn StructuralType) -> Result<JsonValue> {
        let model = self.derive_model(def)?;
        Self::extract_schema(&*model, &def.qualified_name())
    }

    /// Pull the document out of an already built model.
    ///
    /// Any failure comes back as `ExtractionFailed`, cause preserved.
    pub fn extract_schema(model: &dyn SchemaModel, type_name: &str) -> Result<JsonValue> {
        model.json_schema().map_err(|e| match e {
            Error::ExtractionFailed { .. } => e,
            other => Error::extraction(
                format!("{} model for '{}'", model.dialect(), type_name),
                other,
            ),
        })
    }
}
