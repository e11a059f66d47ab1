//! Type Registry
//!
//! Maps `(module_path, type_name)` to the registered type definition.
//! Envelope import uses it to rediscover a record's definition from the
//! names stashed in envelope metadata, so the caller does not have to pass
//! the definition back in.
//!
//! ## Registration
//!
//! Modules that define record shapes register them at startup:
//!
//! ```
//! use recordwire_core::{register_type, resolve_type, RecordShape, TypeAnnotation, TypeDefinition};
//!
//! let user = RecordShape::builder(module_path!(), "User")
//!     .required("id", TypeAnnotation::Int)
//!     .build();
//! register_type(user);
//!
//! let found = resolve_type(module_path!(), "User").unwrap();
//! assert_eq!(found.type_name(), "User");
//! ```
//!
//! Registering the same `(module_path, type_name)` twice keeps the first
//! definition and hands it back, so every caller shares one `Arc`.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::RegistryError;
use crate::structural::{same_shape, TypeDefinition};

type ModuleTypes = HashMap<String, Arc<dyn TypeDefinition>>;

/// Registry of type definitions keyed by module path, then type name
#[derive(Default)]
pub struct TypeRegistry {
    modules: RwLock<HashMap<String, ModuleTypes>>,
}

/// Process-wide registry
///
/// Uses parking_lot::RwLock so a panicking registrant cannot poison it.
static GLOBAL_REGISTRY: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::new);

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by envelope import and forward
    /// reference resolution
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register a definition, returning the one now stored under its name.
    pub fn register(&self, def: Arc<dyn TypeDefinition>) -> Arc<dyn TypeDefinition> {
        let mut modules = self.modules.write();
        let types = modules.entry(def.module_path().to_string()).or_default();

        if let Some(existing) = types.get(def.type_name()) {
            let identical = match (existing.as_structural(), def.as_structural()) {
                (Some(a), Some(b)) => same_shape(a, b),
                (None, None) => true,
                _ => false,
            };
            if identical {
                debug!(type_name = %def.qualified_name(), "Type already registered");
            } else {
                warn!(
                    type_name = %def.qualified_name(),
                    "Conflicting registration ignored; keeping the first definition"
                );
            }
            return Arc::clone(existing);
        }

        info!(type_name = %def.qualified_name(), "Registered type definition");
        types.insert(def.type_name().to_string(), Arc::clone(&def));
        def
    }

    /// Look up a definition by module path and type name.
    ///
    /// # Errors
    ///
    /// `ModuleNotFound` if nothing is registered under `module_path`,
    /// `NameNotFound` if the module is known but `type_name` is not.
    pub fn resolve(
        &self,
        module_path: &str,
        type_name: &str,
    ) -> Result<Arc<dyn TypeDefinition>, RegistryError> {
        let modules = self.modules.read();
        let types = modules
            .get(module_path)
            .ok_or_else(|| RegistryError::ModuleNotFound(module_path.to_string()))?;
        types
            .get(type_name)
            .cloned()
            .ok_or_else(|| RegistryError::NameNotFound {
                module: module_path.to_string(),
                name: type_name.to_string(),
            })
    }

    /// Whether `(module_path, type_name)` is registered
    pub fn contains(&self, module_path: &str, type_name: &str) -> bool {
        self.modules
            .read()
            .get(module_path)
            .map_or(false, |types| types.contains_key(type_name))
    }

    /// Type names registered under `module_path`, sorted
    pub fn type_names(&self, module_path: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .modules
            .read()
            .get(module_path)
            .map(|types| types.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Total number of registered definitions
    pub fn len(&self) -> usize {
        self.modules.read().values().map(HashMap::len).sum()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.len())
            .finish()
    }
}

/// Register a definition in the global registry
pub fn register_type(def: Arc<dyn TypeDefinition>) -> Arc<dyn TypeDefinition> {
    TypeRegistry::global().register(def)
}

/// Look up a definition in the global registry
pub fn resolve_type(
    module_path: &str,
    type_name: &str,
) -> Result<Arc<dyn TypeDefinition>, RegistryError> {
    TypeRegistry::global().resolve(module_path, type_name)
}
