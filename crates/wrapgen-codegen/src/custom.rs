//! User-supplied code generation hooks.

use indexmap::IndexMap;
use wrapgen_common::{Result, WrapError};

/// Extra code contributed to generated wrappers.
///
/// Every hook defaults to contributing nothing. Returned text is inserted
/// verbatim, so it must carry its own line endings.
pub trait CustomGenerator {
    /// Inserted after the includes of a class source unit.
    fn class_pre_code(&self, _host_name: &str) -> String {
        String::new()
    }

    /// Inserted inside the class registration, after methods.
    fn class_def_code(&self, _host_name: &str) -> String {
        String::new()
    }

    /// Inserted after the includes of a module source unit.
    fn module_pre_code(&self) -> String {
        String::new()
    }

    /// Inserted at the end of the module entry point.
    fn module_post_code(&self) -> String {
        String::new()
    }
}

/// Generators addressable from configuration by identifier.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: IndexMap<String, Box<dyn CustomGenerator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `generator` under `id`, replacing any earlier one.
    pub fn register(&mut self, id: impl Into<String>, generator: Box<dyn CustomGenerator>) {
        let id = id.into();
        if self.generators.insert(id.clone(), generator).is_some() {
            tracing::warn!("Custom generator {} registered twice; keeping the latest", id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&dyn CustomGenerator> {
        self.generators.get(id).map(|g| &**g)
    }

    /// Look up the generator a node asks for. Naming an unregistered
    /// generator is a configuration error.
    pub fn resolve(&self, id: Option<&str>) -> Result<Option<&dyn CustomGenerator>> {
        match id {
            None => Ok(None),
            Some(id) => self.get(id).map(Some).ok_or_else(|| {
                WrapError::Config(format!("unknown custom generator `{}`", id))
            }),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
