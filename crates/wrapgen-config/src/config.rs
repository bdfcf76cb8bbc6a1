//! Package info document types (package_info.toml format).

use crate::feature::{FeatureConfig, TemplateArg};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wrapgen_common::{Result, WrapError, ALL_SENTINEL, DEFAULT_PACKAGE_NAME};

/// Root package configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Package name, used for the module entry points and include guards.
    #[serde(default = "default_package_name")]
    pub name: String,

    /// Glob patterns selecting headers under the source root.
    #[serde(default = "default_hpp_patterns")]
    pub source_hpp_patterns: Vec<String>,

    /// Modules making up the package.
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,

    /// Package-wide defaults.
    #[serde(flatten)]
    pub feature: FeatureConfig,
}

/// Module configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Module name.
    pub name: String,

    /// Directories whose declarations belong to this module.
    #[serde(default)]
    pub source_locations: Vec<PathBuf>,

    /// Classes to wrap, or `"ALL"`.
    #[serde(default)]
    pub classes: Selection<ClassConfig>,

    /// Free functions to wrap, or `"ALL"`.
    #[serde(default)]
    pub free_functions: Selection<EntityConfig>,

    /// Variables to wrap, or `"ALL"`.
    #[serde(default)]
    pub variables: Selection<EntityConfig>,

    /// Module-level overrides.
    #[serde(flatten)]
    pub feature: FeatureConfig,
}

/// Class configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassConfig {
    /// Class name as declared in the source.
    pub name: String,

    /// Name to expose instead of `name`.
    #[serde(default)]
    pub name_override: Option<String>,

    /// Header file name declaring the class.
    #[serde(default)]
    pub source_file: Option<String>,

    /// Full path of the header declaring the class.
    #[serde(default)]
    pub source_file_path: Option<PathBuf>,

    /// Explicit instantiations; skips the template source scan when set.
    #[serde(default)]
    pub template_arg_lists: Vec<Vec<TemplateArg>>,

    /// Class-level overrides.
    #[serde(flatten)]
    pub feature: FeatureConfig,
}

/// Free function or variable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Name as declared in the source.
    pub name: String,

    /// Name to expose instead of `name`.
    #[serde(default)]
    pub name_override: Option<String>,

    /// Header file name declaring the entity.
    #[serde(default)]
    pub source_file: Option<String>,

    /// Full path of the header declaring the entity.
    #[serde(default)]
    pub source_file_path: Option<PathBuf>,

    /// Entity-level overrides.
    #[serde(flatten)]
    pub feature: FeatureConfig,
}

/// Either an explicit entity list or the "discover everything" sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection<T> {
    All(AllSentinel),
    Listed(Vec<T>),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::Listed(Vec::new())
    }
}

impl<T> Selection<T> {
    /// Whether entities should be discovered from the parsed source.
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All(_))
    }

    /// The explicitly listed entities (empty for `"ALL"`).
    pub fn listed(&self) -> &[T] {
        match self {
            Selection::All(_) => &[],
            Selection::Listed(items) => items,
        }
    }
}

/// The `"ALL"` marker, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AllSentinel;

impl TryFrom<String> for AllSentinel {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case(ALL_SENTINEL) {
            Ok(AllSentinel)
        } else {
            Err(format!("expected \"{}\" or a list, found \"{}\"", ALL_SENTINEL, value))
        }
    }
}

impl From<AllSentinel> for String {
    fn from(_: AllSentinel) -> Self {
        ALL_SENTINEL.to_string()
    }
}

fn default_package_name() -> String {
    DEFAULT_PACKAGE_NAME.to_string()
}

fn default_hpp_patterns() -> Vec<String> {
    vec!["*.hpp".to_string()]
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: default_package_name(),
            source_hpp_patterns: default_hpp_patterns(),
            modules: Vec::new(),
            feature: FeatureConfig::default(),
        }
    }
}

impl PackageConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| WrapError::io(path, e))?;
        let config = Self::parse(&content)?;
        tracing::info!(
            "Loaded package info for `{}` from {}",
            config.name,
            path.display()
        );
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: PackageConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Find a module by name.
    pub fn find_module(&self, name: &str) -> Option<&ModuleConfig> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Check invariants the document format cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(WrapError::Config("package name is empty".to_string()));
        }

        let mut seen = Vec::with_capacity(self.modules.len());
        for module in &self.modules {
            if module.name.trim().is_empty() {
                return Err(WrapError::Config("module name is empty".to_string()));
            }
            if seen.contains(&module.name.as_str()) {
                return Err(WrapError::Config(format!(
                    "module `{}` is declared twice",
                    module.name
                )));
            }
            seen.push(module.name.as_str());

            for class in module.classes.listed() {
                if class.name.trim().is_empty() {
                    return Err(WrapError::Config(format!(
                        "module `{}` lists a class without a name",
                        module.name
                    )));
                }
                check_substitutions(&class.feature, &class.name)?;
            }
            for entity in module
                .free_functions
                .listed()
                .iter()
                .chain(module.variables.listed())
            {
                if entity.name.trim().is_empty() {
                    return Err(WrapError::Config(format!(
                        "module `{}` lists an entity without a name",
                        module.name
                    )));
                }
            }
            check_substitutions(&module.feature, &module.name)?;
        }

        check_substitutions(&self.feature, &self.name)
    }
}

/// Every replacement tuple must supply one argument per signature parameter.
fn check_substitutions(feature: &FeatureConfig, owner: &str) -> Result<()> {
    for sub in &feature.template_substitutions {
        let signature = sub.signature.trim();
        if !(signature.starts_with('<') && signature.ends_with('>')) {
            return Err(WrapError::Config(format!(
                "template signature `{}` on `{}` must be enclosed in angle brackets",
                sub.signature, owner
            )));
        }
        let expected = sub.param_count();
        if let Some(bad) = sub.replacement.iter().find(|args| args.len() != expected) {
            return Err(WrapError::Config(format!(
                "template signature `{}` on `{}` takes {} arguments, replacement has {}",
                sub.signature,
                owner,
                expected,
                bad.len()
            )));
        }
    }
    Ok(())
}
