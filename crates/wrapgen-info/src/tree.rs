//! Info tree nodes: package, modules, and the entities they wrap.

use crate::scope::Scope;
use std::path::{Path, PathBuf};
use wrapgen_config::{
    ClassConfig, EntityConfig, FeatureConfig, ModuleConfig, PackageConfig, TemplateArg,
};
use wrapgen_decl::{ClassId, FunctionId, VariableId};

/// Root of the info tree.
#[derive(Debug, Clone)]
pub struct PackageInfo {
    pub name: String,
    /// Absolute root of the native source tree.
    pub source_root: PathBuf,
    pub source_hpp_patterns: Vec<String>,
    /// Headers found under the source root, sorted by file name.
    pub source_hpp_files: Vec<PathBuf>,
    pub modules: Vec<ModuleInfo>,
    pub feature: FeatureConfig,
}

/// A host-language module.
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    pub name: String,
    /// Absolute directories whose declarations belong to the module.
    pub source_locations: Vec<PathBuf>,
    pub use_all_classes: bool,
    pub use_all_free_functions: bool,
    pub use_all_variables: bool,
    pub classes: Vec<ClassInfo>,
    pub free_functions: Vec<FreeFunctionInfo>,
    pub variables: Vec<VariableInfo>,
    pub feature: FeatureConfig,
}

/// A class and all of its instantiations.
///
/// Once names and declarations are attached,
/// `native_names`, `host_names` and `decls` all hold
/// [`ClassInfo::instantiation_count`] entries.
#[derive(Debug, Clone, Default)]
pub struct ClassInfo {
    pub name: String,
    pub name_override: Option<String>,
    /// Header file name, e.g. `Foo.hpp`.
    pub source_file: Option<String>,
    pub source_file_path: Option<PathBuf>,
    /// Signature the class was matched against, e.g. `<int A, int B = A>`.
    pub template_signature: Option<String>,
    /// Parameter names from the signature, e.g. `["A", "B"]`.
    pub template_params: Vec<String>,
    /// One argument tuple per instantiation; empty for non-generic classes.
    pub template_arg_lists: Vec<Vec<TemplateArg>>,
    /// Native spellings, e.g. `Foo<2, 2>`.
    pub native_names: Vec<String>,
    /// Host identifiers, e.g. `Foo_2_2`.
    pub host_names: Vec<String>,
    pub decls: Vec<ClassId>,
    /// Direct bases of each instantiation.
    pub base_decls: Vec<Vec<ClassId>>,
    pub feature: FeatureConfig,
}

/// A namespace-scope function.
#[derive(Debug, Clone, Default)]
pub struct FreeFunctionInfo {
    pub name: String,
    pub name_override: Option<String>,
    pub source_file: Option<String>,
    pub source_file_path: Option<PathBuf>,
    pub decl: Option<FunctionId>,
    pub feature: FeatureConfig,
}

/// A namespace-scope variable.
#[derive(Debug, Clone, Default)]
pub struct VariableInfo {
    pub name: String,
    pub name_override: Option<String>,
    pub source_file: Option<String>,
    pub source_file_path: Option<PathBuf>,
    pub decl: Option<VariableId>,
    pub feature: FeatureConfig,
}

impl PackageInfo {
    /// Build the tree skeleton from configuration.
    pub fn from_config(config: &PackageConfig, source_root: &Path) -> Self {
        Self {
            name: config.name.clone(),
            source_root: source_root.to_path_buf(),
            source_hpp_patterns: config.source_hpp_patterns.clone(),
            source_hpp_files: Vec::new(),
            modules: config
                .modules
                .iter()
                .map(|module| ModuleInfo::from_config(module, source_root))
                .collect(),
            feature: config.feature.clone(),
        }
    }

    pub fn scope(&self) -> Scope<'_> {
        Scope::root(&self.feature)
    }

    pub fn find_module(&self, name: &str) -> Option<&ModuleInfo> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Whether any module asks for every discovered class or function.
    pub fn uses_all_sources(&self) -> bool {
        self.modules
            .iter()
            .any(|m| m.use_all_classes || m.use_all_free_functions)
    }
}

impl ModuleInfo {
    fn from_config(config: &ModuleConfig, source_root: &Path) -> Self {
        Self {
            name: config.name.clone(),
            source_locations: config
                .source_locations
                .iter()
                .map(|location| {
                    if location.is_absolute() {
                        location.clone()
                    } else {
                        source_root.join(location)
                    }
                })
                .collect(),
            use_all_classes: config.classes.is_all(),
            use_all_free_functions: config.free_functions.is_all(),
            use_all_variables: config.variables.is_all(),
            classes: config.classes.listed().iter().map(ClassInfo::from_config).collect(),
            free_functions: config
                .free_functions
                .listed()
                .iter()
                .map(FreeFunctionInfo::from_config)
                .collect(),
            variables: config
                .variables
                .listed()
                .iter()
                .map(VariableInfo::from_config)
                .collect(),
            feature: config.feature.clone(),
        }
    }

    pub fn scope<'a>(&'a self, package: &'a PackageInfo) -> Scope<'a> {
        package.scope().child(&self.feature)
    }

    /// Whether a declaration located in `file` belongs to this module.
    pub fn contains_path(&self, file: &Path) -> bool {
        self.source_locations.is_empty()
            || self
                .source_locations
                .iter()
                .any(|location| file.starts_with(location))
    }

    pub fn find_class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.iter().find(|c| c.name == name)
    }
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn from_config(config: &ClassConfig) -> Self {
        Self {
            name: config.name.clone(),
            name_override: config.name_override.clone(),
            source_file: config.source_file.clone(),
            source_file_path: config.source_file_path.clone(),
            template_arg_lists: config.template_arg_lists.clone(),
            feature: config.feature.clone(),
            ..Self::default()
        }
    }

    pub fn scope<'a>(&'a self, module: &Scope<'a>) -> Scope<'a> {
        module.child(&self.feature)
    }

    pub fn is_generic(&self) -> bool {
        !self.template_arg_lists.is_empty()
    }

    /// Number of distinct native types this class wraps.
    pub fn instantiation_count(&self) -> usize {
        self.template_arg_lists.len().max(1)
    }

    /// Template arguments of one instantiation; empty for non-generic classes.
    pub fn template_args(&self, idx: usize) -> &[TemplateArg] {
        self.template_arg_lists
            .get(idx)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Associate the class with one of the discovered headers.
    ///
    /// An explicit path wins; otherwise a header whose file name equals
    /// `source_file`, or whose stem equals the class name, is used.
    pub fn map_to_header(&mut self, headers: &[PathBuf]) {
        if let Some(path) = &self.source_file_path {
            if self.source_file.is_none() {
                self.source_file = file_name(path);
            }
            return;
        }

        for header in headers {
            let header_name = file_name(header);
            if header_name.is_some() && self.source_file == header_name {
                self.source_file_path = Some(header.clone());
            } else if header.file_stem().and_then(|s| s.to_str()) == Some(self.name.as_str()) {
                self.source_file = header_name;
                self.source_file_path = Some(header.clone());
            }
        }
    }
}

impl FreeFunctionInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn from_config(config: &EntityConfig) -> Self {
        Self {
            name: config.name.clone(),
            name_override: config.name_override.clone(),
            source_file: config.source_file.clone(),
            source_file_path: config.source_file_path.clone(),
            decl: None,
            feature: config.feature.clone(),
        }
    }

    pub fn scope<'a>(&'a self, module: &Scope<'a>) -> Scope<'a> {
        module.child(&self.feature)
    }

    /// Name exposed to the host language.
    pub fn host_name(&self) -> &str {
        self.name_override.as_deref().unwrap_or(&self.name)
    }
}

impl VariableInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn from_config(config: &EntityConfig) -> Self {
        Self {
            name: config.name.clone(),
            name_override: config.name_override.clone(),
            source_file: config.source_file.clone(),
            source_file_path: config.source_file_path.clone(),
            decl: None,
            feature: config.feature.clone(),
        }
    }

    pub fn scope<'a>(&'a self, module: &Scope<'a>) -> Scope<'a> {
        module.child(&self.feature)
    }

    /// Name exposed to the host language.
    pub fn host_name(&self) -> &str {
        self.name_override.as_deref().unwrap_or(&self.name)
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}
