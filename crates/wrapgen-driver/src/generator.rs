//! The end-to-end generation pipeline.

use crate::discover::discover_headers;
use std::path::{Path, PathBuf};
use wrapgen_codegen::{generate_wrappers, header_collection, write_all, GeneratorRegistry};
use wrapgen_common::{Result, WrapError, DEFAULT_WRAPPER_DIR};
use wrapgen_config::PackageConfig;
use wrapgen_decl::{DeclIndex, DeclarationQuery, ParserTool, ParserToolConfig};
use wrapgen_info::{
    attach_declarations, discover_entities, read_stripped_source, sort_classes, unknown_classes,
    PackageInfo,
};

/// Package info file looked up in the working directory when none is given.
pub const DEFAULT_PACKAGE_INFO_FILE: &str = "package_info.toml";

/// What a run produced.
#[derive(Debug, Clone, Default)]
pub struct GenerationSummary {
    pub header_collection: PathBuf,
    pub files: Vec<PathBuf>,
    pub classes: usize,
    pub unknown_classes: usize,
}

/// Generates pybind11 wrappers for one package.
///
/// Stages run strictly in order; each consumes the previous one's output:
/// configuration, header discovery, template resolution, header
/// collection, parsing, merge, ordering and emission.
pub struct WrapperGenerator {
    source_root: PathBuf,
    wrapper_root: PathBuf,
    package_info: Option<PathBuf>,
    parser: ParserToolConfig,
    registry: GeneratorRegistry,
}

impl WrapperGenerator {
    /// Create a generator for the native sources under `source_root`.
    pub fn new(source_root: impl AsRef<Path>) -> Result<Self> {
        let source_root = source_root.as_ref();
        if !source_root.is_dir() {
            tracing::error!("Could not find source root directory: {}", source_root.display());
            return Err(WrapError::Config(format!(
                "source root is not a directory: {}",
                source_root.display()
            )));
        }
        let source_root = source_root
            .canonicalize()
            .map_err(|e| WrapError::io(source_root, e))?;
        let wrapper_root = source_root.join(DEFAULT_WRAPPER_DIR);

        Ok(Self {
            parser: ParserToolConfig::new().include_dir(&source_root),
            source_root,
            wrapper_root,
            package_info: None,
            registry: GeneratorRegistry::new(),
        })
    }

    /// Write wrappers under `wrapper_root` instead of the default
    /// `<source_root>/wrapgen_wrappers`.
    pub fn wrapper_root(mut self, wrapper_root: impl AsRef<Path>) -> Self {
        let wrapper_root = wrapper_root.as_ref();
        self.wrapper_root = if wrapper_root.is_absolute() {
            wrapper_root.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(wrapper_root))
                .unwrap_or_else(|_| wrapper_root.to_path_buf())
        };
        self
    }

    /// Read the package configuration from `path`.
    pub fn package_info(mut self, path: impl AsRef<Path>) -> Self {
        self.package_info = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn parser(mut self, parser: ParserToolConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn registry(mut self, registry: GeneratorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Load the package configuration.
    ///
    /// Without an explicit file, `package_info.toml` in the working
    /// directory is used if present; otherwise every setting takes its
    /// default.
    pub fn load_package(&self) -> Result<PackageInfo> {
        let path = match &self.package_info {
            Some(path) => Some(path.clone()),
            None => {
                let default = PathBuf::from(DEFAULT_PACKAGE_INFO_FILE);
                if default.is_file() {
                    tracing::info!("Package info file not specified; using {}", default.display());
                    Some(default)
                } else {
                    None
                }
            }
        };

        let config = match path {
            Some(path) => PackageConfig::from_file(&path)?,
            None => {
                tracing::warn!("No package info file found; using default settings");
                PackageConfig::default()
            }
        };
        Ok(PackageInfo::from_config(&config, &self.source_root))
    }

    /// Find the package's headers and map classes onto them.
    pub fn discover(&self, package: &mut PackageInfo) -> Result<()> {
        package.source_hpp_files = discover_headers(
            &self.source_root,
            &package.source_hpp_patterns,
            &self.wrapper_root,
        )?;
        for module in &mut package.modules {
            for class in &mut module.classes {
                if !class.feature.excluded.unwrap_or(false) {
                    class.map_to_header(&package.source_hpp_files);
                }
            }
        }
        Ok(())
    }

    /// Resolve template instantiations from the class headers and derive
    /// native and host names.
    pub fn resolve_templates(&self, package: &mut PackageInfo) -> Result<()> {
        for m in 0..package.modules.len() {
            for c in 0..package.modules[m].classes.len() {
                let (rules, replacements) = {
                    let module = &package.modules[m];
                    let scope = module.classes[c].scope(&module.scope(package));
                    if scope.excluded() {
                        continue;
                    }
                    let rules: Vec<_> = scope.template_substitutions().into_iter().cloned().collect();
                    (rules, scope.name_replacements())
                };

                let class = &mut package.modules[m].classes[c];
                if let Some(path) = class.source_file_path.clone() {
                    let source = read_stripped_source(&path)?;
                    let rule_refs: Vec<_> = rules.iter().collect();
                    class.extract_templates(&source, &rule_refs);
                }
                class.update_names(&replacements);
            }
        }
        Ok(())
    }

    /// Write the header collection and return its path.
    pub fn write_header_collection(&self, package: &PackageInfo) -> Result<PathBuf> {
        let file = header_collection(package, &self.wrapper_root);
        tracing::info!("Writing header collection {}", file.path.display());
        file.write()?;
        Ok(file.path)
    }

    /// Run the external parser over the header collection.
    pub fn parse_declarations(&self, header_collection: &Path) -> Result<DeclIndex> {
        let tool = ParserTool::new(self.parser.clone())?;
        tool.version()?;
        tool.parse(header_collection, &self.wrapper_root)
    }

    /// Merge parsed declarations into the info tree and order each
    /// module's classes.
    pub fn merge(&self, package: &mut PackageInfo, query: &dyn DeclarationQuery) -> Result<usize> {
        discover_entities(package, query);
        attach_declarations(package, query)?;

        let unknown = unknown_classes(package, query)?;
        for class in &unknown {
            tracing::info!("Unknown class {} from {}", class.name, class.location);
        }

        for module in &mut package.modules {
            sort_classes(&mut module.classes, query);
        }
        Ok(unknown.len())
    }

    /// Run every stage, parsing with the external tool.
    pub fn generate(&self) -> Result<GenerationSummary> {
        self.generate_with(|collection| self.parse_declarations(collection))
    }

    /// Run every stage, obtaining declarations from `parse` instead of the
    /// external tool.
    ///
    /// The index returned by `parse` is restricted to the source tree and
    /// the header collection before it is merged.
    pub fn generate_with<F>(&self, parse: F) -> Result<GenerationSummary>
    where
        F: FnOnce(&Path) -> Result<DeclIndex>,
    {
        std::fs::create_dir_all(&self.wrapper_root)
            .map_err(|e| WrapError::io(&self.wrapper_root, e))?;

        let mut package = self.load_package()?;
        self.discover(&mut package)?;
        self.resolve_templates(&mut package)?;

        let collection = self.write_header_collection(&package)?;
        let index = parse(&collection)?.restrict_to(&self.source_root, &collection);
        tracing::info!("Parsed {} class declarations", index.class_count());

        let unknown = self.merge(&mut package, &index)?;

        let files = generate_wrappers(&package, &index, &self.registry, &self.wrapper_root)?;
        write_all(&files)?;

        let classes: usize = package
            .modules
            .iter()
            .flat_map(|module| &module.classes)
            .filter(|class| !class.feature.excluded.unwrap_or(false))
            .map(|class| class.decls.len())
            .sum();
        tracing::info!(
            "Generated {} files for {} class instantiations in {}",
            files.len(),
            classes,
            self.wrapper_root.display()
        );

        Ok(GenerationSummary {
            header_collection: collection,
            files: files.into_iter().map(|file| file.path).collect(),
            classes,
            unknown_classes: unknown,
        })
    }
}
