//! Module entry point and the class wrappers it registers.

use crate::buffer::CodeBuffer;
use crate::class_writer::ClassWriter;
use crate::custom::GeneratorRegistry;
use crate::function::{free_function_wrapper, variable_wrapper};
use crate::output::{module_dir, WrapperFile};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use wrapgen_common::{Result, HEADER_COLLECTION_FILENAME, WRAPGEN_EXT};
use wrapgen_decl::{ClassId, DeclarationQuery};
use wrapgen_info::{ClassInfo, ModuleInfo, PackageInfo, Scope};

/// Writes one module: its entry point plus every class wrapper.
pub struct ModuleWriter<'a> {
    package: &'a PackageInfo,
    module: &'a ModuleInfo,
    scope: Scope<'a>,
    query: &'a dyn DeclarationQuery,
    registry: &'a GeneratorRegistry,
    wrapper_root: &'a Path,
}

impl<'a> ModuleWriter<'a> {
    pub fn new(
        package: &'a PackageInfo,
        module: &'a ModuleInfo,
        query: &'a dyn DeclarationQuery,
        registry: &'a GeneratorRegistry,
        wrapper_root: &'a Path,
    ) -> Self {
        Self {
            package,
            module,
            scope: module.scope(package),
            query,
            registry,
            wrapper_root,
        }
    }

    /// `_<package>_<module>`, the host-side extension module name.
    pub fn full_module_name(&self) -> String {
        format!("_{}_{}", self.package.name, self.module.name)
    }

    pub fn module_file_path(&self) -> PathBuf {
        module_dir(self.wrapper_root, &self.module.name).join(format!(
            "{}.main.{}.cpp",
            self.full_module_name(),
            WRAPGEN_EXT
        ))
    }

    fn wrapped_classes(&self) -> impl Iterator<Item = &'a ClassInfo> {
        self.module
            .classes
            .iter()
            .filter(|class| !class.feature.excluded.unwrap_or(false))
    }

    /// Render every file of the module.
    pub fn write(&self) -> Result<Vec<WrapperFile>> {
        tracing::info!("Generating wrappers for module {}", self.module.name);

        let mut files = vec![WrapperFile::new(
            self.module_file_path(),
            self.module_source()?,
        )];

        let mut module_classes: FxHashMap<ClassId, String> = FxHashMap::default();
        for class in self.wrapped_classes() {
            for (decl, host) in class.decls.iter().zip(&class.host_names) {
                module_classes.insert(*decl, host.clone());
            }
        }

        let dir = module_dir(self.wrapper_root, &self.module.name);
        for class in &self.module.classes {
            if class.feature.excluded.unwrap_or(false) {
                tracing::info!("Skipping class {}", class.name);
                continue;
            }
            let writer =
                ClassWriter::new(class, &self.scope, self.query, &module_classes, self.registry)?;
            files.extend(writer.write(&dir)?);
        }
        Ok(files)
    }

    /// Source unit defining the module entry point.
    pub fn module_source(&self) -> Result<String> {
        let generator = self.registry.resolve(self.scope.custom_generator())?;

        let mut cpp = CodeBuffer::new();
        cpp.write_prefix(self.scope.prefix_text());
        cpp.writeln("#include <pybind11/pybind11.h>");
        if self.scope.common_include_file() {
            cpp.writeln(&format!("#include \"{}\"", HEADER_COLLECTION_FILENAME));
        }
        if let Some(generator) = generator {
            cpp.push_str(&generator.module_pre_code());
        }

        for class in self.wrapped_classes() {
            for host in &class.host_names {
                cpp.writeln(&format!("#include \"{}.{}.hpp\"", host, WRAPGEN_EXT));
            }
        }

        cpp.blank_line();
        cpp.writeln("namespace py = pybind11;");
        cpp.blank_line();
        cpp.writeln(&format!("PYBIND11_MODULE({}, m)", self.full_module_name()));
        cpp.writeln("{");

        for function in &self.module.free_functions {
            if function.feature.excluded.unwrap_or(false) {
                continue;
            }
            let Some(id) = function.decl else {
                continue;
            };
            let scope = function.scope(&self.scope);
            if let Some(text) = free_function_wrapper(function, self.query.function(id), &scope) {
                cpp.push_str(&text);
            }
        }

        for variable in &self.module.variables {
            if variable.feature.excluded.unwrap_or(false) || variable.decl.is_none() {
                continue;
            }
            if let Some(text) = variable_wrapper(variable, &variable.scope(&self.scope)) {
                cpp.push_str(&text);
            }
        }

        cpp.indent();
        for class in self.wrapped_classes() {
            for host in &class.host_names {
                cpp.writeln(&format!("register_{}_class(m);", host));
            }
        }
        cpp.dedent();

        if let Some(generator) = generator {
            cpp.push_str(&generator.module_post_code());
        }
        cpp.writeln("}");
        Ok(cpp.finish())
    }
}
