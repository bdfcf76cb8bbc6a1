//! Per-class wrapper files.

use crate::buffer::CodeBuffer;
use crate::calldef::{TemplateBinding, TypeExcludes};
use crate::constructor::constructor_wrapper;
use crate::custom::{CustomGenerator, GeneratorRegistry};
use crate::method::{method_wrapper, override_wrapper};
use crate::output::WrapperFile;
use crate::templates::{self, tidy_name};
use rustc_hash::FxHashMap;
use std::path::Path;
use wrapgen_common::{Result, WrapError, HEADER_COLLECTION_FILENAME, WRAPGEN_EXT};
use wrapgen_decl::{AccessSpecifier, ClassDecl, ClassId, DeclarationQuery};
use wrapgen_info::{ClassInfo, Scope};

/// One instantiation of a class, with everything its member writers need.
pub struct ClassInstance<'a> {
    pub class: &'a ClassInfo,
    pub idx: usize,
    pub decl_id: ClassId,
    pub decl: &'a ClassDecl,
    pub host_name: &'a str,
    pub scope: &'a Scope<'a>,
    pub excludes: &'a TypeExcludes,
    pub query: &'a dyn DeclarationQuery,
}

impl<'a> ClassInstance<'a> {
    /// Template parameters bound to this instantiation's arguments.
    pub fn template_binding(&self) -> Option<TemplateBinding<'a>> {
        if self.class.template_params.is_empty() {
            return None;
        }
        Some(TemplateBinding {
            class_name: &self.class.name,
            params: &self.class.template_params,
            args: self.class.template_args(self.idx),
        })
    }
}

/// Writes the header and source unit of every instantiation of a class.
pub struct ClassWriter<'a> {
    class: &'a ClassInfo,
    scope: Scope<'a>,
    excludes: TypeExcludes,
    query: &'a dyn DeclarationQuery,
    /// Host names of every instantiation wrapped in the module.
    module_classes: &'a FxHashMap<ClassId, String>,
    generator: Option<&'a dyn CustomGenerator>,
}

impl<'a> ClassWriter<'a> {
    pub fn new(
        class: &'a ClassInfo,
        module_scope: &Scope<'a>,
        query: &'a dyn DeclarationQuery,
        module_classes: &'a FxHashMap<ClassId, String>,
        registry: &'a GeneratorRegistry,
    ) -> Result<Self> {
        let scope = class.scope(module_scope);
        let generator = registry.resolve(scope.custom_generator())?;
        let excludes = TypeExcludes::from_scope(&scope);
        Ok(Self {
            class,
            scope,
            excludes,
            query,
            module_classes,
            generator,
        })
    }

    /// Render both files of every instantiation into `module_dir`.
    pub fn write(&self, module_dir: &Path) -> Result<Vec<WrapperFile>> {
        let class = self.class;
        if class.decls.len() != class.native_names.len() {
            let missing = class
                .native_names
                .get(class.decls.len())
                .cloned()
                .unwrap_or_else(|| class.name.clone());
            return Err(WrapError::class_not_found(missing));
        }

        tracing::info!("Generating wrappers for class {}", class.name);

        let mut files = Vec::with_capacity(2 * class.decls.len());
        for idx in 0..class.decls.len() {
            let decl_id = class.decls[idx];
            let instance = ClassInstance {
                class,
                idx,
                decl_id,
                decl: self.query.class(decl_id),
                host_name: &class.host_names[idx],
                scope: &self.scope,
                excludes: &self.excludes,
                query: self.query,
            };

            let mut cpp = CodeBuffer::new();
            self.add_cpp_header(&mut cpp, &class.native_names[idx], instance.host_name);
            match struct_enum(instance.decl, instance.host_name) {
                Some(text) => cpp.push_str(&text),
                None => self.add_class_definition(&mut cpp, &instance),
            }

            let host = instance.host_name;
            files.push(WrapperFile::new(
                module_dir.join(format!("{}.{}.hpp", host, WRAPGEN_EXT)),
                self.hpp(host),
            ));
            files.push(WrapperFile::new(
                module_dir.join(format!("{}.{}.cpp", host, WRAPGEN_EXT)),
                cpp.finish(),
            ));
        }
        Ok(files)
    }

    fn hpp(&self, host_name: &str) -> String {
        let mut hpp = CodeBuffer::new();
        hpp.write_prefix(self.scope.prefix_text());
        hpp.push_str(&templates::class_hpp_header(host_name));
        hpp.finish()
    }

    fn includes(&self) -> String {
        if self.scope.common_include_file() {
            return format!("#include \"{}\"\n", HEADER_COLLECTION_FILENAME);
        }

        let mut includes = String::new();
        for include in self.scope.gather(|f| f.source_includes.as_slice()) {
            if include.starts_with('<') {
                includes.push_str(&format!("#include {}\n", include));
            } else {
                includes.push_str(&format!("#include \"{}\"\n", include));
            }
        }

        let source_file = self.class.source_file.clone().or_else(|| {
            let decl = self.query.class(*self.class.decls.first()?);
            let file = &decl.location.as_ref()?.file;
            Some(file.file_name()?.to_string_lossy().into_owned())
        });
        match source_file {
            Some(file) => includes.push_str(&format!("#include \"{}\"\n", file)),
            None => tracing::warn!("No header known for class {}", self.class.name),
        }
        includes
    }

    fn add_cpp_header(&self, cpp: &mut CodeBuffer, native_name: &str, host_name: &str) {
        cpp.write_prefix(self.scope.prefix_text());

        let smart_ptr_handle = self
            .scope
            .smart_ptr_type()
            .map(templates::smart_pointer_holder)
            .unwrap_or_default();
        cpp.push_str(&templates::class_cpp_header(
            &self.includes(),
            native_name,
            host_name,
            &smart_ptr_handle,
        ));

        for line in self.scope.gather(|f| f.prefix_code.as_slice()) {
            cpp.writeln(line);
        }
        if let Some(generator) = self.generator {
            cpp.push_str(&generator.class_pre_code(host_name));
        }
    }

    /// Emit the trampoline subtype when the class has virtual methods.
    /// Returns whether one was emitted.
    fn add_virtual_overrides(&self, cpp: &mut CodeBuffer, instance: &ClassInstance<'_>) -> bool {
        let virtual_methods: Vec<_> = self
            .query
            .member_functions(instance.decl_id)
            .into_iter()
            .filter(|m| m.owner == instance.decl_id && m.virtuality.is_virtual())
            .collect();

        for method in &virtual_methods {
            let spelling = method.return_type.spelling();
            let tidy = tidy_name(spelling);
            if tidy != spelling {
                cpp.push_str(&format!("typedef {} {};\n", spelling, tidy));
            }
        }
        cpp.blank_line();

        if virtual_methods.is_empty() {
            return false;
        }

        cpp.push_str(&templates::class_virtual_override_header(
            instance.host_name,
            &self.class.name,
        ));
        for method in &virtual_methods {
            if let Some(text) = override_wrapper(instance, method) {
                cpp.push_str(&text);
            }
        }
        cpp.push_str("};\n\n");
        true
    }

    fn add_class_definition(&self, cpp: &mut CodeBuffer, instance: &ClassInstance<'_>) {
        let host = instance.host_name;

        let overrides = if self.add_virtual_overrides(cpp, instance) {
            format!(", {}", templates::overrides_name(host))
        } else {
            String::new()
        };

        let ptr_support = self
            .scope
            .smart_ptr_type()
            .map(|ptr| format!(", {}<{}>", ptr, host))
            .unwrap_or_default();

        let mut bases = String::new();
        for (base, access) in self.query.bases(instance.decl_id) {
            if access != AccessSpecifier::Public {
                continue;
            }
            if let Some(base_host) = self.module_classes.get(&base) {
                bases.push_str(&format!(", {}", base_host));
            }
        }

        cpp.push_str(&templates::class_definition(host, &overrides, &ptr_support, &bases));

        for ctor in self.query.constructors(instance.decl_id) {
            if ctor.access != AccessSpecifier::Public {
                continue;
            }
            if let Some(text) = constructor_wrapper(instance, ctor) {
                cpp.push_str(&text);
            }
        }

        for method in self.query.member_functions(instance.decl_id) {
            if method.access != AccessSpecifier::Public {
                continue;
            }
            if let Some(text) = method_wrapper(instance, method) {
                cpp.push_str(&text);
            }
        }

        if let Some(generator) = self.generator {
            cpp.push_str(&generator.class_def_code(host));
        }
        for line in self.scope.gather(|f| f.suffix_code.as_slice()) {
            cpp.writeln(line);
        }
        cpp.push_str(templates::CLASS_DEFINITION_FOOTER);
    }
}

/// A struct holding exactly one enumeration is registered as that enum.
fn struct_enum(decl: &ClassDecl, host_name: &str) -> Option<String> {
    if !decl.is_struct || decl.enumerations.len() != 1 {
        return None;
    }
    let enumeration = &decl.enumerations[0];
    let name = &decl.name;

    tracing::debug!("Registering struct {} as enum {}", host_name, enumeration.name);
    let mut buf = CodeBuffer::new();
    buf.writeln(&format!("void register_{}_class(py::module &m){{", host_name));
    buf.indent();
    buf.writeln(&format!("py::class_<{name}> myclass(m, \"{name}\");", name = name));
    buf.writeln(&format!(
        "py::enum_<{name}::{e}>(myclass, \"{e}\")",
        name = name,
        e = enumeration.name
    ));
    buf.indent();
    for value in &enumeration.values {
        buf.writeln(&format!(
            ".value(\"{v}\", {name}::{e}::{v})",
            v = value,
            name = name,
            e = enumeration.name
        ));
    }
    buf.dedent();
    buf.writeln(".export_values();");
    buf.dedent();
    buf.writeln("}");
    Some(buf.finish())
}
