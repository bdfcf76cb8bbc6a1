//! Merging parsed declarations into the info tree.

use crate::source::{find_classes_in_source, read_stripped_source};
use crate::tree::{ClassInfo, FreeFunctionInfo, PackageInfo, VariableInfo};
use rustc_hash::FxHashSet;
use std::path::Path;
use wrapgen_common::{Result, WrapError};
use wrapgen_decl::{parse_template_args, ClassId, DeclarationQuery, Location};

/// Add entities for modules that asked for everything under their source
/// locations.
///
/// Nested classes and template instantiations are not discovered: the
/// former belong to their enclosing class, the latter are reached through
/// template substitution rules.
pub fn discover_entities(package: &mut PackageInfo, query: &dyn DeclarationQuery) {
    let replacements: Vec<_> = package
        .modules
        .iter()
        .map(|module| module.scope(package).name_replacements())
        .collect();

    for (module, replacements) in package.modules.iter_mut().zip(replacements) {
        if module.use_all_classes {
            for id in query.class_ids() {
                let decl = query.class(id);
                if decl.parent.is_some() || decl.name.contains('<') {
                    continue;
                }
                if !located_in(&decl.location, |file| module.contains_path(file)) {
                    continue;
                }
                if module.classes.iter().any(|c| c.name == decl.name) {
                    continue;
                }
                let mut class = ClassInfo::new(decl.name.clone());
                class.update_names(&replacements);
                tracing::debug!("Discovered class {} for module {}", decl.name, module.name);
                module.classes.push(class);
            }
        }

        if module.use_all_free_functions {
            for id in query.function_ids() {
                let decl = query.function(id);
                if !located_in(&decl.location, |file| module.contains_path(file)) {
                    continue;
                }
                if module.free_functions.iter().any(|f| f.name == decl.name) {
                    continue;
                }
                module.free_functions.push(FreeFunctionInfo::new(decl.name.clone()));
            }
        }

        if module.use_all_variables {
            for id in query.variable_ids() {
                let decl = query.variable(id);
                if !located_in(&decl.location, |file| module.contains_path(file)) {
                    continue;
                }
                if module.variables.iter().any(|v| v.name == decl.name) {
                    continue;
                }
                module.variables.push(VariableInfo::new(decl.name.clone()));
            }
        }
    }
}

fn located_in(location: &Option<Location>, accept: impl Fn(&Path) -> bool) -> bool {
    location.as_ref().is_some_and(|loc| accept(&loc.file))
}

/// Look up a class instantiation, retrying without defaulted trailing
/// template arguments when the signature declares any.
fn find_instantiation(
    class: &ClassInfo,
    idx: usize,
    query: &dyn DeclarationQuery,
) -> Result<ClassId> {
    let native = class.native_names[idx].replace(' ', "");
    if let Some(id) = query.find_class(&native) {
        return Ok(id);
    }

    let signature = class.template_signature.as_deref().unwrap_or("");
    if !signature.contains('=') {
        tracing::error!("Could not find declaration for class {}", native);
        return Err(WrapError::class_not_found(native));
    }

    tracing::warn!(
        "Could not find declaration for class {}: trying a partial match",
        native
    );
    let inner = signature.trim();
    let inner = inner.strip_prefix('<').unwrap_or(inner);
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    let first_default = parse_template_args(inner)
        .iter()
        .position(|param| param.contains('='))
        .unwrap_or(0);

    let kept: Vec<String> = class
        .template_args(idx)
        .iter()
        .take(first_default)
        .map(ToString::to_string)
        .collect();
    let compressed = if kept.is_empty() {
        class.name.clone()
    } else {
        format!("{}<{}>", class.name, kept.join(","))
    };

    match query.find_class(&compressed) {
        Some(id) => {
            tracing::info!("Found {}", compressed);
            Ok(id)
        }
        None => {
            tracing::error!("Could not find declaration for class {}", compressed);
            Err(WrapError::class_not_found(compressed))
        }
    }
}

/// Attach declarations to every non-excluded class, free function and
/// variable. Any entity without a declaration aborts the merge.
pub fn attach_declarations(package: &mut PackageInfo, query: &dyn DeclarationQuery) -> Result<()> {
    for module in &mut package.modules {
        if module.feature.excluded.unwrap_or(false) {
            continue;
        }

        for class in &mut module.classes {
            if class.feature.excluded.unwrap_or(false) {
                continue;
            }

            let mut decls = Vec::with_capacity(class.native_names.len());
            for idx in 0..class.native_names.len() {
                decls.push(find_instantiation(class, idx, query)?);
            }
            class.base_decls = decls
                .iter()
                .map(|&id| query.bases(id).into_iter().map(|(base, _)| base).collect())
                .collect();
            class.decls = decls;

            if class.source_file_path.is_none() {
                if let Some(location) = class.decls.first().and_then(|&id| query.class(id).location.clone()) {
                    class.source_file = location
                        .file
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned());
                    class.source_file_path = Some(location.file);
                }
            }
        }

        for function in &mut module.free_functions {
            if function.feature.excluded.unwrap_or(false) {
                continue;
            }
            let id = query
                .find_function(&function.name)
                .ok_or_else(|| WrapError::DeclarationNotFound {
                    kind: "free function",
                    name: function.name.clone(),
                })?;
            function.decl = Some(id);
            if function.source_file_path.is_none() {
                function.source_file_path = query.function(id).location.as_ref().map(|l| l.file.clone());
            }
        }

        for variable in &mut module.variables {
            if variable.feature.excluded.unwrap_or(false) {
                continue;
            }
            let id = query
                .find_variable(&variable.name)
                .ok_or_else(|| WrapError::DeclarationNotFound {
                    kind: "variable",
                    name: variable.name.clone(),
                })?;
            variable.decl = Some(id);
            if variable.source_file_path.is_none() {
                variable.source_file_path = query.variable(id).location.as_ref().map(|l| l.file.clone());
            }
        }
    }
    Ok(())
}

/// A class found in the sources that no configured entity asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownClass {
    pub name: String,
    /// `file:line` for parsed declarations, `file` for scanned definitions.
    pub location: String,
}

/// Classes under the source root that nothing wraps.
///
/// Parsed declarations are checked first, then every header is scanned for
/// class definitions the parser never instantiated. Each name is reported
/// once.
pub fn unknown_classes(
    package: &PackageInfo,
    query: &dyn DeclarationQuery,
) -> Result<Vec<UnknownClass>> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    for module in &package.modules {
        for class in &module.classes {
            seen.insert(class.name.clone());
            for &id in &class.decls {
                seen.insert(query.class(id).name.clone());
            }
        }
    }

    let mut unknown = Vec::new();
    for id in query.class_ids() {
        let decl = query.class(id);
        let Some(location) = &decl.location else {
            continue;
        };
        if !location.file.starts_with(&package.source_root) || seen.contains(&decl.name) {
            continue;
        }
        seen.insert(decl.name.clone());
        if let Some(base) = decl.name.split('<').next() {
            seen.insert(base.trim().to_string());
        }
        unknown.push(UnknownClass {
            name: decl.name.clone(),
            location: format!("{}:{}", location.file.display(), location.line),
        });
    }

    for header in &package.source_hpp_files {
        let source = read_stripped_source(header)?;
        for class in find_classes_in_source(&source, None, None) {
            if seen.insert(class.name.clone()) {
                unknown.push(UnknownClass {
                    name: class.name,
                    location: header.display().to_string(),
                });
            }
        }
    }

    Ok(unknown)
}
