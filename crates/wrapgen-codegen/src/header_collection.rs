//! The aggregated header fed to the parser and included by wrappers.

use crate::buffer::CodeBuffer;
use crate::output::WrapperFile;
use rustc_hash::FxHashSet;
use std::path::Path;
use wrapgen_common::{ALIAS_NAMESPACE, HEADER_COLLECTION_FILENAME};
use wrapgen_info::PackageInfo;

/// Header file names to include, in first-seen order.
///
/// When any module wraps everything it finds, every discovered header is
/// included; otherwise only the headers of configured classes and free
/// functions are.
pub fn collection_includes(package: &PackageInfo) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut includes = Vec::new();
    let mut add = |name: Option<String>| {
        if let Some(name) = name {
            if seen.insert(name.clone()) {
                includes.push(name);
            }
        }
    };

    if package.uses_all_sources() {
        for path in &package.source_hpp_files {
            add(file_name(path));
        }
        return includes;
    }

    for module in &package.modules {
        if module.feature.excluded.unwrap_or(false) {
            continue;
        }
        for class in &module.classes {
            if !class.feature.excluded.unwrap_or(false) {
                add(class.source_file.clone());
            }
        }
        for function in &module.free_functions {
            add(function.source_file_path.as_deref().and_then(file_name));
        }
    }
    includes
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

/// Render the header collection for `package`.
pub fn header_collection_source(package: &PackageInfo) -> String {
    let guard = format!("{}_HEADERS_HPP_", package.name);

    let mut hpp = CodeBuffer::new();
    hpp.push_str(package.scope().prefix_text().unwrap_or(""));
    hpp.blank_line();
    hpp.writeln(&format!("#ifndef {}", guard));
    hpp.writeln(&format!("#define {}", guard));

    hpp.blank_line();
    hpp.writeln("// Includes");
    for include in collection_includes(package) {
        hpp.writeln(&format!("#include \"{}\"", include));
    }

    let mut instantiations = Vec::new();
    let mut aliases = Vec::new();
    for module in &package.modules {
        if module.feature.excluded.unwrap_or(false) {
            continue;
        }
        for class in &module.classes {
            if class.feature.excluded.unwrap_or(false) || !class.is_generic() {
                continue;
            }
            for (native, host) in class.native_names.iter().zip(&class.host_names) {
                instantiations.push(format!("template class {};", native.trim()));
                aliases.push(format!("typedef {} {};", native.trim(), host.trim()));
            }
        }
    }

    hpp.blank_line();
    hpp.writeln("// Instantiate Template Classes");
    for line in &instantiations {
        hpp.writeln(line);
    }

    hpp.blank_line();
    hpp.writeln("// Typedefs for nicer naming");
    hpp.writeln(&format!("namespace {}", ALIAS_NAMESPACE));
    hpp.writeln("{");
    hpp.indent();
    for line in &aliases {
        hpp.writeln(line);
    }
    hpp.dedent();
    hpp.writeln(&format!("}} // namespace {}", ALIAS_NAMESPACE));

    hpp.blank_line();
    hpp.writeln(&format!("#endif // {}", guard));
    hpp.finish()
}

/// The header collection file under `wrapper_root`.
pub fn header_collection(package: &PackageInfo, wrapper_root: &Path) -> WrapperFile {
    WrapperFile::new(
        wrapper_root.join(HEADER_COLLECTION_FILENAME),
        header_collection_source(package),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use wrapgen_config::PackageConfig;

    fn package(toml: &str) -> PackageInfo {
        let config = PackageConfig::parse(toml).unwrap();
        let mut package = PackageInfo::from_config(&config, Path::new("/src"));
        let replacements = package.scope().name_replacements();
        for module in &mut package.modules {
            for class in &mut module.classes {
                class.update_names(&replacements);
            }
        }
        package
    }

    #[test]
    fn test_header_collection() {
        let mut package = package(
            r#"
name = "pyshapes"

[[modules]]
name = "geometry"
classes = [
    { name = "Point", source_file = "Point.hpp", template_arg_lists = [[2], [3]] },
    { name = "Hidden", source_file = "Hidden.hpp", excluded = true },
]
free_functions = [{ name = "Distance", source_file_path = "/src/geometry/Distance.hpp" }]

[[modules]]
name = "primitives"
classes = [{ name = "Shape", source_file = "Point.hpp" }]

[[modules]]
name = "legacy"
excluded = true
classes = [{ name = "Mesh", source_file = "Mesh.hpp", template_arg_lists = [[2]] }]
"#,
        );
        package.source_hpp_files = vec![PathBuf::from("/src/geometry/Unused.hpp")];

        assert_eq!(
            header_collection_source(&package),
            "\n\
             #ifndef pyshapes_HEADERS_HPP_\n\
             #define pyshapes_HEADERS_HPP_\n\
             \n\
             // Includes\n\
             #include \"Point.hpp\"\n\
             #include \"Distance.hpp\"\n\
             \n\
             // Instantiate Template Classes\n\
             template class Point<2>;\n\
             template class Point<3>;\n\
             \n\
             // Typedefs for nicer naming\n\
             namespace wrapgen\n\
             {\n\
             \x20   typedef Point<2> Point_2;\n\
             \x20   typedef Point<3> Point_3;\n\
             } // namespace wrapgen\n\
             \n\
             #endif // pyshapes_HEADERS_HPP_\n"
        );
    }

    #[test]
    fn test_all_sources_are_included() {
        let mut package = package(
            r#"
name = "pyshapes"
prefix_text = "// generated"

[[modules]]
name = "geometry"
classes = "ALL"
"#,
        );
        package.source_hpp_files = vec![
            PathBuf::from("/src/a/Point.hpp"),
            PathBuf::from("/src/b/Point.hpp"),
            PathBuf::from("/src/b/Shape.hpp"),
        ];

        let file = header_collection(&package, Path::new("/out"));
        assert_eq!(file.path, PathBuf::from("/out/wrapper_header_collection.wrapgen.hpp"));
        assert!(file.contents.starts_with("// generated\n#ifndef"));
        assert!(file
            .contents
            .contains("// Includes\n#include \"Point.hpp\"\n#include \"Shape.hpp\"\n\n"));
    }
}
