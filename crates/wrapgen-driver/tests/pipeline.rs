use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wrapgen_common::WrapError;
use wrapgen_decl::DeclIndex;
use wrapgen_driver::WrapperGenerator;

const SHAPE_HPP: &str = "\
#ifndef SHAPE_HPP_
#define SHAPE_HPP_

template <unsigned DIM>
class Shape
{
public:
    double GetArea() const;
};

#endif
";

const COLOUR_HPP: &str = "\
// Not listed in the package info.
class Helper
{
};

struct Colour
{
    int mValue;
};
";

const PACKAGE_INFO: &str = r#"
name = "pyshapes"

[[template_substitutions]]
signature = "<unsigned DIM>"
replacement = [[2], [3]]

[[modules]]
name = "primitives"
classes = [{ name = "Shape" }, { name = "Colour" }]
"#;

struct Fixture {
    _dir: TempDir,
    source_root: PathBuf,
    wrapper_root: PathBuf,
    package_info: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let source_root = root.join("src");
    fs::create_dir_all(source_root.join("shapes")).unwrap();
    fs::write(source_root.join("shapes/Shape.hpp"), SHAPE_HPP).unwrap();
    fs::write(source_root.join("Colour.hpp"), COLOUR_HPP).unwrap();
    fs::write(source_root.join("notes.txt"), "not a header").unwrap();

    let package_info = root.join("package_info.toml");
    fs::write(&package_info, PACKAGE_INFO).unwrap();

    Fixture {
        _dir: dir,
        wrapper_root: root.join("out"),
        source_root,
        package_info,
    }
}

fn declarations(source_root: &Path) -> DeclIndex {
    let shape = source_root.join("shapes/Shape.hpp");
    let colour = source_root.join("Colour.hpp");
    let method = r#"{ "name": "GetArea", "return_type": "double", "is_const": true }"#;
    DeclIndex::from_json(&format!(
        r#"{{ "classes": [
            {{ "name": "Shape<2>", "location": {{ "file": "{shape}", "line": 5 }},
               "member_functions": [ {method} ] }},
            {{ "name": "Shape<3>", "location": {{ "file": "{shape}", "line": 5 }},
               "member_functions": [ {method} ] }},
            {{ "name": "Colour", "is_struct": true, "location": {{ "file": "{colour}", "line": 6 }} }},
            {{ "name": "Vector", "location": {{ "file": "/usr/include/vector", "line": 1 }} }}
        ] }}"#,
        shape = shape.display(),
        colour = colour.display(),
        method = method,
    ))
    .unwrap()
}

#[test]
fn test_generate_package() {
    let fixture = fixture();
    let generator = WrapperGenerator::new(&fixture.source_root)
        .unwrap()
        .wrapper_root(&fixture.wrapper_root)
        .package_info(&fixture.package_info);

    let summary = generator
        .generate_with(|collection| {
            assert!(collection.is_file());
            Ok(declarations(&fixture.source_root))
        })
        .unwrap();

    assert_eq!(
        summary.header_collection,
        fixture.wrapper_root.join("wrapper_header_collection.wrapgen.hpp")
    );
    let collection = fs::read_to_string(&summary.header_collection).unwrap();
    assert!(collection.contains("#include \"Shape.hpp\"\n#include \"Colour.hpp\"\n"));
    assert!(collection.contains("template class Shape<2>;\ntemplate class Shape<3>;\n"));
    assert!(collection.contains("    typedef Shape<3> Shape_3;\n"));

    // Module entry point plus a header and source per instantiation.
    assert_eq!(summary.files.len(), 7);
    assert_eq!(summary.classes, 3);
    assert_eq!(summary.unknown_classes, 1);

    let module_dir = fixture.wrapper_root.join("primitives");
    for name in [
        "_pyshapes_primitives.main.wrapgen.cpp",
        "Colour.wrapgen.hpp",
        "Colour.wrapgen.cpp",
        "Shape_2.wrapgen.hpp",
        "Shape_2.wrapgen.cpp",
        "Shape_3.wrapgen.cpp",
    ] {
        assert!(module_dir.join(name).is_file(), "{} was not written", name);
    }

    let shape = fs::read_to_string(module_dir.join("Shape_3.wrapgen.cpp")).unwrap();
    assert!(shape.contains("typedef Shape<3> Shape_3;\n"));
    assert!(shape.contains("(double(Shape_3::*)() const ) &Shape_3::GetArea,"));
}

#[test]
fn test_regeneration_ignores_previous_output() {
    let fixture = fixture();
    // Wrappers written inside the source tree must not be picked up as headers.
    let wrapper_root = fixture.source_root.join("wrapgen_wrappers");
    let generator = WrapperGenerator::new(&fixture.source_root)
        .unwrap()
        .package_info(&fixture.package_info);

    let first = generator
        .generate_with(|_| Ok(declarations(&fixture.source_root)))
        .unwrap();
    let second = generator
        .generate_with(|_| Ok(declarations(&fixture.source_root)))
        .unwrap();

    assert!(first.header_collection.starts_with(&wrapper_root));
    assert_eq!(first.files, second.files);
    assert_eq!(second.unknown_classes, 1);
}

#[test]
fn test_missing_source_root() {
    let dir = TempDir::new().unwrap();
    let err = WrapperGenerator::new(dir.path().join("missing")).err().unwrap();
    assert!(matches!(err, WrapError::Config(_)));
}

#[test]
fn test_no_headers_found() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("README.md"), "nothing to wrap").unwrap();
    let package_info = dir.path().join("package_info.toml");
    fs::write(&package_info, "name = \"empty\"\n").unwrap();

    let generator = WrapperGenerator::new(dir.path())
        .unwrap()
        .package_info(&package_info);
    let err = generator
        .generate_with(|_| unreachable!("parsing must not start without headers"))
        .unwrap_err();
    assert!(matches!(err, WrapError::Discovery { .. }));
}
