use std::path::Path;
use wrapgen_codegen::{generate_wrappers, CustomGenerator, GeneratorRegistry, WrapperFile};
use wrapgen_config::PackageConfig;
use wrapgen_decl::DeclIndex;
use wrapgen_info::{attach_declarations, sort_classes, PackageInfo};

const GRAPH: &str = r#"{ "classes": [
    { "name": "Shape<2>", "is_abstract": true,
      "location": { "file": "/src/Shape.hpp", "line": 5 },
      "member_functions": [
        { "name": "GetArea", "return_type": "double", "virtuality": "pure_virtual", "is_const": true },
        { "name": "SetIndex", "return_type": "void",
          "arguments": [ { "name": "index", "type": "unsigned int" } ] },
        { "name": "rGetVertex", "return_type": "::Point<2> const &",
          "arguments": [ { "name": "i", "type": "unsigned int" } ] },
        { "name": "Reset", "return_type": "void", "access": "private" }
      ],
      "constructors": [
        { "kind": "default" },
        { "kind": "copy", "is_artificial": true,
          "arguments": [ { "name": "other", "type": "::Shape<2> const &" } ] }
      ] },
    { "name": "Polygon<2>", "is_abstract": true,
      "location": { "file": "/src/Polygon.hpp", "line": 3 },
      "bases": [ { "name": "Shape<2>" } ],
      "constructors": [ { "arguments": [ { "name": "n", "type": "unsigned int" } ] } ] },
    { "name": "Rectangle<2>",
      "location": { "file": "/src/Rectangle.hpp", "line": 9 },
      "bases": [ { "name": "Shape<2>" }, { "name": "Polygon<2>", "access": "protected" } ],
      "member_functions": [
        { "name": "GetArea", "return_type": "double", "virtuality": "virtual", "is_const": true },
        { "name": "Create", "return_type": "::Rectangle<2> *", "is_static": true,
          "arguments": [ { "name": "width", "type": "double" } ] }
      ],
      "constructors": [
        { "arguments": [
            { "name": "width", "type": "double", "default_value": "1.0" },
            { "name": "height", "type": "double", "default_value": "1.0" } ] },
        { "arguments": [ { "name": "points", "type": "::std::vector<Point<2>> const &" } ] }
      ] },
    { "name": "Colour", "is_struct": true,
      "location": { "file": "/src/Colour.hpp", "line": 1 },
      "enumerations": [ { "name": "Value", "values": [ "RED", "GREEN" ] } ] }
] }"#;

const CONFIG: &str = r#"
name = "pyshapes"
reference_call_policy = "reference_internal"
pointer_call_policy = "reference"

[[modules]]
name = "primitives"
constructor_arg_type_excludes = ["std::vector<Point"]
classes = [
    { name = "Shape", template_arg_lists = [[2]] },
    { name = "Polygon", template_arg_lists = [[2]] },
    { name = "Rectangle", template_arg_lists = [[2]] },
    { name = "Colour" },
]
"#;

fn build(config: &str) -> (PackageInfo, DeclIndex) {
    let config = PackageConfig::parse(config).unwrap();
    let mut package = PackageInfo::from_config(&config, Path::new("/src"));
    let tables: Vec<_> = package
        .modules
        .iter()
        .map(|module| module.scope(&package).name_replacements())
        .collect();
    for (module, table) in package.modules.iter_mut().zip(tables) {
        for class in &mut module.classes {
            class.update_names(&table);
        }
    }

    let index = DeclIndex::from_json(GRAPH).unwrap();
    attach_declarations(&mut package, &index).unwrap();
    for module in &mut package.modules {
        sort_classes(&mut module.classes, &index);
    }
    (package, index)
}

fn render(config: &str, registry: &GeneratorRegistry) -> Vec<WrapperFile> {
    let (package, index) = build(config);
    generate_wrappers(&package, &index, registry, Path::new("/out")).unwrap()
}

fn contents<'f>(files: &'f [WrapperFile], name: &str) -> &'f str {
    files
        .iter()
        .find(|file| file.file_name() == Some(name))
        .map(|file| file.contents.as_str())
        .unwrap_or_else(|| panic!("{} was not generated", name))
}

#[test]
fn test_module_entry_point() {
    let files = render(CONFIG, &GeneratorRegistry::new());
    assert_eq!(files.len(), 9);
    assert_eq!(
        files[0].path,
        Path::new("/out/primitives/_pyshapes_primitives.main.wrapgen.cpp")
    );
    assert_eq!(
        files[0].contents,
        "#include <pybind11/pybind11.h>\n\
         #include \"wrapper_header_collection.wrapgen.hpp\"\n\
         #include \"Colour.wrapgen.hpp\"\n\
         #include \"Shape_2.wrapgen.hpp\"\n\
         #include \"Polygon_2.wrapgen.hpp\"\n\
         #include \"Rectangle_2.wrapgen.hpp\"\n\
         \n\
         namespace py = pybind11;\n\
         \n\
         PYBIND11_MODULE(_pyshapes_primitives, m)\n\
         {\n\
         \x20   register_Colour_class(m);\n\
         \x20   register_Shape_2_class(m);\n\
         \x20   register_Polygon_2_class(m);\n\
         \x20   register_Rectangle_2_class(m);\n\
         }\n"
    );
}

#[test]
fn test_class_header() {
    let files = render(CONFIG, &GeneratorRegistry::new());
    insta::assert_snapshot!(contents(&files, "Shape_2.wrapgen.hpp"), @r"
    #ifndef Shape_2_hpp__wrapgen_wrapper
    #define Shape_2_hpp__wrapgen_wrapper

    #include <pybind11/pybind11.h>

    void register_Shape_2_class(pybind11::module &m);
    #endif // Shape_2_hpp__wrapgen_wrapper
    ");
}

#[test]
fn test_pure_virtual_trampoline() {
    let files = render(CONFIG, &GeneratorRegistry::new());
    let shape = contents(&files, "Shape_2.wrapgen.cpp");

    assert!(shape.starts_with(
        "#include <pybind11/pybind11.h>\n\
         #include <pybind11/stl.h>\n\
         #include \"wrapper_header_collection.wrapgen.hpp\"\n\
         \n\
         #include \"Shape_2.wrapgen.hpp\"\n\
         \n\
         namespace py = pybind11;\n\
         typedef Shape<2> Shape_2;\n\
         ;\n\
         \n\
         class Shape_2_Overrides : public Shape_2{\n"
    ));
    assert!(shape.contains(
        "    double GetArea() const  override {\n\
         \x20       PYBIND11_OVERRIDE_PURE(\n\
         \x20           double,\n\
         \x20           Shape_2,\n\
         \x20           GetArea,\n\
         \x20           );\n\
         \x20   }\n\
         };\n"
    ));
    assert!(shape.contains("py::class_<Shape_2 , Shape_2_Overrides   >(m, \"Shape_2\")\n"));
    assert!(shape.ends_with("    ;\n}\n"));
}

#[test]
fn test_constructor_filtering() {
    let files = render(CONFIG, &GeneratorRegistry::new());

    let shape = contents(&files, "Shape_2.wrapgen.cpp");
    assert!(shape.contains("        .def(py::init< >())\n"));
    assert!(!shape.contains("py::init<::Shape<2> const &"));

    // Abstract class deriving from an abstract base.
    let polygon = contents(&files, "Polygon_2.wrapgen.cpp");
    assert!(!polygon.contains("py::init"));

    let rectangle = contents(&files, "Rectangle_2.wrapgen.cpp");
    assert!(rectangle.contains(
        "        .def(py::init<double, double >(), py::arg(\"width\") = 1.0, py::arg(\"height\") = 1.0)\n"
    ));
    assert!(!rectangle.contains("std::vector<Point<2>>"));
}

#[test]
fn test_methods_and_bases() {
    let files = render(CONFIG, &GeneratorRegistry::new());

    let shape = contents(&files, "Shape_2.wrapgen.cpp");
    assert!(shape.contains(
        "        .def(\n\
         \x20           \"SetIndex\",\n\
         \x20           (void(Shape_2::*)(unsigned int)) &Shape_2::SetIndex,\n\
         \x20           \" \" , py::arg(\"index\") )\n"
    ));
    assert!(shape.contains(
        "(::Point<2> const &(Shape_2::*)(unsigned int)) &Shape_2::rGetVertex,\n\
         \x20           \" \" , py::arg(\"i\") , py::return_value_policy::reference_internal)\n"
    ));
    assert!(!shape.contains("Reset"));

    let rectangle = contents(&files, "Rectangle_2.wrapgen.cpp");
    assert!(rectangle.contains(
        "py::class_<Rectangle_2 , Rectangle_2_Overrides  , Shape_2 >(m, \"Rectangle_2\")\n"
    ));
    // Protected bases are not exposed.
    assert!(!rectangle.contains("Polygon_2"));
    assert!(rectangle.contains("        PYBIND11_OVERRIDE(\n"));
    assert!(rectangle.contains(
        "        .def_static(\n\
         \x20           \"Create\",\n\
         \x20           (::Rectangle<2> *(*)(double)) &Rectangle_2::Create,\n\
         \x20           \" \" , py::arg(\"width\") , py::return_value_policy::reference)\n"
    ));
}

#[test]
fn test_struct_enum() {
    let files = render(CONFIG, &GeneratorRegistry::new());
    let colour = contents(&files, "Colour.wrapgen.cpp");
    assert!(colour.ends_with(
        "typedef Colour Colour;\n\
         ;\n\
         void register_Colour_class(py::module &m){\n\
         \x20   py::class_<Colour> myclass(m, \"Colour\");\n\
         \x20   py::enum_<Colour::Value>(myclass, \"Value\")\n\
         \x20       .value(\"RED\", Colour::Value::RED)\n\
         \x20       .value(\"GREEN\", Colour::Value::GREEN)\n\
         \x20   .export_values();\n\
         }\n"
    ));
}

struct Pickling;

impl CustomGenerator for Pickling {
    fn class_pre_code(&self, host_name: &str) -> String {
        format!("// pickle support for {}\n", host_name)
    }

    fn class_def_code(&self, host_name: &str) -> String {
        format!("        .def(py::pickle(&get_{0}, &set_{0}))\n", host_name)
    }

    fn module_post_code(&self) -> String {
        "    m.attr(\"pickled\") = true;\n".to_string()
    }
}

#[test]
fn test_custom_generator_and_includes() {
    let config = r#"
name = "pyshapes"
common_include_file = false
prefix_text = "// banner"
custom_generator = "pickling"

[[modules]]
name = "primitives"
source_includes = ["<vector>", "Point.hpp"]
classes = [
    { name = "Rectangle", template_arg_lists = [[2]], suffix_code = ["        .def(\"Extra\", &Extra)"] },
]
"#;
    let mut registry = GeneratorRegistry::new();
    registry.register("pickling", Box::new(Pickling));
    let files = render(config, &registry);

    let module = &files[0].contents;
    assert!(module.starts_with("// banner\n#include <pybind11/pybind11.h>\n#include \"Rectangle_2.wrapgen.hpp\"\n"));
    assert!(module.ends_with("    register_Rectangle_2_class(m);\n    m.attr(\"pickled\") = true;\n}\n"));

    let rectangle = contents(&files, "Rectangle_2.wrapgen.cpp");
    assert!(rectangle.starts_with(
        "// banner\n\
         #include <pybind11/pybind11.h>\n\
         #include <pybind11/stl.h>\n\
         #include <vector>\n\
         #include \"Point.hpp\"\n\
         #include \"Rectangle.hpp\"\n"
    ));
    assert!(rectangle.contains(";\n// pickle support for Rectangle_2\n"));
    assert!(rectangle.ends_with(
        "        .def(py::pickle(&get_Rectangle_2, &set_Rectangle_2))\n\
         \x20       .def(\"Extra\", &Extra)\n\
         \x20   ;\n\
         }\n"
    ));
    assert!(contents(&files, "Rectangle_2.wrapgen.hpp").starts_with("// banner\n#ifndef"));
}

#[test]
fn test_unknown_generator_is_rejected() {
    let config = r#"
[[modules]]
name = "primitives"
custom_generator = "missing"
classes = [{ name = "Colour" }]
"#;
    let (package, index) = build(config);
    let err = generate_wrappers(&package, &index, &GeneratorRegistry::new(), Path::new("/out"))
        .unwrap_err();
    assert!(err.to_string().contains("unknown custom generator `missing`"));
}
