use std::fs;
use tempfile::TempDir;
use wrapgen_config::{PackageConfig, TemplateArg};
use wrapgen_info::{read_stripped_source, PackageInfo};

const MESH_HPP: &str = "\
#include \"Base.hpp\"

/**
 * A mesh of elements.
 */
template <unsigned DIM_A, unsigned DIM_B = DIM_A>
class Mesh : public Base<DIM_A>
{
public:
    // Number of nodes.
    unsigned GetNumNodes() const;
};
";

const CONFIG: &str = r#"
name = "pymesh"

[[template_substitutions]]
signature = "<unsigned DIM_A, unsigned DIM_B = DIM_A>"
replacement = [[2, 2], [3, 3]]

[[modules]]
name = "mesh"
classes = [
    { name = "Mesh" },
    { name = "Point", template_arg_lists = [[1]] },
    { name = "Node" },
]
"#;

#[test]
fn test_resolve_templates_from_headers() {
    let dir = TempDir::new().unwrap();
    let header = dir.path().join("Mesh.hpp");
    fs::write(&header, MESH_HPP).unwrap();
    fs::write(dir.path().join("Node.hpp"), "class Node {};\n").unwrap();
    let headers = vec![header, dir.path().join("Node.hpp")];

    let config = PackageConfig::parse(CONFIG).unwrap();
    let mut package = PackageInfo::from_config(&config, dir.path());

    let rules: Vec<_> = package.modules[0]
        .scope(&package)
        .template_substitutions()
        .into_iter()
        .cloned()
        .collect();
    let replacements = package.modules[0].scope(&package).name_replacements();
    let rule_refs: Vec<_> = rules.iter().collect();

    for class in &mut package.modules[0].classes {
        class.map_to_header(&headers);
        if let Some(path) = class.source_file_path.clone() {
            let source = read_stripped_source(&path).unwrap();
            class.extract_templates(&source, &rule_refs);
        }
        class.update_names(&replacements);
    }

    let mesh = &package.modules[0].classes[0];
    assert_eq!(mesh.source_file.as_deref(), Some("Mesh.hpp"));
    assert_eq!(
        mesh.template_signature.as_deref(),
        Some("<unsigned DIM_A, unsigned DIM_B = DIM_A>")
    );
    assert_eq!(mesh.template_params, vec!["DIM_A", "DIM_B"]);
    assert_eq!(mesh.native_names, vec!["Mesh<2, 2>", "Mesh<3, 3>"]);
    assert_eq!(mesh.host_names, vec!["Mesh_2_2", "Mesh_3_3"]);

    // Explicit instantiations are kept even without a header.
    let point = &package.modules[0].classes[1];
    assert_eq!(point.template_arg_lists, vec![vec![TemplateArg::Int(1)]]);
    assert_eq!(point.host_names, vec!["Point_1"]);

    let node = &package.modules[0].classes[2];
    assert!(!node.is_generic());
    assert_eq!(node.native_names, vec!["Node"]);
    assert_eq!(node.host_names, vec!["Node"]);
}
