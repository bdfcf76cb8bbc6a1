//! In-memory index over a JSON declaration graph.

use crate::model::{
    ClassDecl, ClassId, Constructor, FunctionDecl, FunctionId, Location, MemberFunction,
    VariableDecl, VariableId,
};
use crate::query::DeclarationQuery;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use wrapgen_common::{Result, WrapError};

/// The document written by the parser front-end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclGraph {
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    #[serde(default)]
    pub variables: Vec<VariableDecl>,
}

/// Declarations indexed by whitespace-free name.
#[derive(Debug, Default)]
pub struct DeclIndex {
    classes: Vec<ClassDecl>,
    functions: Vec<FunctionDecl>,
    variables: Vec<VariableDecl>,
    class_names: FxHashMap<String, ClassId>,
    function_names: FxHashMap<String, FunctionId>,
    variable_names: FxHashMap<String, VariableId>,
    nested: FxHashMap<ClassId, Vec<ClassId>>,
}

fn lookup_key(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

impl DeclIndex {
    pub fn new(graph: DeclGraph) -> Self {
        let DeclGraph {
            mut classes,
            functions,
            variables,
        } = graph;

        let mut class_names = FxHashMap::default();
        for (idx, class) in classes.iter_mut().enumerate() {
            let id = ClassId(idx as u32);
            for method in &mut class.member_functions {
                method.owner = id;
            }
            for ctor in &mut class.constructors {
                ctor.owner = id;
            }
            class_names.entry(lookup_key(&class.name)).or_insert(id);
        }

        let mut nested: FxHashMap<ClassId, Vec<ClassId>> = FxHashMap::default();
        for (idx, class) in classes.iter().enumerate() {
            let Some(parent) = &class.parent else {
                continue;
            };
            match class_names.get(&lookup_key(parent)) {
                Some(&parent_id) => nested
                    .entry(parent_id)
                    .or_default()
                    .push(ClassId(idx as u32)),
                None => tracing::debug!(
                    "Nested class {} refers to unknown parent {}",
                    class.name,
                    parent
                ),
            }
        }

        let mut function_names = FxHashMap::default();
        for (idx, function) in functions.iter().enumerate() {
            function_names
                .entry(lookup_key(&function.name))
                .or_insert(FunctionId(idx as u32));
        }

        let mut variable_names = FxHashMap::default();
        for (idx, variable) in variables.iter().enumerate() {
            variable_names
                .entry(lookup_key(&variable.name))
                .or_insert(VariableId(idx as u32));
        }

        Self {
            classes,
            functions,
            variables,
            class_names,
            function_names,
            variable_names,
            nested,
        }
    }

    /// Decode a declaration graph.
    pub fn from_json(text: &str) -> Result<Self> {
        let graph: DeclGraph = serde_json::from_str(text)?;
        Ok(Self::new(graph))
    }

    /// Load a declaration graph written by the parser.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| WrapError::io(path, e))?;
        Self::from_json(&text)
    }

    /// Keep only declarations located under `source_root` or inside the
    /// header collection, dropping whatever the parser pulled in from
    /// system and third-party headers.
    pub fn restrict_to(self, source_root: &Path, header_collection: &Path) -> Self {
        let keep = |location: &Option<Location>| {
            location.as_ref().is_some_and(|loc| {
                loc.file.starts_with(source_root) || loc.file == header_collection
            })
        };

        let graph = DeclGraph {
            classes: self
                .classes
                .into_iter()
                .filter(|c| keep(&c.location))
                .collect(),
            functions: self
                .functions
                .into_iter()
                .filter(|f| keep(&f.location))
                .collect(),
            variables: self
                .variables
                .into_iter()
                .filter(|v| keep(&v.location))
                .collect(),
        };
        tracing::debug!(
            "Kept {} classes, {} functions and {} variables from the source tree",
            graph.classes.len(),
            graph.functions.len(),
            graph.variables.len()
        );
        Self::new(graph)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn with_nested(&self, id: ClassId) -> Vec<ClassId> {
        let mut result = vec![id];
        let mut cursor = 0;
        while cursor < result.len() {
            if let Some(children) = self.nested.get(&result[cursor]) {
                for child in children {
                    if !result.contains(child) {
                        result.push(*child);
                    }
                }
            }
            cursor += 1;
        }
        result
    }
}

impl DeclarationQuery for DeclIndex {
    fn find_class(&self, name: &str) -> Option<ClassId> {
        self.class_names.get(&lookup_key(name)).copied()
    }

    fn class(&self, id: ClassId) -> &ClassDecl {
        &self.classes[id.0 as usize]
    }

    fn class_ids(&self) -> Vec<ClassId> {
        (0..self.classes.len() as u32).map(ClassId).collect()
    }

    fn find_function(&self, name: &str) -> Option<FunctionId> {
        self.function_names.get(&lookup_key(name)).copied()
    }

    fn function(&self, id: FunctionId) -> &FunctionDecl {
        &self.functions[id.0 as usize]
    }

    fn function_ids(&self) -> Vec<FunctionId> {
        (0..self.functions.len() as u32).map(FunctionId).collect()
    }

    fn find_variable(&self, name: &str) -> Option<VariableId> {
        self.variable_names.get(&lookup_key(name)).copied()
    }

    fn variable(&self, id: VariableId) -> &VariableDecl {
        &self.variables[id.0 as usize]
    }

    fn variable_ids(&self) -> Vec<VariableId> {
        (0..self.variables.len() as u32).map(VariableId).collect()
    }

    fn member_functions(&self, id: ClassId) -> Vec<&MemberFunction> {
        self.with_nested(id)
            .into_iter()
            .flat_map(|c| self.class(c).member_functions.iter())
            .collect()
    }

    fn constructors(&self, id: ClassId) -> Vec<&Constructor> {
        self.with_nested(id)
            .into_iter()
            .flat_map(|c| self.class(c).constructors.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccessSpecifier;

    const GRAPH: &str = r#"{
        "classes": [
            {
                "name": "AbstractMesh<2, 2>",
                "is_abstract": true,
                "location": { "file": "/src/mesh/AbstractMesh.hpp", "line": 10 },
                "member_functions": [
                    { "name": "GetNumNodes", "return_type": "unsigned int",
                      "virtuality": "pure_virtual", "is_const": true }
                ]
            },
            {
                "name": "Mesh<2, 2>",
                "location": { "file": "/src/mesh/Mesh.hpp", "line": 5 },
                "bases": [ { "name": "AbstractMesh<2,2>", "access": "public" } ],
                "member_functions": [
                    { "name": "GetNumNodes", "return_type": "unsigned int", "is_const": true,
                      "virtuality": "virtual" }
                ],
                "constructors": [
                    { "arguments": [ { "name": "n", "type": "unsigned int", "default_value": "4" } ] }
                ]
            },
            {
                "name": "NodeIterator",
                "parent": "Mesh<2, 2>",
                "location": { "file": "/src/mesh/Mesh.hpp", "line": 20 },
                "member_functions": [ { "name": "operator++", "return_type": "NodeIterator &" } ],
                "constructors": [ { } ]
            },
            {
                "name": "std::vector<double>",
                "location": { "file": "/usr/include/c++/vector", "line": 1 }
            }
        ],
        "functions": [
            { "name": "Area", "return_type": "double",
              "arguments": [ { "name": "r", "type": "double" } ],
              "location": { "file": "/src/geometry/Area.hpp" } },
            { "name": "Area", "return_type": "double",
              "location": { "file": "/src/geometry/Area.hpp" } }
        ],
        "variables": [
            { "name": "kTolerance", "type": "double const",
              "location": { "file": "/src/geometry/Area.hpp" } }
        ]
    }"#;

    #[test]
    fn test_lookup_ignores_whitespace() {
        let index = DeclIndex::from_json(GRAPH).unwrap();
        let mesh = index.find_class("Mesh<2,2>").unwrap();
        assert_eq!(index.class(mesh).name, "Mesh<2, 2>");
        assert_eq!(index.find_class("Mesh < 2, 2 >"), Some(mesh));
        assert!(index.find_class("Mesh<3,3>").is_none());
    }

    #[test]
    fn test_nested_members_are_reported_with_their_owner() {
        let index = DeclIndex::from_json(GRAPH).unwrap();
        let mesh = index.find_class("Mesh<2,2>").unwrap();
        let iter = index.find_class("NodeIterator").unwrap();

        let members = index.member_functions(mesh);
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].owner, mesh);
        assert_eq!(members[1].owner, iter);

        let ctors = index.constructors(mesh);
        assert_eq!(ctors.len(), 2);
        assert_eq!(ctors[0].arguments[0].default_value.as_deref(), Some("4"));
        assert_eq!(ctors[1].owner, iter);
    }

    #[test]
    fn test_bases() {
        let index = DeclIndex::from_json(GRAPH).unwrap();
        let mesh = index.find_class("Mesh<2,2>").unwrap();
        let abstract_mesh = index.find_class("AbstractMesh<2,2>").unwrap();

        assert_eq!(index.bases(mesh), vec![(abstract_mesh, AccessSpecifier::Public)]);
        assert_eq!(index.recursive_bases(mesh), vec![abstract_mesh]);
        assert!(index.recursive_bases(abstract_mesh).is_empty());
    }

    #[test]
    fn test_first_overload_wins() {
        let index = DeclIndex::from_json(GRAPH).unwrap();
        let area = index.find_function("Area").unwrap();
        assert_eq!(index.function(area).arguments.len(), 1);
        assert_eq!(index.function_ids().len(), 2);
    }

    #[test]
    fn test_restrict_to_source_root() {
        let index = DeclIndex::from_json(GRAPH)
            .unwrap()
            .restrict_to(Path::new("/src"), Path::new("/out/collection.hpp"));
        assert_eq!(index.class_count(), 3);
        assert!(index.find_class("std::vector<double>").is_none());
        assert!(index.find_variable("kTolerance").is_some());
    }

    #[test]
    fn test_malformed_graph() {
        let err = DeclIndex::from_json("{ \"classes\": 3 }").unwrap_err();
        assert!(matches!(err, WrapError::Json(_)));
    }
}
