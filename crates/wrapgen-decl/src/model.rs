//! Declaration records as they appear in the JSON declaration graph.

use crate::types::CppType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Handle to a class declaration inside a [`crate::DeclIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ClassId(pub u32);

/// Handle to a free function declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FunctionId(pub u32);

/// Handle to a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VariableId(pub u32);

/// The graph's `access` field on members and bases; `public` when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessSpecifier {
    /// Bound to the host and counted when ordering classes.
    #[default]
    Public,
    Protected,
    /// Never bound; private pure virtuals still block construction.
    Private,
}

/// Virtual dispatch kind of a member function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Virtuality {
    #[default]
    NotVirtual,
    Virtual,
    PureVirtual,
}

impl Virtuality {
    /// Whether calls dispatch through the vtable.
    pub fn is_virtual(self) -> bool {
        !matches!(self, Virtuality::NotVirtual)
    }
}

/// The graph's `kind` field on constructors.
///
/// Only `copy` changes what is generated: an artificial copy constructor
/// is left to pybind11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructorKind {
    Default,
    Copy,
    Move,
    /// Anything the parser did not classify.
    #[default]
    Other,
}

/// Source position of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    #[serde(default)]
    pub line: u32,
}

/// A function or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: CppType,
    /// Default value as spelled in the source, e.g. `1.0` or `{}`.
    #[serde(default)]
    pub default_value: Option<String>,
}

/// A member function of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFunction {
    pub name: String,
    pub return_type: CppType,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(default)]
    pub access: AccessSpecifier,
    #[serde(default)]
    pub virtuality: Virtuality,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_static: bool,
    /// Class that declares this member; nested classes' members are
    /// reported alongside their enclosing class and differ here.
    #[serde(skip)]
    pub owner: ClassId,
}

/// A constructor of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(default)]
    pub access: AccessSpecifier,
    #[serde(default)]
    pub kind: ConstructorKind,
    /// Implicitly declared by the compiler.
    #[serde(default)]
    pub is_artificial: bool,
    #[serde(skip)]
    pub owner: ClassId,
}

/// A direct base class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseSpecifier {
    /// Declaration name of the base, e.g. `AbstractMesh<2, 2>`.
    pub name: String,
    #[serde(default)]
    pub access: AccessSpecifier,
}

/// An enumeration nested in a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// A class, struct or template instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Declaration name, including template arguments for instantiations.
    pub name: String,
    #[serde(default)]
    pub is_struct: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub bases: Vec<BaseSpecifier>,
    #[serde(default)]
    pub member_functions: Vec<MemberFunction>,
    #[serde(default)]
    pub constructors: Vec<Constructor>,
    #[serde(default)]
    pub enumerations: Vec<EnumDecl>,
    /// Enclosing class name for nested types.
    #[serde(default)]
    pub parent: Option<String>,
}

/// A namespace-scope function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: CppType,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(default)]
    pub location: Option<Location>,
}

/// A namespace-scope variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: CppType,
    #[serde(default)]
    pub location: Option<Location>,
}
