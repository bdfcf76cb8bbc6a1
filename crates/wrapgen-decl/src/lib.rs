//! Native declarations as recovered by the external parser front-end.
//!
//! The generator never parses native source itself beyond a light textual
//! scan. Everything it knows about classes, members and free functions comes
//! from a JSON declaration graph written by an external tool, loaded into a
//! [`DeclIndex`] and consumed through the [`DeclarationQuery`] trait.

mod index;
mod model;
mod query;
mod tool;
mod types;

pub use index::{DeclGraph, DeclIndex};
pub use model::{
    AccessSpecifier, Argument, BaseSpecifier, ClassDecl, ClassId, Constructor, ConstructorKind,
    EnumDecl, FunctionDecl, FunctionId, Location, MemberFunction, VariableDecl, VariableId,
    Virtuality,
};
pub use query::DeclarationQuery;
pub use tool::{ParserTool, ParserToolConfig, ToolVersion};
pub use types::{parse_template_args, CppType};
