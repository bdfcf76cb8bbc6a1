//! Lookup interface over parsed declarations.

use crate::model::{
    AccessSpecifier, ClassDecl, ClassId, Constructor, FunctionDecl, FunctionId, MemberFunction,
    VariableDecl, VariableId,
};

/// Read access to the declaration graph.
///
/// Name lookups ignore whitespace, so `Foo<2, 2>` and `Foo<2,2>` resolve to
/// the same class. `None` means "not found"; deciding whether that is fatal
/// is left to the caller.
pub trait DeclarationQuery {
    fn find_class(&self, name: &str) -> Option<ClassId>;
    fn class(&self, id: ClassId) -> &ClassDecl;
    /// Every class, in graph order.
    fn class_ids(&self) -> Vec<ClassId>;

    /// First free function with this name.
    fn find_function(&self, name: &str) -> Option<FunctionId>;
    fn function(&self, id: FunctionId) -> &FunctionDecl;
    fn function_ids(&self) -> Vec<FunctionId>;

    fn find_variable(&self, name: &str) -> Option<VariableId>;
    fn variable(&self, id: VariableId) -> &VariableDecl;
    fn variable_ids(&self) -> Vec<VariableId>;

    /// Member functions of the class and of every class nested inside it.
    /// Each entry's `owner` tells the two apart.
    fn member_functions(&self, id: ClassId) -> Vec<&MemberFunction>;

    /// Constructors of the class and of every class nested inside it.
    fn constructors(&self, id: ClassId) -> Vec<&Constructor>;

    /// Direct bases that resolve to a known declaration.
    fn bases(&self, id: ClassId) -> Vec<(ClassId, AccessSpecifier)> {
        self.class(id)
            .bases
            .iter()
            .filter_map(|base| self.find_class(&base.name).map(|b| (b, base.access)))
            .collect()
    }

    /// All direct and indirect bases, nearest first, without duplicates.
    fn recursive_bases(&self, id: ClassId) -> Vec<ClassId> {
        let mut result: Vec<ClassId> = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            for (base, _) in self.bases(current) {
                if base != id && !result.contains(&base) {
                    result.push(base);
                    pending.push(base);
                }
            }
        }
        result
    }
}
