//! Hierarchical attribute resolution.

use indexmap::IndexMap;
use wrapgen_config::{FeatureConfig, TemplateSubstitution};

/// A node's configuration together with every enclosing level, leaf first.
///
/// Scalar attributes resolve to the first non-empty value walking towards
/// the package; list attributes gather every level's values in the same
/// order.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    levels: Vec<&'a FeatureConfig>,
}

impl<'a> Scope<'a> {
    /// A scope with no enclosing level (the package).
    pub fn root(feature: &'a FeatureConfig) -> Self {
        Self {
            levels: vec![feature],
        }
    }

    /// Scope of a node owned by this one.
    pub fn child(&self, feature: &'a FeatureConfig) -> Self {
        let mut levels = Vec::with_capacity(self.levels.len() + 1);
        levels.push(feature);
        levels.extend(self.levels.iter().copied());
        Self { levels }
    }

    /// The node's own configuration.
    pub fn own(&self) -> &'a FeatureConfig {
        self.levels[0]
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// First non-empty string walking leaf to root.
    pub fn resolve(&self, get: impl Fn(&'a FeatureConfig) -> &'a Option<String>) -> Option<&'a str> {
        self.levels
            .iter()
            .copied()
            .find_map(|level| get(level).as_deref().filter(|value| !value.is_empty()))
    }

    /// First explicitly set flag walking leaf to root.
    pub fn resolve_flag(&self, get: impl Fn(&FeatureConfig) -> Option<bool>) -> Option<bool> {
        self.levels.iter().copied().find_map(|level| get(level))
    }

    /// Every level's values, leaf first.
    pub fn gather<T>(&self, get: impl Fn(&'a FeatureConfig) -> &'a [T]) -> Vec<&'a T> {
        self.levels
            .iter()
            .copied()
            .flat_map(|level| get(level).iter())
            .collect()
    }

    /// Gathered string values with all spaces removed.
    pub fn gather_compact(&self, get: impl Fn(&'a FeatureConfig) -> &'a [String]) -> Vec<String> {
        self.gather(get)
            .into_iter()
            .map(|value| value.replace(' ', ""))
            .collect()
    }

    /// Exclusion applies to the node itself; ancestors exclude by omission.
    pub fn excluded(&self) -> bool {
        self.own().excluded.unwrap_or(false)
    }

    pub fn smart_ptr_type(&self) -> Option<&'a str> {
        self.resolve(|f| &f.smart_ptr_type)
    }

    pub fn pointer_call_policy(&self) -> Option<&'a str> {
        self.resolve(|f| &f.pointer_call_policy)
    }

    pub fn reference_call_policy(&self) -> Option<&'a str> {
        self.resolve(|f| &f.reference_call_policy)
    }

    pub fn prefix_text(&self) -> Option<&'a str> {
        self.resolve(|f| &f.prefix_text)
    }

    pub fn custom_generator(&self) -> Option<&'a str> {
        self.resolve(|f| &f.custom_generator)
    }

    /// Include the header collection rather than per-class includes.
    pub fn common_include_file(&self) -> bool {
        self.resolve_flag(|f| f.common_include_file).unwrap_or(true)
    }

    pub fn exclude_default_args(&self) -> bool {
        self.resolve_flag(|f| f.exclude_default_args).unwrap_or(false)
    }

    /// Applicable substitution rules, nearest level first.
    pub fn template_substitutions(&self) -> Vec<&'a TemplateSubstitution> {
        self.gather(|f| f.template_substitutions.as_slice())
    }

    /// The effective name replacement table.
    ///
    /// Starts from [`default_name_replacements`] and applies each level's
    /// table from the package down, so nearer levels win.
    pub fn name_replacements(&self) -> IndexMap<String, String> {
        let mut table = default_name_replacements(self.smart_ptr_type());
        for level in self.levels.iter().rev() {
            for (pattern, replacement) in &level.name_replacements {
                table.insert(pattern.clone(), replacement.clone());
            }
        }
        table
    }
}

/// Built-in replacements, applied in order.
pub fn default_name_replacements(smart_ptr_type: Option<&str>) -> IndexMap<String, String> {
    let mut table = IndexMap::new();
    for (pattern, replacement) in [
        ("double", "Double"),
        ("unsigned int", "Unsigned"),
        ("Unsigned int", "Unsigned"),
        ("unsigned", "Unsigned"),
        ("std::vector", "Vector"),
        ("std::pair", "Pair"),
        ("std::map", "Map"),
        ("std::string", "String"),
        ("std::set", "Set"),
    ] {
        table.insert(pattern.to_string(), replacement.to_string());
    }
    table.insert(
        smart_ptr_type.unwrap_or("std::shared_ptr").to_string(),
        "SharedPtr".to_string(),
    );
    table.insert("*".to_string(), "Ptr".to_string());
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(f: impl FnOnce(&mut FeatureConfig)) -> FeatureConfig {
        let mut config = FeatureConfig::default();
        f(&mut config);
        config
    }

    #[test]
    fn test_resolve_walks_towards_root() {
        let package = feature(|f| {
            f.smart_ptr_type = Some("std::shared_ptr".into());
            f.pointer_call_policy = Some("reference".into());
        });
        let module = feature(|f| f.pointer_call_policy = Some(String::new()));
        let class = feature(|f| f.pointer_call_policy = Some("take_ownership".into()));

        let module_scope = Scope::root(&package).child(&module);
        let class_scope = module_scope.child(&class);

        assert_eq!(class_scope.depth(), 3);
        assert_eq!(class_scope.pointer_call_policy(), Some("take_ownership"));
        assert_eq!(module_scope.pointer_call_policy(), Some("reference"));
        assert_eq!(class_scope.smart_ptr_type(), Some("std::shared_ptr"));
        assert_eq!(class_scope.reference_call_policy(), None);
    }

    #[test]
    fn test_gather_concatenates_leaf_first() {
        let package = feature(|f| f.calldef_excludes = vec!["double *".into()]);
        let class = feature(|f| f.calldef_excludes = vec!["Foo".into(), "Bar".into()]);
        let scope = Scope::root(&package).child(&class);

        let gathered: Vec<&String> = scope.gather(|f| f.calldef_excludes.as_slice());
        assert_eq!(gathered, vec!["Foo", "Bar", "double *"]);
        assert_eq!(
            scope.gather_compact(|f| f.calldef_excludes.as_slice()),
            vec!["Foo", "Bar", "double*"]
        );
    }

    #[test]
    fn test_flags_and_defaults() {
        let package = FeatureConfig::default();
        let scope = Scope::root(&package);
        assert!(scope.common_include_file());
        assert!(!scope.exclude_default_args());
        assert!(!scope.excluded());

        let module = feature(|f| {
            f.common_include_file = Some(false);
            f.excluded = Some(true);
        });
        let class = FeatureConfig::default();
        let module_scope = scope.child(&module);
        assert!(!module_scope.common_include_file());
        assert!(module_scope.excluded());
        assert!(!module_scope.child(&class).excluded());
    }

    #[test]
    fn test_name_replacements_merge() {
        let package = feature(|f| {
            f.smart_ptr_type = Some("boost::shared_ptr".into());
            f.name_replacements.insert("double".into(), "Real".into());
        });
        let class = feature(|f| {
            f.name_replacements.insert("double".into(), "D".into());
            f.name_replacements.insert("Node".into(), "N".into());
        });
        let table = Scope::root(&package).child(&class).name_replacements();

        assert_eq!(table["double"], "D");
        assert_eq!(table["Node"], "N");
        assert_eq!(table["boost::shared_ptr"], "SharedPtr");
        assert!(!table.contains_key("std::shared_ptr"));
        assert_eq!(table.get_index_of("unsigned int"), Some(1));
    }
}
