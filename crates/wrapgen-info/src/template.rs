//! Template instantiation discovery.

use crate::source::find_classes_in_source;
use crate::tree::ClassInfo;
use wrapgen_config::TemplateSubstitution;
use wrapgen_decl::parse_template_args;

/// Parameter names declared by a template signature.
///
/// The type keyword and any default are dropped:
/// `<unsigned DIM_A, unsigned DIM_B = DIM_A>` gives `["DIM_A", "DIM_B"]`.
pub fn extract_template_params(signature: &str) -> Vec<String> {
    let signature = signature.trim();
    let inner = signature.strip_prefix('<').unwrap_or(signature);
    let inner = inner.strip_suffix('>').unwrap_or(inner);

    parse_template_args(inner)
        .iter()
        .filter_map(|param| {
            let declaration = param.split('=').next().unwrap_or(param).trim();
            declaration.split_whitespace().last().map(str::to_string)
        })
        .collect()
}

/// First rule whose signature introduces a definition of `class_name` in
/// the stripped `source`.
pub fn find_template_substitution<'r>(
    class_name: &str,
    source: &str,
    rules: &[&'r TemplateSubstitution],
) -> Option<&'r TemplateSubstitution> {
    rules.iter().copied().find(|rule| {
        !find_classes_in_source(source, Some(class_name), Some(rule.signature.trim())).is_empty()
    })
}

impl ClassInfo {
    /// Fill in template arguments from the first matching substitution rule.
    ///
    /// Classes with explicit `template_arg_lists` are left alone. Returns
    /// whether a rule matched.
    pub fn extract_templates(&mut self, source: &str, rules: &[&TemplateSubstitution]) -> bool {
        if self.is_generic() {
            return false;
        }

        let Some(rule) = find_template_substitution(&self.name, source, rules) else {
            return false;
        };

        let signature = rule.signature.trim().to_string();
        tracing::debug!(
            "Class {} matches template signature {} ({} instantiations)",
            self.name,
            signature,
            rule.replacement.len()
        );
        self.template_params = extract_template_params(&signature);
        self.template_arg_lists = rule.replacement.clone();
        self.template_signature = Some(signature);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::strip_source;
    use wrapgen_config::TemplateArg;

    fn rule(signature: &str, replacement: Vec<Vec<i64>>) -> TemplateSubstitution {
        TemplateSubstitution {
            signature: signature.to_string(),
            replacement: replacement
                .into_iter()
                .map(|args| args.into_iter().map(TemplateArg::Int).collect())
                .collect(),
        }
    }

    #[test]
    fn test_extract_template_params() {
        assert_eq!(extract_template_params("<int A, int B>"), vec!["A", "B"]);
        assert_eq!(
            extract_template_params("<unsigned DIM_A, unsigned DIM_B = DIM_A>"),
            vec!["DIM_A", "DIM_B"]
        );
        assert_eq!(extract_template_params("<int A, int B=A>"), vec!["A", "B"]);
        assert_eq!(
            extract_template_params("<unsigned int N, typename T = std::vector<int> >"),
            vec!["N", "T"]
        );
        assert!(extract_template_params("<>").is_empty());
    }

    #[test]
    fn test_resolves_matching_signature() {
        let source = strip_source("template <int A, int B>\nclass Foo\n{\n};\n");
        let rules = [
            rule("<unsigned DIM>", vec![vec![2], vec![3]]),
            rule("<int A, int B>", vec![vec![2, 2], vec![3, 3]]),
        ];
        let rule_refs: Vec<&TemplateSubstitution> = rules.iter().collect();

        let mut class = ClassInfo::new("Foo");
        assert!(class.extract_templates(&source, &rule_refs));
        assert_eq!(class.template_params, vec!["A", "B"]);
        assert_eq!(
            class.template_arg_lists,
            vec![
                vec![TemplateArg::Int(2), TemplateArg::Int(2)],
                vec![TemplateArg::Int(3), TemplateArg::Int(3)]
            ]
        );
        assert_eq!(class.template_signature.as_deref(), Some("<int A, int B>"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let source = strip_source("template<unsigned DIM> class Point {};");
        let rules = [
            rule("<unsigned DIM>", vec![vec![2]]),
            rule("<unsigned DIM>", vec![vec![3]]),
        ];
        let rule_refs: Vec<&TemplateSubstitution> = rules.iter().collect();

        let mut class = ClassInfo::new("Point");
        assert!(class.extract_templates(&source, &rule_refs));
        assert_eq!(class.template_arg_lists, vec![vec![TemplateArg::Int(2)]]);
    }

    #[test]
    fn test_no_match_leaves_class_non_generic() {
        let source = strip_source("class Foo {};");
        let rules = [rule("<int A>", vec![vec![1]])];
        let rule_refs: Vec<&TemplateSubstitution> = rules.iter().collect();

        let mut class = ClassInfo::new("Foo");
        assert!(!class.extract_templates(&source, &rule_refs));
        assert!(!class.is_generic());
        assert_eq!(class.instantiation_count(), 1);
    }

    #[test]
    fn test_explicit_arguments_take_precedence() {
        let source = strip_source("template <int A> class Foo {};");
        let rules = [rule("<int A>", vec![vec![1]])];
        let rule_refs: Vec<&TemplateSubstitution> = rules.iter().collect();

        let mut class = ClassInfo::new("Foo");
        class.template_arg_lists = vec![vec![TemplateArg::Int(7)]];
        assert!(!class.extract_templates(&source, &rule_refs));
        assert_eq!(class.template_arg_lists, vec![vec![TemplateArg::Int(7)]]);
        assert!(class.template_signature.is_none());
    }
}
