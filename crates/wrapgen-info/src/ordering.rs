//! Registration order of a module's classes.
//!
//! A class must be registered after its bases and after the classes its
//! public signatures mention. Classes are first ordered by name, then
//! emitted one at a time: the next class is always the earliest (by name)
//! whose dependencies have all been emitted. Mutual references impose no
//! constraint. Longer reference cycles are broken by emitting the earliest
//! remaining class.

use crate::tree::ClassInfo;
use regex::Regex;
use wrapgen_decl::{AccessSpecifier, DeclarationQuery};

/// Whether `class` directly inherits from any instantiation of `other`.
fn extends(class: &ClassInfo, other: &ClassInfo) -> bool {
    class
        .base_decls
        .iter()
        .flatten()
        .any(|base| other.decls.contains(base))
}

/// Argument types of every public constructor and member function.
fn public_argument_types(class: &ClassInfo, query: &dyn DeclarationQuery) -> Vec<String> {
    let mut types = Vec::new();
    for &decl in &class.decls {
        for method in query.member_functions(decl) {
            if method.access == AccessSpecifier::Public {
                types.extend(method.arguments.iter().map(|a| a.ty.spelling().to_string()));
            }
        }
        for ctor in query.constructors(decl) {
            if ctor.access == AccessSpecifier::Public {
                types.extend(ctor.arguments.iter().map(|a| a.ty.spelling().to_string()));
            }
        }
    }
    types
}

fn name_pattern(name: &str) -> Option<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(name))).ok()
}

/// Reorder `classes` so that every class follows what it depends on.
///
/// Classes without declarations neither depend on nor are depended upon,
/// so they keep their place in the name order.
pub fn sort_classes(classes: &mut Vec<ClassInfo>, query: &dyn DeclarationQuery) {
    classes.sort_by(|a, b| a.name.cmp(&b.name));

    let n = classes.len();
    if n < 2 {
        return;
    }

    let arg_types: Vec<Vec<String>> = classes
        .iter()
        .map(|class| public_argument_types(class, query))
        .collect();
    let patterns: Vec<Option<Regex>> = classes.iter().map(|c| name_pattern(&c.name)).collect();

    let mut requires = vec![false; n * n];
    for a in 0..n {
        if classes[a].decls.is_empty() {
            continue;
        }
        for b in 0..n {
            if a == b || classes[b].decls.is_empty() {
                continue;
            }
            if let Some(pattern) = &patterns[b] {
                requires[a * n + b] = arg_types[a].iter().any(|ty| pattern.is_match(ty));
            }
        }
    }

    // must_follow[a * n + b]: a is registered after b.
    let mut must_follow = vec![false; n * n];
    let mut pending = vec![0usize; n];
    for a in 0..n {
        for b in 0..n {
            if a == b || classes[a].decls.is_empty() || classes[b].decls.is_empty() {
                continue;
            }
            // Inheritance wins over a base mentioning its own subclass.
            let follows = extends(&classes[a], &classes[b])
                || (requires[a * n + b]
                    && !requires[b * n + a]
                    && !extends(&classes[b], &classes[a]));
            if follows {
                must_follow[a * n + b] = true;
                pending[a] += 1;
            }
        }
    }

    let mut emitted = vec![false; n];
    let mut order = Vec::with_capacity(n);
    while order.len() < n {
        let next = match (0..n).find(|&i| !emitted[i] && pending[i] == 0) {
            Some(i) => i,
            None => {
                let Some(i) = (0..n).find(|&i| !emitted[i]) else {
                    break;
                };
                tracing::warn!(
                    "Dependency cycle involving class {}; registering it before its dependencies",
                    classes[i].name
                );
                i
            }
        };

        emitted[next] = true;
        order.push(next);
        for a in 0..n {
            if !emitted[a] && must_follow[a * n + next] {
                pending[a] -= 1;
            }
        }
    }

    let mut position = vec![0usize; n];
    for (pos, &idx) in order.iter().enumerate() {
        position[idx] = pos;
    }

    let mut ranked: Vec<(usize, ClassInfo)> = std::mem::take(classes)
        .into_iter()
        .enumerate()
        .map(|(idx, class)| (position[idx], class))
        .collect();
    ranked.sort_by_key(|(pos, _)| *pos);
    *classes = ranked.into_iter().map(|(_, class)| class).collect();

    tracing::debug!(
        "Class order: {}",
        classes
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
}
