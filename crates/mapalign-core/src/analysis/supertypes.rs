//! Supertype closure: all mapped ancestors of a class.
//!
//! The closure is computed with an explicit worklist and a visited set keyed
//! by binary name, so cyclic or diamond-shaped hierarchies terminate and
//! contribute each ancestor once. Ancestors outside the tree (e.g. runtime
//! classes) end the walk along their branch.
//!
//! Ordering is a pre-order depth-first walk: for every class, its superclass
//! chain is explored before its interfaces, and interfaces are explored in
//! declaration order.

use std::collections::HashSet;

use tracing::trace;

use crate::tree::{ClassId, ClassMapping, ElementMapping, MappingTree};

/// Binary name prefix of the foreign runtime's classes.
pub const FOREIGN_RUNTIME_PREFIX: &str = "java/";

/// Collect all mapped supertypes of a class, closest first.
///
/// The result never contains the class itself and has no duplicates. A class
/// id that does not resolve yields an empty closure.
pub fn supertypes(tree: &MappingTree, class_id: ClassId) -> Vec<ClassId> {
    let Some(class) = tree.class(class_id) else {
        return Vec::new();
    };

    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(class.src_name());

    let mut worklist: Vec<&str> = direct_supertypes(tree, class).into_iter().rev().collect();
    let mut result = Vec::new();

    while let Some(name) = worklist.pop() {
        if !visited.insert(name) {
            continue;
        }
        let Some(id) = tree.class_id(name) else {
            continue;
        };
        let Some(ancestor) = tree.class(id) else {
            continue;
        };
        result.push(id);
        worklist.extend(direct_supertypes(tree, ancestor).into_iter().rev());
    }

    trace!(class = class.src_name(), count = result.len(), "computed supertypes");
    result
}

/// Immediate supertype names: the superclass followed by the interfaces.
pub fn direct_supertypes<'a>(tree: &MappingTree, class: &'a ClassMapping) -> Vec<&'a str> {
    let mut names = vec![tree.superclass(class)];
    names.extend(tree.interfaces(class));
    names
}

/// Check if every immediate supertype belongs to the foreign runtime.
pub fn has_only_foreign_supertypes(tree: &MappingTree, class: &ClassMapping) -> bool {
    direct_supertypes(tree, class)
        .iter()
        .all(|name| name.starts_with(FOREIGN_RUNTIME_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NS_INTERFACES, NS_SUPER};

    /// Build a tree from `(name, super, interfaces)` triples.
    fn hierarchy(classes: &[(&str, Option<&str>, &str)]) -> MappingTree {
        let mut tree = MappingTree::new("source", [NS_SUPER, NS_INTERFACES]).unwrap();
        let super_ns = tree.namespace_id(NS_SUPER);
        let interfaces_ns = tree.namespace_id(NS_INTERFACES);
        for (name, superclass, interfaces) in classes {
            let id = tree.add_class(name);
            let class = tree.class_mut(id).unwrap();
            class.set_dst_name(super_ns, superclass.map(str::to_string));
            if !interfaces.is_empty() {
                class.set_dst_name(interfaces_ns, Some(interfaces.to_string()));
            }
        }
        tree
    }

    fn closure_names(tree: &MappingTree, name: &str) -> Vec<String> {
        supertypes(tree, tree.class_id(name).unwrap())
            .into_iter()
            .map(|id| tree.class(id).unwrap().src_name().to_string())
            .collect()
    }

    #[test]
    fn empty_without_mapped_ancestors() {
        let tree = hierarchy(&[("a", None, ""), ("b", Some("java/util/AbstractList"), "x/Y")]);
        assert!(closure_names(&tree, "a").is_empty());
        assert!(closure_names(&tree, "b").is_empty());
    }

    #[test]
    fn superclass_chain_before_interfaces() {
        let tree = hierarchy(&[
            ("a", None, ""),
            ("b", Some("a"), "i"),
            ("c", Some("b"), "j,k"),
            ("i", None, ""),
            ("j", None, "i"),
            ("k", None, ""),
        ]);
        assert_eq!(closure_names(&tree, "c"), vec!["b", "a", "i", "j", "k"]);
    }

    #[test]
    fn diamonds_are_deduplicated() {
        let tree = hierarchy(&[
            ("top", None, ""),
            ("left", None, "top"),
            ("right", None, "top"),
            ("bottom", None, "left,right"),
        ]);
        assert_eq!(closure_names(&tree, "bottom"), vec!["left", "top", "right"]);
    }

    #[test]
    fn cycles_terminate_and_exclude_self() {
        let tree = hierarchy(&[("a", Some("b"), ""), ("b", Some("c"), "a"), ("c", Some("a"), "")]);
        assert_eq!(closure_names(&tree, "a"), vec!["b", "c"]);
        assert_eq!(closure_names(&tree, "b"), vec!["c", "a"]);
    }

    #[test]
    fn self_reference_is_ignored() {
        let tree = hierarchy(&[("a", Some("a"), "a")]);
        assert!(closure_names(&tree, "a").is_empty());
    }

    #[test]
    fn unknown_class_id_yields_nothing() {
        let tree = hierarchy(&[("a", None, "")]);
        assert!(supertypes(&tree, ClassId::new(42)).is_empty());
    }

    #[test]
    fn foreign_supertypes() {
        let tree = hierarchy(&[
            ("a", None, ""),
            ("b", Some("java/lang/Thread"), "java/lang/Runnable"),
            ("c", None, "a"),
            ("d", Some("a"), ""),
        ]);
        let check = |name: &str| has_only_foreign_supertypes(&tree, tree.get_class(name).unwrap());
        assert!(check("a"));
        assert!(check("b"));
        assert!(!check("c"));
        assert!(!check("d"));
    }
}
