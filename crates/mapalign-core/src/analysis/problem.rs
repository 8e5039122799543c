//! Problems and their deferred resolutions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tree::{ElementRef, MappingTree, NamespaceId};

/// The kinds of defects detected by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemKind {
    /// The element has no parsable `modifiers` value, so no bytecode record
    /// backs it.
    NonExistentMapping,
    /// The element is compiler-generated.
    Synthetic,
    /// An inner class has no name although its enclosing class does.
    InnerClassOwnerNotMapped,
    /// An overriding method is named differently than the method it overrides.
    InheritanceError,
}

impl ProblemKind {
    /// Every kind, in declaration order.
    pub const ALL: [ProblemKind; 4] = [
        ProblemKind::NonExistentMapping,
        ProblemKind::Synthetic,
        ProblemKind::InnerClassOwnerNotMapped,
        ProblemKind::InheritanceError,
    ];

    /// Stable name, as used in configuration and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemKind::NonExistentMapping => "NON_EXISTENT_MAPPING",
            ProblemKind::Synthetic => "SYNTHETIC",
            ProblemKind::InnerClassOwnerNotMapped => "INNER_CLASS_OWNER_NOT_MAPPED",
            ProblemKind::InheritanceError => "INHERITANCE_ERROR",
        }
    }

    /// Short human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            ProblemKind::NonExistentMapping => "element does not exist in the bytecode",
            ProblemKind::Synthetic => "element is synthetic",
            ProblemKind::InnerClassOwnerNotMapped => {
                "inner class is not mapped while its owner is"
            }
            ProblemKind::InheritanceError => "overriding method is named inconsistently",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown problem kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown problem kind '{0}'")]
pub struct UnknownProblemKind(pub String);

impl FromStr for ProblemKind {
    type Err = UnknownProblemKind;

    /// Parses stable names case-insensitively, accepting `-` for `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_uppercase();
        ProblemKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownProblemKind(s.to_string()))
    }
}

/// A deferred fix for a problem.
///
/// Resolutions are plain values: recording one has no effect on the tree
/// until [`Resolution::apply`] is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Resolution {
    /// Detach the element from its owner.
    Remove { target: ElementRef },
    /// Overwrite the element's name in a namespace.
    Rename {
        target: ElementRef,
        namespace: NamespaceId,
        name: String,
    },
}

impl Resolution {
    /// The element this resolution acts on.
    pub fn target(&self) -> &ElementRef {
        match self {
            Resolution::Remove { target } | Resolution::Rename { target, .. } => target,
        }
    }

    /// Apply the resolution to a tree.
    ///
    /// Returns `true` if the tree changed. Removing an element that is
    /// already gone and renaming an element that no longer exists are no-ops.
    pub fn apply(&self, tree: &mut MappingTree) -> bool {
        match self {
            Resolution::Remove { target } => tree.remove_element(target),
            Resolution::Rename {
                target,
                namespace,
                name,
            } => {
                if namespace.is_null() {
                    return false;
                }
                tree.set_element_name(target, *namespace, Some(name.clone()))
            }
        }
    }
}

/// A detected defect with its deferred fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// What kind of defect this is.
    pub kind: ProblemKind,
    /// The affected element.
    pub element: ElementRef,
    /// The namespace the defect concerns, if it is namespace-specific.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// The fix, applied only on request.
    pub resolution: Resolution,
}

impl Problem {
    /// Create a new problem.
    pub fn new(
        kind: ProblemKind,
        element: ElementRef,
        namespace: Option<String>,
        resolution: Resolution,
    ) -> Self {
        Problem {
            kind,
            element,
            namespace,
            resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{ElementMapping, MemberKey};

    mod kind_tests {
        use super::*;

        #[test]
        fn parses_stable_names() {
            assert_eq!(
                "INHERITANCE_ERROR".parse::<ProblemKind>(),
                Ok(ProblemKind::InheritanceError)
            );
            assert_eq!("synthetic".parse::<ProblemKind>(), Ok(ProblemKind::Synthetic));
            assert_eq!(
                "inner-class-owner-not-mapped".parse::<ProblemKind>(),
                Ok(ProblemKind::InnerClassOwnerNotMapped)
            );
            assert_eq!(
                "bogus".parse::<ProblemKind>(),
                Err(UnknownProblemKind("bogus".to_string()))
            );
        }

        #[test]
        fn display_matches_serde() {
            for kind in ProblemKind::ALL {
                let json = serde_json::to_string(&kind).unwrap();
                assert_eq!(json, format!("\"{}\"", kind));
            }
        }
    }

    mod resolution_tests {
        use super::*;

        #[test]
        fn rename_sets_name() {
            let mut tree = MappingTree::new("source", ["mojang"]).unwrap();
            let id = tree.add_class("a");
            tree.class_mut(id).unwrap().add_method("m", "()V");
            let target = ElementRef::method(id, MemberKey::new("m", "()V"));

            let resolution = Resolution::Rename {
                target: target.clone(),
                namespace: NamespaceId::new(0),
                name: "run".to_string(),
            };
            assert!(resolution.apply(&mut tree));
            assert_eq!(tree.element_name(&target, NamespaceId::new(0)), Some("run"));
        }

        #[test]
        fn rename_never_targets_null_namespace() {
            let mut tree = MappingTree::new("source", ["mojang"]).unwrap();
            let id = tree.add_class("a");
            let resolution = Resolution::Rename {
                target: ElementRef::class(id),
                namespace: NamespaceId::NULL,
                name: "x".to_string(),
            };
            assert!(!resolution.apply(&mut tree));
            assert!(tree.class(id).unwrap().dst_names().iter().all(Option::is_none));
        }

        #[test]
        fn remove_is_idempotent() {
            let mut tree = MappingTree::new("source", ["mojang"]).unwrap();
            let id = tree.add_class("a");
            tree.class_mut(id).unwrap().add_field("f", "I");
            let field = ElementRef::field(id, MemberKey::new("f", "I"));

            let remove_field = Resolution::Remove {
                target: field.clone(),
            };
            let remove_class = Resolution::Remove {
                target: ElementRef::class(id),
            };

            assert!(remove_class.apply(&mut tree));
            assert!(!remove_field.apply(&mut tree));
            assert!(!remove_class.apply(&mut tree));
            assert!(!Resolution::Rename {
                target: field,
                namespace: NamespaceId::new(0),
                name: "x".to_string(),
            }
            .apply(&mut tree));
        }

        #[test]
        fn serializes_as_tagged_variant() {
            let resolution = Resolution::Rename {
                target: ElementRef::class(crate::tree::ClassId::new(3)),
                namespace: NamespaceId::new(1),
                name: "Foo".to_string(),
            };
            let value = serde_json::to_value(&resolution).unwrap();
            assert_eq!(value["action"], "rename");
            assert_eq!(value["target"]["element"], "class");
            assert_eq!(value["target"]["id"], 3);
            assert_eq!(value["namespace"], 1);
            assert_eq!(value["name"], "Foo");
        }
    }
}
