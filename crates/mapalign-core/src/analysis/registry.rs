//! Problem registry: detected problems grouped by kind.

use std::collections::HashMap;

use tracing::{debug, info};

use super::problem::{Problem, ProblemKind};
use crate::tree::MappingTree;

/// Problems recorded during an analysis pass, grouped by kind.
///
/// Kinds are enumerated in the order they were first recorded, which keeps
/// reports and batch application deterministic.
#[derive(Debug, Clone, Default)]
pub struct ProblemRegistry {
    kinds: Vec<ProblemKind>,
    problems: HashMap<ProblemKind, Vec<Problem>>,
}

impl ProblemRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem.
    pub fn record(&mut self, problem: Problem) {
        if !self.kinds.contains(&problem.kind) {
            self.kinds.push(problem.kind);
        }
        self.problems.entry(problem.kind).or_default().push(problem);
    }

    /// Distinct kinds with pending problems, in first-recorded order.
    pub fn kinds(&self) -> &[ProblemKind] {
        &self.kinds
    }

    /// Pending problems of a kind, in recording order.
    pub fn problems(&self, kind: ProblemKind) -> &[Problem] {
        self.problems.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All pending problems, grouped by kind in first-recorded order.
    pub fn iter(&self) -> impl Iterator<Item = &Problem> + '_ {
        self.kinds.iter().flat_map(|kind| self.problems(*kind))
    }

    /// Number of pending problems of a kind.
    pub fn count(&self, kind: ProblemKind) -> usize {
        self.problems(kind).len()
    }

    /// Total number of pending problems.
    pub fn len(&self) -> usize {
        self.problems.values().map(Vec::len).sum()
    }

    /// Check if no problems are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply every resolution of a kind to the tree.
    ///
    /// The kind's problems are consumed, so each resolution is applied at
    /// most once. Returns the number of resolutions that changed the tree.
    pub fn accept_resolutions(&mut self, kind: ProblemKind, tree: &mut MappingTree) -> usize {
        let problems = self.take(kind);
        let total = problems.len();
        let mut applied = 0;
        for problem in &problems {
            if problem.resolution.apply(tree) {
                applied += 1;
            } else {
                debug!(
                    kind = %kind,
                    target = ?problem.resolution.target(),
                    "resolution had no effect"
                );
            }
        }

        info!(kind = %kind, total, applied, "applied resolutions");
        applied
    }

    /// Drop every problem of a kind without applying it.
    ///
    /// Returns the number of problems discarded.
    pub fn discard(&mut self, kind: ProblemKind) -> usize {
        let discarded = self.take(kind).len();
        if discarded > 0 {
            debug!(kind = %kind, discarded, "discarded problems");
        }
        discarded
    }

    fn take(&mut self, kind: ProblemKind) -> Vec<Problem> {
        self.kinds.retain(|k| *k != kind);
        self.problems.remove(&kind).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::problem::Resolution;
    use crate::tree::{ElementMapping, ElementRef, MemberKey, NamespaceId};

    fn tree_with_method() -> (MappingTree, ElementRef) {
        let mut tree = MappingTree::new("source", ["mojang"]).unwrap();
        let id = tree.add_class("a");
        tree.class_mut(id).unwrap().add_method("m", "()V");
        (tree, ElementRef::method(id, MemberKey::new("m", "()V")))
    }

    fn rename(target: &ElementRef, name: &str) -> Problem {
        Problem::new(
            ProblemKind::InheritanceError,
            target.clone(),
            Some("mojang".to_string()),
            Resolution::Rename {
                target: target.clone(),
                namespace: NamespaceId::new(0),
                name: name.to_string(),
            },
        )
    }

    fn remove(kind: ProblemKind, target: &ElementRef) -> Problem {
        Problem::new(
            kind,
            target.clone(),
            None,
            Resolution::Remove {
                target: target.clone(),
            },
        )
    }

    #[test]
    fn kinds_in_first_recorded_order() {
        let (_, method) = tree_with_method();
        let mut registry = ProblemRegistry::new();
        registry.record(remove(ProblemKind::Synthetic, &method));
        registry.record(rename(&method, "run"));
        registry.record(remove(ProblemKind::Synthetic, &method));

        assert_eq!(
            registry.kinds(),
            [ProblemKind::Synthetic, ProblemKind::InheritanceError]
        );
        assert_eq!(registry.count(ProblemKind::Synthetic), 2);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.iter().count(), 3);
        assert!(registry.problems(ProblemKind::NonExistentMapping).is_empty());
    }

    #[test]
    fn accept_applies_each_resolution_once() {
        let (mut tree, method) = tree_with_method();
        let mut registry = ProblemRegistry::new();
        registry.record(rename(&method, "run"));

        assert_eq!(registry.accept_resolutions(ProblemKind::InheritanceError, &mut tree), 1);
        assert_eq!(tree.element_name(&method, NamespaceId::new(0)), Some("run"));
        assert!(registry.kinds().is_empty());
        assert_eq!(registry.accept_resolutions(ProblemKind::InheritanceError, &mut tree), 0);
    }

    #[test]
    fn skipped_kind_leaves_tree_untouched() {
        let (mut tree, method) = tree_with_method();
        let mut registry = ProblemRegistry::new();
        registry.record(rename(&method, "run"));
        registry.record(remove(ProblemKind::Synthetic, &method));

        assert_eq!(registry.accept_resolutions(ProblemKind::InheritanceError, &mut tree), 1);
        assert_eq!(registry.discard(ProblemKind::Synthetic), 1);

        assert!(tree.contains(&method));
        assert!(registry.is_empty());
    }

    #[test]
    fn batches_tolerate_prior_removals() {
        let (mut tree, method) = tree_with_method();
        let mut registry = ProblemRegistry::new();
        registry.record(remove(ProblemKind::NonExistentMapping, &method));
        registry.record(remove(ProblemKind::Synthetic, &method));
        registry.record(rename(&method, "run"));

        assert_eq!(registry.accept_resolutions(ProblemKind::NonExistentMapping, &mut tree), 1);
        assert_eq!(registry.accept_resolutions(ProblemKind::Synthetic, &mut tree), 0);
        assert_eq!(registry.accept_resolutions(ProblemKind::InheritanceError, &mut tree), 0);

        let class = tree.get_class("a").unwrap();
        assert!(class.methods().is_empty());
        assert!(class.dst_names().is_empty());
    }
}
