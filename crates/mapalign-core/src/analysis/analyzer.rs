//! The analysis pass: per-class contexts and the standard checks.
//!
//! A pass visits every class once through [`MappingAnalyzer::accept_class`],
//! then every field and method of that class through the returned
//! [`ClassContext`]. Checks only record [`Problem`]s; the tree is borrowed
//! shared for the whole pass and is only mutated later, when the caller
//! accepts the resolutions of a kind.
//!
//! # Checks
//!
//! - **Modifiers**: elements without a parsable `modifiers` value do not
//!   exist in the bytecode; elements with the synthetic bit are
//!   compiler-generated. Both are resolved by removal.
//! - **Inner class completion**: a nested class unnamed in a candidate
//!   namespace gets `<owner name>$<rest>` from its closest named owner.
//! - **Inheritance**: an overriding method takes the name of the method it
//!   overrides in every namespace that is not exempt.

use std::collections::HashSet;

use tracing::{debug, info};

use super::options::AnalysisOptions;
use super::problem::{Problem, ProblemKind, Resolution};
use super::registry::ProblemRegistry;
use super::supertypes::{has_only_foreign_supertypes, supertypes};
use crate::access::AccessFlags;
use crate::descriptor::is_override_compatible;
use crate::tree::{
    is_metadata_namespace, ClassId, ClassMapping, ElementMapping, ElementRef, FieldMapping,
    MappingTree, MethodMapping, NamespaceId, TreeError, NS_INTERFACES, NS_SUPER,
};

// ============================================================================
// Analyzer
// ============================================================================

/// Detects naming defects in a mapping tree and collects their fixes.
#[derive(Debug, Clone, Default)]
pub struct MappingAnalyzer {
    options: AnalysisOptions,
    registry: ProblemRegistry,
}

impl MappingAnalyzer {
    /// Create an analyzer with an empty registry.
    pub fn new(options: AnalysisOptions) -> Self {
        MappingAnalyzer {
            options,
            registry: ProblemRegistry::new(),
        }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Problems recorded so far.
    pub fn registry(&self) -> &ProblemRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ProblemRegistry {
        &mut self.registry
    }

    /// Distinct kinds with pending problems, in first-recorded order.
    pub fn problem_kinds(&self) -> &[ProblemKind] {
        self.registry.kinds()
    }

    /// Apply every pending resolution of a kind to the tree.
    ///
    /// Returns the number of resolutions that changed the tree.
    pub fn accept_resolutions(&mut self, kind: ProblemKind, tree: &mut MappingTree) -> usize {
        self.registry.accept_resolutions(kind, tree)
    }

    /// Run a whole pass: every class, then its fields, then its methods.
    pub fn analyze(&mut self, tree: &MappingTree) {
        let before = self.registry.len();
        let mut classes = 0usize;

        for (id, _) in tree.classes() {
            let Ok(mut context) = self.accept_class(tree, id) else {
                continue;
            };
            let class = context.class();
            for field in class.fields() {
                context.accept_field(field);
            }
            for method in class.methods() {
                context.accept_method(method);
            }
            classes += 1;
        }

        info!(
            classes,
            problems = self.registry.len() - before,
            kinds = self.registry.kinds().len(),
            "analysis pass complete"
        );
    }

    /// Visit a class and create the context for visiting its members.
    ///
    /// Checks the class's modifiers and completes missing inner class names
    /// in the candidate namespaces.
    pub fn accept_class<'a>(
        &'a mut self,
        tree: &'a MappingTree,
        class_id: ClassId,
    ) -> Result<ClassContext<'a>, TreeError> {
        let class = tree
            .class(class_id)
            .ok_or(TreeError::ClassNotFound { id: class_id })?;

        self.check_element_modifiers(tree, class, ElementRef::class(class_id));

        for ns in tree.dst_namespace_ids() {
            let is_candidate = tree
                .namespace_name(ns)
                .is_some_and(|name| self.options.inner_class_name_completion_candidates.contains(name));
            if is_candidate {
                self.complete_inner_class_name(tree, class_id, class, ns);
            }
        }

        Ok(ClassContext::new(self, tree, class_id, class))
    }

    /// Record modifier problems of an element.
    fn check_element_modifiers(
        &mut self,
        tree: &MappingTree,
        element: &dyn ElementMapping,
        target: ElementRef,
    ) {
        match AccessFlags::of(tree, element) {
            None => {
                let resolution = Resolution::Remove {
                    target: target.clone(),
                };
                self.record(
                    tree,
                    Problem::new(ProblemKind::NonExistentMapping, target, None, resolution),
                );
            }
            Some(flags) if flags.is_synthetic() => {
                let resolution = Resolution::Remove {
                    target: target.clone(),
                };
                self.record(
                    tree,
                    Problem::new(ProblemKind::Synthetic, target, None, resolution),
                );
            }
            Some(_) => {}
        }
    }

    /// Derive a missing nested class name from its closest named owner.
    fn complete_inner_class_name(
        &mut self,
        tree: &MappingTree,
        class_id: ClassId,
        class: &ClassMapping,
        ns: NamespaceId,
    ) {
        if class.dst_name(ns).is_some() {
            return;
        }

        let src_name = class.src_name();
        let mut owner = src_name;
        while let Some(index) = owner.rfind('$') {
            owner = &src_name[..index];
            let Some(owner_name) = tree.get_class(owner).and_then(|c| c.dst_name(ns)) else {
                continue;
            };

            let target = ElementRef::class(class_id);
            let resolution = Resolution::Rename {
                target: target.clone(),
                namespace: ns,
                name: format!("{}${}", owner_name, &src_name[index + 1..]),
            };
            let namespace = tree.namespace_name(ns).map(str::to_string);
            self.record(
                tree,
                Problem::new(
                    ProblemKind::InnerClassOwnerNotMapped,
                    target,
                    namespace,
                    resolution,
                ),
            );
            return;
        }
    }

    fn record(&mut self, tree: &MappingTree, problem: Problem) {
        let element = tree.describe(&problem.element);
        debug!(
            kind = %problem.kind,
            element = element.as_deref().unwrap_or("<removed>"),
            namespace = problem.namespace.as_deref(),
            "recorded problem"
        );
        self.registry.record(problem);
    }
}

// ============================================================================
// Class Context
// ============================================================================

/// Per-class analysis state, built once when the class is visited.
///
/// Holds the supertype closure and the namespace sets the member checks need,
/// so each member visit only walks the ancestors' methods.
#[derive(Debug)]
pub struct ClassContext<'a> {
    analyzer: &'a mut MappingAnalyzer,
    tree: &'a MappingTree,
    class_id: ClassId,
    class: &'a ClassMapping,
    supertypes: Vec<ClassId>,
    additional_namespaces: Vec<NamespaceId>,
    correction_targets: Vec<NamespaceId>,
    skip_inheritance_checks: bool,
}

impl<'a> ClassContext<'a> {
    fn new(
        analyzer: &'a mut MappingAnalyzer,
        tree: &'a MappingTree,
        class_id: ClassId,
        class: &'a ClassMapping,
    ) -> Self {
        let options = &analyzer.options;

        let additional_namespaces = options
            .inheritance_additional_namespaces
            .iter()
            .map(|name| tree.namespace_id(name))
            .filter(|ns| !ns.is_null())
            .collect();

        let correction_targets = tree
            .dst_namespace_ids()
            .filter(|ns| {
                tree.namespace_name(*ns).is_some_and(|name| {
                    !is_metadata_namespace(name) && !options.inheritance_error_exemptions.contains(name)
                })
            })
            .collect();

        let lacks_hierarchy = !tree.has_namespace(NS_SUPER) && !tree.has_namespace(NS_INTERFACES);
        let skip_inheritance_checks = lacks_hierarchy || has_only_foreign_supertypes(tree, class);

        ClassContext {
            analyzer,
            tree,
            class_id,
            class,
            supertypes: supertypes(tree, class_id),
            additional_namespaces,
            correction_targets,
            skip_inheritance_checks,
        }
    }

    /// The visited class.
    pub fn class(&self) -> &'a ClassMapping {
        self.class
    }

    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Mapped supertypes of the class, closest first.
    pub fn supertypes(&self) -> &[ClassId] {
        &self.supertypes
    }

    /// Whether methods of this class are exempt from inheritance correction.
    pub fn skips_inheritance_checks(&self) -> bool {
        self.skip_inheritance_checks
    }

    /// Visit a field of the class.
    pub fn accept_field(&mut self, field: &FieldMapping) {
        let target = ElementRef::field(self.class_id, field.key().clone());
        self.analyzer.check_element_modifiers(self.tree, field, target);
    }

    /// Visit a method of the class.
    ///
    /// Besides the modifier check, aligns the method's names with the first
    /// overridden ancestor method named in each correction target. Private
    /// methods neither override nor get overridden.
    pub fn accept_method(&mut self, method: &MethodMapping) {
        let target = ElementRef::method(self.class_id, method.key().clone());
        self.analyzer
            .check_element_modifiers(self.tree, method, target.clone());

        if self.skip_inheritance_checks || AccessFlags::of_or_empty(self.tree, method).is_private() {
            return;
        }

        let mut pending = self.correction_targets.clone();
        if pending.is_empty() {
            return;
        }

        let alternates = alternate_names(method, &self.additional_namespaces);

        for ancestor in self.supertypes.iter().filter_map(|id| self.tree.class(*id)) {
            for super_method in ancestor.methods() {
                if !is_override_compatible(super_method.src_desc(), method.src_desc())
                    || AccessFlags::of_or_empty(self.tree, super_method).is_private()
                {
                    continue;
                }

                let rejected_by_name = super_method.src_name() != method.src_name();
                if rejected_by_name
                    && alternates.is_disjoint(&alternate_names(super_method, &self.additional_namespaces))
                {
                    continue;
                }

                let mut corrections = Vec::new();
                pending.retain(|&ns| {
                    let Some(super_name) = super_method.dst_name(ns) else {
                        return true;
                    };
                    let name = method.dst_name(ns);
                    // a name picked through the alternate identity is kept
                    let chosen = rejected_by_name && name.is_some();
                    if !chosen && name != Some(super_name) {
                        corrections.push((ns, super_name.to_string()));
                    }
                    false
                });

                for (ns, name) in corrections {
                    let namespace = self.tree.namespace_name(ns).map(str::to_string);
                    let resolution = Resolution::Rename {
                        target: target.clone(),
                        namespace: ns,
                        name,
                    };
                    self.analyzer.record(
                        self.tree,
                        Problem::new(
                            ProblemKind::InheritanceError,
                            target.clone(),
                            namespace,
                            resolution,
                        ),
                    );
                }

                if pending.is_empty() {
                    return;
                }
            }
        }
    }
}

/// Names of a method across the alternate identity namespaces.
fn alternate_names<'m>(method: &'m MethodMapping, namespaces: &[NamespaceId]) -> HashSet<&'m str> {
    namespaces
        .iter()
        .filter_map(|ns| method.dst_name(*ns))
        .collect()
}
