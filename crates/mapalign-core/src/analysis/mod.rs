//! Mapping analysis: problem detection and deferred correction.
//!
//! The analyzer never mutates the tree it inspects. Every defect becomes a
//! [`Problem`] carrying a [`Resolution`]; the caller decides per
//! [`ProblemKind`] whether to commit the resolutions.
//!
//! ```
//! use mapalign_core::analysis::{AnalysisOptions, MappingAnalyzer, ProblemKind};
//! use mapalign_core::tree::MappingTree;
//!
//! let mut tree = MappingTree::new("source", ["mojang", "modifiers"]).unwrap();
//! let id = tree.add_class("a");
//! tree.class_mut(id).unwrap().add_field("b", "I");
//!
//! let mut analyzer = MappingAnalyzer::new(AnalysisOptions::default());
//! analyzer.analyze(&tree);
//! assert_eq!(analyzer.problem_kinds(), [ProblemKind::NonExistentMapping]);
//!
//! analyzer.accept_resolutions(ProblemKind::NonExistentMapping, &mut tree);
//! assert_eq!(tree.class_count(), 0);
//! ```

pub mod analyzer;
pub mod options;
pub mod problem;
pub mod registry;
pub mod supertypes;

pub use analyzer::{ClassContext, MappingAnalyzer};
pub use options::AnalysisOptions;
pub use problem::{Problem, ProblemKind, Resolution, UnknownProblemKind};
pub use registry::ProblemRegistry;
