//! Configuration handling for mapalign.
//!
//! Configuration lives in a `mapalign.toml` file:
//!
//! ```toml
//! [analysis]
//! inner_class_name_completion_candidates = ["spigot"]
//! inheritance_additional_namespaces = ["searge"]
//! inheritance_error_exemptions = []
//!
//! [resolutions]
//! skip = ["INNER_CLASS_OWNER_NOT_MAPPED"]
//! keep_synthetic = false
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::{AnalysisOptions, MappingAnalyzer, ProblemKind};
use crate::tree::MappingTree;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "mapalign.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// mapalign configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Analysis settings
    #[serde(default)]
    pub analysis: AnalysisOptions,

    /// Which problem kinds get their resolutions applied
    #[serde(default)]
    pub resolutions: ResolutionPolicy,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `mapalign.toml` from a directory, falling back to defaults
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Config::default())
        }
    }
}

// ============================================================================
// Resolution Policy
// ============================================================================

/// Caller policy deciding which problem kinds to fix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolutionPolicy {
    /// Kinds whose resolutions are never applied.
    pub skip: BTreeSet<ProblemKind>,

    /// Keep synthetic members (never apply `SYNTHETIC` resolutions).
    pub keep_synthetic: bool,
}

/// What happened to one problem kind when a policy was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KindOutcome {
    pub kind: ProblemKind,
    /// Problems of this kind that were pending.
    pub problems: usize,
    /// Resolutions that changed the tree.
    pub applied: usize,
    /// The policy skipped this kind.
    pub skipped: bool,
}

impl ResolutionPolicy {
    /// Check if resolutions of a kind should be applied.
    pub fn should_apply(&self, kind: ProblemKind) -> bool {
        if self.keep_synthetic && kind == ProblemKind::Synthetic {
            return false;
        }
        !self.skip.contains(&kind)
    }

    /// Apply or discard every pending kind, in first-recorded order.
    ///
    /// Skipped kinds are dropped from the registry without touching the tree.
    pub fn apply(&self, analyzer: &mut MappingAnalyzer, tree: &mut MappingTree) -> Vec<KindOutcome> {
        let kinds = analyzer.problem_kinds().to_vec();
        let mut outcomes = Vec::with_capacity(kinds.len());

        for kind in kinds {
            let problems = analyzer.registry().count(kind);
            let outcome = if self.should_apply(kind) {
                KindOutcome {
                    kind,
                    problems,
                    applied: analyzer.accept_resolutions(kind, tree),
                    skipped: false,
                }
            } else {
                info!(kind = %kind, problems, "skipping resolutions");
                analyzer.registry_mut().discard(kind);
                KindOutcome {
                    kind,
                    problems,
                    applied: 0,
                    skipped: true,
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn empty_file_is_default() {
            assert_eq!(Config::parse("").unwrap(), Config::default());
        }

        #[test]
        fn reads_both_tables() {
            let config = Config::parse(
                r#"
                [analysis]
                inner_class_name_completion_candidates = ["spigot"]
                inheritance_additional_namespaces = ["searge"]

                [resolutions]
                skip = ["INHERITANCE_ERROR"]
                keep_synthetic = true
                "#,
            )
            .unwrap();

            assert!(config
                .analysis
                .inner_class_name_completion_candidates
                .contains("spigot"));
            assert!(config.analysis.inheritance_error_exemptions.is_empty());
            assert!(config.resolutions.skip.contains(&ProblemKind::InheritanceError));
            assert!(config.resolutions.keep_synthetic);
        }

        #[test]
        fn rejects_unknown_keys_and_kinds() {
            assert!(Config::parse("[analysis]\nbogus = []\n").is_err());
            assert!(Config::parse("[resolutions]\nskip = [\"BOGUS\"]\n").is_err());
            assert!(Config::parse("[extra]\n").is_err());
        }

        #[test]
        fn load_from_dir_falls_back_to_default() {
            let dir = tempfile::tempdir().unwrap();
            assert_eq!(Config::load_from_dir(dir.path()).unwrap(), Config::default());

            fs::write(
                dir.path().join(CONFIG_FILE_NAME),
                "[resolutions]\nkeep_synthetic = true\n",
            )
            .unwrap();
            assert!(Config::load_from_dir(dir.path()).unwrap().resolutions.keep_synthetic);
        }

        #[test]
        fn load_reports_path() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("broken.toml");
            fs::write(&path, "[analysis").unwrap();

            let err = Config::load(&path).unwrap_err();
            assert!(matches!(err, ConfigError::Parse { .. }));
            assert!(err.to_string().contains("broken.toml"));

            let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
            assert!(matches!(err, ConfigError::Read { .. }));
        }
    }

    mod policy_tests {
        use super::*;
        use crate::tree::{ElementMapping, NS_MODIFIERS};

        #[test]
        fn should_apply() {
            let policy = ResolutionPolicy::default();
            assert!(ProblemKind::ALL.iter().all(|kind| policy.should_apply(*kind)));

            let policy = ResolutionPolicy {
                skip: BTreeSet::from([ProblemKind::InheritanceError]),
                keep_synthetic: true,
            };
            assert!(!policy.should_apply(ProblemKind::Synthetic));
            assert!(!policy.should_apply(ProblemKind::InheritanceError));
            assert!(policy.should_apply(ProblemKind::NonExistentMapping));
        }

        #[test]
        fn apply_respects_skips() {
            let mut tree = MappingTree::new("source", [NS_MODIFIERS]).unwrap();
            let modifiers = tree.namespace_id(NS_MODIFIERS);
            let id = tree.add_class("a");
            let class = tree.class_mut(id).unwrap();
            class.set_dst_name(modifiers, Some("1".to_string()));
            class
                .add_method("access$000", "()V")
                .set_dst_name(modifiers, Some("4104".to_string()));
            class.add_field("gone", "I");

            let mut analyzer = MappingAnalyzer::default();
            analyzer.analyze(&tree);
            assert_eq!(
                analyzer.problem_kinds(),
                [ProblemKind::NonExistentMapping, ProblemKind::Synthetic]
            );

            let policy = ResolutionPolicy {
                keep_synthetic: true,
                ..ResolutionPolicy::default()
            };
            let outcomes = policy.apply(&mut analyzer, &mut tree);

            assert_eq!(
                outcomes,
                vec![
                    KindOutcome {
                        kind: ProblemKind::NonExistentMapping,
                        problems: 1,
                        applied: 1,
                        skipped: false,
                    },
                    KindOutcome {
                        kind: ProblemKind::Synthetic,
                        problems: 1,
                        applied: 0,
                        skipped: true,
                    },
                ]
            );
            let class = tree.get_class("a").unwrap();
            assert!(class.fields().is_empty());
            assert_eq!(class.methods().len(), 1);
            assert!(analyzer.registry().is_empty());
        }
    }
}
