//! CLI front door.
//!
//! Provides the command implementations behind the `mapalign` binary:
//! - `analyze` - Detect problems and report them (tree left untouched)
//! - `fix` - Detect problems, apply the policy's kinds, write the result
//! - `namespaces` - List the namespaces of a mapping file
//!
//! ## Configuration
//!
//! Settings come from `mapalign.toml`: the file given with `--config`, or
//! else the one next to the input mappings, or else defaults. Command-line
//! flags extend the namespace sets and the skip list of the file.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, MapalignError>`, which carries the stable
//! error code used for the JSON error response and the exit status.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use mapalign_core::analysis::{AnalysisOptions, MappingAnalyzer, ProblemKind};
use mapalign_core::config::Config;
use mapalign_core::error::MapalignError;
use mapalign_core::output::{AnalyzeResponse, NamespacesResponse};
use mapalign_core::tree::{tiny, MappingTree};

/// Options shared by `analyze` and `fix`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit configuration file.
    pub config: Option<PathBuf>,
    /// Extra inner class name completion namespaces.
    pub complete_inner_classes: Vec<String>,
    /// Extra alternate override identity namespaces.
    pub additional_namespaces: Vec<String>,
    /// Extra namespaces exempt from inheritance correction.
    pub exempt: Vec<String>,
    /// Extra problem kinds never applied by `fix`.
    pub skip: Vec<String>,
    /// Never apply `SYNTHETIC` resolutions.
    pub keep_synthetic: bool,
    /// Report per-kind counts only.
    pub summary_only: bool,
}

impl RunOptions {
    /// Resolve the effective configuration for an input file.
    pub fn resolve(&self, input: &Path) -> Result<Config, MapalignError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => {
                let dir = input.parent().unwrap_or_else(|| Path::new("."));
                let dir = if dir.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    dir
                };
                Config::load_from_dir(dir)?
            }
        };

        config.analysis = config.analysis.merge(AnalysisOptions {
            inner_class_name_completion_candidates: self.complete_inner_classes.iter().cloned().collect(),
            inheritance_additional_namespaces: self.additional_namespaces.iter().cloned().collect(),
            inheritance_error_exemptions: self.exempt.iter().cloned().collect(),
        });

        for kind in &self.skip {
            config.resolutions.skip.insert(kind.parse::<ProblemKind>()?);
        }
        config.resolutions.keep_synthetic |= self.keep_synthetic;

        Ok(config)
    }
}

/// Analyze a mapping file and report the problems found.
pub fn run_analyze(input: &Path, options: &RunOptions) -> Result<AnalyzeResponse, MapalignError> {
    let config = options.resolve(input)?;
    let tree = read_tree(input)?;
    let analyzer = analyze(&tree, config.analysis);

    Ok(AnalyzeResponse::new(
        input.display().to_string(),
        &tree,
        analyzer.registry(),
        !options.summary_only,
    ))
}

/// Analyze a mapping file, apply the policy's kinds and write the result.
pub fn run_fix(
    input: &Path,
    output: &Path,
    options: &RunOptions,
) -> Result<AnalyzeResponse, MapalignError> {
    let config = options.resolve(input)?;
    let mut tree = read_tree(input)?;
    let mut analyzer = analyze(&tree, config.analysis);

    let report = AnalyzeResponse::new(
        input.display().to_string(),
        &tree,
        analyzer.registry(),
        !options.summary_only,
    );
    let outcomes = config.resolutions.apply(&mut analyzer, &mut tree);

    tiny::write_path(&tree, output)
        .map_err(|err| MapalignError::from_write(output.display().to_string(), err))?;
    info!(output = %output.display(), classes = tree.class_count(), "wrote corrected mappings");

    Ok(report.with_outcomes(output.display().to_string(), &outcomes))
}

/// List the namespaces of a mapping file.
pub fn run_namespaces(input: &Path) -> Result<NamespacesResponse, MapalignError> {
    let tree = read_tree(input)?;
    Ok(NamespacesResponse::new(input.display().to_string(), &tree))
}

fn read_tree(input: &Path) -> Result<MappingTree, MapalignError> {
    let tree = tiny::read_path(input)
        .map_err(|err| MapalignError::from_read(input.display().to_string(), err))?;
    info!(
        input = %input.display(),
        classes = tree.class_count(),
        namespaces = tree.dst_namespaces().len(),
        "read mappings"
    );
    Ok(tree)
}

fn analyze(tree: &MappingTree, options: AnalysisOptions) -> MappingAnalyzer {
    let configured = options
        .inner_class_name_completion_candidates
        .iter()
        .chain(&options.inheritance_additional_namespaces)
        .chain(&options.inheritance_error_exemptions);
    for name in configured {
        if !tree.has_namespace(name) {
            warn!(namespace = %name, "configured namespace is not in the mappings");
        }
    }

    let mut analyzer = MappingAnalyzer::new(options);
    analyzer.analyze(tree);
    analyzer
}
