//! JSON output types for CLI responses.
//!
//! Every response begins with `status` (`"ok"` or `"error"`) followed by
//! `schema_version`, so consumers can dispatch before reading the rest.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::analysis::{Problem, ProblemKind, ProblemRegistry, Resolution};
use crate::config::KindOutcome;
use crate::error::{MapalignError, OutputErrorCode};
use crate::tree::{is_metadata_namespace, ElementRef, MappingTree};

/// Current output schema version.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Problems
// ============================================================================

/// A problem rendered for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemInfo {
    pub kind: ProblemKind,
    /// `class`, `field` or `method`.
    pub element_kind: String,
    /// Readable element path, e.g. `a/b/C.m()V`.
    pub element: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// `remove` or `rename`.
    pub action: String,
    /// Target name of a rename.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
}

impl ProblemInfo {
    /// Render a problem against the tree it was detected in.
    ///
    /// Must be called before resolutions are applied, while the element
    /// still resolves.
    pub fn from_problem(tree: &MappingTree, problem: &Problem) -> Self {
        let element_kind = match problem.element {
            ElementRef::Class { .. } => "class",
            ElementRef::Field { .. } => "field",
            ElementRef::Method { .. } => "method",
        };
        let (action, new_name) = match &problem.resolution {
            Resolution::Remove { .. } => ("remove", None),
            Resolution::Rename { name, .. } => ("rename", Some(name.clone())),
        };

        ProblemInfo {
            kind: problem.kind,
            element_kind: element_kind.to_string(),
            element: tree
                .describe(&problem.element)
                .unwrap_or_else(|| "<removed>".to_string()),
            namespace: problem.namespace.clone(),
            action: action.to_string(),
            new_name,
        }
    }
}

/// Per-kind counts of a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSummary {
    pub kind: ProblemKind,
    pub description: String,
    pub count: usize,
    /// Resolutions applied (only for `fix`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<usize>,
    /// The kind was skipped by policy (only for `fix`).
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub skipped: bool,
}

impl KindSummary {
    fn pending(kind: ProblemKind, count: usize) -> Self {
        KindSummary {
            kind,
            description: kind.description().to_string(),
            count,
            applied: None,
            skipped: false,
        }
    }
}

impl From<&KindOutcome> for KindSummary {
    fn from(outcome: &KindOutcome) -> Self {
        KindSummary {
            applied: Some(outcome.applied),
            skipped: outcome.skipped,
            ..KindSummary::pending(outcome.kind, outcome.problems)
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Response for `analyze` and `fix`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Status: "ok".
    pub status: String,
    pub schema_version: String,
    /// Input mapping file.
    pub input: String,
    /// Corrected mapping file (only for `fix`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Number of classes analysed.
    pub classes: usize,
    /// Total number of problems detected.
    pub total: usize,
    /// Per-kind counts in first-recorded order.
    pub summary: Vec<KindSummary>,
    /// Detected problems, omitted in summary-only mode.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub problems: Vec<ProblemInfo>,
}

impl AnalyzeResponse {
    /// Build a report from a finished pass, before anything is applied.
    pub fn new(
        input: impl Into<String>,
        tree: &MappingTree,
        registry: &ProblemRegistry,
        include_problems: bool,
    ) -> Self {
        let summary = registry
            .kinds()
            .iter()
            .map(|kind| KindSummary::pending(*kind, registry.count(*kind)))
            .collect();
        let problems = if include_problems {
            registry
                .iter()
                .map(|problem| ProblemInfo::from_problem(tree, problem))
                .collect()
        } else {
            Vec::new()
        };

        AnalyzeResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            input: input.into(),
            output: None,
            classes: tree.class_count(),
            total: registry.len(),
            summary,
            problems,
        }
    }

    /// Attach the outcome of applying a resolution policy.
    pub fn with_outcomes(mut self, output: impl Into<String>, outcomes: &[KindOutcome]) -> Self {
        self.output = Some(output.into());
        self.summary = outcomes.iter().map(KindSummary::from).collect();
        self
    }
}

/// A namespace of a mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceInfo {
    /// Destination namespace id (`-1` for the source namespace).
    pub id: i32,
    pub name: String,
    /// The namespace carries metadata rather than names.
    pub metadata: bool,
}

/// Response for `namespaces`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespacesResponse {
    /// Status: "ok".
    pub status: String,
    pub schema_version: String,
    pub input: String,
    pub classes: usize,
    pub namespaces: Vec<NamespaceInfo>,
}

impl NamespacesResponse {
    pub fn new(input: impl Into<String>, tree: &MappingTree) -> Self {
        let source = NamespaceInfo {
            id: -1,
            name: tree.src_namespace().to_string(),
            metadata: false,
        };
        let destinations = tree
            .dst_namespace_ids()
            .zip(tree.dst_namespaces())
            .map(|(id, name)| NamespaceInfo {
                id: id.0,
                name: name.clone(),
                metadata: is_metadata_namespace(name),
            });

        NamespacesResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            input: input.into(),
            classes: tree.class_count(),
            namespaces: std::iter::once(source).chain(destinations).collect(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error details in a JSON error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// File the error concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl ErrorInfo {
    /// Create from a MapalignError.
    pub fn from_error(err: &MapalignError) -> Self {
        let file = match err {
            MapalignError::FileNotFound { path } | MapalignError::InvalidMappings { path, .. } => {
                Some(path.clone())
            }
            MapalignError::ApplyError { file, .. } => file.clone(),
            _ => None,
        };
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
            file,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a MapalignError.
    pub fn from_error(err: &MapalignError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emitting
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Emit a response as compact JSON (single line) to a writer.
pub fn emit_response_compact<T: Serialize>(
    response: &T,
    writer: &mut impl Write,
) -> io::Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
