//! Binary entry point for the mapalign CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Report problems in a Tiny v2 file
//! mapalign analyze mappings.tiny
//!
//! # Fix them, keeping synthetic members
//! mapalign fix mappings.tiny -o fixed.tiny --keep-synthetic
//!
//! # List the namespaces of a file
//! mapalign namespaces mappings.tiny
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use mapalign::cli::{run_analyze, run_fix, run_namespaces, RunOptions};
use mapalign::error::{MapalignError, OutputErrorCode};
use mapalign::output::{emit_response, emit_response_compact, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Align names of overriding members across JVM mapping namespaces.
///
/// All output is JSON on stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "mapalign", version, about = "Align JVM mappings across namespaces")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Args, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Print single-line JSON.
    #[arg(long, global = true)]
    compact: bool,

    /// Configuration file (default: mapalign.toml next to the input).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Analysis settings that extend the configuration file.
#[derive(Args, Debug)]
struct AnalysisArgs {
    /// Complete missing inner class names in this namespace (repeatable).
    #[arg(long = "complete-inner-classes", value_name = "NAMESPACE")]
    complete_inner_classes: Vec<String>,

    /// Identify overrides by names in this namespace (repeatable).
    #[arg(long = "additional-namespace", value_name = "NAMESPACE")]
    additional_namespaces: Vec<String>,

    /// Never correct inheritance in this namespace (repeatable).
    #[arg(long, value_name = "NAMESPACE")]
    exempt: Vec<String>,

    /// Report per-kind counts only.
    #[arg(long)]
    summary_only: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect problems without changing anything.
    Analyze {
        /// Tiny v2 mapping file.
        input: PathBuf,
        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Detect problems, apply the fixes and write the corrected mappings.
    Fix {
        /// Tiny v2 mapping file.
        input: PathBuf,
        /// Where to write the corrected mappings.
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        analysis: AnalysisArgs,
        /// Problem kind whose fixes are not applied (repeatable).
        #[arg(long, value_name = "KIND")]
        skip: Vec<String>,
        /// Keep synthetic members.
        #[arg(long)]
        keep_synthetic: bool,
    },

    /// List the namespaces of a mapping file.
    Namespaces {
        /// Tiny v2 mapping file.
        input: PathBuf,
    },
}

impl AnalysisArgs {
    fn into_options(self, config: Option<PathBuf>) -> RunOptions {
        RunOptions {
            config,
            complete_inner_classes: self.complete_inner_classes,
            additional_namespaces: self.additional_namespaces,
            exempt: self.exempt,
            summary_only: self.summary_only,
            ..RunOptions::default()
        }
    }
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_json);

    let compact = cli.global.compact;
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // errors go to stdout as JSON, like every other response
            let _ = emit(&response, compact);
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), MapalignError> {
    let GlobalArgs {
        compact, config, ..
    } = cli.global;

    match cli.command {
        Command::Analyze { input, analysis } => {
            let response = run_analyze(&input, &analysis.into_options(config))?;
            emit(&response, compact)
        }
        Command::Fix {
            input,
            output,
            analysis,
            skip,
            keep_synthetic,
        } => {
            let options = RunOptions {
                skip,
                keep_synthetic,
                ..analysis.into_options(config)
            };
            let response = run_fix(&input, &output, &options)?;
            emit(&response, compact)
        }
        Command::Namespaces { input } => {
            let response = run_namespaces(&input)?;
            emit(&response, compact)
        }
    }
}

fn emit<T: Serialize>(response: &T, compact: bool) -> Result<(), MapalignError> {
    let mut stdout = io::stdout();
    let result = if compact {
        emit_response_compact(response, &mut stdout)
    } else {
        emit_response(response, &mut stdout)
    };
    result.map_err(|err| MapalignError::internal(format!("failed to write output: {}", err)))
}
