//! patchdrift CLI binary.
//!
//! Finds every Harmony patch declared in an add-on tree and reports which of
//! the patched methods changed between an old and a new version of the base
//! codebase.
//!
//! Exit codes:
//! - 0: success (drift is reported, not an error)
//! - 2: invalid arguments
//! - 3: a root directory or file does not exist
//! - 10: I/O, parse or internal failure
//!
//! Failures are reported on stdout as a JSON error envelope; logs go to
//! stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use patchdrift::cli::{run_compare, run_list_patches, run_resolve, write_output};
use patchdrift::render::OutputFormat;
use patchdrift_core::config::{AnalysisConfig, DEFAULT_PAIRING_THRESHOLD};
use patchdrift_core::error::{OutputErrorCode, PatchdriftError};
use patchdrift_core::output::{emit_response, ErrorResponse};
use patchdrift_csharp::CompareInput;

// ============================================================================
// CLI Structure
// ============================================================================

/// patchdrift - detect drift under Harmony patches.
#[derive(Parser, Debug)]
#[command(
    name = "patchdrift",
    version,
    about = "Report how the targets of Harmony patches changed between two versions of a codebase"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output (overridden by RUST_LOG).
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
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

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Compare every patch target between the old and new base trees.
    Compare {
        /// Root of the add-on tree declaring the patches.
        #[arg(long = "mod", value_name = "DIR")]
        mod_root: PathBuf,
        /// Root of the base tree before the update.
        #[arg(long = "old", value_name = "DIR")]
        old_root: PathBuf,
        /// Root of the base tree after the update.
        #[arg(long = "new", value_name = "DIR")]
        new_root: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Write the report to this file instead of stdout.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Similarity a deleted/inserted line pair must exceed to be shown
        /// as one modified line.
        #[arg(long, default_value_t = DEFAULT_PAIRING_THRESHOLD)]
        pairing_threshold: f64,
    },
    /// List the patch declarations of an add-on tree (JSON).
    ListPatches {
        /// Root of the add-on tree.
        #[arg(long = "mod", value_name = "DIR")]
        mod_root: PathBuf,
    },
    /// Resolve a class name in the old and new base trees (JSON).
    Resolve {
        /// Simple, partially or fully qualified class name.
        name: String,
        /// Root of the base tree before the update.
        #[arg(long = "old", value_name = "DIR")]
        old_root: PathBuf,
        /// Root of the base tree after the update.
        #[arg(long = "new", value_name = "DIR")]
        new_root: PathBuf,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Errors go to stdout as JSON, like every other response.
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), PatchdriftError> {
    match cli.command {
        Command::Compare {
            mod_root,
            old_root,
            new_root,
            format,
            output,
            pairing_threshold,
        } => {
            let input = CompareInput {
                mod_root,
                old_root,
                new_root,
                config: AnalysisConfig::default().with_pairing_threshold(pairing_threshold),
            };
            let rendered = run_compare(&input, format)?;
            write_output(&rendered, output.as_deref())
        }
        Command::ListPatches { mod_root } => {
            let rendered = run_list_patches(&mod_root)?;
            write_output(&rendered, None)
        }
        Command::Resolve {
            name,
            old_root,
            new_root,
        } => {
            let rendered = run_resolve(&name, &old_root, &new_root)?;
            write_output(&rendered, None)
        }
    }
}
