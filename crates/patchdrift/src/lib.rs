//! patchdrift - report how Harmony patch targets drifted between two
//! versions of a C# codebase.
//!
//! This crate provides the CLI binary and the report renderers.
//!
//! ## Modules
//!
//! - `cli` - CLI command implementations
//! - `render` - text, JSON and HTML report rendering

pub mod cli;
pub mod render;

// Re-export core types for convenience
pub use patchdrift_core::config::AnalysisConfig;
pub use patchdrift_core::error::{OutputErrorCode, PatchdriftError};
pub use patchdrift_core::output::{ErrorInfo, ErrorResponse, SCHEMA_VERSION};
pub use patchdrift_core::report::Report;
pub use patchdrift_csharp::CompareInput;
pub use render::OutputFormat;
