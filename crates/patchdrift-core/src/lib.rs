//! Core engine for patchdrift.
//!
//! This crate is language-agnostic. It provides:
//! - Similarity scoring between single lines of text
//! - Token-level diffs of related lines
//! - Line alignment with similarity-based pairing into two-pane renderings
//! - Symbol index and target resolution with ambiguity detection
//! - Structural equivalence of method bodies
//! - Error types, report model and JSON output types
//!
//! Parsing lives in language crates, which convert their syntax trees into
//! the owned [`equivalence::SyntaxShape`] used here.

pub mod align;
pub mod config;
pub mod equivalence;
pub mod error;
pub mod output;
pub mod report;
pub mod resolve;
pub mod similarity;
pub mod token_diff;
pub mod types;
