//! C# support for patchdrift.
//!
//! This crate provides the C#-specific half of an analysis run:
//! - tree-sitter parsing of C# sources
//! - Harmony marker reading and patch extraction
//! - per-tree loading and symbol indexing
//! - method location and lowering of bodies into trivia-free shapes
//! - the end-to-end operations behind the CLI commands

pub mod declarations;
pub mod extract;
pub mod files;
pub mod locate;
pub mod marker;
pub mod ops;
pub mod parser;
pub mod shape;
pub mod tree;

pub use ops::compare::{compare, CompareInput};
pub use parser::{parse_source, ParseError, ParsedFile};
pub use tree::SourceTree;
