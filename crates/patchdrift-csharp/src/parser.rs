//! C# parsing on top of tree-sitter.
//!
//! tree-sitter is error tolerant: a file with syntax errors still yields a
//! tree, with `ERROR`/`MISSING` nodes where recovery happened. Such files are
//! kept and flagged through [`ParsedFile::has_errors`]; only a parser that
//! produces no tree at all is an error.

use thiserror::Error;
use tracing::warn;
use tree_sitter::{Node, Parser, Tree};

use patchdrift_core::error::PatchdriftError;

// ============================================================================
// Error Types
// ============================================================================

/// Errors from the parser service.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load C# grammar: {message}")]
    Language { message: String },

    /// The parser returned no tree.
    #[error("parser produced no tree for {path}")]
    NoTree { path: String },
}

impl From<ParseError> for PatchdriftError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Language { message } => PatchdriftError::internal(message),
            ParseError::NoTree { path } => PatchdriftError::ParseFailed {
                path,
                message: "parser produced no tree".to_string(),
            },
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

/// A reusable C# parser.
pub struct CSharpParser {
    parser: Parser,
}

impl CSharpParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| ParseError::Language {
                message: e.to_string(),
            })?;
        Ok(CSharpParser { parser })
    }

    /// Parse one file. `path` is only used for diagnostics.
    pub fn parse(&mut self, path: &str, source: String) -> Result<ParsedFile, ParseError> {
        let tree = self
            .parser
            .parse(source.as_bytes(), None)
            .ok_or_else(|| ParseError::NoTree {
                path: path.to_string(),
            })?;

        let parsed = ParsedFile {
            path: path.to_string(),
            source,
            tree,
        };
        if parsed.has_errors() {
            warn!(file = %path, "syntax errors in file; continuing with recovered tree");
        }
        Ok(parsed)
    }
}

/// Parse a single source with a fresh parser.
pub fn parse_source(path: &str, source: impl Into<String>) -> Result<ParsedFile, ParseError> {
    CSharpParser::new()?.parse(path, source.into())
}

// ============================================================================
// Parsed File
// ============================================================================

/// A source file together with its syntax tree.
pub struct ParsedFile {
    path: String,
    source: String,
    tree: Tree,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("path", &self.path)
            .field("len", &self.source.len())
            .finish()
    }
}

impl ParsedFile {
    /// Tree-relative path.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Whether error recovery happened anywhere in the file.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Source text of a node.
    pub fn text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    /// Source text of a node, extended back to the start of its first line.
    pub fn text_from_line_start(&self, node: Node<'_>) -> &str {
        let start = self
            .source
            .get(..node.start_byte())
            .and_then(|before| before.rfind('\n'))
            .map_or(0, |newline| newline + 1);
        self.source.get(start..node.end_byte()).unwrap_or("")
    }

    /// 1-based line on which a node starts.
    pub fn line_of(&self, node: Node<'_>) -> usize {
        node.start_position().row + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_abi_is_accepted_by_runtime() {
        let language: tree_sitter::Language = tree_sitter_c_sharp::LANGUAGE.into();
        let supported =
            tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION..=tree_sitter::LANGUAGE_VERSION;
        assert!(supported.contains(&language.version()));
        assert!(CSharpParser::new().is_ok());
    }

    #[test]
    fn parses_class() {
        let file = parse_source("A.cs", "class A { void M() { } }").unwrap();
        assert_eq!(file.root().kind(), "compilation_unit");
        assert!(!file.has_errors());
        assert_eq!(file.path(), "A.cs");
    }

    #[test]
    fn broken_source_still_parses() {
        let file = parse_source("B.cs", "class B { void M( { }").unwrap();
        assert!(file.has_errors());
    }

    #[test]
    fn text_from_line_start_keeps_indentation() {
        let source = "class A\n{\n    void M() { }\n}\n";
        let file = parse_source("A.cs", source).unwrap();
        let class = file.root().named_child(0).unwrap();
        let body = class.child_by_field_name("body").unwrap();
        let method = body.named_child(0).unwrap();
        assert_eq!(method.kind(), "method_declaration");
        assert_eq!(file.text(method), "void M() { }");
        assert_eq!(file.text_from_line_start(method), "    void M() { }");
        assert_eq!(file.line_of(method), 3);
    }
}
