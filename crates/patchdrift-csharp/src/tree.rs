//! A loaded code tree: every C# file parsed once, plus its symbol index.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use patchdrift_core::error::PatchdriftError;
use patchdrift_core::resolve::{SymbolIndex, SymbolIndexBuilder};
use patchdrift_core::types::TreeKind;

use crate::declarations::type_declarations;
use crate::files::collect_csharp_files;
use crate::parser::{CSharpParser, ParsedFile};

/// One of the three trees of an analysis run, fully parsed.
#[derive(Debug)]
pub struct SourceTree {
    kind: TreeKind,
    files: Vec<ParsedFile>,
    by_path: HashMap<String, usize>,
    index: SymbolIndex,
}

impl SourceTree {
    /// Collect, parse and index every `.cs` file under `root`.
    pub fn load(kind: TreeKind, root: &Path) -> Result<Self, PatchdriftError> {
        if !root.is_dir() {
            return Err(PatchdriftError::root_not_found(root.display().to_string()));
        }

        let sources = collect_csharp_files(root)?;
        let mut parser = CSharpParser::new()?;
        let mut files = Vec::with_capacity(sources.len());
        for (path, source) in sources {
            files.push(parser.parse(&path, source)?);
        }
        let tree = SourceTree::from_files(kind, files);
        info!(
            tree = %kind,
            root = %root.display(),
            files = tree.files.len(),
            types = tree.index.len(),
            "loaded tree"
        );
        Ok(tree)
    }

    /// Build a tree from already parsed files, in the order given.
    pub fn from_files(kind: TreeKind, files: Vec<ParsedFile>) -> Self {
        let index = build_index(kind, &files);
        let by_path = files
            .iter()
            .enumerate()
            .map(|(i, f)| (f.path().to_string(), i))
            .collect();
        SourceTree {
            kind,
            files,
            by_path,
            index,
        }
    }

    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    /// Parsed files in path order.
    pub fn files(&self) -> &[ParsedFile] {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&ParsedFile> {
        self.by_path.get(path).map(|&i| &self.files[i])
    }

    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }
}

/// Index every declared type of `files`. Later files win on collisions.
pub fn build_index(kind: TreeKind, files: &[ParsedFile]) -> SymbolIndex {
    let mut builder = SymbolIndexBuilder::new(kind);
    for file in files {
        for ty in type_declarations(file) {
            builder.insert(ty.fq_name, file.path());
        }
    }
    let index = builder.build();
    debug!(
        tree = %kind,
        types = index.len(),
        collisions = index.collisions().len(),
        "built symbol index"
    );
    index
}
