//! Error types for documents and the document store.

use std::path::PathBuf;

use crate::{KeywordId, KeywordKind};

/// Violation of the keyword tree's shape.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    /// A keyword kind was nested under a kind that cannot contain it.
    #[error("{child} cannot be nested under {parent}")]
    InvalidChild {
        /// Kind of the parent node.
        parent: KeywordKind,
        /// Kind of the rejected child.
        child: KeywordKind,
    },
    /// A keyword id does not belong to the document.
    #[error("keyword #{} does not exist in document '{document}'", .id.index())]
    UnknownKeyword {
        /// Document name.
        document: String,
        /// Offending id.
        id: KeywordId,
    },
    /// Walking the tree revisited a node.
    #[error("keyword #{} of document '{document}' is its own ancestor", .id.index())]
    Cycle {
        /// Document name.
        document: String,
        /// Node found twice on one path.
        id: KeywordId,
    },
}

/// Failed keyword lookup.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Reference did not match any document keyword.
    #[error("Gherkin keyword not found: {0}")]
    NotFound(String),
}

/// Failure to load a parsed Gherkin AST.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// I/O error reading an AST file.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// JSON did not match the Gherkin AST shape.
    #[error("Invalid Gherkin AST in '{name}': {source}")]
    Json {
        /// Document name.
        name: String,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// The AST has no feature (empty feature file).
    #[error("Gherkin document '{0}' has no feature")]
    MissingFeature(String),
    /// The AST nests keywords in an impossible way.
    #[error(transparent)]
    Structure(#[from] StructureError),
    /// Invalid glob pattern built from the source root.
    #[error("Invalid source pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
