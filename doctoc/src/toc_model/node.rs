//! TOC tree nodes

use std::fmt;

use super::{Document, FilePath, MonikerList};

/// Location of a TOC entry in its authored source file, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub file: FilePath,
    pub line: usize,
    pub column: usize,
}

impl Source {
    pub fn new(file: FilePath, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A node in the table-of-contents tree.
///
/// The parser produces nodes carrying input-level hrefs (`toc_href`,
/// `topic_href`, and an unresolved `href`); resolution rewrites them into the
/// final `href`/`homepage`/`document` form and clears the input-only fields.
/// Empty strings mean "not present" throughout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TocNode {
    /// Display name shown in navigation
    pub name: String,

    /// Final resolved URL or path; empty when the node only groups children
    pub href: String,

    /// Input-only reference to another TOC; cleared during resolution
    pub toc_href: String,

    /// Input-only reference to the node's landing topic; cleared during
    /// resolution
    pub topic_href: String,

    /// Cross-reference uid, looked up when no topic href is present
    pub uid: String,

    /// Resolved topic href when the author gave `topic_href` but no `href`
    pub homepage: String,

    /// Document backing this node, when the href resolved to one
    pub document: Option<Document>,

    /// Aggregated version monikers for this subtree
    pub monikers: MonikerList,

    /// Ordered child nodes
    pub items: Vec<TocNode>,

    /// Glob patterns consumed by TOC joining
    pub children: Vec<String>,

    /// Where the entry was authored
    pub source: Option<Source>,
}

impl TocNode {
    /// Create a named node with no links or children
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
