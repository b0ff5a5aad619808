//! Contracts of the build-tool collaborators
//!
//! The surrounding build tool supplies parsing, link and xref resolution,
//! moniker lookup, content validation, dependency recording, and the document
//! registry. The loader only sees these traits; every implementation must be
//! thread-safe because parallel workers call them concurrently.

use std::sync::Arc;

use crate::error_sink::{ErrorSink, TocError};
use crate::toc_model::{ContentType, Document, FilePath, MonikerList, TocNode};

/// Outcome of resolving a link href against the docset
#[derive(Debug, Clone, Default)]
pub struct LinkResult {
    pub error: Option<TocError>,
    /// Resolved URL or path; empty when resolution failed
    pub href: String,
    pub document: Option<Document>,
}

/// Outcome of resolving the content an href points at
#[derive(Debug, Clone, Default)]
pub struct ContentResult {
    pub error: Option<TocError>,
    pub document: Option<Document>,
}

/// Outcome of resolving a cross-reference uid
#[derive(Debug, Clone, Default)]
pub struct XrefResult {
    pub error: Option<TocError>,
    pub href: String,
    pub display_name: String,
    pub declaring_file: Option<Document>,
}

/// Kind of edge recorded in the dependency map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// Plain hyperlink between documents
    Link,
    /// Content inclusion
    Include,
    /// Landing page pulled in through a TOC folder include
    TocInclusion,
}

/// Parses a TOC source file into its input tree (hrefs not yet resolved)
pub trait TocParser: Send + Sync {
    fn parse(&self, file: &Document, errors: &ErrorSink) -> TocNode;
}

/// Resolves hrefs against the docset
pub trait LinkResolver: Send + Sync {
    /// Resolve a link href into its final URL and backing document
    fn resolve_link(&self, href: &str, current_file: &Document, root_file: &Document)
        -> LinkResult;

    /// Resolve the document an href points at without producing a URL
    fn resolve_content(&self, href: &str, current_file: &Document) -> ContentResult;
}

/// Resolves cross-reference uids through the external index
pub trait XrefResolver: Send + Sync {
    fn resolve_by_uid(
        &self,
        uid: &str,
        current_file: &Document,
        root_file: &Document,
        monikers: &MonikerList,
    ) -> XrefResult;
}

/// Supplies file-level version monikers
pub trait MonikerProvider: Send + Sync {
    fn file_level_monikers(&self, errors: &ErrorSink, file_path: &FilePath) -> MonikerList;
}

/// Validates content rules the loader cannot check itself
pub trait ContentValidator: Send + Sync {
    /// Validate external breadcrumb links on an input node
    fn validate_breadcrumb_link(&self, file_path: &FilePath, node: &TocNode);

    /// Validate that no document is referenced twice across a loaded TOC
    fn validate_entry_duplicated(&self, file_path: &FilePath, referenced_files: &[Document]);
}

/// Records dependency edges discovered during loading
pub trait DependencyMapBuilder: Send + Sync {
    fn add_dependency_item(
        &self,
        from: &FilePath,
        to: &Document,
        kind: DependencyKind,
        from_content_type: ContentType,
    );
}

/// Document registry of the build
pub trait DocumentProvider: Send + Sync {
    fn get_document(&self, path: &FilePath) -> Document;
}

/// Bundle of collaborator handles threaded through the loader
#[derive(Clone)]
pub struct Collaborators {
    pub parser: Arc<dyn TocParser>,
    pub link_resolver: Arc<dyn LinkResolver>,
    pub xref_resolver: Arc<dyn XrefResolver>,
    pub moniker_provider: Arc<dyn MonikerProvider>,
    pub validator: Arc<dyn ContentValidator>,
    pub dependency_map: Arc<dyn DependencyMapBuilder>,
    pub document_provider: Arc<dyn DocumentProvider>,
}
