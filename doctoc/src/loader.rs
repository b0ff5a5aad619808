//! TOC loading façade
//!
//! `TocLoader::load` is the public entry point of the subsystem:
//! consult the memo cache, parse and resolve the file tree (expanding nested
//! includes in parallel), run the optional join pass, and publish the
//! immutable result triple.

pub(crate) mod cache;
pub(crate) mod guard;
mod join;
mod resolve;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error_sink::{ErrorSink, TocError};
use crate::externals::Collaborators;
use crate::join_config::JoinConfig;
use crate::toc_model::{Document, FilePath, TocNode};
use cache::MemoCache;
use guard::RecursionGuard;
use resolve::TocFileLoader;

/// A fully loaded TOC: the resolved tree plus the side-tables of documents
/// and TOCs it depends on. Published triples are immutable and shared by
/// reference between callers.
#[derive(Debug, PartialEq, Eq)]
pub struct TocResult {
    /// Root of the resolved tree
    pub node: TocNode,

    /// Documents referenced by topic hrefs and uid resolutions, excluding
    /// those reached only through folder includes
    pub referenced_files: Vec<Document>,

    /// TOC files pulled in by explicit TOC-file hrefs
    pub referenced_tocs: Vec<Document>,
}

/// Entry point of the TOC subsystem.
///
/// Thread-safe: independent `load` calls may run concurrently and
/// deduplicate through the internal cache.
pub struct TocLoader {
    collaborators: Collaborators,
    errors: Arc<ErrorSink>,
    joins: HashMap<String, Option<String>>,
    cache: MemoCache,
}

impl TocLoader {
    /// Create a loader over the given collaborators and join configuration
    pub fn new(
        collaborators: Collaborators,
        join_config: &JoinConfig,
        errors: Arc<ErrorSink>,
    ) -> Self {
        Self {
            collaborators,
            errors,
            joins: join_config.index(),
            cache: MemoCache::new(),
        }
    }

    /// Load a TOC file into its resolved tree and dependency side-tables.
    ///
    /// Results are memoized per file path: the first call computes, repeated
    /// and concurrent calls share the identical triple. Only a circular
    /// include chain fails a load; every other problem is reported to the
    /// error sink and resolution continues best-effort.
    pub fn load(&self, file: &Document) -> Result<Arc<TocResult>, TocError> {
        self.cache
            .get_or_compute(file.file_path.clone(), || self.load_uncached(file))
    }

    fn load_uncached(&self, file: &Document) -> Result<Arc<TocResult>, TocError> {
        log::debug!("loading TOC {}", file.file_path);

        let mut referenced_files = Vec::new();
        let mut referenced_tocs = Vec::new();
        let file_loader = TocFileLoader {
            collaborators: &self.collaborators,
            errors: &self.errors,
            root_file: file,
        };

        let mut node = file_loader
            .load_file(
                file,
                &RecursionGuard::new(),
                &mut referenced_files,
                &mut referenced_tocs,
            )
            .map_err(|error| {
                self.errors.report(error.clone());
                error
            })?;

        if let Some(Some(top_level_path)) = self.joins.get(file.file_path.path.as_str()) {
            let top_level_file = self
                .collaborators
                .document_provider
                .get_document(&FilePath::new(top_level_path));
            let top_level = self.load(&top_level_file)?;
            node = join::merge(&top_level.node, &node);
        }

        Ok(Arc::new(TocResult {
            node,
            referenced_files,
            referenced_tocs,
        }))
    }
}
