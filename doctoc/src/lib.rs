//! doctoc - Table-of-contents loader for static documentation builds
//!
//! Loads a tree of authored TOC files, resolves every cross-reference they
//! contain (topic links, uid lookups, folder probes, nested TOC inclusions),
//! merges auxiliary TOCs into top-level slots by glob patterns, detects
//! circular inclusion, and propagates version monikers through the resolved
//! tree. Loading one file yields the materialized tree plus side-tables of
//! the documents and TOCs it depends on.
//!
//! TOC file parsing, link and xref resolution, and the rest of the build
//! tool are collaborator traits (see [`externals`]); this crate owns the
//! load/resolve/join pass.

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod error_sink;
pub mod externals;
pub mod href;
pub mod join_config;
pub mod loader;
pub mod toc_model;

// Re-export the public surface
pub use error_sink::{ErrorSink, TocError};
pub use href::{LinkType, TocHrefKind};
pub use join_config::{JoinConfig, JoinEntry};
pub use loader::{TocLoader, TocResult};
pub use toc_model::{ContentType, Document, FilePath, MonikerList, Source, TocNode};
