//! Loader diagnostics and their collector

use std::sync::Mutex;

use thiserror::Error;

use crate::toc_model::{FilePath, Source};

/// Diagnostics raised while loading a TOC tree.
///
/// Everything except `CircularReference` is recoverable: it is reported to
/// the [`ErrorSink`] and resolution continues best-effort. A circular include
/// chain fails the whole load of the file it originates in.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TocError {
    /// A TOC include chain came back around to a file still being loaded
    #[error("circular reference between TOC files: {}", format_chain(.files))]
    CircularReference {
        /// The include chain, root first, ending with the repeated file
        files: Vec<FilePath>,
    },

    /// `toc_href` pointed at something that is neither a TOC nor absolute
    #[error("invalid toc href '{href}': must reference a TOC file, a folder, or an absolute path")]
    InvalidTocHref {
        href: String,
        at: Option<Source>,
    },

    /// `topic_href` pointed at another TOC
    #[error("invalid topic href '{href}': must not reference a TOC")]
    InvalidTopicHref {
        href: String,
        at: Option<Source>,
    },

    /// Folder probing found no TOC file
    #[error("no TOC file found under '{href}'")]
    FileNotFound {
        href: String,
        at: Option<Source>,
    },

    /// A resolved entry ended up with no display name
    #[error("missing required attribute 'name' on TOC entry")]
    MissingName { at: Option<Source> },

    /// Error passed through verbatim from a collaborator
    #[error("{message}")]
    Resolve { message: String },
}

/// Helper function to format an include chain
fn format_chain(files: &[FilePath]) -> String {
    files
        .iter()
        .map(|file| format!("'{}'", file))
        .collect::<Vec<_>>()
        .join(" --> ")
}

/// Thread-safe collector for loader diagnostics.
///
/// Shared between the loader and its collaborators; parallel workers report
/// into the same sink.
#[derive(Debug, Default)]
pub struct ErrorSink {
    errors: Mutex<Vec<TocError>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic
    pub fn report(&self, error: TocError) {
        log::warn!("{}", error);
        self.lock().push(error);
    }

    /// Record a diagnostic if one was produced
    pub fn report_if(&self, error: Option<TocError>) {
        if let Some(error) = error {
            self.report(error);
        }
    }

    /// Snapshot of everything reported so far
    pub fn errors(&self) -> Vec<TocError> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TocError>> {
        // A worker that panicked mid-report leaves the list intact
        self.errors.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_reference_message_lists_chain() {
        let error = TocError::CircularReference {
            files: vec![
                FilePath::new("a/TOC.yml"),
                FilePath::new("b/TOC.yml"),
                FilePath::new("a/TOC.yml"),
            ],
        };

        assert_eq!(
            format!("{}", error),
            "circular reference between TOC files: 'a/TOC.yml' --> 'b/TOC.yml' --> 'a/TOC.yml'"
        );
    }

    #[test]
    fn test_sink_collects_in_order() {
        let sink = ErrorSink::new();
        assert!(sink.is_empty());

        sink.report(TocError::MissingName { at: None });
        sink.report_if(None);
        sink.report_if(Some(TocError::FileNotFound {
            href: "guide/".to_string(),
            at: None,
        }));

        let errors = sink.errors();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], TocError::MissingName { .. }));
        assert!(matches!(errors[1], TocError::FileNotFound { .. }));
    }
}
