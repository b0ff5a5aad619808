//! Memoized load results
//!
//! One entry per file path; working-tree and git-history revisions of the
//! same path are distinct keys. The first caller for a key computes, every
//! contender blocks on the same cell, and all of them share the published
//! outcome by reference.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;

use crate::error_sink::TocError;
use crate::loader::TocResult;
use crate::toc_model::FilePath;

/// Outcome of a finished load: the shared triple, or the error that failed
/// the chain. Failures are cached like successes so repeated loads of a
/// cyclic file return the identical error.
pub(crate) type LoadOutcome = Result<Arc<TocResult>, TocError>;

#[derive(Default)]
pub(crate) struct MemoCache {
    entries: DashMap<FilePath, Arc<OnceCell<LoadOutcome>>>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the memoized outcome for `key`, computing it on first use.
    ///
    /// `compute` runs at most once per key. The map shard guard is dropped
    /// before `compute` runs so nested loads may touch the cache.
    pub fn get_or_compute<F>(&self, key: FilePath, compute: F) -> LoadOutcome
    where
        F: FnOnce() -> LoadOutcome,
    {
        let cell = {
            let entry = self.entries.entry(key).or_default();
            Arc::clone(&entry)
        };
        cell.get_or_init(compute).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::toc_model::TocNode;

    fn result(name: &str) -> LoadOutcome {
        Ok(Arc::new(TocResult {
            node: TocNode::new(name),
            referenced_files: Vec::new(),
            referenced_tocs: Vec::new(),
        }))
    }

    #[test]
    fn test_compute_runs_once_per_key() {
        let cache = MemoCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_compute(FilePath::new("TOC.yml"), || {
            calls.fetch_add(1, Ordering::SeqCst);
            result("root")
        });
        let second = cache.get_or_compute(FilePath::new("TOC.yml"), || {
            calls.fetch_add(1, Ordering::SeqCst);
            result("other")
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
    }

    #[test]
    fn test_revisions_are_distinct_keys() {
        let cache = MemoCache::new();

        let working = cache
            .get_or_compute(FilePath::new("TOC.yml"), || result("working"))
            .unwrap();
        let historic = cache
            .get_or_compute(FilePath::git_commit("TOC.yml"), || result("historic"))
            .unwrap();

        assert!(!Arc::ptr_eq(&working, &historic));
        assert_eq!(historic.node.name, "historic");
    }

    #[test]
    fn test_errors_are_cached() {
        let cache = MemoCache::new();
        let calls = AtomicUsize::new(0);
        let error = TocError::CircularReference {
            files: vec![FilePath::new("TOC.yml")],
        };

        for _ in 0..2 {
            let outcome = cache.get_or_compute(FilePath::new("TOC.yml"), || {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(error.clone())
            });
            assert_eq!(outcome.unwrap_err(), error);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_single_flight_under_contention() {
        let cache = Arc::new(MemoCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                scope.spawn(move || {
                    let outcome = cache.get_or_compute(FilePath::new("TOC.yml"), || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        result("root")
                    });
                    assert!(outcome.is_ok());
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
