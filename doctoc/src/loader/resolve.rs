//! Recursive TOC file loading and per-node link resolution

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error_sink::{ErrorSink, TocError};
use crate::externals::{Collaborators, DependencyKind};
use crate::href::{self, LinkType, TocHrefKind};
use crate::loader::guard::RecursionGuard;
use crate::toc_model::{Document, MonikerList, TocNode};

/// Loads one TOC file tree, expanding nested includes and resolving every
/// node. One instance exists per top-level load; nested loads reuse it so the
/// root file (and its duplicate-entry validation) stays fixed.
pub(crate) struct TocFileLoader<'a> {
    pub collaborators: &'a Collaborators,
    pub errors: &'a ErrorSink,
    pub root_file: &'a Document,
}

/// What a toc-include href contributed to its node
#[derive(Default)]
struct ResolvedTocHref {
    /// Result href, set only when the toc href was an absolute path
    href: String,

    /// Items of an included TOC file, replacing the node's own children
    replace_items: Option<Vec<TocNode>>,

    /// First linked item of the included TOC
    first_item: Option<TocNode>,
}

impl TocFileLoader<'_> {
    /// Load `file`: parse, resolve all children, and run root-file validation.
    ///
    /// Fails only on a circular include chain; every other problem is
    /// reported to the error sink and resolution continues.
    pub fn load_file(
        &self,
        file: &Document,
        guard: &RecursionGuard,
        referenced_files: &mut Vec<Document>,
        referenced_tocs: &mut Vec<Document>,
    ) -> Result<TocNode, TocError> {
        let guard = guard.enter(&file.file_path)?;

        let mut root = self.collaborators.parser.parse(file, self.errors);
        let input_items = std::mem::take(&mut root.items);
        root.items = self.load_nodes(&input_items, file, &guard, referenced_files, referenced_tocs)?;
        root.toc_href = String::new();
        root.topic_href = String::new();

        if file == self.root_file {
            self.collaborators
                .validator
                .validate_entry_duplicated(&file.file_path, referenced_files);
        }

        Ok(root)
    }

    /// Resolve sibling nodes, fanning out across the worker pool.
    ///
    /// Workers collect into a positional buffer so output order matches input
    /// order. Each worker accumulates its own scratch side-lists; they are
    /// merged into the caller's lists once all siblings have finished.
    fn load_nodes(
        &self,
        items: &[TocNode],
        current_file: &Document,
        guard: &RecursionGuard,
        referenced_files: &mut Vec<Document>,
        referenced_tocs: &mut Vec<Document>,
    ) -> Result<Vec<TocNode>, TocError> {
        #[cfg(feature = "parallel")]
        let resolved: Result<Vec<_>, TocError> = items
            .par_iter()
            .map(|item| self.resolve_in_scratch(item, current_file, guard))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let resolved: Result<Vec<_>, TocError> = items
            .iter()
            .map(|item| self.resolve_in_scratch(item, current_file, guard))
            .collect();

        let mut nodes = Vec::with_capacity(items.len());
        for (node, mut files, mut tocs) in resolved? {
            nodes.push(node);
            referenced_files.append(&mut files);
            referenced_tocs.append(&mut tocs);
        }
        Ok(nodes)
    }

    fn resolve_in_scratch(
        &self,
        input: &TocNode,
        current_file: &Document,
        guard: &RecursionGuard,
    ) -> Result<(TocNode, Vec<Document>, Vec<Document>), TocError> {
        let mut referenced_files = Vec::new();
        let mut referenced_tocs = Vec::new();
        let node = self.resolve_node(
            input,
            current_file,
            guard,
            &mut referenced_files,
            &mut referenced_tocs,
        )?;
        Ok((node, referenced_files, referenced_tocs))
    }

    /// Resolve one input node into its final form
    fn resolve_node(
        &self,
        input: &TocNode,
        current_file: &Document,
        guard: &RecursionGuard,
        referenced_files: &mut Vec<Document>,
        referenced_tocs: &mut Vec<Document>,
    ) -> Result<TocNode, TocError> {
        let toc_href = self.derive_toc_href(input);
        let topic_href = self.derive_topic_href(input);

        self.collaborators
            .validator
            .validate_breadcrumb_link(&current_file.file_path, input);

        let included = self.resolve_toc_href(
            &toc_href,
            input,
            current_file,
            guard,
            referenced_files,
            referenced_tocs,
        )?;

        // A node that includes another TOC does not claim its landing topic
        // as a referenced file
        let add_to_referenced = toc_href.is_empty();
        let (resolved_topic_href, display_name, document) = self.resolve_topic(
            &topic_href,
            &input.uid,
            current_file,
            referenced_files,
            add_to_referenced,
        );

        let items = match included.replace_items {
            Some(sub_items) => sub_items,
            None => self.load_nodes(
                &input.items,
                current_file,
                guard,
                referenced_files,
                referenced_tocs,
            )?,
        };

        let first_item = included.first_item;
        let href = [
            included.href,
            resolved_topic_href.clone(),
            first_item
                .as_ref()
                .map(|item| item.href.clone())
                .unwrap_or_default(),
        ]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default();

        let homepage = if input.href.is_empty() && !input.topic_href.is_empty() {
            resolved_topic_href
        } else {
            String::new()
        };

        let mut node = TocNode {
            name: if input.name.is_empty() {
                display_name
            } else {
                input.name.clone()
            },
            href,
            toc_href: String::new(),
            topic_href: String::new(),
            uid: input.uid.clone(),
            homepage,
            document: document.or_else(|| first_item.and_then(|item| item.document)),
            monikers: MonikerList::default(),
            items,
            children: input.children.clone(),
            source: input.source.clone(),
        };
        let monikers = self.aggregate_monikers(&mut node);
        node.monikers = monikers;

        if node.name.is_empty() {
            self.errors.report(TocError::MissingName {
                at: input.source.clone(),
            });
        }

        Ok(node)
    }

    /// Pick the href that drives TOC inclusion for a node, if any
    fn derive_toc_href(&self, input: &TocNode) -> String {
        if !input.toc_href.is_empty() {
            let kind = href::classify(&input.toc_href);
            if href::is_toc_include(kind) || kind == TocHrefKind::AbsolutePath {
                return input.toc_href.clone();
            }
            self.errors.report(TocError::InvalidTocHref {
                href: input.toc_href.clone(),
                at: input.source.clone(),
            });
        }

        if !input.href.is_empty() && href::is_toc_include(href::classify(&input.href)) {
            return input.href.clone();
        }

        String::new()
    }

    /// Pick the href that resolves to the node's landing topic, if any
    fn derive_topic_href(&self, input: &TocNode) -> String {
        if !input.topic_href.is_empty() {
            if href::is_toc_include(href::classify(&input.topic_href)) {
                self.errors.report(TocError::InvalidTopicHref {
                    href: input.topic_href.clone(),
                    at: input.source.clone(),
                });
            } else {
                return input.topic_href.clone();
            }
        }

        if input.href.is_empty() || !href::is_toc_include(href::classify(&input.href)) {
            return input.href.clone();
        }

        String::new()
    }

    /// Resolve a toc-include href into the subtree it contributes
    fn resolve_toc_href(
        &self,
        toc_href: &str,
        input: &TocNode,
        current_file: &Document,
        guard: &RecursionGuard,
        referenced_files: &mut Vec<Document>,
        referenced_tocs: &mut Vec<Document>,
    ) -> Result<ResolvedTocHref, TocError> {
        match href::classify(toc_href) {
            TocHrefKind::None | TocHrefKind::RelativeFile => Ok(ResolvedTocHref::default()),

            TocHrefKind::AbsolutePath => Ok(ResolvedTocHref {
                href: toc_href.to_string(),
                ..Default::default()
            }),

            TocHrefKind::TocFile => {
                let result = self
                    .collaborators
                    .link_resolver
                    .resolve_content(toc_href, current_file);
                self.errors.report_if(result.error);
                let Some(referenced_toc) = result.document else {
                    return Ok(ResolvedTocHref::default());
                };
                referenced_tocs.push(referenced_toc.clone());

                let sub_toc =
                    self.load_file(&referenced_toc, guard, referenced_files, referenced_tocs)?;
                let first_item = first_linked_item(&sub_toc.items).cloned();
                Ok(ResolvedTocHref {
                    replace_items: Some(sub_toc.items),
                    first_item,
                    ..Default::default()
                })
            }

            TocHrefKind::RelativeFolder => {
                let Some(folder_toc) = self.probe_folder(toc_href, input, current_file) else {
                    return Ok(ResolvedTocHref::default());
                };

                // Files referenced through a folder include stay scoped to
                // that TOC; only the landing edge below is recorded
                let mut scoped_files = Vec::new();
                let sub_toc =
                    self.load_file(&folder_toc, guard, &mut scoped_files, referenced_tocs)?;

                let first_item = first_linked_item(&sub_toc.items).cloned();
                if let Some(document) = first_item.as_ref().and_then(|item| item.document.as_ref())
                {
                    self.collaborators.dependency_map.add_dependency_item(
                        &current_file.file_path,
                        document,
                        DependencyKind::TocInclusion,
                        current_file.content_type,
                    );
                }

                Ok(ResolvedTocHref {
                    first_item,
                    ..Default::default()
                })
            }
        }
    }

    /// Probe a folder href for its TOC file.
    ///
    /// Working-tree hits win immediately; the first git-history hit is kept
    /// as a fallback. `FileNotFound` is reported only when nothing hit at
    /// all, so a history-only hit suppresses it.
    fn probe_folder(
        &self,
        folder_href: &str,
        input: &TocNode,
        current_file: &Document,
    ) -> Option<Document> {
        let mut fallback = None;
        for name in href::FOLDER_PROBE_NAMES {
            let probe = href::combine(folder_href, name);
            let result = self
                .collaborators
                .link_resolver
                .resolve_content(&probe, current_file);
            if let Some(document) = result.document {
                if !document.file_path.is_git_commit {
                    return Some(document);
                }
                if fallback.is_none() {
                    fallback = Some(document);
                }
            }
        }

        if fallback.is_none() {
            self.errors.report(TocError::FileNotFound {
                href: folder_href.to_string(),
                at: input.source.clone(),
            });
        }
        fallback
    }

    /// Resolve the topic a node points at, via link href or xref uid
    fn resolve_topic(
        &self,
        topic_href: &str,
        uid: &str,
        current_file: &Document,
        referenced_files: &mut Vec<Document>,
        add_to_referenced: bool,
    ) -> (String, String, Option<Document>) {
        if !topic_href.is_empty() {
            let result =
                self.collaborators
                    .link_resolver
                    .resolve_link(topic_href, current_file, self.root_file);
            self.errors.report_if(result.error);
            if add_to_referenced {
                if let Some(document) = &result.document {
                    referenced_files.push(document.clone());
                }
            }
            return (result.href, String::new(), result.document);
        }

        if !uid.is_empty() {
            let monikers = self
                .collaborators
                .moniker_provider
                .file_level_monikers(self.errors, &current_file.file_path);
            let result = self.collaborators.xref_resolver.resolve_by_uid(
                uid,
                current_file,
                self.root_file,
                &monikers,
            );
            self.errors.report_if(result.error);
            if add_to_referenced {
                if let Some(document) = &result.declaring_file {
                    referenced_files.push(document.clone());
                }
            }
            return (result.href, result.display_name, result.declaring_file);
        }

        (String::new(), String::new(), None)
    }

    /// Aggregate the effective moniker set of `node`: the union of its own
    /// file-level monikers and its children's. Children that do not narrow
    /// the aggregate are reset to the default, so explicit monikers only
    /// appear where they restrict.
    fn aggregate_monikers(&self, node: &mut TocNode) -> MonikerList {
        let mut lists: Vec<MonikerList> = Vec::new();

        if !node.href.is_empty() {
            match href::link_type(&node.href) {
                LinkType::External | LinkType::AbsolutePath => {
                    lists.push(MonikerList::default());
                }
                LinkType::RelativePath | LinkType::SelfBookmark => {
                    if let Some(document) = &node.document {
                        lists.push(
                            self.collaborators
                                .moniker_provider
                                .file_level_monikers(self.errors, &document.file_path),
                        );
                    }
                }
            }
        }
        lists.extend(node.items.iter().map(|child| child.monikers.clone()));

        let union = MonikerList::union(&lists);
        for child in &mut node.items {
            if child.monikers == union {
                child.monikers = MonikerList::default();
            }
        }
        union
    }
}

/// First item in pre-order with a non-empty href.
///
/// When no sibling links directly, only the first sibling's subtree is
/// searched; later siblings are not visited.
pub(crate) fn first_linked_item(items: &[TocNode]) -> Option<&TocNode> {
    for item in items {
        if !item.href.is_empty() {
            return Some(item);
        }
    }
    if let Some(first) = items.first() {
        return first_linked_item(&first.items);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linked(name: &str, href: &str) -> TocNode {
        TocNode {
            href: href.to_string(),
            ..TocNode::new(name)
        }
    }

    #[test]
    fn test_first_linked_item_prefers_direct_siblings() {
        let items = vec![TocNode::new("group"), linked("a", "a.md")];
        assert_eq!(first_linked_item(&items).unwrap().name, "a");
    }

    #[test]
    fn test_first_linked_item_descends_into_first_sibling_only() {
        let mut group = TocNode::new("group");
        group.items = vec![linked("nested", "nested.md")];
        let mut other = TocNode::new("other");
        other.items = vec![linked("later", "later.md")];

        let items = [group, other];
        let found = first_linked_item(&items).unwrap();
        assert_eq!(found.name, "nested");

        // A link under a later sibling is never found
        let empty_first = TocNode::new("empty");
        let mut second = TocNode::new("second");
        second.items = vec![linked("later", "later.md")];
        assert!(first_linked_item(&[empty_first, second]).is_none());
    }

    #[test]
    fn test_first_linked_item_of_nothing() {
        assert!(first_linked_item(&[]).is_none());
    }
}
