//! Href classification
//!
//! Classifies raw href strings into the kinds the loader dispatches on:
//! absolute links, plain relative files, folders to probe for a TOC, and
//! explicit references to one of the reserved TOC file names.

/// File names recognized as TOC files when they end an href path
pub const TOC_FILE_NAMES: &[&str] = &[
    "TOC.md",
    "TOC.json",
    "TOC.yml",
    "TOC.experimental.md",
    "TOC.experimental.json",
    "TOC.experimental.yml",
];

/// Probe order for folder hrefs
pub(crate) const FOLDER_PROBE_NAMES: &[&str] = &["TOC.md", "TOC.json", "TOC.yml"];

/// Broad link shape of an href
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// Link into another site (`https://...`, scheme-relative, `mailto:`)
    External,
    /// Site-absolute or drive-absolute path
    AbsolutePath,
    /// Path relative to the current file
    RelativePath,
    /// Bookmark within the current page (`#fragment`)
    SelfBookmark,
}

/// Kind of TOC reference an href represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocHrefKind {
    /// Absolute or external link, passed through unresolved
    AbsolutePath,
    /// Relative link to an ordinary document
    RelativeFile,
    /// Relative link to a folder, probed for a TOC file
    RelativeFolder,
    /// Relative link naming a TOC file explicitly
    TocFile,
    /// No href
    None,
}

/// Determine the broad link shape of an href
pub fn link_type(href: &str) -> LinkType {
    if href.is_empty() {
        return LinkType::RelativePath;
    }
    if is_windows_drive(href) {
        return LinkType::AbsolutePath;
    }
    if href.starts_with("//") || has_scheme(href) {
        return LinkType::External;
    }
    if href.starts_with('/') || href.starts_with('\\') {
        return LinkType::AbsolutePath;
    }
    if href.starts_with('#') {
        return LinkType::SelfBookmark;
    }
    LinkType::RelativePath
}

/// Classify an href into the kind of TOC reference it represents
pub fn classify(href: &str) -> TocHrefKind {
    if href.is_empty() {
        return TocHrefKind::None;
    }

    match link_type(href) {
        LinkType::AbsolutePath | LinkType::External => return TocHrefKind::AbsolutePath,
        LinkType::RelativePath | LinkType::SelfBookmark => {}
    }

    // Examine only the path portion, without query or fragment
    let path = &href[..href.find(['?', '#']).unwrap_or(href.len())];
    if path.ends_with('/') || path.ends_with('\\') {
        return TocHrefKind::RelativeFolder;
    }

    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    if TOC_FILE_NAMES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(file_name))
    {
        TocHrefKind::TocFile
    } else {
        TocHrefKind::RelativeFile
    }
}

/// True for kinds that pull another TOC into the tree
pub fn is_toc_include(kind: TocHrefKind) -> bool {
    matches!(kind, TocHrefKind::TocFile | TocHrefKind::RelativeFolder)
}

/// Join a folder href with a file name using a single separator
pub(crate) fn combine(base: &str, name: &str) -> String {
    let trimmed = base.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        name.to_string()
    } else {
        format!("{trimmed}/{name}")
    }
}

fn has_scheme(href: &str) -> bool {
    match href.split_once(':') {
        Some((scheme, _)) if !scheme.is_empty() => {
            scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

fn is_windows_drive(href: &str) -> bool {
    let bytes = href.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/' || bytes[2] == b'\\')
}
