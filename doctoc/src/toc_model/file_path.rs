//! File identities within the docset

use std::fmt;

/// Identifier of a source file, with a normalized path form.
///
/// Working-tree files and files read out of git history are distinct
/// identities even when they share a path; the loader keys its caches on the
/// whole value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath {
    /// Docset-relative path with forward slashes and no `.`/`..` segments
    pub path: String,

    /// True when the file was read from a historical git revision
    pub is_git_commit: bool,
}

impl FilePath {
    /// Identity of a working-tree file
    pub fn new<S: AsRef<str>>(path: S) -> Self {
        Self {
            path: normalize(path.as_ref()),
            is_git_commit: false,
        }
    }

    /// Identity of a file as it existed in a historical git revision
    pub fn git_commit<S: AsRef<str>>(path: S) -> Self {
        Self {
            path: normalize(path.as_ref()),
            is_git_commit: true,
        }
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_git_commit {
            write!(f, "{} (git history)", self.path)
        } else {
            write!(f, "{}", self.path)
        }
    }
}

/// What kind of content a document holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// A rendered documentation page
    Page,
    /// A table-of-contents file
    Toc,
    /// A static resource (image, download, ...)
    Resource,
}

/// Handle to a resolved document in the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    /// Identity of the backing file
    pub file_path: FilePath,

    /// Content kind of the document
    pub content_type: ContentType,
}

impl Document {
    pub fn new(file_path: FilePath, content_type: ContentType) -> Self {
        Self {
            file_path,
            content_type,
        }
    }
}

/// Normalize a path to forward slashes without `.`/`..` segments.
///
/// `..` segments that cannot be resolved against a preceding segment are
/// kept, so paths escaping the docset root stay visibly relative.
pub(crate) fn normalize(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    let mut parts: Vec<&str> = Vec::new();

    for part in replaced.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&"..") | None => parts.push(".."),
                Some(_) => {
                    parts.pop();
                }
            },
            _ => parts.push(part),
        }
    }

    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_separators_and_dots() {
        assert_eq!(normalize("docs\\guide\\TOC.yml"), "docs/guide/TOC.yml");
        assert_eq!(normalize("./docs/./TOC.yml"), "docs/TOC.yml");
        assert_eq!(normalize("docs//TOC.yml"), "docs/TOC.yml");
        assert_eq!(normalize("docs/sub/../TOC.yml"), "docs/TOC.yml");
        assert_eq!(normalize("../shared/TOC.yml"), "../shared/TOC.yml");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_git_commit_revisions_are_distinct_identities() {
        let working = FilePath::new("docs/TOC.yml");
        let historic = FilePath::git_commit("docs/TOC.yml");

        assert_eq!(working.path, historic.path);
        assert_ne!(working, historic);
        assert_eq!(format!("{}", historic), "docs/TOC.yml (git history)");
    }
}
