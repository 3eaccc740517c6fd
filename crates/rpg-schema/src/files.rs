//! File entries listed in a package's `%files` section.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Attribute directive attached to a file entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAttr {
    /// `%doc`
    Doc,
    /// `%config`
    Config,
    /// `%ghost`
    Ghost,
    /// `%dir`
    Dir,
}

impl FileAttr {
    /// The directive as written in a `%files` list.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doc => "%doc",
            Self::Config => "%config",
            Self::Ghost => "%ghost",
            Self::Dir => "%dir",
        }
    }
}

impl fmt::Display for FileAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file shipped by a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the project root.
    pub path: PathBuf,
    /// Installed location, when it differs from `path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    /// Optional attribute directive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<FileAttr>,
}

impl FileEntry {
    /// An entry with no target and no attribute.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            target: None,
            attr: None,
        }
    }

    /// Set the installed location.
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the attribute directive.
    pub fn with_attr(mut self, attr: FileAttr) -> Self {
        self.attr = Some(attr);
        self
    }

    /// The line this entry contributes to a generated `%files` body.
    pub fn spec_line(&self) -> String {
        let location = self.target.as_deref().unwrap_or(&self.path).display();
        match self.attr {
            Some(attr) => format!("{attr} {location}"),
            None => location.to_string(),
        }
    }
}

/// Ordered set of file entries, unique by relative path.
///
/// The first entry recorded for a path wins; later entries for the same path
/// are dropped. This holds for deserialized lists too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FileEntry>", into = "Vec<FileEntry>")]
pub struct FileList {
    entries: Vec<FileEntry>,
}

impl FileList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry. Returns `false` if its path was already present.
    pub fn insert(&mut self, entry: FileEntry) -> bool {
        if self.contains(&entry.path) {
            tracing::debug!("Ignoring duplicate file entry {}", entry.path.display());
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Whether an entry exists for `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|entry| entry.path == path)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<FileEntry>> for FileList {
    fn from(entries: Vec<FileEntry>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<FileList> for Vec<FileEntry> {
    fn from(list: FileList) -> Self {
        list.entries
    }
}

impl FromIterator<FileEntry> for FileList {
    fn from_iter<I: IntoIterator<Item = FileEntry>>(iter: I) -> Self {
        let mut list = Self::new();
        for entry in iter {
            list.insert(entry);
        }
        list
    }
}

impl<'a> IntoIterator for &'a FileList {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_paths_keep_first_entry() {
        let mut files = FileList::new();
        assert!(files.insert(FileEntry::new("README.md").with_attr(FileAttr::Doc)));
        assert!(!files.insert(FileEntry::new("README.md")));
        assert!(files.insert(FileEntry::new("src/main.c")));

        assert_eq!(files.len(), 2);
        assert_eq!(files.iter().next().unwrap().attr, Some(FileAttr::Doc));
    }

    #[test]
    fn test_from_vec_drops_later_duplicates() {
        let files = FileList::from(vec![
            FileEntry::new("a").with_attr(FileAttr::Doc),
            FileEntry::new("b"),
            FileEntry::new("a"),
        ]);

        let entries: Vec<FileEntry> = files.into();
        assert_eq!(
            entries,
            vec![FileEntry::new("a").with_attr(FileAttr::Doc), FileEntry::new("b")]
        );
    }

    #[test]
    fn test_spec_line_prefers_target() {
        let entry = FileEntry::new("conf/demo.conf")
            .with_target("/etc/demo.conf")
            .with_attr(FileAttr::Config);
        assert_eq!(entry.spec_line(), "%config /etc/demo.conf");

        assert_eq!(FileEntry::new("bin/demo").spec_line(), "bin/demo");
    }
}
