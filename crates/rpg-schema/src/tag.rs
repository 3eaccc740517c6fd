//! Spec tags.
//!
//! Known tags are written in [`CANONICAL_ORDER`]. Anything else parses to
//! [`Tag::Extension`], which the model keeps and the serializer skips.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A spec preamble tag.
///
/// The named variants are the tags the serializer knows how to place; their
/// declaration order is the canonical output order. Anything else parses to
/// [`Tag::Extension`] and is kept in the model but not rendered.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tag {
    /// `Name`. Becomes the `%package` header on a subpackage.
    Name,
    /// `Version`
    Version,
    /// `Release`
    Release,
    /// `Summary`
    Summary,
    /// `Group`
    Group,
    /// `License`
    License,
    /// `URL`
    Url,
    /// `Source`
    Source,
    /// `Patch`. Rendered as `Patch1`, `Patch2`, ... on the top-level package.
    Patch,
    /// `BuildArch`
    BuildArch,
    /// `BuildRoot`
    BuildRoot,
    /// `BuildRequires`
    BuildRequires,
    /// `Requires`
    Requires,
    /// `Provides`
    Provides,
    /// `Obsoletes`
    Obsoletes,
    /// `Conflicts`
    Conflicts,
    /// `Vendor`
    Vendor,
    /// `Packager`
    Packager,
    /// Any tag outside the canonical list. Stored verbatim, never rendered.
    Extension(String),
}

/// Order in which tags are written, independent of insertion order.
pub const CANONICAL_ORDER: [Tag; 18] = [
    Tag::Name,
    Tag::Version,
    Tag::Release,
    Tag::Summary,
    Tag::Group,
    Tag::License,
    Tag::Url,
    Tag::Source,
    Tag::Patch,
    Tag::BuildArch,
    Tag::BuildRoot,
    Tag::BuildRequires,
    Tag::Requires,
    Tag::Provides,
    Tag::Obsoletes,
    Tag::Conflicts,
    Tag::Vendor,
    Tag::Packager,
];

impl Tag {
    /// The key as it appears in spec text (`URL`, `BuildRequires`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name => "Name",
            Self::Version => "Version",
            Self::Release => "Release",
            Self::Summary => "Summary",
            Self::Group => "Group",
            Self::License => "License",
            Self::Url => "URL",
            Self::Source => "Source",
            Self::Patch => "Patch",
            Self::BuildArch => "BuildArch",
            Self::BuildRoot => "BuildRoot",
            Self::BuildRequires => "BuildRequires",
            Self::Requires => "Requires",
            Self::Provides => "Provides",
            Self::Obsoletes => "Obsoletes",
            Self::Conflicts => "Conflicts",
            Self::Vendor => "Vendor",
            Self::Packager => "Packager",
            Self::Extension(name) => name,
        }
    }

    /// Whether the default serializer writes this tag.
    pub fn is_canonical(&self) -> bool {
        !matches!(self, Self::Extension(_))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Tag {
    // Tag names are case-sensitive: "name" is an extension, not `Name`.
    fn from(s: &str) -> Self {
        CANONICAL_ORDER
            .iter()
            .find(|tag| tag.as_str() == s)
            .cloned()
            .unwrap_or_else(|| Self::Extension(s.to_string()))
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.as_str().to_string()
    }
}

/// Value stored under a tag: one string, or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    /// A single value, rendered as one line.
    Single(String),
    /// Several values, rendered one line each in order.
    List(Vec<String>),
}

impl TagValue {
    /// All values as a slice, in order.
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::List(values) => values,
        }
    }
}

/// Mapping from tag to value(s).
///
/// Iteration follows the enum order, which for the named tags is the
/// canonical order; extension tags come last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagCollection {
    entries: BTreeMap<Tag, TagValue>,
}

impl TagCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single value, replacing whatever was stored.
    pub fn set(&mut self, tag: Tag, value: impl Into<String>) {
        self.entries.insert(tag, TagValue::Single(value.into()));
    }

    /// Set a list of values, replacing whatever was stored.
    pub fn set_list<I, S>(&mut self, tag: Tag, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.entries.insert(tag, TagValue::List(values));
    }

    /// Append a value. A single value already present is promoted to a list.
    pub fn push(&mut self, tag: Tag, value: impl Into<String>) {
        let value = value.into();
        match self.entries.remove(&tag) {
            None => {
                self.entries.insert(tag, TagValue::List(vec![value]));
            }
            Some(TagValue::Single(first)) => {
                self.entries.insert(tag, TagValue::List(vec![first, value]));
            }
            Some(TagValue::List(mut values)) => {
                values.push(value);
                self.entries.insert(tag, TagValue::List(values));
            }
        }
    }

    /// Look up a tag.
    pub fn get(&self, tag: &Tag) -> Option<&TagValue> {
        self.entries.get(tag)
    }

    /// Remove a tag, returning its value.
    pub fn remove(&mut self, tag: &Tag) -> Option<TagValue> {
        self.entries.remove(tag)
    }

    /// The package name, if exactly one non-empty `Name` value is present.
    pub fn name(&self) -> Option<&str> {
        match self.entries.get(&Tag::Name)?.values() {
            [name] if !name.trim().is_empty() => Some(name.as_str()),
            _ => None,
        }
    }

    /// Iterate over all tags, extensions included.
    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &TagValue)> {
        self.entries.iter()
    }

    /// Tags that the default serializer skips.
    pub fn extensions(&self) -> impl Iterator<Item = &Tag> {
        self.entries.keys().filter(|tag| !tag.is_canonical())
    }

    /// Number of tags stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tags are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
