//! Package units and the descriptor that groups them.

use serde::{Deserialize, Serialize};

use crate::changelog::ChangelogEntry;
use crate::files::FileList;
use crate::script::ScriptCollection;
use crate::tag::{Tag, TagCollection};

/// The tag/script/file shape shared by a package and its subpackages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageUnit {
    /// Preamble tags.
    #[serde(default)]
    pub tags: TagCollection,
    /// Script section bodies.
    #[serde(default)]
    pub scripts: ScriptCollection,
    /// Files shipped by this unit.
    #[serde(default)]
    pub files: FileList,
}

impl PackageUnit {
    /// An empty unit with its `Name` tag set.
    pub fn named(name: impl Into<String>) -> Self {
        let mut unit = Self::default();
        unit.tags.set(Tag::Name, name);
        unit
    }

    /// Shorthand for `self.tags.name()`.
    pub fn name(&self) -> Option<&str> {
        self.tags.name()
    }
}

/// The full build specification for one package family.
///
/// Owns its own [`PackageUnit`], the subpackages rendered at the `%package`
/// slot, and the changelog. One descriptor is built per build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// The top-level package.
    #[serde(flatten)]
    pub package: PackageUnit,
    /// Subpackages, rendered in insertion order.
    #[serde(default)]
    pub subpackages: Vec<PackageUnit>,
    /// Changelog entries, rendered in insertion order.
    #[serde(default)]
    pub changelog: Vec<ChangelogEntry>,
}

impl Descriptor {
    /// An empty descriptor with the top-level `Name` tag set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            package: PackageUnit::named(name),
            ..Self::default()
        }
    }

    /// Append a subpackage.
    pub fn add_subpackage(&mut self, unit: PackageUnit) {
        self.subpackages.push(unit);
    }

    /// Append a changelog entry.
    pub fn add_changelog(&mut self, entry: ChangelogEntry) {
        self.changelog.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::FileAttr;
    use crate::script::ScriptSection;
    use crate::tag::TagValue;

    const DEMO: &str = r#"
[tags]
Name = "demo"
Requires = ["vlc", "python"]
Epoch = "1"

[scripts]
"%build" = "make"

[[files]]
path = "README.md"
attr = "doc"

[[subpackages]]
[subpackages.tags]
Name = "devel"

[[changelog]]
date = "2015-06-01"
author = "Jane Doe"
email = "jane@example.com"
message = "Initial package"
"#;

    #[test]
    fn test_load_from_toml() {
        let spec: Descriptor = toml::from_str(DEMO).unwrap();

        assert_eq!(spec.package.name(), Some("demo"));
        assert_eq!(
            spec.package.tags.get(&Tag::Requires),
            Some(&TagValue::List(vec!["vlc".to_string(), "python".to_string()]))
        );
        assert_eq!(
            spec.package.tags.get(&Tag::Extension("Epoch".to_string())),
            Some(&TagValue::Single("1".to_string()))
        );
        assert_eq!(spec.package.scripts.get(ScriptSection::Build), Some("make"));
        assert_eq!(spec.package.files.len(), 1);
        assert_eq!(spec.subpackages[0].name(), Some("devel"));
        assert_eq!(spec.changelog[0].author, "Jane Doe");
    }

    #[test]
    fn test_duplicate_file_paths_keep_first_on_load() {
        let toml = "[[files]]\npath = \"a\"\nattr = \"doc\"\n\n[[files]]\npath = \"a\"\n";
        let spec: Descriptor = toml::from_str(toml).unwrap();

        assert_eq!(spec.package.files.len(), 1);
        assert_eq!(
            spec.package.files.iter().next().unwrap().attr,
            Some(FileAttr::Doc)
        );
    }

    #[test]
    fn test_unknown_script_section_is_rejected() {
        let bad = "[scripts]\n\"%bogus\" = \"x\"\n";
        assert!(toml::from_str::<Descriptor>(bad).is_err());
    }
}
