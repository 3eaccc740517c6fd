//! Script sections and the order they are written in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A script section of a spec file (`%prep`, `%install`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScriptSection {
    /// `%description`
    Description,
    /// `%prep`
    Prep,
    /// `%build`
    Build,
    /// `%pre`
    Pre,
    /// `%install`
    Install,
    /// `%check`
    Check,
    /// `%post`
    Post,
    /// `%preun`
    Preun,
    /// `%postun`
    Postun,
    /// `%pretrans`
    Pretrans,
    /// `%posttrans`
    Posttrans,
    /// `%clean`
    Clean,
    /// `%files`
    Files,
    /// `%changelog`. Free text placed at the top of the trailing changelog.
    Changelog,
}

impl ScriptSection {
    /// The section marker as written in spec text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Description => "%description",
            Self::Prep => "%prep",
            Self::Build => "%build",
            Self::Pre => "%pre",
            Self::Install => "%install",
            Self::Check => "%check",
            Self::Post => "%post",
            Self::Preun => "%preun",
            Self::Postun => "%postun",
            Self::Pretrans => "%pretrans",
            Self::Posttrans => "%posttrans",
            Self::Clean => "%clean",
            Self::Files => "%files",
            Self::Changelog => "%changelog",
        }
    }

    /// All sections, in canonical order.
    pub const ALL: [Self; 14] = [
        Self::Description,
        Self::Prep,
        Self::Build,
        Self::Pre,
        Self::Install,
        Self::Check,
        Self::Post,
        Self::Preun,
        Self::Postun,
        Self::Pretrans,
        Self::Posttrans,
        Self::Clean,
        Self::Files,
        Self::Changelog,
    ];
}

impl fmt::Display for ScriptSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A section marker that is not one of the known script sections.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown script section `{0}`")]
pub struct UnknownSection(pub String);

impl FromStr for ScriptSection {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

impl TryFrom<String> for ScriptSection {
    type Error = UnknownSection;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ScriptSection> for String {
    fn from(section: ScriptSection) -> Self {
        section.as_str().to_string()
    }
}

/// One position in the canonical script order.
///
/// The order interleaves a marker for where subpackages go between the
/// script sections of the owning package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStep {
    /// Emit this script section if present.
    Section(ScriptSection),
    /// Emit every subpackage, in insertion order.
    Subpackages,
}

/// Canonical order of script sections, with the `%package` slot.
pub const SCRIPT_ORDER: [ScriptStep; 15] = [
    ScriptStep::Section(ScriptSection::Description),
    ScriptStep::Subpackages,
    ScriptStep::Section(ScriptSection::Prep),
    ScriptStep::Section(ScriptSection::Build),
    ScriptStep::Section(ScriptSection::Pre),
    ScriptStep::Section(ScriptSection::Install),
    ScriptStep::Section(ScriptSection::Check),
    ScriptStep::Section(ScriptSection::Post),
    ScriptStep::Section(ScriptSection::Preun),
    ScriptStep::Section(ScriptSection::Postun),
    ScriptStep::Section(ScriptSection::Pretrans),
    ScriptStep::Section(ScriptSection::Posttrans),
    ScriptStep::Section(ScriptSection::Clean),
    ScriptStep::Section(ScriptSection::Files),
    ScriptStep::Section(ScriptSection::Changelog),
];

/// Mapping from script section to its multi-line body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptCollection {
    bodies: BTreeMap<ScriptSection, String>,
}

impl ScriptCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body of a section, replacing any previous body.
    pub fn set(&mut self, section: ScriptSection, body: impl Into<String>) {
        self.bodies.insert(section, body.into());
    }

    /// Body of a section, if set.
    pub fn get(&self, section: ScriptSection) -> Option<&str> {
        self.bodies.get(&section).map(String::as_str)
    }

    /// Remove a section, returning its body.
    pub fn remove(&mut self, section: ScriptSection) -> Option<String> {
        self.bodies.remove(&section)
    }

    /// Iterate over present sections in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ScriptSection, &str)> {
        self.bodies.iter().map(|(section, body)| (*section, body.as_str()))
    }

    /// Number of sections present.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether no sections are present.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_section_markers() {
        assert_eq!("%install".parse::<ScriptSection>(), Ok(ScriptSection::Install));
        assert_eq!("%posttrans".parse::<ScriptSection>(), Ok(ScriptSection::Posttrans));
        assert_eq!(
            "install".parse::<ScriptSection>(),
            Err(UnknownSection("install".to_string()))
        );
        assert!("%package".parse::<ScriptSection>().is_err());
    }

    #[test]
    fn test_script_order_covers_every_section_once() {
        let sections: Vec<_> = SCRIPT_ORDER
            .iter()
            .filter_map(|step| match step {
                ScriptStep::Section(section) => Some(*section),
                ScriptStep::Subpackages => None,
            })
            .collect();
        assert_eq!(sections, ScriptSection::ALL.to_vec());
        assert_eq!(SCRIPT_ORDER[1], ScriptStep::Subpackages);
    }

    #[test]
    fn test_iteration_ignores_insertion_order() {
        let mut scripts = ScriptCollection::new();
        scripts.set(ScriptSection::Files, "/usr/bin/demo");
        scripts.set(ScriptSection::Build, "make");
        scripts.set(ScriptSection::Description, "demo");

        let order: Vec<_> = scripts.iter().map(|(section, _)| section).collect();
        assert_eq!(
            order,
            vec![
                ScriptSection::Description,
                ScriptSection::Build,
                ScriptSection::Files
            ]
        );
    }
}
