//! Descriptor model and canonical serializer for RPM spec files.
//!
//! A [`Descriptor`] is the full build specification of a package family: its
//! own tags, scripts and files, the subpackages built alongside it and the
//! changelog. [`render_descriptor`] turns it into spec text with a fixed
//! section order, so two descriptors holding the same data always produce the
//! same file regardless of how they were assembled.
//!
//! # Example
//!
//! ```
//! use rpg_schema::{Descriptor, ScriptSection, Tag, render_descriptor};
//!
//! let mut spec = Descriptor::default();
//! spec.package.tags.set(Tag::Name, "demo");
//! spec.package.tags.set(Tag::Version, "1.0");
//! spec.package.scripts.set(ScriptSection::Build, "make");
//!
//! let text = render_descriptor(&spec).unwrap();
//! assert!(text.starts_with("Name: demo\nVersion: 1.0\n\n%build\nmake\n"));
//! ```

pub mod changelog;
pub mod descriptor;
pub mod files;
pub mod render;
pub mod script;
pub mod tag;

// Re-exports
pub use changelog::ChangelogEntry;
pub use descriptor::{Descriptor, PackageUnit};
pub use files::{FileAttr, FileEntry, FileList};
pub use render::{SpecError, render_descriptor, render_unit, write_descriptor};
pub use script::{SCRIPT_ORDER, ScriptCollection, ScriptSection, ScriptStep, UnknownSection};
pub use tag::{CANONICAL_ORDER, Tag, TagCollection, TagValue};
