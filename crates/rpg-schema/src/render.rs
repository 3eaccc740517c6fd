//! Canonical spec-file serialization.
//!
//! Output layout:
//!
//! 1. Tags of the top-level package in [`CANONICAL_ORDER`], one `Key: value`
//!    line per value. `Patch` values are numbered `Patch1`, `Patch2`, ...
//! 2. Script sections in [`SCRIPT_ORDER`]. At the `%package` slot every
//!    subpackage is written: a `%package <name>` header, its tags, then its
//!    scripts with headers qualified by its name (`%install devel`).
//! 3. A trailing `%changelog` with every entry in insertion order.
//!
//! Extension tags are not written. Subpackages never carry patches.

use std::io::Write;

use crate::descriptor::{Descriptor, PackageUnit};
use crate::script::{SCRIPT_ORDER, ScriptSection, ScriptStep};
use crate::tag::{CANONICAL_ORDER, Tag, TagValue};

/// Errors raised while rendering a descriptor.
#[derive(thiserror::Error, Debug)]
pub enum SpecError {
    /// A unit that must be referenced by name has no usable `Name` tag.
    #[error("missing required tag `{tag}` on {unit}")]
    MissingRequiredTag {
        /// The tag that was required.
        tag: Tag,
        /// Which unit lacked it (e.g. `subpackage #2`).
        unit: String,
    },

    /// Writing the rendered text to the sink failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Render a descriptor to spec text.
///
/// Every subpackage name is validated before any text is produced.
///
/// # Errors
///
/// Returns [`SpecError::MissingRequiredTag`] if a subpackage has no single,
/// non-empty `Name` value.
pub fn render_descriptor(descriptor: &Descriptor) -> Result<String, SpecError> {
    let names = subpackage_names(descriptor)?;
    let package = &descriptor.package;
    let mut out = String::new();

    let mut patch_index = 1;
    for tag in &CANONICAL_ORDER {
        let Some(value) = package.tags.get(tag) else {
            continue;
        };
        if *tag == Tag::Patch {
            for patch in value.values() {
                push_line(&mut out, &format!("Patch{patch_index}: {patch}"));
                patch_index += 1;
            }
            continue;
        }
        push_tag(&mut out, tag, value);
    }
    log_skipped_extensions(package, "top-level package");

    for step in SCRIPT_ORDER {
        match step {
            ScriptStep::Subpackages => {
                for (unit, name) in descriptor.subpackages.iter().zip(&names) {
                    push_unit(&mut out, unit, name);
                }
            }
            // Written as part of the trailer below.
            ScriptStep::Section(ScriptSection::Changelog) => {}
            ScriptStep::Section(section) => push_section(&mut out, package, section, None),
        }
    }

    out.push_str("\n%changelog\n");
    if let Some(body) = package.scripts.get(ScriptSection::Changelog) {
        push_line(&mut out, body);
    }
    for entry in &descriptor.changelog {
        push_line(&mut out, &entry.to_string());
        out.push('\n');
    }

    Ok(out)
}

/// Render a single subpackage the way it appears inside a descriptor.
///
/// # Errors
///
/// Returns [`SpecError::MissingRequiredTag`] if the unit has no `Name`.
pub fn render_unit(unit: &PackageUnit) -> Result<String, SpecError> {
    let name = unit.name().ok_or_else(|| SpecError::MissingRequiredTag {
        tag: Tag::Name,
        unit: "subpackage".to_string(),
    })?;
    let mut out = String::new();
    push_unit(&mut out, unit, name);
    Ok(out)
}

/// Render a descriptor and write it to `out`.
///
/// Rendering completes in memory first, so a validation failure leaves
/// `out` untouched.
///
/// # Errors
///
/// Returns [`SpecError::MissingRequiredTag`] on validation failure or
/// [`SpecError::Io`] if the write fails.
pub fn write_descriptor<W: Write>(descriptor: &Descriptor, out: &mut W) -> Result<(), SpecError> {
    let text = render_descriptor(descriptor)?;
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn subpackage_names(descriptor: &Descriptor) -> Result<Vec<&str>, SpecError> {
    descriptor
        .subpackages
        .iter()
        .enumerate()
        .map(|(index, unit)| {
            unit.name().ok_or_else(|| SpecError::MissingRequiredTag {
                tag: Tag::Name,
                unit: format!("subpackage #{}", index + 1),
            })
        })
        .collect()
}

fn push_unit(out: &mut String, unit: &PackageUnit, name: &str) {
    for tag in &CANONICAL_ORDER {
        let Some(value) = unit.tags.get(tag) else {
            continue;
        };
        match tag {
            Tag::Name => {
                out.push('\n');
                push_line(out, &format!("%package {name}"));
            }
            Tag::Patch => {
                tracing::warn!("Subpackage '{name}' declares patches; they are not written");
            }
            _ => push_tag(out, tag, value),
        }
    }
    log_skipped_extensions(unit, name);

    for step in SCRIPT_ORDER {
        match step {
            ScriptStep::Subpackages => {}
            ScriptStep::Section(ScriptSection::Changelog) => {
                if unit.scripts.get(ScriptSection::Changelog).is_some() {
                    tracing::warn!("Subpackage '{name}' has a %changelog script; ignored");
                }
            }
            ScriptStep::Section(section) => push_section(out, unit, section, Some(name)),
        }
    }
}

fn push_tag(out: &mut String, tag: &Tag, value: &TagValue) {
    match value {
        TagValue::Single(value) => push_line(out, &format!("{tag}: {value}")),
        TagValue::List(values) => {
            for value in values {
                push_line(out, &format!("{tag}: {value}"));
            }
        }
    }
}

fn push_section(out: &mut String, unit: &PackageUnit, section: ScriptSection, owner: Option<&str>) {
    let body = match unit.scripts.get(section) {
        Some(body) => body.to_string(),
        None if section == ScriptSection::Files && !unit.files.is_empty() => unit
            .files
            .iter()
            .map(crate::files::FileEntry::spec_line)
            .collect::<Vec<_>>()
            .join("\n"),
        None => return,
    };

    out.push('\n');
    match owner {
        Some(name) => push_line(out, &format!("{section} {name}")),
        None => push_line(out, section.as_str()),
    }
    push_line(out, &body);
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn log_skipped_extensions(unit: &PackageUnit, owner: &str) {
    for tag in unit.tags.extensions() {
        tracing::debug!("Skipping extension tag '{tag}' on {owner}");
    }
}
