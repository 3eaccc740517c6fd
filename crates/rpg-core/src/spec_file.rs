//! Writing rendered spec files to disk.

use anyhow::{Context, Result};
use rpg_schema::{Descriptor, render_descriptor};
use std::path::Path;

/// Render `descriptor` and write it to `path`, creating parent directories.
///
/// Nothing is written if rendering fails.
///
/// # Errors
///
/// Returns an error if the descriptor does not validate or the file cannot
/// be written.
pub fn write_spec_file(descriptor: &Descriptor, path: &Path) -> Result<()> {
    let text = render_descriptor(descriptor).context("Failed to render spec")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote spec file {}", path.display());
    Ok(())
}
