use anyhow::{Context, Result};
use rpg_schema::{Descriptor, FileEntry, FileList};
use std::path::Path;
use walkdir::WalkDir;

use super::{AnalysisPlugin, DependencySack};

/// Records every file in the project tree whose name contains a dot.
///
/// Paths are stored relative to the project root, with no target and no
/// attribute, in file-name order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FindFilePlugin;

impl AnalysisPlugin for FindFilePlugin {
    fn name(&self) -> &str {
        "find_file"
    }

    fn compiled(
        &self,
        project_dir: &Path,
        _: &Descriptor,
        files: &mut FileList,
        _: &dyn DependencySack,
    ) -> Result<()> {
        let mut added = 0;
        for entry in WalkDir::new(project_dir).min_depth(1).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("Failed to walk {}", project_dir.display()))?;
            if !entry.file_type().is_file() || !entry.file_name().to_string_lossy().contains('.') {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(project_dir)
                .with_context(|| format!("{} escapes the project", entry.path().display()))?;
            if files.insert(FileEntry::new(relative)) {
                added += 1;
            }
        }
        tracing::debug!("find_file: recorded {added} file(s) under {}", project_dir.display());
        Ok(())
    }
}
