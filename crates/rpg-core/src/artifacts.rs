//! Best-effort collection of build results.
//!
//! After a sandboxed build the result directory holds binary packages and
//! logs. [`collect`] moves the packages into the output directory and the
//! logs into `<output>/mock_logs`. A file that cannot be moved is logged and
//! skipped, so one locked log never costs the caller a finished package.
//! Callers check the returned sets against what they expected.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Glob for binary packages (source packages included).
pub const PACKAGE_GLOB: &str = "*.rpm";

/// Glob for builder logs.
pub const LOG_GLOB: &str = "*.log";

/// Subdirectory of the output directory that receives logs.
pub const LOGS_DIR: &str = "mock_logs";

/// Whether `path` names a source package (`*.src.rpm`).
pub fn is_source_package(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(".src.rpm"))
}

/// Files actually moved by [`collect`], at their new locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Collected {
    /// Moved packages, source packages included.
    pub rpms: Vec<PathBuf>,
    /// Moved logs.
    pub logs: Vec<PathBuf>,
}

/// Move packages and logs out of `result_dir`.
///
/// Packages land directly in `output_dir`, logs in `output_dir/mock_logs`.
/// Both directories are created if absent.
pub fn collect(result_dir: &Path, output_dir: &Path) -> Collected {
    let rpms = move_matching(result_dir, PACKAGE_GLOB, output_dir);
    let logs = move_matching(result_dir, LOG_GLOB, &output_dir.join(LOGS_DIR));
    tracing::debug!(
        "Collected {} package(s) and {} log(s) from {}",
        rpms.len(),
        logs.len(),
        result_dir.display()
    );
    Collected { rpms, logs }
}

/// Move every regular file in `dir` matching `pattern` into `dest`.
///
/// Returns the new paths of the files that were moved, in name order.
pub fn move_matching(dir: &Path, pattern: &str, dest: &Path) -> Vec<PathBuf> {
    if let Err(e) = fs::create_dir_all(dest) {
        tracing::warn!("Cannot create {}: {e}", dest.display());
        return Vec::new();
    }

    let full_pattern = format!(
        "{}/{pattern}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let entries = match glob::glob(&full_pattern) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Invalid artifact pattern {full_pattern}: {e}");
            return Vec::new();
        }
    };

    let mut moved = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        match move_file(&path, dest) {
            Ok(new_path) => moved.push(new_path),
            Err(e) => tracing::warn!("Could not move {}: {e}", path.display()),
        }
    }
    moved
}

/// Move `file` into `dest_dir`, keeping its name.
///
/// Prefers rename (atomic, instant on same filesystem) with copy fallback.
pub(crate) fn move_file(file: &Path, dest_dir: &Path) -> std::io::Result<PathBuf> {
    let name = file.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} has no file name", file.display()),
        )
    })?;
    let target = dest_dir.join(name);

    if fs::rename(file, &target).is_err() {
        fs::copy(file, &target)?;
        if let Err(e) = fs::remove_file(file) {
            tracing::warn!("Copied {} but could not remove it: {e}", file.display());
        }
    }
    Ok(target)
}
