//! Host tool checks before building.
//!
//! Catches a missing `mock` or `rpmbuild` up front instead of as a spawn
//! error halfway through a pipeline.

use anyhow::{Result, bail};
use std::path::Path;

use crate::builder::BuilderConfig;

/// Whether `cmd` resolves to an executable (a path, or a name on `PATH`).
pub fn command_exists(cmd: &Path) -> bool {
    which::which(cmd).is_ok()
}

/// Check that specific tools are available.
///
/// Each tuple is (command, package providing it).
///
/// # Errors
///
/// Returns a single error listing every missing tool and its package.
pub fn check_required_tools(tools: &[(&Path, &str)]) -> Result<()> {
    let missing: Vec<_> = tools
        .iter()
        .filter(|(tool, _)| !command_exists(tool))
        .map(|(tool, package)| format!("  {} (install: {package})", tool.display()))
        .collect();

    if !missing.is_empty() {
        bail!("Missing required host tools:\n{}", missing.join("\n"));
    }
    Ok(())
}

/// Check the builders named in `config`.
///
/// # Errors
///
/// Returns an error listing the configured builders that cannot be found.
pub fn check_host_tools(config: &BuilderConfig) -> Result<()> {
    check_required_tools(&[
        (config.rpmbuild_bin.as_path(), "rpm-build"),
        (config.mock_bin.as_path(), "mock"),
    ])
}
