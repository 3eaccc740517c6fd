//! Error types for the build pipeline.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Fatal errors from the build pipeline. Any of these aborts the attempt.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The external tool could not be started.
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran past its deadline and was killed.
    #[error("{program} did not finish within {}s and was killed", .timeout.as_secs())]
    TimedOut {
        /// Program that was killed.
        program: String,
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// Building or retrieving the source package failed.
    #[error("Source package build failed: {0}")]
    SourcePackage(#[from] SourcePackageError),

    /// Initialising the sandbox root failed.
    #[error("Initialising root {root} failed (exit code {exit_code:?}):\n{output}")]
    RootInit {
        /// Root name, e.g. `fedora-22-x86_64`.
        root: String,
        /// Exit code, `None` if killed by a signal.
        exit_code: Option<i32>,
        /// Captured stdout and stderr.
        output: String,
    },

    /// Filesystem or pipe error outside the per-artifact best-effort paths.
    #[error("{context}: {source}")]
    Io {
        /// What was being done.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Why a source package could not be produced.
#[derive(Error, Debug)]
pub enum SourcePackageError {
    /// The build root could not be prepared.
    #[error("{context}: {source}")]
    Stage {
        /// What was being done.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The builder exited unsuccessfully.
    #[error("rpmbuild exited with code {exit_code:?}:\n{output}")]
    Failed {
        /// Exit code, `None` if killed by a signal.
        exit_code: Option<i32>,
        /// Captured stdout and stderr.
        output: String,
    },

    /// The builder succeeded but no `.src.rpm` could be found.
    #[error("no .src.rpm produced; builder output:\n{output}")]
    NoArtifact {
        /// Captured stdout and stderr.
        output: String,
    },

    /// The produced source package could not be moved to the output directory.
    #[error("moving {} to {}: {source}", .from.display(), .to.display())]
    Move {
        /// Where the source package was produced.
        from: PathBuf,
        /// Output directory it should have been moved into.
        to: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A binary build the caller has judged failed.
///
/// Produced by [`BuildOutcome::into_result`](crate::BuildOutcome::into_result);
/// the builder itself never returns it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Binary package build failed (exit code {exit_code:?}){}", format_diagnostics(.diagnostics))]
pub struct BuildFailure {
    /// Exit code of the sandboxed builder, `None` if killed by a signal.
    pub exit_code: Option<i32>,
    /// Diagnostic lines collected during the build.
    pub diagnostics: Vec<String>,
}

fn format_diagnostics(diagnostics: &[String]) -> String {
    if diagnostics.is_empty() {
        String::new()
    } else {
        format!(":\n{}", diagnostics.join("\n"))
    }
}
