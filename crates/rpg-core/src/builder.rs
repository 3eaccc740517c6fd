//! Build orchestration on top of `rpmbuild` and `mock`.
//!
//! Two steps turn a rendered spec file into binary packages:
//!
//! 1. [`PackageBuilder::build_source_package`] stages a private rpmbuild
//!    top directory, copies the source archive into `SOURCES/`, runs
//!    `rpmbuild -bs` and moves the resulting `.src.rpm` to the output
//!    directory. Every failure here is fatal: later steps need the source
//!    package.
//! 2. [`PackageBuilder::build_binary_package`] rebuilds the source package
//!    inside a `mock` root for `<distro>-<arch>`. Combined stdout/stderr is
//!    read line by line on the calling thread, every line goes to the
//!    [`BuildReporter`], and lines matching the diagnostic pattern are kept.
//!    Once the process exits, `build.log` is scanned again and the results
//!    are collected best-effort. The call returns a [`BuildOutcome`]; whether
//!    that outcome counts as a failure is for the caller to decide.
//!
//! Each call works in its own scratch directory under
//! [`BuilderConfig::scratch_root`], so concurrent builds never share a
//! result directory.

use serde::Serialize;
use std::fs;
use std::io::{BufRead, BufReader, PipeReader};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use wait_timeout::ChildExt;

use crate::artifacts::{self, Collected};
use crate::diagnostics::{is_diagnostic, scan_log};
use crate::error::{BuildError, BuildFailure, SourcePackageError};
use crate::paths;
use crate::reporter::{BuildReporter, NullReporter};

/// Name of the log the sandboxed builder writes into its result directory.
pub const BUILD_LOG: &str = "build.log";

/// Subdirectories of an rpmbuild top directory.
const TOPDIR_LAYOUT: [&str; 6] = ["BUILD", "BUILDROOT", "RPMS", "SOURCES", "SPECS", "SRPMS"];

/// Configuration for [`PackageBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Sandboxed builder executable.
    pub mock_bin: PathBuf,
    /// Source package builder executable.
    pub rpmbuild_bin: PathBuf,
    /// Parent of the per-build scratch directories.
    pub scratch_root: PathBuf,
    /// Kill the sandboxed builder after this long. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            mock_bin: PathBuf::from("mock"),
            rpmbuild_bin: PathBuf::from("rpmbuild"),
            scratch_root: paths::tmp_path(),
            timeout: None,
        }
    }
}

impl BuilderConfig {
    /// Load configuration from environment variables.
    ///
    /// `RPG_MOCK_BIN`, `RPG_RPMBUILD_BIN` and `RPG_BUILD_TIMEOUT_SECS`
    /// override the defaults. An unparsable timeout is ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(bin) = std::env::var("RPG_MOCK_BIN") {
            config.mock_bin = PathBuf::from(bin);
        }
        if let Ok(bin) = std::env::var("RPG_RPMBUILD_BIN") {
            config.rpmbuild_bin = PathBuf::from(bin);
        }
        if let Ok(secs) = std::env::var("RPG_BUILD_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => config.timeout = Some(Duration::from_secs(secs)),
                Err(e) => tracing::warn!("Ignoring RPG_BUILD_TIMEOUT_SECS={secs}: {e}"),
            }
        }
        config
    }
}

/// Result of one sandboxed binary build.
///
/// Always produced once the builder ran to completion, whatever its exit
/// code. See [`BuildOutcome::into_result`] for the default pass/fail policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
    /// Sandbox root the build ran in, e.g. `fedora-22-x86_64`.
    pub root: String,
    /// Exit code of the builder, `None` if it was killed by a signal.
    pub exit_code: Option<i32>,
    /// Matching lines from live output, then matching lines from `build.log`.
    /// The two passes are not deduplicated against each other.
    pub diagnostics: Vec<String>,
    /// Every `*.rpm` moved into the output directory. mock copies the source
    /// package into its result directory, so the `.src.rpm` is listed here
    /// too; use [`BuildOutcome::binary_rpms`] for binary packages only.
    pub rpms: Vec<PathBuf>,
    /// Logs moved into `<output>/mock_logs`.
    pub logs: Vec<PathBuf>,
}

impl BuildOutcome {
    /// Whether the builder exited with status zero.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Moved packages, excluding source packages.
    pub fn binary_rpms(&self) -> impl Iterator<Item = &Path> {
        self.rpms
            .iter()
            .map(PathBuf::as_path)
            .filter(|path| !artifacts::is_source_package(path))
    }

    /// Whether the builder exited with status zero and nothing matched.
    pub fn is_clean(&self) -> bool {
        self.succeeded() && self.diagnostics.is_empty()
    }

    /// Apply the default policy: the exit code decides.
    ///
    /// Diagnostics alone do not fail a build; ordinary compiler flags such
    /// as `-Werror=format-security` match the pattern in almost every log.
    ///
    /// # Errors
    ///
    /// Returns [`BuildFailure`] carrying the exit code and diagnostics if the
    /// builder did not exit with status zero.
    pub fn into_result(self) -> Result<Self, BuildFailure> {
        if self.succeeded() {
            Ok(self)
        } else {
            Err(BuildFailure {
                exit_code: self.exit_code,
                diagnostics: self.diagnostics,
            })
        }
    }
}

/// Drives `rpmbuild` and `mock` for one package family.
pub struct PackageBuilder {
    config: BuilderConfig,
    reporter: Arc<dyn BuildReporter>,
}

impl std::fmt::Debug for PackageBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PackageBuilder {
    /// Create a builder that discards live output.
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            config,
            reporter: Arc::new(NullReporter),
        }
    }

    /// Send phases and live output to `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn BuildReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Build a source package from a spec file and a source archive.
    ///
    /// Returns the path of the `.src.rpm` inside `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Spawn`] if `rpmbuild` cannot be started and
    /// [`BuildError::SourcePackage`] if staging, the build itself, locating
    /// the result, or moving it fails.
    pub fn build_source_package(
        &self,
        spec_path: &Path,
        source_archive: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf, BuildError> {
        self.reporter.phase("Building source package");
        let scratch = self.scratch_dir("rpg-srpm-")?;
        let topdir = scratch.path();

        for sub in TOPDIR_LAYOUT {
            fs::create_dir_all(topdir.join(sub))
                .map_err(|e| stage_error(format!("creating {sub}/ in build root"), e))?;
        }

        let archive_name = source_archive.file_name().ok_or_else(|| {
            stage_error(
                format!("{} is not a file", source_archive.display()),
                std::io::Error::from(std::io::ErrorKind::InvalidInput),
            )
        })?;
        fs::copy(source_archive, topdir.join("SOURCES").join(archive_name)).map_err(|e| {
            stage_error(format!("copying {} into SOURCES", source_archive.display()), e)
        })?;

        let program = self.config.rpmbuild_bin.display().to_string();
        tracing::debug!("Running {program} -bs {}", spec_path.display());
        let output = Command::new(&self.config.rpmbuild_bin)
            .arg("-bs")
            .arg("--define")
            .arg(format!("_topdir {}", topdir.display()))
            .arg(spec_path)
            .output()
            .map_err(|source| BuildError::Spawn {
                program: program.clone(),
                source,
            })?;

        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        if !output.status.success() {
            return Err(SourcePackageError::Failed {
                exit_code: output.status.code(),
                output: combined,
            }
            .into());
        }

        let produced = wrote_path(&combined)
            .filter(|path| path.is_file())
            .or_else(|| find_source_package(&topdir.join("SRPMS")))
            .ok_or_else(|| SourcePackageError::NoArtifact {
                output: combined.clone(),
            })?;

        fs::create_dir_all(output_dir).map_err(|e| {
            stage_error(format!("creating output directory {}", output_dir.display()), e)
        })?;
        let moved = artifacts::move_file(&produced, output_dir).map_err(|source| {
            SourcePackageError::Move {
                from: produced.clone(),
                to: output_dir.to_path_buf(),
                source,
            }
        })?;

        tracing::info!("Source package written to {}", moved.display());
        Ok(moved)
    }

    /// Rebuild a source package inside the sandbox root `<distro>-<arch>`.
    ///
    /// Produced packages are moved to `output_dir`, logs to
    /// `output_dir/mock_logs`. A non-zero exit code is *not* an error here;
    /// inspect the returned [`BuildOutcome`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Spawn`] if `mock` cannot be started,
    /// [`BuildError::TimedOut`] if it was killed at the configured deadline,
    /// or [`BuildError::Io`] if its output pipe fails.
    pub fn build_binary_package(
        &self,
        source_package: &Path,
        distro: &str,
        arch: &str,
        output_dir: &Path,
    ) -> Result<BuildOutcome, BuildError> {
        let root = paths::root_name(distro, arch);
        self.reporter.phase(&format!("Building binary packages for {root}"));

        let scratch = self.scratch_dir("rpg-mock-")?;
        let result_dir = scratch.path();
        let program = self.config.mock_bin.display().to_string();

        let (reader, writer) =
            std::io::pipe().map_err(|e| BuildError::io("creating output pipe", e))?;
        let child = {
            let mut cmd = Command::new(&self.config.mock_bin);
            cmd.arg("--no-clean")
                .arg("--verbose")
                .arg("--root")
                .arg(&root)
                .arg("--rebuild")
                .arg(source_package)
                .arg(format!("--resultdir={}", result_dir.display()));
            let stderr = writer
                .try_clone()
                .map_err(|e| BuildError::io("duplicating output pipe", e))?;
            // Own process group, so a timeout reaches everything mock starts.
            cmd.stdout(writer).stderr(stderr).process_group(0);
            tracing::debug!("Running {cmd:?}");
            cmd.spawn().map_err(|source| BuildError::Spawn {
                program: program.clone(),
                source,
            })?
            // `cmd` drops here, closing our copies of the write end so the
            // reader sees EOF once mock exits.
        };

        let pid = child.id();
        let watchdog = spawn_watchdog(child, self.config.timeout);

        let mut diagnostics = match self.stream_output(reader) {
            Ok(diagnostics) => diagnostics,
            Err(e) => {
                stop_builder(pid, watchdog);
                return Err(BuildError::io(format!("reading {program} output"), e));
            }
        };

        let (status, timed_out) = watchdog
            .join()
            .map_err(|_| {
                BuildError::io(
                    format!("waiting for {program}"),
                    std::io::Error::other("watchdog thread panicked"),
                )
            })?
            .map_err(|e| BuildError::io(format!("waiting for {program}"), e))?;

        if timed_out {
            return Err(BuildError::TimedOut {
                program,
                timeout: self.config.timeout.unwrap_or_default(),
            });
        }

        let exit_code = status.code();
        tracing::info!("{program} exited with code {exit_code:?}");

        let log_path = result_dir.join(BUILD_LOG);
        match scan_log(&log_path) {
            Ok(lines) => diagnostics.extend(lines),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No {BUILD_LOG} in {}", result_dir.display());
            }
            Err(e) => tracing::warn!("Could not read {}: {e}", log_path.display()),
        }

        let Collected { rpms, logs } = artifacts::collect(result_dir, output_dir);

        Ok(BuildOutcome {
            root,
            exit_code,
            diagnostics,
            rpms,
            logs,
        })
    }

    /// Initialise the sandbox root `<distro>-<arch>` ahead of a build.
    ///
    /// Prefetches the root's repositories so the first build does not pay
    /// for it. Optional: `mock --rebuild` initialises on demand.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Spawn`] if `mock` cannot be started or
    /// [`BuildError::RootInit`] if it exits unsuccessfully.
    pub fn init_root(&self, distro: &str, arch: &str) -> Result<(), BuildError> {
        let root = paths::root_name(distro, arch);
        self.reporter.phase(&format!("Initialising {root}"));

        let output = Command::new(&self.config.mock_bin)
            .arg("--init")
            .arg("-r")
            .arg(&root)
            .output()
            .map_err(|source| BuildError::Spawn {
                program: self.config.mock_bin.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(BuildError::RootInit {
                root,
                exit_code: output.status.code(),
                output: format!(
                    "{}{}",
                    String::from_utf8_lossy(&output.stdout),
                    String::from_utf8_lossy(&output.stderr)
                ),
            });
        }
        Ok(())
    }

    /// Forward every output line to the reporter, returning the diagnostics.
    fn stream_output(&self, reader: PipeReader) -> std::io::Result<Vec<String>> {
        let mut diagnostics = Vec::new();
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(diagnostics);
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            self.reporter.output_line(line);
            if is_diagnostic(line) {
                self.reporter.diagnostic(line);
                diagnostics.push(line.to_string());
            }
        }
    }

    fn scratch_dir(&self, prefix: &str) -> Result<tempfile::TempDir, BuildError> {
        let root = &self.config.scratch_root;
        fs::create_dir_all(root)
            .map_err(|e| BuildError::io(format!("creating {}", root.display()), e))?;
        tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(root)
            .map_err(|e| BuildError::io(format!("creating scratch directory in {}", root.display()), e))
    }
}

/// Wait for `child` on a separate thread, killing it at `timeout`.
///
/// Returns the exit status and whether the deadline was hit.
fn spawn_watchdog(mut child: Child, timeout: Option<Duration>) -> Watchdog {
    std::thread::spawn(move || {
        let Some(limit) = timeout else {
            return Ok((child.wait()?, false));
        };
        if let Some(status) = child.wait_timeout(limit)? {
            return Ok((status, false));
        }
        tracing::warn!("Build exceeded {}s; killing builder", limit.as_secs());
        if let Err(e) = kill_process_group(child.id()) {
            tracing::debug!("Could not kill process group {}: {e}", child.id());
            // The child may exit between the timeout and the kill.
            let _ = child.kill();
        }
        Ok((child.wait()?, true))
    })
}

type Watchdog = JoinHandle<std::io::Result<(ExitStatus, bool)>>;

/// Kill the builder's process group and wait for the watchdog to reap it.
fn stop_builder(pid: u32, watchdog: Watchdog) {
    let killed = if watchdog.is_finished() {
        Ok(())
    } else {
        kill_process_group(pid)
    };
    if let Err(e) = killed {
        tracing::warn!("Could not kill process group {pid}: {e}");
    }
    if watchdog.join().is_err() {
        tracing::warn!("Watchdog thread panicked");
    }
}

/// Send SIGKILL to every process in the group led by `pgid`.
#[allow(unsafe_code)]
fn kill_process_group(pgid: u32) -> std::io::Result<()> {
    let pgid = libc::pid_t::try_from(pgid)
        .map_err(|_| std::io::Error::from(std::io::ErrorKind::InvalidInput))?;
    // SAFETY: kill(2) only takes integer arguments and touches no memory.
    if unsafe { libc::kill(-pgid, libc::SIGKILL) } == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

fn stage_error(context: String, source: std::io::Error) -> BuildError {
    SourcePackageError::Stage { context, source }.into()
}

/// Path from the last `Wrote: <path>` line of rpmbuild output.
fn wrote_path(output: &str) -> Option<PathBuf> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Wrote:"))
        .map(|path| PathBuf::from(path.trim()))
        .next_back()
}

fn find_source_package(srpms_dir: &Path) -> Option<PathBuf> {
    let pattern = format!(
        "{}/*.src.rpm",
        glob::Pattern::escape(&srpms_dir.to_string_lossy())
    );
    glob::glob(&pattern).ok()?.filter_map(Result::ok).next()
}
