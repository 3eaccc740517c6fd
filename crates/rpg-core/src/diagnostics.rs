//! Failure-signature matching for builder output.
//!
//! One compiled pattern is shared by the live output scanner and the
//! `build.log` re-scan. Matching is a plain case-insensitive substring
//! search, so `-Werror` and `errors.h` match too; the resulting lines are
//! hints for the caller, not a verdict.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Case-insensitive failure signatures.
pub const DIAGNOSTIC_PATTERN: &str = r"(?i)error|exception|command not found";

static PATTERN: OnceLock<Regex> = OnceLock::new();

/// The compiled [`DIAGNOSTIC_PATTERN`].
///
/// # Panics
///
/// Panics if `DIAGNOSTIC_PATTERN` is not a valid regex. It is a constant, so
/// this cannot happen at runtime once the tests pass.
fn pattern() -> &'static Regex {
    PATTERN.get_or_init(|| Regex::new(DIAGNOSTIC_PATTERN).expect("DIAGNOSTIC_PATTERN is valid"))
}

/// Whether a line of builder output looks like a failure indicator.
///
/// # Panics
///
/// Only if `DIAGNOSTIC_PATTERN` fails to compile, which it does not.
pub fn is_diagnostic(line: &str) -> bool {
    pattern().is_match(line)
}

/// Return every matching line of a log file, in order.
///
/// Invalid UTF-8 is replaced rather than rejected; build logs routinely
/// contain compiler output in arbitrary encodings.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be read.
pub fn scan_log(path: &Path) -> std::io::Result<Vec<String>> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .filter(|line| is_diagnostic(line))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_pattern_compiles() {
        assert!(Regex::new(DIAGNOSTIC_PATTERN).is_ok());
    }

    #[test]
    fn test_matches_any_case() {
        assert!(is_diagnostic("gcc: error: foo.c"));
        assert!(is_diagnostic("ERROR: Exception(demo.src.rpm) Config(fedora-22-x86_64)"));
        assert!(is_diagnostic("Traceback: ValueError"));
        assert!(is_diagnostic("java.lang.NullPointerException"));
        assert!(is_diagnostic("/bin/sh: cmake: command not found"));
        assert!(is_diagnostic("sh: foo: COMMAND NOT FOUND"));
    }

    #[test]
    fn test_ignores_clean_lines() {
        assert!(!is_diagnostic("Wrote: /builddir/build/RPMS/demo-1.0-1.x86_64.rpm"));
        assert!(!is_diagnostic("command found"));
        assert!(!is_diagnostic(""));
    }

    #[test]
    fn test_scan_log_keeps_order() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("build.log");
        std::fs::write(
            &log,
            "Executing(%build)\nmake: *** [all] Error 2\nok\nRPM build errors:\n",
        )
        .unwrap();

        let lines = scan_log(&log).unwrap();
        assert_eq!(lines, vec!["make: *** [all] Error 2", "RPM build errors:"]);
    }

    #[test]
    fn test_scan_log_tolerates_invalid_utf8() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("build.log");
        std::fs::write(&log, b"\xff\xfe error here\nfine\n").unwrap();

        let lines = scan_log(&log).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("error here"));
    }

    #[test]
    fn test_scan_log_missing_file() {
        let dir = tempdir().unwrap();
        let err = scan_log(&dir.path().join("build.log")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
