//! Terminal output for builds.

use rpg_core::BuildReporter;
use std::io::Write;

/// Echoes builder output to the terminal as it arrives.
///
/// With `to_stderr` set everything goes to stderr, leaving stdout for
/// machine-readable results.
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter {
    to_stderr: bool,
}

impl ConsoleReporter {
    pub fn new(to_stderr: bool) -> Self {
        Self { to_stderr }
    }

    fn emit(&self, text: &str) {
        // A closed pipe must not abort a running build.
        let _ = if self.to_stderr {
            writeln!(std::io::stderr().lock(), "{text}")
        } else {
            writeln!(std::io::stdout().lock(), "{text}")
        };
    }
}

impl BuildReporter for ConsoleReporter {
    fn phase(&self, title: &str) {
        self.emit(&format!("==> {title}"));
    }

    fn output_line(&self, line: &str) {
        self.emit(line);
    }

    fn diagnostic(&self, _: &str) {}
}

/// Print a labelled list of paths, skipping empty lists.
pub fn print_paths(label: &str, paths: &[std::path::PathBuf]) {
    if paths.is_empty() {
        return;
    }
    println!("{label}:");
    for path in paths {
        println!("  {}", path.display());
    }
}
