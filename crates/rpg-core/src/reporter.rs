//! Reporter trait for dependency injection
//!
//! Lets the builder hand live output to the caller without being coupled to
//! a terminal, a GUI, or a test harness.

/// Receives progress and builder output while a build runs.
pub trait BuildReporter: Send + Sync {
    /// A new build phase has started (e.g. "Building source package").
    fn phase(&self, title: &str);

    /// One line of the external builder's combined stdout/stderr.
    ///
    /// Called for every line, whether or not it is a diagnostic.
    fn output_line(&self, line: &str);

    /// A line that matched the failure pattern. Called after `output_line`.
    fn diagnostic(&self, line: &str);
}

impl<T: BuildReporter + ?Sized> BuildReporter for std::sync::Arc<T> {
    fn phase(&self, title: &str) {
        (**self).phase(title);
    }
    fn output_line(&self, line: &str) {
        (**self).output_line(line);
    }
    fn diagnostic(&self, line: &str) {
        (**self).diagnostic(line);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl BuildReporter for NullReporter {
    fn phase(&self, _: &str) {}
    fn output_line(&self, _: &str) {}
    fn diagnostic(&self, _: &str) {}
}
