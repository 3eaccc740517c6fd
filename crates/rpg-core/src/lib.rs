//! Build pipeline for rpg.
//!
//! [`PackageBuilder`] turns a spec file and a source archive into a source
//! package with `rpmbuild`, then rebuilds it inside a `mock` root. Builder
//! output is streamed to a [`BuildReporter`] and lines matching
//! [`diagnostics::DIAGNOSTIC_PATTERN`] are kept on the [`BuildOutcome`].
//! Results are moved out of the scratch directory by [`artifacts::collect`].
//!
//! The [`plugin`] module lets analysis plugins fill in a descriptor's file
//! entries from a project tree before the spec is written.

pub mod artifacts;
pub mod builder;
pub mod diagnostics;
pub mod error;
pub mod paths;
pub mod plugin;
pub mod preflight;
pub mod reporter;
pub mod spec_file;

pub use builder::{BuildOutcome, BuilderConfig, PackageBuilder};
pub use error::{BuildError, BuildFailure, SourcePackageError};
pub use paths::*;
pub use reporter::{BuildReporter, NullReporter};
pub use spec_file::write_spec_file;

/// Re-export of the descriptor model.
pub use rpg_schema as schema;
