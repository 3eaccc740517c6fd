//! Source and binary package builds

use anyhow::Result;
use rpg_core::PackageBuilder;
use std::path::Path;
use std::sync::Arc;

use crate::builder_config;
use crate::ui::{ConsoleReporter, print_paths};

/// Build a source package and print its path.
pub fn srpm(spec: &Path, source: &Path, output: &Path) -> Result<()> {
    let builder =
        PackageBuilder::new(builder_config(None)).with_reporter(Arc::new(ConsoleReporter::new(true)));
    let srpm = builder.build_source_package(spec, source, output)?;
    println!("{}", srpm.display());
    Ok(())
}

/// Rebuild a source package in mock and report the outcome.
///
/// The outcome is printed before the exit code is judged, so a failed build
/// still shows what was collected.
pub fn rpm(
    srpm: &Path,
    distro: &str,
    arch: &str,
    output: &Path,
    timeout: Option<u64>,
    json: bool,
) -> Result<()> {
    let builder = PackageBuilder::new(builder_config(timeout))
        .with_reporter(Arc::new(ConsoleReporter::new(json)));
    let outcome = builder.build_binary_package(srpm, distro, arch, output)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_paths("Packages", &outcome.rpms);
        print_paths("Logs", &outcome.logs);
        if !outcome.diagnostics.is_empty() {
            println!("Diagnostics:");
            for line in &outcome.diagnostics {
                println!("  {line}");
            }
        }
    }

    outcome.into_result()?;
    Ok(())
}
