//! Host and mock root preparation

use anyhow::Result;
use rpg_core::PackageBuilder;
use rpg_core::preflight::check_host_tools;
use std::sync::Arc;

use crate::builder_config;
use crate::ui::ConsoleReporter;

/// Initialise the mock root for `distro`/`arch`.
pub fn init_root(distro: &str, arch: &str) -> Result<()> {
    let builder =
        PackageBuilder::new(builder_config(None)).with_reporter(Arc::new(ConsoleReporter::new(false)));
    builder.init_root(distro, arch)?;
    println!("Root {} is ready.", rpg_core::root_name(distro, arch));
    Ok(())
}

/// Verify the configured builders are installed.
pub fn check() -> Result<()> {
    let config = builder_config(None);
    check_host_tools(&config)?;
    println!(
        "Found {} and {}.",
        config.mock_bin.display(),
        config.rpmbuild_bin.display()
    );
    Ok(())
}
