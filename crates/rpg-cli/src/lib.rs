//! rpg - RPM package generator
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Turns a package descriptor into a spec file, a source package and binary
//! packages built in a `mock` root.
//!
//! # Pipeline
//!
//! ```text
//! demo.toml ──render──▶ demo.spec ──srpm──▶ demo.src.rpm ──rpm──▶ *.rpm + mock_logs/
//! ```

pub mod cmd;
pub mod ui;

use clap::{Parser, Subcommand};
use rpg_core::BuilderConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "rpg")]
#[command(author, version, about = "rpg - RPM package generator")]
pub struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a TOML descriptor to a spec file
    Render {
        /// Descriptor file
        descriptor: PathBuf,
        /// Record files found under this project directory in %files
        #[arg(long)]
        scan: Option<PathBuf>,
        /// Write the spec file here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build a source package with rpmbuild
    Srpm {
        /// Spec file
        #[arg(long)]
        spec: PathBuf,
        /// Source archive copied into SOURCES
        #[arg(long)]
        source: PathBuf,
        /// Directory receiving the .src.rpm
        #[arg(long)]
        output: PathBuf,
    },
    /// Rebuild a source package into binary packages inside mock
    Rpm {
        /// Source package
        #[arg(long)]
        srpm: PathBuf,
        /// Target distribution, e.g. fedora-22
        #[arg(long)]
        distro: String,
        /// Target architecture, e.g. x86_64
        #[arg(long)]
        arch: String,
        /// Directory receiving packages and mock_logs/
        #[arg(long)]
        output: PathBuf,
        /// Kill mock after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Print the build outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Prepare a mock root ahead of the first build
    InitRoot {
        /// Target distribution, e.g. fedora-22
        #[arg(long)]
        distro: String,
        /// Target architecture, e.g. x86_64
        #[arg(long)]
        arch: String,
    },
    /// Check that mock and rpmbuild are installed
    Check,
}

/// Builder configuration from the environment, with command-line overrides.
pub fn builder_config(timeout_secs: Option<u64>) -> BuilderConfig {
    let mut config = BuilderConfig::from_env();
    if let Some(secs) = timeout_secs {
        config.timeout = Some(Duration::from_secs(secs));
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rpm() {
        let cli = Cli::parse_from([
            "rpg", "rpm", "--srpm", "demo.src.rpm", "--distro", "fedora-22", "--arch", "x86_64",
            "--output", "out", "--timeout", "60", "--json",
        ]);
        match cli.command {
            Commands::Rpm {
                distro,
                arch,
                timeout,
                json,
                ..
            } => {
                assert_eq!(distro, "fedora-22");
                assert_eq!(arch, "x86_64");
                assert_eq!(timeout, Some(60));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_timeout_flag_overrides_config() {
        assert_eq!(builder_config(Some(5)).timeout, Some(Duration::from_secs(5)));
    }
}
