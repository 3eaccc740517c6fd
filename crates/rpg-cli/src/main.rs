//! rpg - RPM package generator CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rpg_cli::cmd;
use rpg_cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render {
            descriptor,
            scan,
            output,
        } => cmd::render::render(&descriptor, scan.as_deref(), output.as_deref()),
        Commands::Srpm {
            spec,
            source,
            output,
        } => cmd::build::srpm(&spec, &source, &output),
        Commands::Rpm {
            srpm,
            distro,
            arch,
            output,
            timeout,
            json,
        } => cmd::build::rpm(&srpm, &distro, &arch, &output, timeout, json),
        Commands::InitRoot { distro, arch } => cmd::root::init_root(&distro, &arch),
        Commands::Check => cmd::root::check(),
    }
}
