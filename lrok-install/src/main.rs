use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lrok_install::cli::Args;
use lrok_install::config::Config;
use lrok_install::installer::{Installer, InstallerConfig};
use lrok_install::release::manual_install_url;

#[tokio::main]
async fn main() -> ExitCode {
    let mut args = Args::parse();

    // Initialize tracing; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if args.verbose {
        tracing::info!("Running lrok-install with verbose output");
    }

    let config = match resolve_config(&mut args) {
        Ok(config) => config,
        Err(e) => return fail(format!("{e:#}"), &manual_install_url(args.base_url())),
    };

    let manual_url = config.source.manual_install_url();
    let binary_name = config.source.binary_name.clone();
    let (os, arch) = args.reported_platform();

    match install(config, &os, &arch).await {
        Ok(dest) => {
            tracing::info!("Installed {}", dest.display());
            println!("✅ {binary_name} installed successfully!");
            println!("\nRun: {binary_name} version");
            ExitCode::SUCCESS
        }
        Err(e) => fail(format!("{e:#}"), &manual_url),
    }
}

fn resolve_config(args: &mut Args) -> Result<InstallerConfig> {
    let config_path = args.config_path();
    let config = Config::load(&config_path).context("Failed to load configuration")?;
    config.merge_with_args(args);
    args.installer_config()
}

async fn install(config: InstallerConfig, os: &str, arch: &str) -> Result<PathBuf> {
    let installer = Installer::new(config)?;
    Ok(installer.run(os, arch).await?)
}

fn fail(message: impl Display, manual_url: &str) -> ExitCode {
    eprintln!("❌ Installation failed: {message}");
    eprintln!("\nTry manual installation from: {manual_url}");
    ExitCode::FAILURE
}
