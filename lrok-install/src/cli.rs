use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::archive::ArchiveFormat;
use crate::config::Config;
use crate::download::DEFAULT_MAX_REDIRECTS;
use crate::installer::InstallerConfig;
use crate::platform::Platform;
use crate::release::{ReleaseSource, DEFAULT_BASE_URL};

#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "lrok-install",
    version,
    about = "Install the prebuilt lrok binary from GitHub Releases",
    long_about = None
)]
pub struct Args {
    /// Release version to install (e.g., 0.1.4 or v0.1.4)
    /// Defaults to the installer's own version
    #[clap(short, long, value_name = "VERSION", env = "LROK_INSTALL_VERSION")]
    pub release: Option<String>,

    /// Base URL release archives are published under
    #[clap(long, value_name = "URL", env = "LROK_INSTALL_BASE_URL")]
    pub base_url: Option<String>,

    /// Name of the binary inside the release archive
    #[clap(short, long)]
    pub bin: Option<String>,

    /// Archive format of the release asset
    #[clap(short, long, value_enum)]
    pub format: Option<ArchiveFormat>,

    /// Installation directory; the binary is placed in <DIR>/bin
    /// Defaults to the directory containing this installer
    #[clap(short = 'd', long, value_name = "DIR", env = "LROK_INSTALL_DIR")]
    pub install_dir: Option<PathBuf>,

    /// Override the detected operating system (e.g., linux, macos, windows)
    #[clap(long)]
    pub os: Option<String>,

    /// Override the detected CPU architecture (e.g., x86_64, aarch64)
    #[clap(long)]
    pub arch: Option<String>,

    /// Maximum number of HTTP redirects to follow
    #[clap(long, value_name = "N")]
    pub max_redirects: Option<usize>,

    /// Total request timeout in seconds (no timeout when unset)
    #[clap(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Configuration file path
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[clap(long)]
    pub verbose: bool,
}

impl Args {
    /// OS and architecture to install for, honoring overrides
    pub fn reported_platform(&self) -> (String, String) {
        let (host_os, host_arch) = Platform::host();
        (
            self.os.clone().unwrap_or_else(|| host_os.to_string()),
            self.arch.clone().unwrap_or_else(|| host_arch.to_string()),
        )
    }

    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Base URL as currently known, before any configuration is applied
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Get the installation directory, expanding ~
    pub fn install_dir(&self) -> Result<PathBuf> {
        match &self.install_dir {
            Some(path) => Ok(expand_home(path)),
            None => {
                let exe = std::env::current_exe()
                    .context("Failed to locate the installer executable")?;
                exe.parent()
                    .map(Path::to_path_buf)
                    .with_context(|| format!("{} has no parent directory", exe.display()))
            }
        }
    }

    /// Build the explicit installer configuration from these arguments
    pub fn installer_config(&self) -> Result<InstallerConfig> {
        let defaults = ReleaseSource::default();
        let source = ReleaseSource {
            version: self.release.clone().unwrap_or(defaults.version),
            base_url: self.base_url.clone().unwrap_or(defaults.base_url),
            binary_name: self.bin.clone().unwrap_or(defaults.binary_name),
            format: self.format.unwrap_or(defaults.format),
        };

        if source.version().is_empty() {
            anyhow::bail!("Release version must not be empty");
        }

        Ok(InstallerConfig {
            source,
            install_dir: self.install_dir()?,
            max_redirects: self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS),
            timeout: self.timeout.map(Duration::from_secs),
        })
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
        {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
