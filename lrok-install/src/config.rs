use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::archive::ArchiveFormat;
use crate::cli::{expand_home, Args};
use crate::error::InstallError;

#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub install: InstallConfig,
}

#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct ReleaseConfig {
    pub version: Option<String>,
    pub base_url: Option<String>,
    pub binary_name: Option<String>,
    pub format: Option<ArchiveFormat>,
}

#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct InstallConfig {
    pub dir: Option<String>,
    pub max_redirects: Option<usize>,
    pub timeout: Option<u64>,
}

impl Config {
    /// Load configuration from file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| InstallError::Config {
            path: path.display().to_string(),
            message: e.message().to_string(),
        })?;
        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("lrok-install.toml"))
            .unwrap_or_else(|| PathBuf::from("~/.config/lrok-install.toml"))
    }

    /// Fill in anything not given on the command line
    pub fn merge_with_args(&self, args: &mut Args) {
        let release = &self.release;
        if args.release.is_none() {
            args.release = release.version.clone();
        }
        if args.base_url.is_none() {
            args.base_url = release.base_url.clone();
        }
        if args.bin.is_none() {
            args.bin = release.binary_name.clone();
        }
        if args.format.is_none() {
            args.format = release.format;
        }

        let install = &self.install;
        if args.install_dir.is_none() {
            args.install_dir = install.dir.as_deref().map(|dir| expand_home(Path::new(dir)));
        }
        if args.max_redirects.is_none() {
            args.max_redirects = install.max_redirects;
        }
        if args.timeout.is_none() {
            args.timeout = install.timeout;
        }
    }
}
