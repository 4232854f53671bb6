use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::archive;
use crate::download::{Downloader, DEFAULT_MAX_REDIRECTS};
use crate::error::{InstallError, Result};
use crate::platform::Platform;
use crate::release::ReleaseSource;
use crate::utils;

/// Everything an install run needs, resolved up front
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    pub source: ReleaseSource,
    /// The executable lands in `<install_dir>/bin`
    pub install_dir: PathBuf,
    pub max_redirects: usize,
    pub timeout: Option<Duration>,
}

impl InstallerConfig {
    pub fn new(source: ReleaseSource, install_dir: PathBuf) -> Self {
        Self {
            source,
            install_dir,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout: None,
        }
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.install_dir.join("bin")
    }
}

pub struct Installer {
    config: InstallerConfig,
    downloader: Downloader,
}

impl Installer {
    pub fn new(config: InstallerConfig) -> Result<Self> {
        let downloader = Downloader::new(config.max_redirects, config.timeout)?;
        Ok(Self { config, downloader })
    }

    /// Install the release binary for the reported OS/architecture.
    ///
    /// Returns the path of the installed executable. Nothing touches the
    /// network or the filesystem until the platform has been resolved.
    pub async fn run(&self, reported_os: &str, reported_arch: &str) -> Result<PathBuf> {
        let platform = Platform::resolve(reported_os, reported_arch)?;
        let source = &self.config.source;
        let asset = source.asset_for(&platform);

        println!(
            "📦 Installing {} v{} for {}...",
            source.binary_name, asset.version, platform
        );

        let bin_dir = self.config.bin_dir();
        fs::create_dir_all(&bin_dir)
            .map_err(|e| InstallError::filesystem("create directory", &bin_dir, e))?;

        let executable = platform.executable_name(&source.binary_name);
        let dest_path = bin_dir.join(&executable);

        println!("  → Downloading from {}...", asset.url);
        let archive_file = self
            .downloader
            .download(&asset.url, &bin_dir, &asset.filename)
            .await?;

        println!("  → Extracting binary...");
        let staging = tempfile::Builder::new()
            .prefix(".lrok-extract-")
            .tempdir_in(&bin_dir)
            .map_err(|e| InstallError::filesystem("create staging directory in", &bin_dir, e))?;

        archive::extract(archive_file.path(), asset.format, staging.path())?;
        let extracted = archive::find_binary(staging.path(), &executable).map_err(|e| match e {
            InstallError::BinaryNotFound { name, .. } => InstallError::BinaryNotFound {
                name,
                archive: asset.filename.clone(),
            },
            other => other,
        })?;

        tracing::info!("Installing {} to {}", executable, dest_path.display());
        utils::replace_file(&extracted, &dest_path)?;

        let archive_path = archive_file.path().to_path_buf();
        archive_file
            .close()
            .map_err(|e| InstallError::filesystem("remove temporary archive", &archive_path, e))?;
        let staging_path = staging.path().to_path_buf();
        staging
            .close()
            .map_err(|e| InstallError::filesystem("remove staging directory", &staging_path, e))?;

        if !platform.is_windows() {
            utils::make_executable(&dest_path)?;
        }

        tracing::info!("Installation completed successfully!");
        Ok(dest_path)
    }
}
