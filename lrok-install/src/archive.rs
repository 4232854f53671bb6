use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InstallError, Result};

/// Archive formats a release asset may be packaged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ArchiveFormat {
    #[default]
    #[serde(rename = "tar.gz", alias = "tgz")]
    #[value(name = "tar.gz", alias = "tgz")]
    TarGz,
    #[serde(rename = "zip")]
    #[value(name = "zip")]
    Zip,
}

impl ArchiveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::Zip => "zip",
        }
    }
}

/// Unpack `archive_path` into `dest_dir`
pub fn extract(archive_path: &Path, format: ArchiveFormat, dest_dir: &Path) -> Result<()> {
    tracing::debug!(
        "Extracting {} ({}) into {}",
        archive_path.display(),
        format.extension(),
        dest_dir.display()
    );

    let file = fs::File::open(archive_path)
        .map_err(|e| InstallError::filesystem("open archive", archive_path, e))?;

    match format {
        ArchiveFormat::TarGz => extract_tar_gz(file, dest_dir),
        ArchiveFormat::Zip => extract_zip(file, dest_dir),
    }
    .map_err(|reason| InstallError::extraction(archive_path, reason))
}

fn extract_tar_gz(file: fs::File, dest_dir: &Path) -> std::result::Result<(), String> {
    let gz_decoder = flate2::read::GzDecoder::new(file);
    let mut archive = tar::Archive::new(gz_decoder);
    archive.unpack(dest_dir).map_err(|e| e.to_string())
}

fn extract_zip(file: fs::File, dest_dir: &Path) -> std::result::Result<(), String> {
    let mut archive = zip::ZipArchive::new(file).map_err(|e| e.to_string())?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| e.to_string())?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!("Skipping zip entry with unsafe path: {}", entry.name());
            continue;
        };
        let outpath = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath).map_err(|e| e.to_string())?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let mut outfile = fs::File::create(&outpath).map_err(|e| e.to_string())?;
        io::copy(&mut entry, &mut outfile).map_err(|e| e.to_string())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))
                    .map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

/// Locate a file named exactly `file_name` anywhere under `dir`
pub fn find_binary(dir: &Path, file_name: &str) -> Result<PathBuf> {
    for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| InstallError::filesystem("walk", dir, e.into()))?;

        if entry.file_type().is_file() && entry.file_name() == file_name {
            return Ok(entry.into_path());
        }
    }

    Err(InstallError::BinaryNotFound {
        name: file_name.to_string(),
        archive: dir.display().to_string(),
    })
}
