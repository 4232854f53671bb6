use std::io;
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("HTTP request error")]
    Http(#[from] reqwest::Error),

    #[error("Failed to download {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("Redirect from {url} (HTTP {status}) has no usable Location header")]
    InvalidRedirect { url: String, status: u16 },

    #[error("Too many redirects: stopped after {max} at {url} (HTTP {status})")]
    TooManyRedirects { url: String, status: u16, max: usize },

    #[error("Archive extraction failed for {archive}: {reason}")]
    ArchiveExtraction { archive: String, reason: String },

    #[error("Binary '{name}' not found in archive {archive}")]
    BinaryNotFound { name: String, archive: String },

    #[error("Failed to {action} {path}")]
    Filesystem {
        action: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error at {path}: {message}")]
    Config { path: String, message: String },
}

impl InstallError {
    pub(crate) fn filesystem(action: &'static str, path: &Path, source: io::Error) -> Self {
        InstallError::Filesystem {
            action,
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn extraction(archive: &Path, reason: impl ToString) -> Self {
        InstallError::ArchiveExtraction {
            archive: archive.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;
