//! # lrok-install
//!
//! Installer for the prebuilt `lrok` binary published on GitHub releases.
//!
//! ## Overview
//!
//! `lrok-install` detects the host operating system and CPU architecture,
//! downloads the matching release archive, unpacks it in-process and places
//! the executable in `<install-dir>/bin` with mode `0755`.
//!
//! Release archives follow a fixed naming scheme:
//!
//! ```text
//! https://github.com/lum-tools/lrok/releases/download/v<version>/lrok_<version>_<os>_<arch>.tar.gz
//! ```
//!
//! where `<os>` is one of `darwin`, `linux`, `windows` and `<arch>` one of
//! `amd64`, `arm64`.
//!
//! ## Usage
//!
//! ```bash
//! # Install the version matching this installer next to it
//! lrok-install
//!
//! # Install a specific version into /opt/lrok/bin
//! lrok-install --release 0.1.4 --install-dir /opt/lrok
//! ```
//!
//! ## Configuration
//!
//! Defaults can be set in `lrok-install.toml` under the user's configuration
//! directory, or in any file passed with `--config`.

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Configuration file handling
pub mod config;

/// Error types
pub mod error;

/// Host platform resolution
pub mod platform;

/// Release asset naming and URLs
pub mod release;

/// HTTP download with bounded redirect following
pub mod download;

/// In-process archive extraction
pub mod archive;

/// The install pipeline
pub mod installer;

/// File permission and placement helpers
pub mod utils;
