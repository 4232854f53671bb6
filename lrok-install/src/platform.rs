use std::fmt;

use crate::error::{InstallError, Result};

/// Operating systems release assets are published for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

/// CPU architectures release assets are published for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Os {
    /// Map an OS name as reported by a runtime to its release tag
    pub fn from_reported(name: &str) -> Option<Self> {
        match name {
            "macos" | "darwin" => Some(Os::Darwin),
            "linux" => Some(Os::Linux),
            "windows" | "win32" => Some(Os::Windows),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Darwin => "darwin",
            Os::Linux => "linux",
            Os::Windows => "windows",
        }
    }
}

impl Arch {
    /// Map a CPU architecture as reported by a runtime to its release tag
    pub fn from_reported(name: &str) -> Option<Self> {
        match name {
            "x86_64" | "x64" | "amd64" | "AMD64" => Some(Arch::Amd64),
            "aarch64" | "arm64" => Some(Arch::Arm64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

/// Resolved (OS, architecture) pair used to pick a release asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Resolve a reported OS/architecture pair, failing if either side is unsupported
    pub fn resolve(os: &str, arch: &str) -> Result<Self> {
        match (Os::from_reported(os), Arch::from_reported(arch)) {
            (Some(os), Some(arch)) => Ok(Self { os, arch }),
            _ => Err(InstallError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            }),
        }
    }

    /// The OS and architecture this process was built for
    pub fn host() -> (&'static str, &'static str) {
        (std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    /// File name of the executable on this platform
    pub fn executable_name(&self, binary_name: &str) -> String {
        if self.is_windows() {
            format!("{binary_name}.exe")
        } else {
            binary_name.to_string()
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os.as_str(), self.arch.as_str())
    }
}
