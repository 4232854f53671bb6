use std::fs;
use std::path::Path;

use crate::error::{InstallError, Result};

/// Mode applied to installed executables: rwxr-xr-x
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Set the installed binary's mode to 0755 (Unix only)
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE))
        .map_err(|e| InstallError::filesystem("set permissions on", path, e))
}

#[cfg(not(unix))]
pub fn make_executable(path: &Path) -> Result<()> {
    // No POSIX mode bits; just confirm the file is there
    fs::metadata(path)
        .map(|_| ())
        .map_err(|e| InstallError::filesystem("stat", path, e))
}

/// Move `source` onto `dest`, replacing whatever is already there
pub fn replace_file(source: &Path, dest: &Path) -> Result<()> {
    fs::rename(source, dest).map_err(|e| InstallError::filesystem("move binary to", dest, e))
}
