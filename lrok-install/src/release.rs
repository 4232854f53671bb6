use crate::archive::ArchiveFormat;
use crate::platform::Platform;

pub const DEFAULT_BASE_URL: &str = "https://github.com/lum-tools/lrok/releases/download";
pub const DEFAULT_BINARY_NAME: &str = "lrok";

/// Where release archives are published and which one to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    pub version: String,
    pub base_url: String,
    pub binary_name: String,
    pub format: ArchiveFormat,
}

/// A single downloadable archive for one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub version: String,
    pub filename: String,
    pub url: String,
    pub format: ArchiveFormat,
}

impl Default for ReleaseSource {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            binary_name: DEFAULT_BINARY_NAME.to_string(),
            format: ArchiveFormat::default(),
        }
    }
}

impl ReleaseSource {
    /// Version without a leading `v`, as it appears in asset names
    pub fn version(&self) -> &str {
        self.version.strip_prefix('v').unwrap_or(&self.version)
    }

    /// Build the asset for `platform`
    /// Format: `<base>/v<version>/<bin>_<version>_<os>_<arch>.<ext>`
    pub fn asset_for(&self, platform: &Platform) -> ReleaseAsset {
        let version = self.version();
        let filename = format!(
            "{}_{}_{}_{}.{}",
            self.binary_name,
            version,
            platform.os.as_str(),
            platform.arch.as_str(),
            self.format.extension()
        );
        let url = format!(
            "{}/v{}/{}",
            self.base_url.trim_end_matches('/'),
            version,
            filename
        );

        ReleaseAsset {
            version: version.to_string(),
            filename,
            url,
            format: self.format,
        }
    }

    /// Page users are sent to when automatic installation fails
    pub fn manual_install_url(&self) -> String {
        manual_install_url(&self.base_url)
    }
}

/// Release listing page for a download base URL
pub fn manual_install_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    base.strip_suffix("/download").unwrap_or(base).to_string()
}
