use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerSettings,
    #[serde(default = "super::defaults::mapping_settings")]
    pub mapping: MappingSettings,
    #[serde(default = "super::defaults::upload_settings")]
    pub upload: UploadSettings,
    #[serde(default = "super::defaults::scan_settings")]
    pub scan: ScanSettings,
    #[serde(default = "super::defaults::download_settings")]
    pub download: DownloadSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: super::defaults::server_settings(),
            mapping: super::defaults::mapping_settings(),
            upload: super::defaults::upload_settings(),
            scan: super::defaults::scan_settings(),
            download: super::defaults::download_settings(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    #[serde(default = "super::defaults::timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "super::defaults::max_body_size")]
    pub max_body_size_mb: usize,
    #[serde(default = "super::defaults::allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "super::defaults::max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    #[serde(default = "super::defaults::enable_compression")]
    pub enable_compression: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MappingSettings {
    /// JSON file holding absolute image path -> hosted URL
    #[serde(default = "super::defaults::mapping_file")]
    pub file: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadSettings {
    /// Executable invoked as `<tool> <command> <image path>`
    #[serde(default = "super::defaults::upload_tool")]
    pub tool: String,
    #[serde(default = "super::defaults::upload_command")]
    pub command: String,
    /// 0 disables the timeout
    #[serde(default = "super::defaults::upload_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanSettings {
    #[serde(default = "super::defaults::document_extensions")]
    pub document_extensions: Vec<String>,
    #[serde(default = "super::defaults::image_extensions")]
    pub image_extensions: Vec<String>,
    #[serde(default)]
    pub follow_links: bool,
}

impl ScanSettings {
    pub fn is_document(&self, extension: &str) -> bool {
        self.document_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    pub fn is_image(&self, extension: &str) -> bool {
        self.image_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadSettings {
    /// Directory, relative to each document, that receives downloaded images
    #[serde(default = "super::defaults::images_dir")]
    pub images_dir: String,
    #[serde(default = "super::defaults::download_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "super::defaults::user_agent")]
    pub user_agent: String,
}
