/// Default values for configuration fields

pub fn host() -> String {
    "127.0.0.1".to_string()
}

pub fn port() -> u16 {
    3000
}

pub fn timeout_secs() -> u64 {
    600  // Uploads run inside the request, keep this above upload.timeout_secs
}

pub fn max_body_size() -> usize {
    1
}

pub fn max_concurrent_requests() -> usize {
    64
}

pub fn allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

pub fn enable_compression() -> bool {
    true
}

pub fn server_settings() -> super::models::ServerSettings {
    super::models::ServerSettings {
        host: host(),
        port: port(),
        timeout_secs: timeout_secs(),
        max_body_size_mb: max_body_size(),
        allowed_origins: allowed_origins(),
        max_concurrent_requests: max_concurrent_requests(),
        enable_compression: enable_compression(),
    }
}

// Mapping defaults
pub fn mapping_file() -> String {
    "image-mapping.json".to_string()
}

pub fn mapping_settings() -> super::models::MappingSettings {
    super::models::MappingSettings {
        file: mapping_file(),
    }
}

// Upload defaults
pub fn upload_tool() -> String {
    "piclist".to_string()
}

pub fn upload_command() -> String {
    "upload".to_string()
}

pub fn upload_timeout_secs() -> u64 {
    30
}

pub fn upload_settings() -> super::models::UploadSettings {
    super::models::UploadSettings {
        tool: upload_tool(),
        command: upload_command(),
        timeout_secs: upload_timeout_secs(),
    }
}

// Scan defaults
pub fn document_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

pub fn image_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif", "bmp", "webp", "svg"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

pub fn scan_settings() -> super::models::ScanSettings {
    super::models::ScanSettings {
        document_extensions: document_extensions(),
        image_extensions: image_extensions(),
        follow_links: false,
    }
}

// Download defaults
pub fn images_dir() -> String {
    "images".to_string()
}

pub fn download_timeout_secs() -> u64 {
    30
}

pub fn user_agent() -> String {
    concat!("mdimg/", env!("CARGO_PKG_VERSION")).to_string()
}

pub fn download_settings() -> super::models::DownloadSettings {
    super::models::DownloadSettings {
        images_dir: images_dir(),
        timeout_secs: download_timeout_secs(),
        user_agent: user_agent(),
    }
}

pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ===============================================================================
# mdimg Configuration
# ===============================================================================

[server]
# Network
host = "127.0.0.1"                   # Bind address (local tool, keep it on loopback)
port = 3000                          # Server port (PORT env var overrides)

# Performance
timeout_secs = 600                   # Request timeout in seconds (covers whole upload batches)
max_concurrent_requests = 64         # Max simultaneous requests
max_body_size_mb = 1                 # Max request body size in MB
enable_compression = true            # HTTP compression (gzip/brotli/deflate)

# CORS
allowed_origins = ["*"]              # "*" = all origins | ["http://localhost:5173"]

[mapping]
file = "image-mapping.json"          # Local image path -> hosted URL table

# ===============================================================================
# UPLOAD TOOL
# ===============================================================================
[upload]
tool = "piclist"                     # Executable name or full path
command = "upload"                   # Invoked as: <tool> <command> <image path>
timeout_secs = 30                    # Per-image timeout (0 = wait forever)

# ===============================================================================
# SCANNING
# ===============================================================================
[scan]
document_extensions = ["md"]
image_extensions = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "svg"]
follow_links = false                 # Follow symlinked directories while walking

# ===============================================================================
# REMOTE IMAGE DOWNLOAD
# ===============================================================================
[download]
images_dir = "images"                # Created next to each document
timeout_secs = 30                    # Per-image HTTP timeout
user_agent = "mdimg"                 # User-Agent header for downloads
"#;
