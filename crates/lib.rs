// Re-export the workspace crates under one roof

pub use mdimg_models as models;
pub use mdimg_events as events;
pub use mdimg_utils as utils;
pub use mdimg_filesystem as filesystem;
pub use mdimg_config as config;
pub use mdimg_scanner as scanner;
pub use mdimg_mapping as mapping;
pub use mdimg_hosting as hosting;
pub use mdimg_manager as manager;
pub use mdimg_api as api;

/// Prelude module for convenient imports
pub mod prelude {
    // Core models
    pub use mdimg_models::{
        CleanupResult, DownloadReport, FixReport, LinkCheckReport, LinkType, ReplaceResult, ReportExport,
        ScanResult, StatusReport, UndoReport, UploadResult,
    };

    // Events
    pub use mdimg_events::{AppEvent, EventBus};

    // Configuration
    pub use mdimg_config::Config;

    // Scanning and mapping
    pub use mdimg_scanner::{ImageIndex, ReferenceScanner};
    pub use mdimg_mapping::MappingStore;

    // Hosting
    pub use mdimg_hosting::{CommandHost, ImageHost, RemoteFetcher};

    // Operations
    pub use mdimg_manager::ImageManager;

    // Filesystem
    pub use mdimg_filesystem::FileSystem;
}
