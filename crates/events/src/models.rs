use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    // Application lifecycle
    Starting,
    Ready { addr: String },
    Shutdown,

    // Configuration
    ConfigLoading { path: String },
    ConfigLoaded { path: String },
    ConfigCreated { path: String },
    ConfigMigrated { added_fields: Vec<String> },

    // Mapping store
    MappingLoaded { path: String, entries: usize },
    MappingSaveFailed { path: String, error: String },
    MappingMigrated { path: String, normalized: usize, backup: String },

    // Operations
    ScanCompleted {
        directory: String,
        documents: usize,
        images: usize,
        invalid: usize,
        unused: usize,
        duration: Duration,
    },
    UploadCompleted { document: String, uploaded: usize, skipped: usize, failed: usize },
    LinksRewritten { document: String, replaced: usize, link_type: String },
    CleanupCompleted { directory: String, deleted: usize, candidates: usize },
    DownloadCompleted { document: String, downloaded: usize, failed: usize },
    PathsFixed { directory: String, fixed: usize, invalid: usize },
    FixUndone { directory: String, restored: usize },
    ReportExported { path: String },
    LinksChecked { directory: String, checked: usize, broken: usize },

    // Errors
    Error { context: String, error: String },
}

pub struct EventBus {
    pub(super) silent_mode: bool,
}
