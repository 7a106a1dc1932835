use mdimg_models::{
    CleanupResult, DownloadReport, FixReport, LinkCheckReport, ReplaceResult, ReportExport, UndoReport,
    UploadResult,
};
use serde::{Deserialize, Serialize};

/// Body of the directory-wide operations (`scan`, `cleanup`, `fix-paths`,
/// `undo-fix`, `export-report`, `check-links`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryRequest {
    pub directory: Option<String>,
}

/// Query of `GET /api/md-files`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryQuery {
    pub directory: Option<String>,
}

/// Body of `POST /api/upload` and `POST /api/download`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    pub md_file: Option<String>,
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceRequest {
    pub md_file: Option<String>,
    pub directory: Option<String>,
    pub link_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub results: Vec<UploadResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplaceResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: ReplaceResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: CleanupResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: DownloadReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: FixReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct UndoResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: UndoReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportResponse {
    pub success: bool,
    #[serde(flatten)]
    pub export: ReportExport,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkCheckResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: LinkCheckReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
