use super::documents::{cleanup_images, download_images, list_md_files, replace_links, upload_images};
use super::maintenance::{check_links, export_report, fix_paths, undo_fix};
use super::models::AppState;
use super::status::{get_mapping, get_status, scan_directory};
use axum::{
    routing::{get, post},
    Router,
};

/// All API routes, without middleware
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/scan", post(scan_directory))
        .route("/api/md-files", get(list_md_files))
        .route("/api/upload", post(upload_images))
        .route("/api/replace", post(replace_links))
        .route("/api/cleanup", post(cleanup_images))
        .route("/api/mapping", get(get_mapping))
        .route("/api/download", post(download_images))
        .route("/api/fix-paths", post(fix_paths))
        .route("/api/undo-fix", post(undo_fix))
        .route("/api/export-report", post(export_report))
        .route("/api/check-links", post(check_links))
}
