use super::models::AppState;
use super::params::{link_type, required};
use crate::errors::ApiError;
use crate::models::{
    CleanupResponse, DirectoryQuery, DirectoryRequest, DocumentRequest, DownloadResponse,
    ReplaceRequest, ReplaceResponse, UploadResponse,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Json,
};

pub async fn list_md_files(
    State(state): State<AppState>,
    query: Result<Query<DirectoryQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, ApiError> {
    let Query(query) = query?;
    let directory = required(query.directory, "directory")?;

    Ok(Json(state.manager.list_documents(&directory).await?))
}

pub async fn upload_images(
    State(state): State<AppState>,
    payload: Result<Json<DocumentRequest>, JsonRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let Json(request) = payload?;
    let md_file = required(request.md_file, "mdFile")?;
    let directory = required(request.directory, "directory")?;

    let results = state.manager.upload_document(&directory, &md_file).await?;
    Ok(Json(UploadResponse { success: true, results }))
}

pub async fn replace_links(
    State(state): State<AppState>,
    payload: Result<Json<ReplaceRequest>, JsonRejection>,
) -> Result<Json<ReplaceResponse>, ApiError> {
    let Json(request) = payload?;
    let md_file = required(request.md_file, "mdFile")?;
    let directory = required(request.directory, "directory")?;
    let link_type = link_type(request.link_type)?;

    let result = state.manager.rewrite_links(&directory, &md_file, link_type).await?;
    Ok(Json(ReplaceResponse { success: true, result }))
}

pub async fn cleanup_images(
    State(state): State<AppState>,
    payload: Result<Json<DirectoryRequest>, JsonRejection>,
) -> Result<Json<CleanupResponse>, ApiError> {
    let Json(request) = payload?;
    let directory = required(request.directory, "directory")?;

    let result = state.manager.cleanup(&directory).await?;
    Ok(Json(CleanupResponse { success: true, result }))
}

pub async fn download_images(
    State(state): State<AppState>,
    payload: Result<Json<DocumentRequest>, JsonRejection>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let Json(request) = payload?;
    let md_file = required(request.md_file, "mdFile")?;
    let directory = required(request.directory, "directory")?;

    let report = state.manager.download_document(&directory, &md_file).await?;
    Ok(Json(DownloadResponse { success: true, report }))
}
