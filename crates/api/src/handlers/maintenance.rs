use super::models::AppState;
use super::params::required;
use crate::errors::ApiError;
use crate::models::{DirectoryRequest, ExportResponse, FixResponse, LinkCheckResponse, UndoResponse};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

fn directory(payload: Result<Json<DirectoryRequest>, JsonRejection>) -> Result<String, ApiError> {
    let Json(request) = payload?;
    required(request.directory, "directory")
}

pub async fn fix_paths(
    State(state): State<AppState>,
    payload: Result<Json<DirectoryRequest>, JsonRejection>,
) -> Result<Json<FixResponse>, ApiError> {
    let directory = directory(payload)?;
    let report = state.manager.fix_paths(&directory).await?;
    Ok(Json(FixResponse { success: true, report }))
}

pub async fn undo_fix(
    State(state): State<AppState>,
    payload: Result<Json<DirectoryRequest>, JsonRejection>,
) -> Result<Json<UndoResponse>, ApiError> {
    let directory = directory(payload)?;
    let report = state.manager.undo_fix(&directory).await?;
    Ok(Json(UndoResponse { success: true, report }))
}

pub async fn export_report(
    State(state): State<AppState>,
    payload: Result<Json<DirectoryRequest>, JsonRejection>,
) -> Result<Json<ExportResponse>, ApiError> {
    let directory = directory(payload)?;
    let export = state.manager.export_report(&directory).await?;
    Ok(Json(ExportResponse { success: true, export }))
}

pub async fn check_links(
    State(state): State<AppState>,
    payload: Result<Json<DirectoryRequest>, JsonRejection>,
) -> Result<Json<LinkCheckResponse>, ApiError> {
    let directory = directory(payload)?;
    let report = state.manager.check_links(&directory).await?;
    Ok(Json(LinkCheckResponse { success: true, report }))
}
