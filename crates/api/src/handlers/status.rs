use super::models::AppState;
use super::params::required;
use crate::errors::ApiError;
use crate::models::DirectoryRequest;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use mdimg_models::{ScanResult, StatusReport};
use std::collections::BTreeMap;

pub async fn get_status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(state.manager.status().await)
}

pub async fn get_mapping(State(state): State<AppState>) -> Json<BTreeMap<String, String>> {
    Json(state.manager.mapping_snapshot().await)
}

pub async fn scan_directory(
    State(state): State<AppState>,
    payload: Result<Json<DirectoryRequest>, JsonRejection>,
) -> Result<Json<ScanResult>, ApiError> {
    let Json(request) = payload?;
    let directory = required(request.directory, "directory")?;

    let result = state.manager.scan(&directory).await?;
    Ok(Json(result))
}
