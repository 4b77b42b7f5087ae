// handlers/public/images_get.rs - GET /images handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::services::media::{content_type, ResolvedFile};
use crate::state::AppState;

pub const RESOLVED_IMAGE_HEADER: &str = "x-resolved-image";
const CACHE_CONTROL: &str = "public, max-age=86400";

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub file: Option<String>,
}

/// Serves an attachment by relative path or bare file name, falling back to
/// the placeholder image
pub async fn images_get(
    State(state): State<AppState>,
    query: Result<Query<ImageQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let requested = query
        .file
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| ApiError::field_error("file", "file is required"))?;

    let media = state.media.clone();
    let lookup = requested.clone();
    let resolved = tokio::task::spawn_blocking(move || media.locate(&lookup))
        .await
        .map_err(|e| {
            tracing::error!("Image lookup task failed: {}", e);
            ApiError::internal_server_error("Failed to read image")
        })?;

    if let Some(file) = resolved {
        return serve(file).await;
    }

    tracing::debug!("Image '{}' not found, serving placeholder", requested);
    let placeholder = ResolvedFile {
        path: state.media.placeholder().to_path_buf(),
        relative: state.media.placeholder_url().to_string(),
    };
    if tokio::fs::metadata(&placeholder.path).await.is_ok_and(|m| m.is_file()) {
        return serve(placeholder).await;
    }

    Err(ApiError::not_found("Image not found"))
}

async fn serve(file: ResolvedFile) -> Result<Response, ApiError> {
    let bytes = tokio::fs::read(&file.path).await.map_err(|e| {
        tracing::error!("Failed to read image {}: {}", file.path.display(), e);
        ApiError::internal_server_error("Failed to read image")
    })?;

    let mut response = (StatusCode::OK, bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type(&file.path)));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL));
    if let Ok(value) = HeaderValue::from_str(&file.relative) {
        headers.insert(RESOLVED_IMAGE_HEADER, value);
    }
    Ok(response)
}
