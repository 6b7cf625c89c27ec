//! Storage listing and deletion.
//!
//! The listing reads filesystem metadata directly — nothing about an
//! artifact is stored anywhere else. Entries are sorted by filename so
//! the response is stable across filesystems. Dot-prefixed names are
//! skipped: in-flight staging temps live in the same directory under
//! `.staging-*` names and must never appear in a listing.

use super::error::{ApiError, ApiResult};
use super::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub filename: String,
    pub size: u64,
    pub upload_date: DateTime<Utc>,
    pub path: String,
}

/// `GET /files` — list stored artifacts.
pub async fn list_files(State(state): State<AppState>) -> ApiResult<Json<Vec<FileEntry>>> {
    let storage = &state.config.storage_dir;
    let mut entries = Vec::new();

    let mut dir = match tokio::fs::read_dir(storage).await {
        Ok(dir) => dir,
        // No uploads yet: an absent storage dir is an empty listing.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Json(entries)),
        Err(e) => return Err(ApiError::Internal(format!("Failed to read storage: {e}"))),
    };

    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read storage: {e}")))?
    {
        let filename = entry.file_name().to_string_lossy().into_owned();
        if filename.starts_with('.') {
            continue;
        }
        let meta = match entry.metadata().await {
            Ok(meta) if meta.is_file() => meta,
            _ => continue,
        };
        let upload_date: DateTime<Utc> =
            meta.modified().map(Into::into).unwrap_or_else(|_| Utc::now());
        entries.push(FileEntry {
            path: format!("/uploads/{filename}"),
            filename,
            size: meta.len(),
            upload_date,
        });
    }

    entries.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(Json(entries))
}

/// `DELETE /files/{filename}` — remove one stored artifact.
pub async fn delete_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    // The parameter is client-controlled; only a plain visible filename
    // may reach the storage directory as a path segment.
    if filename.is_empty()
        || filename.starts_with('.')
        || filename.contains(['/', '\\', '\0'])
    {
        return Err(ApiError::BadRequest(format!("Invalid filename '{filename}'")));
    }

    let target = state.config.storage_dir.join(&filename);
    match tokio::fs::remove_file(&target).await {
        Ok(()) => {
            info!("Deleted artifact {}", target.display());
            Ok(Json(
                serde_json::json!({ "message": "File deleted successfully" }),
            ))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::NotFound("File not found".into()))
        }
        Err(e) => Err(ApiError::Internal(format!("Failed to delete file: {e}"))),
    }
}
