//! The upload route: validate, spool, convert.
//!
//! Validation happens before the pipeline is invoked: the declared name
//! must end in `.zip` (the archive extension is the enforced rule) and
//! the body is capped by the router's size limit. The archive is spooled
//! to a managed temp file that is deleted when this handler returns —
//! the pipeline contract says the caller owns and removes the upload.

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::convert::convert;
use crate::output::StoredArtifact;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};

/// Multipart field name the UI posts archives under.
const UPLOAD_FIELD: &str = "files";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub artifact: ArtifactBody,
    /// Compiler stderr, when the engine wrote any. Non-fatal by contract
    /// but worth showing to the author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler_warnings: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactBody {
    pub filename: String,
    pub size: u64,
    pub path: String,
}

impl From<&StoredArtifact> for ArtifactBody {
    fn from(a: &StoredArtifact) -> Self {
        Self {
            filename: a.filename.clone(),
            size: a.size_bytes,
            path: format!("/uploads/{}", a.filename),
        }
    }
}

/// `POST /upload` — accept one `.zip` archive and run the pipeline on it.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field
            .file_name()
            .ok_or_else(|| ApiError::BadRequest("Upload is missing a filename".into()))?
            .to_string();

        if !original_name.to_ascii_lowercase().ends_with(".zip") {
            return Err(ApiError::BadRequest(format!(
                "Only .zip archives are accepted, got '{original_name}'"
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
        debug!("Received '{}' ({} bytes)", original_name, bytes.len());

        let spool = tempfile::NamedTempFile::new()
            .map_err(|e| ApiError::Internal(format!("Failed to spool upload: {e}")))?;
        std::fs::write(spool.path(), &bytes)
            .map_err(|e| ApiError::Internal(format!("Failed to spool upload: {e}")))?;

        let output = convert(spool.path(), &original_name, &state.config).await?;
        // `spool` drops here: the uploaded archive is deleted once the
        // pipeline is done with it.

        info!(
            "Upload '{}' converted to {} in {}ms",
            original_name, output.artifact.filename, output.stats.total_duration_ms
        );

        let compiler_warnings = if output.compiler.stderr.trim().is_empty() {
            None
        } else {
            Some(output.compiler.stderr)
        };

        return Ok(Json(UploadResponse {
            message: "File uploaded and converted successfully".into(),
            artifact: ArtifactBody::from(&output.artifact),
            compiler_warnings,
        }));
    }

    Err(ApiError::BadRequest("No files uploaded".into()))
}
