//! Audio upload handler

use std::path::Path;

use axum::extract::{multipart::MultipartRejection, Multipart, State};
use axum::Json;

use crate::models::UploadResponse;
use crate::{AppError, AppResult, AppState};

/// Multipart field carrying the recording
pub const AUDIO_FIELD: &str = "audio";

/// Store an uploaded recording under the upload directory
pub async fn upload_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!("Upload rejected: {}", rejection.body_text());
        no_audio()
    })?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .and_then(sanitize_file_name)
            .ok_or_else(|| AppError::ValidationError("Invalid audio file name".to_string()))?;

        let data = field.bytes().await?;

        let path = state.config.upload_dir.join(&file_name);
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?;

        tracing::info!("Audio uploaded: {} ({} bytes)", path.display(), data.len());

        return Ok(Json(UploadResponse {
            message: "Audio uploaded successfully".to_string(),
            file_path: path.display().to_string(),
        }));
    }

    Err(no_audio())
}

fn no_audio() -> AppError {
    AppError::ValidationError("No audio file provided".to_string())
}

/// Keep only the final path component of a client-supplied name
fn sanitize_file_name(name: &str) -> Option<String> {
    let base = Path::new(name).file_name()?.to_str()?.trim();
    if base.is_empty() || base.starts_with('.') {
        return None;
    }
    Some(base.to_string())
}
