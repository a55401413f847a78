//! Axum route handlers for document upload and processing.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;

use crate::documents::{pdf, summary, topics};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub summary: String,
    pub topics: Vec<String>,
    pub text_length: usize,
    pub filename: String,
}

/// POST /api/v1/documents/upload
///
/// Accepts one multipart `file` field holding a PDF and returns a summary
/// with the detected topics.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload.pdf").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            file = Some((filename, bytes));
        }
    }

    let (filename, bytes) = file
        .ok_or_else(|| AppError::Validation("Missing multipart field 'file'".to_string()))?;

    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(AppError::Validation(
            "Only PDF files are allowed".to_string(),
        ));
    }

    // pdf parsing is CPU-bound; keep it off the async workers.
    let text = tokio::task::spawn_blocking(move || pdf::extract_text(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))??;

    if text.chars().count() < 10 {
        return Err(AppError::UnprocessableEntity(
            "PDF appears to be empty or contains no readable text".to_string(),
        ));
    }

    let summary = summary::summarize(&state.gemini, &text).await;
    let detected = topics::detect_topics(&text);

    Ok(Json(UploadResponse {
        summary,
        topics: detected,
        text_length: text.chars().count(),
        filename,
    }))
}
