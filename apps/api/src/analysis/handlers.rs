//! Axum route handlers for free-text analysis.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analysis::analyze_text;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub analysis_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

/// POST /api/v1/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let analysis = analyze_text(
        &state.gemini,
        &request.text,
        request.analysis_type.as_deref(),
    )
    .await
    .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(AnalyzeResponse { analysis }))
}
