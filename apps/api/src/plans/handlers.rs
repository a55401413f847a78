//! Axum route handlers for study-plan drafting.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::plans::generate_study_plan;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StudyPlanRequest {
    pub topic: String,
    pub level: String,
    pub duration: String,
}

#[derive(Debug, Serialize)]
pub struct StudyPlanResponse {
    /// Raw model output, unparsed.
    pub plan: String,
}

/// POST /api/v1/study-plan
pub async fn handle_study_plan(
    State(state): State<AppState>,
    Json(request): Json<StudyPlanRequest>,
) -> Result<Json<StudyPlanResponse>, AppError> {
    for (field, value) in [
        ("topic", &request.topic),
        ("level", &request.level),
        ("duration", &request.duration),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} cannot be empty")));
        }
    }

    let plan = generate_study_plan(
        &state.gemini,
        &request.topic,
        &request.level,
        &request.duration,
    )
    .await
    .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(StudyPlanResponse { plan }))
}
