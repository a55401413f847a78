//! Axum route handlers for the compatibility matcher.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::matching::scoring::MatchResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub student_profile: String,
    pub tutor_profile: String,
}

/// POST /api/v1/match
///
/// Never surfaces a backend error: degraded outcomes come back as the
/// zero-score sentinel, so this endpoint always answers with a verdict.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    if request.student_profile.trim().is_empty() || request.tutor_profile.trim().is_empty() {
        return Err(AppError::Validation(
            "student_profile and tutor_profile cannot be empty".to_string(),
        ));
    }

    let result = state
        .matcher
        .score(&request.student_profile, &request.tutor_profile)
        .await;

    Ok(Json(result))
}
