//! Compatibility scoring — asks the model for a JSON verdict and decodes it.
//!
//! `try_match` is the fallible pipeline. `MatchScorer` is the outer
//! contract handed to the route layer: it always returns a `MatchResult`,
//! substituting `MatchResult::fallback()` when the pipeline fails for any
//! reason (backend error, no JSON object in the reply, malformed JSON).
//!
//! Carried in `AppState` as `Arc<dyn MatchScorer>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::gemini::{GeminiClient, GeminiError};
use crate::matching::prompts::build_match_prompt;

pub const FALLBACK_REASONING: &str = "Error analyzing compatibility";

/// Structured verdict for one student/tutor pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 0–100, higher is a better fit.
    pub score: u8,
    pub reasoning: String,
}

impl MatchResult {
    /// Sentinel substituted whenever scoring cannot produce a real verdict.
    pub fn fallback() -> Self {
        Self {
            score: 0,
            reasoning: FALLBACK_REASONING.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Gemini(#[from] GeminiError),

    #[error("no JSON object found in model response")]
    NoJson,

    #[error("malformed JSON verdict: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Fallible scoring pipeline: prompt → generate → extract → decode.
pub async fn try_match(
    client: &GeminiClient,
    student_profile: &str,
    tutor_profile: &str,
) -> Result<MatchResult, MatchError> {
    let prompt = build_match_prompt(student_profile, tutor_profile);
    let response = client.generate_text(&prompt, None).await?;
    let object = extract_json_object(&response).ok_or(MatchError::NoJson)?;
    Ok(serde_json::from_str(object)?)
}

/// Compatibility scorer seam. Implementations never fail; degraded outcomes
/// surface as `MatchResult::fallback()`.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(&self, student_profile: &str, tutor_profile: &str) -> MatchResult;
}

pub struct GeminiMatchScorer {
    client: GeminiClient,
}

impl GeminiMatchScorer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MatchScorer for GeminiMatchScorer {
    async fn score(&self, student_profile: &str, tutor_profile: &str) -> MatchResult {
        match try_match(&self.client, student_profile, tutor_profile).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Match scoring degraded to fallback: {e}");
                MatchResult::fallback()
            }
        }
    }
}

/// Returns the first balanced `{...}` object in `text`. Braces inside JSON
/// strings are skipped, so prose around the object is tolerated.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
