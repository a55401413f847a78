// Study-plan drafting. The plan text is returned to the caller verbatim;
// no structure is imposed on the model's output.

pub mod handlers;
pub mod prompts;

use crate::gemini::{GeminiClient, GeminiError};
use crate::plans::prompts::build_study_plan_prompt;

/// Drafts a study plan for `topic` at `level` over `duration`.
pub async fn generate_study_plan(
    client: &GeminiClient,
    topic: &str,
    level: &str,
    duration: &str,
) -> Result<String, GeminiError> {
    let prompt = build_study_plan_prompt(topic, level, duration);
    client.generate_text(&prompt, None).await
}
