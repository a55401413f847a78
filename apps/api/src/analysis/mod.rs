// Free-text analysis: a prompt wrapper over the generation client. The
// result is returned unmodified.

pub mod handlers;

use crate::gemini::{GeminiClient, GeminiError};

pub const DEFAULT_ANALYSIS_TYPE: &str = "general";

pub fn build_analysis_prompt(text: &str, analysis_type: &str) -> String {
    format!("Analyze the following text for {analysis_type}:\n\n{text}")
}

/// Analyzes `text` for the given aspect (tone, clarity, ...). Defaults to a
/// general analysis.
pub async fn analyze_text(
    client: &GeminiClient,
    text: &str,
    analysis_type: Option<&str>,
) -> Result<String, GeminiError> {
    let prompt = build_analysis_prompt(text, analysis_type.unwrap_or(DEFAULT_ANALYSIS_TYPE));
    client.generate_text(&prompt, None).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_the_analysis_type() {
        let prompt = build_analysis_prompt("foo", "tone");
        assert!(prompt.contains("Analyze the following text for tone:"));
        assert!(prompt.ends_with("\n\nfoo"));
    }

    #[test]
    fn test_default_analysis_type_is_general() {
        assert_eq!(DEFAULT_ANALYSIS_TYPE, "general");
    }
}
