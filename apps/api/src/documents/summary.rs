//! Document summarization with a degradation path.
//!
//! The primary summary comes from the generation client. If that call fails
//! (missing key, terminal backend error, retries exhausted), the document
//! still gets a naive extractive summary built from its leading sentences.

use tracing::warn;

use crate::gemini::GeminiClient;

/// The prompt never carries more than this much document text.
const MAX_PROMPT_CHARS: usize = 4000;
const FALLBACK_SUMMARY_CHARS: usize = 200;

pub fn build_summary_prompt(text: &str) -> String {
    format!(
        "Summarize the following document in a short paragraph:\n\n{}",
        truncate_chars(text, MAX_PROMPT_CHARS)
    )
}

/// Summarizes `text`, degrading to `fallback_summary` on any backend error.
pub async fn summarize(client: &GeminiClient, text: &str) -> String {
    let prompt = build_summary_prompt(text);
    match client.generate_text(&prompt, None).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Document summary degraded to extractive fallback: {e}");
            fallback_summary(text)
        }
    }
}

/// Accumulates leading sentences while the summary stays under the length
/// budget; a document with no usable sentence boundary is clipped instead.
pub fn fallback_summary(text: &str) -> String {
    let mut summary = String::new();

    for sentence in text.split(['.', '!', '?']) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        if summary.len() + sentence.len() >= FALLBACK_SUMMARY_CHARS {
            break;
        }
        summary.push_str(sentence);
        summary.push_str(". ");
    }

    if !summary.is_empty() {
        return summary.trim_end().to_string();
    }

    if text.chars().count() > FALLBACK_SUMMARY_CHARS {
        format!("{}...", truncate_chars(text, FALLBACK_SUMMARY_CHARS))
    } else {
        text.to_string()
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
