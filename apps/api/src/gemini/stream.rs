//! Incremental delivery over `streamGenerateContent`.
//!
//! Fragments are handed to the caller's callback in arrival order, as soon
//! as each server-sent event is decoded. Retries apply only while the
//! current attempt has delivered nothing: fragments already delivered are
//! never retracted, and a restarted stream would replay from the beginning,
//! so after partial delivery a failure propagates to the caller instead.

use futures_util::StreamExt;
use tracing::{debug, warn};

use super::{
    api_error, Content, GeminiClient, GeminiError, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, Part, DEFAULT_MODEL, MAX_OUTPUT_TOKENS,
};

impl GeminiClient {
    /// Streams the response for `prompt`, invoking `on_chunk` for every text
    /// fragment in arrival order, and returns the concatenated full text
    /// once the backend signals end-of-stream.
    pub async fn generate_with_streaming<F>(
        &self,
        prompt: &str,
        mut on_chunk: F,
        model: Option<&str>,
    ) -> Result<String, GeminiError>
    where
        F: FnMut(&str),
    {
        if prompt.trim().is_empty() {
            return Err(GeminiError::EmptyPrompt);
        }
        let model = model.unwrap_or(DEFAULT_MODEL);

        let mut last_error: Option<GeminiError> = None;

        for attempt in 1..=self.policy.max_retries {
            if attempt > 1 {
                self.sleep_before_retry(attempt).await;
            }

            let mut delivered = false;
            match self
                .attempt_stream(prompt, model, &mut on_chunk, &mut delivered)
                .await
            {
                Ok(full) => {
                    debug!("Gemini stream completed on attempt {attempt}");
                    return Ok(full);
                }
                Err(e) if !delivered && e.is_retryable() && attempt < self.policy.max_retries => {
                    warn!("Gemini stream attempt {attempt} failed before any fragment: {e}");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(GeminiError::RetriesExhausted))
    }

    async fn attempt_stream<F>(
        &self,
        prompt: &str,
        model: &str,
        on_chunk: &mut F,
        delivered: &mut bool,
    ) -> Result<String, GeminiError>
    where
        F: FnMut(&str),
    {
        let key = self.api_key()?;
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .http
            .post(self.endpoint(model, "streamGenerateContent"))
            .query(&[("key", key), ("alt", "sse")])
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let mut byte_stream = response.bytes_stream();
        let mut pending = String::new();
        let mut full = String::new();

        while let Some(chunk) = byte_stream.next().await {
            let bytes = chunk?;
            pending.push_str(&String::from_utf8_lossy(&bytes));

            while let Some(pos) = pending.find('\n') {
                let line = pending[..pos].trim_end_matches('\r').to_string();
                pending.drain(..=pos);

                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                let data = data.trim_start();
                if data.is_empty() {
                    continue;
                }

                let event: GenerateContentResponse = serde_json::from_str(data)?;
                if let Some(text) = event.text() {
                    *delivered = true;
                    on_chunk(&text);
                    full.push_str(&text);
                }
            }
        }

        if full.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(full)
    }
}
