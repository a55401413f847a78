/// Gemini Client — the single point of entry for all Generative Language API
/// calls in Learnix.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All generation MUST go through this module.
///
/// Transient backend failures (rate limits, overload, temporary
/// unavailability) are absorbed here with jittered exponential backoff, so
/// every caller gets the same resilience semantics without duplicating the
/// policy.
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod stream;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default model for all generation calls. Overridable per call.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Substrings that mark a failure message as transient. Case-sensitive:
/// numeric HTTP statuses appear in rendered `Api` errors, the upper-case
/// tokens are the backend's own status names.
const RETRYABLE_MARKERS: &[&str] = &[
    "429",
    "503",
    "overloaded",
    "temporarily",
    "RESOURCE_EXHAUSTED",
    "UNAVAILABLE",
];

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("prompt cannot be empty")]
    EmptyPrompt,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model returned no text content")]
    EmptyResponse,

    #[error("max retries reached")]
    RetriesExhausted,
}

impl GeminiError {
    /// Whether this failure is worth another attempt. Classified by message
    /// content so transport-level and API-level transience collapse into one
    /// check.
    pub fn is_retryable(&self) -> bool {
        let message = self.to_string();
        RETRYABLE_MARKERS.iter().any(|m| message.contains(m))
    }
}

/// Backoff schedule for retried attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Hard ceiling on the random jitter added to each backoff.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            max_jitter: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff before attempt `attempt` (1-indexed, >= 2).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1u32 << doublings)
            .min(self.max_delay)
    }

    /// Upper bound for the jitter added to `backoff`: a quarter of the
    /// backoff, capped at `max_jitter`.
    pub fn jitter_cap(&self, backoff: Duration) -> Duration {
        (backoff / 4).min(self.max_jitter)
    }
}

/// Samples a jitter duration in `[0, cap)`. Injectable so retry timing is
/// deterministic under test.
pub type JitterFn = Arc<dyn Fn(Duration) -> Duration + Send + Sync>;

fn random_jitter(cap: Duration) -> Duration {
    let cap_ms = cap.as_millis() as u64;
    if cap_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..cap_ms))
}

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
pub struct TextPart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut out = String::new();
        for part in &content.parts {
            if let Some(text) = part.text.as_deref() {
                out.push_str(text);
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    error: GeminiApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiApiErrorBody {
    message: String,
    /// Backend status name, e.g. `RESOURCE_EXHAUSTED` or `UNAVAILABLE`.
    #[serde(default)]
    status: String,
}

/// Builds an `Api` error from a non-success response body. The rendered
/// message keeps the backend's status token so transience classification
/// can see it.
pub(crate) fn api_error(status: u16, body: &str) -> GeminiError {
    let message = match serde_json::from_str::<GeminiApiError>(body) {
        Ok(parsed) if !parsed.error.status.is_empty() => {
            format!("{}: {}", parsed.error.status, parsed.error.message)
        }
        Ok(parsed) => parsed.error.message,
        Err(_) => body.to_string(),
    };
    GeminiError::Api { status, message }
}

// ── Client ──────────────────────────────────────────────────────────────────

/// The single Gemini client shared by all call sites. Stateless beyond its
/// credential and policy; cheap to clone.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    policy: RetryPolicy,
    jitter: JitterFn,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: DEFAULT_API_BASE.to_string(),
            policy: RetryPolicy::default(),
            jitter: Arc::new(random_jitter),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_jitter(mut self, jitter: JitterFn) -> Self {
        self.jitter = jitter;
        self
    }

    fn api_key(&self) -> Result<&str, GeminiError> {
        self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{model}:{method}",
            self.base_url.trim_end_matches('/')
        )
    }

    pub(crate) async fn sleep_before_retry(&self, attempt: u32) {
        let backoff = self.policy.backoff(attempt);
        let delay = backoff + (self.jitter)(self.policy.jitter_cap(backoff));
        warn!(
            "Gemini call failed, retrying (attempt {}) after {}ms",
            attempt,
            delay.as_millis()
        );
        tokio::time::sleep(delay).await;
    }

    /// Generates the full text response for `prompt`.
    ///
    /// Transient failures are retried up to the policy budget; terminal
    /// failures and the last failure of an exhausted budget propagate
    /// unchanged.
    pub async fn generate_text(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, GeminiError> {
        if prompt.trim().is_empty() {
            return Err(GeminiError::EmptyPrompt);
        }
        let model = model.unwrap_or(DEFAULT_MODEL);

        let mut last_error: Option<GeminiError> = None;

        for attempt in 1..=self.policy.max_retries {
            if attempt > 1 {
                self.sleep_before_retry(attempt).await;
            }

            match self.attempt_generate(prompt, model).await {
                Ok(text) => {
                    debug!("Gemini call succeeded on attempt {attempt}");
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && attempt < self.policy.max_retries => {
                    warn!("Gemini call attempt {attempt} failed: {e}");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        // Unreachable while max_retries > 0; kept so an exhausted loop still
        // surfaces something meaningful.
        Err(last_error.unwrap_or(GeminiError::RetriesExhausted))
    }

    async fn attempt_generate(&self, prompt: &str, model: &str) -> Result<String, GeminiError> {
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
            .post(self.endpoint(model, "generateContent"))
            .query(&[("key", key)])
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let body: GenerateContentResponse = response.json().await?;
        body.text().ok_or(GeminiError::EmptyResponse)
    }
}
