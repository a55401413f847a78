use std::sync::Arc;

use crate::gemini::GeminiClient;
use crate::matching::scoring::MatchScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub gemini: GeminiClient,
    /// Pluggable compatibility scorer. Default: `GeminiMatchScorer` over the
    /// shared client.
    pub matcher: Arc<dyn MatchScorer>,
}
