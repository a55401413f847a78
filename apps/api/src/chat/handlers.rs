//! Axum route handlers for the chat call sites.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::chat::ChatMessage;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
    pub reply: ChatMessage,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let reply_text = state
        .gemini
        .generate_text(&request.message, None)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(ChatResponse {
        message: ChatMessage::user(request.message),
        reply: ChatMessage::assistant(reply_text),
    }))
}

/// POST /api/v1/chat/stream
///
/// Forwards backend fragments as SSE `data:` events in arrival order,
/// followed by a `done` event. A failure is emitted as an `error` event
/// after whatever fragments were already delivered; a client accumulating
/// fragments must discard its buffer before re-sending, since a new request
/// restarts the response from the beginning.
pub async fn handle_chat_stream(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let gemini = state.gemini.clone();

    tokio::spawn(async move {
        let fragments = tx.clone();
        let result = gemini
            .generate_with_streaming(
                &request.message,
                |chunk| {
                    let _ = fragments.send(Ok(Event::default().data(chunk)));
                },
                None,
            )
            .await;

        let terminal = match result {
            Ok(_) => Event::default().event("done").data(""),
            Err(e) => Event::default().event("error").data(e.to_string()),
        };
        let _ = tx.send(Ok(terminal));
    });

    Ok(Sse::new(UnboundedReceiverStream::new(rx)).keep_alive(KeepAlive::default()))
}
