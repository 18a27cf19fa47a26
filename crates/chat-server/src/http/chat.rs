use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use shared::models::{ChatRequest, ChatResponse};
use tracing::info;

use super::AppState;
use super::session::attach_session_cookie;

pub(super) const EMPTY_MESSAGE_REPLY: &str = "Please type a message.";

pub(super) async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ChatRequest>,
) -> Response {
    let message = req.message.trim();
    if message.is_empty() {
        return Json(ChatResponse::new(EMPTY_MESSAGE_REPLY)).into_response();
    }

    let session = state.sessions.resolve(&headers);
    let mut history = state.sessions.history(session.id);

    let reply = state
        .assistant
        .generate_reply(message, history.turns())
        .await;

    history.record_exchange(message, &reply);
    let history_len = history.len();
    state.sessions.store_history(session.id, history);

    info!(
        session_id = %session.id,
        message_chars = message.chars().count(),
        history_len,
        "chat turn completed"
    );

    attach_session_cookie(Json(ChatResponse::new(reply)).into_response(), session)
}
