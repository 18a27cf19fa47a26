use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};

use super::AppState;
use super::session::attach_session_cookie;

const CHAT_PAGE: &str = include_str!("../../static/index.html");

/// Serves the chat page. Every visit starts the conversation over.
pub(super) async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers);
    state.sessions.clear(session.id);

    attach_session_cookie(Html(CHAT_PAGE).into_response(), session)
}
