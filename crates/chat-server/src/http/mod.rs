use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use shared::llm::AdmissionsAssistant;

mod chat;
mod home;
mod session;

pub use session::{SESSION_COOKIE_NAME, SessionHandle, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<AdmissionsAssistant>,
    pub sessions: SessionStore,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/chat", post(chat::chat))
        .with_state(app_state)
}
