#![allow(dead_code)]

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy)]
pub enum MockMode {
    /// Answers with `reply to: <last user message>`.
    Echo,
    /// Answers every request with a 503.
    Unavailable,
}

#[derive(Clone)]
struct MockState {
    mode: MockMode,
    seen_payloads: Arc<Mutex<Vec<Value>>>,
}

pub struct MockCompletionServer {
    pub chat_completions_url: String,
    seen_payloads: Arc<Mutex<Vec<Value>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockCompletionServer {
    pub async fn start(mode: MockMode) -> Self {
        let seen_payloads = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/openai/v1/chat/completions", post(chat_completions))
            .with_state(MockState {
                mode,
                seen_payloads: Arc::clone(&seen_payloads),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("mock completion listener should bind");
        let bind_addr = listener
            .local_addr()
            .expect("mock completion listener local address should exist");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("mock completion server should run");
        });

        Self {
            chat_completions_url: format!("http://{bind_addr}/openai/v1/chat/completions"),
            seen_payloads,
            handle,
        }
    }

    pub async fn request_count(&self) -> usize {
        self.seen_payloads.lock().await.len()
    }

    pub async fn last_payload(&self) -> Option<Value> {
        self.seen_payloads.lock().await.last().cloned()
    }
}

impl Drop for MockCompletionServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn chat_completions(
    State(state): State<MockState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let last_user_message = payload["messages"]
        .as_array()
        .and_then(|messages| messages.last())
        .and_then(|message| message["content"].as_str())
        .unwrap_or_default()
        .to_string();
    state.seen_payloads.lock().await.push(payload);

    match state.mode {
        MockMode::Echo => (
            StatusCode::OK,
            Json(json!({
                "id": "chatcmpl-test",
                "model": "mock-model",
                "choices": [
                    {
                        "index": 0,
                        "message": {
                            "role": "assistant",
                            "content": format!("reply to: {last_user_message}")
                        },
                        "finish_reason": "stop"
                    }
                ]
            })),
        ),
        MockMode::Unavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": {
                    "message": "service unavailable",
                    "type": "service_unavailable"
                }
            })),
        ),
    }
}
