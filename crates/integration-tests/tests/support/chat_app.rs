#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chat_server::http::{AppState, SESSION_COOKIE_NAME, SessionStore, build_router};
use serde_json::{Value, json};
use shared::conversation::ConversationHistory;
use shared::knowledge::KnowledgeBase;
use shared::llm::{
    AdmissionsAssistant, CompletionBackend, GroqGateway, GroqGatewayConfig, build_system_prompt,
};
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: axum::Router,
    pub sessions: SessionStore,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|_| json!({}))
    }

    pub fn reply(&self) -> String {
        self.json()["reply"].as_str().unwrap_or_default().to_string()
    }
}

pub fn build_test_app(backend: CompletionBackend) -> TestApp {
    let knowledge = KnowledgeBase::from_value(json!({
        "engineering": {
            "programs": {
                "btech": {
                    "name": "B.Tech",
                    "duration": "4 years",
                    "specializations": ["CSE", "ECE"]
                }
            }
        }
    }))
    .expect("test knowledge should parse");
    let assistant = AdmissionsAssistant::new(
        build_system_prompt("Scaledown University", &knowledge),
        backend,
    );
    let sessions = SessionStore::new(Duration::from_secs(3600), 1_000);

    let router = build_router(AppState {
        assistant: Arc::new(assistant),
        sessions: sessions.clone(),
    });

    TestApp { router, sessions }
}

pub fn groq_backend(chat_completions_url: &str) -> CompletionBackend {
    let gateway = GroqGateway::new(GroqGatewayConfig {
        chat_completions_url: chat_completions_url.to_string(),
        api_key: "test-groq-key".to_string(),
        model: "llama-3.3-70b-versatile".to_string(),
        timeout_ms: Some(5_000),
    })
    .expect("groq gateway should build");
    CompletionBackend::Configured(Arc::new(gateway))
}

/// Drives the router like a browser: keeps the session cookie between requests.
pub struct ChatClient<'a> {
    app: &'a TestApp,
    cookie: Option<String>,
}

impl<'a> ChatClient<'a> {
    pub fn new(app: &'a TestApp) -> Self {
        Self { app, cookie: None }
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.cookie
            .as_deref()
            .and_then(|cookie| cookie.strip_prefix(&format!("{SESSION_COOKIE_NAME}=")))
            .and_then(|id| Uuid::parse_str(id).ok())
    }

    pub fn history(&self) -> ConversationHistory {
        self.session_id()
            .map(|id| self.app.sessions.history(id))
            .unwrap_or_default()
    }

    pub async fn visit_home(&mut self) -> TestResponse {
        let request = self
            .builder(Method::GET, "/")
            .body(Body::empty())
            .expect("home request should build");
        self.send(request).await
    }

    pub async fn send_message(&mut self, message: &str) -> TestResponse {
        self.post_chat(json!({ "message": message })).await
    }

    pub async fn post_chat(&mut self, body: Value) -> TestResponse {
        let request = self
            .builder(Method::POST, "/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::to_vec(&body).expect("chat body should serialize"),
            ))
            .expect("chat request should build");
        self.send(request).await
    }

    fn builder(&self, method: Method, path: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request should succeed");

        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body should read")
            .to_vec();

        if let Some(set_cookie) = &set_cookie
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.trim().to_string());
        }

        TestResponse {
            status,
            set_cookie,
            content_type,
            body,
        }
    }
}
