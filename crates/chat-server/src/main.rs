use std::sync::Arc;
use std::time::Duration;

use chat_server::http::{self, AppState, SessionStore};
use shared::config::{ChatServerConfig, load_dotenv};
use shared::knowledge::KnowledgeBase;
use shared::llm::{AdmissionsAssistant, CompletionBackend, GroqGateway, build_system_prompt};
use tracing::{error, info, warn};

const SESSION_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    if let Err(err) = load_dotenv() {
        eprintln!("{err}");
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "chat_server=info,shared=info,axum=info".to_string()),
        )
        .init();

    let config = match ChatServerConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(error = %err, "failed to read config");
            std::process::exit(1);
        }
    };

    let knowledge = match KnowledgeBase::load(&config.knowledge_data_path) {
        Ok(knowledge) => knowledge,
        Err(err) => {
            error!(error = %err, "failed to load knowledge data");
            std::process::exit(1);
        }
    };
    let system_prompt = build_system_prompt(&config.institution_name, &knowledge);
    info!(
        schools = knowledge.schools().len(),
        programs = knowledge.program_count(),
        prompt_chars = system_prompt.as_str().chars().count(),
        "system prompt built"
    );

    let backend = match config.completion.clone() {
        Some(groq_config) => match GroqGateway::new(groq_config) {
            Ok(gateway) => {
                info!(model = gateway.model(), "completion backend configured");
                CompletionBackend::Configured(Arc::new(gateway))
            }
            Err(err) => {
                error!(error = %err, "failed to initialize completion client");
                std::process::exit(1);
            }
        },
        None => {
            warn!(
                "GROQ_API_KEY is not set; chat replies will explain that the AI service is not configured. \
                 Get a free key at https://console.groq.com and add it to your .env file"
            );
            CompletionBackend::Unconfigured
        }
    };

    let sessions = SessionStore::new(
        Duration::from_secs(config.session_ttl_seconds),
        config.session_max_entries,
    );
    sessions.spawn_pruner(SESSION_PRUNE_INTERVAL);

    let app = http::build_router(AppState {
        assistant: Arc::new(AdmissionsAssistant::new(system_prompt, backend)),
        sessions,
    });

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, bind_addr = %config.bind_addr, "failed to bind chat server listener");
            std::process::exit(1);
        }
    };

    info!(
        bind_addr = %listener.local_addr().unwrap_or(config.bind_addr),
        institution = %config.institution_name,
        "chat server listening"
    );

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "chat server failed");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
