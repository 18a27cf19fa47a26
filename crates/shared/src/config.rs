use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::config_env::{optional_trimmed_env, parse_u64_env};
use crate::llm::GroqGatewayConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_KNOWLEDGE_DATA_PATH: &str = "data/university_data.json";
const DEFAULT_INSTITUTION_NAME: &str = "Scaledown University";
const DEFAULT_SESSION_TTL_SECONDS: u64 = 86_400;
const DEFAULT_SESSION_MAX_ENTRIES: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct ChatServerConfig {
    pub bind_addr: SocketAddr,
    pub knowledge_data_path: PathBuf,
    pub institution_name: String,
    pub session_ttl_seconds: u64,
    pub session_max_entries: usize,
    /// `None` when no usable completion credential is present; the assistant then
    /// answers every message with the not-configured notice.
    pub completion: Option<GroqGatewayConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to load .env file: {0}")]
    Dotenv(String),
}

impl ChatServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_bind_addr =
            optional_trimmed_env("CHAT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_bind_addr.parse::<SocketAddr>().map_err(|_| {
            ConfigError::InvalidConfiguration(format!(
                "CHAT_BIND_ADDR is not a socket address: {raw_bind_addr}"
            ))
        })?;

        let session_ttl_seconds =
            parse_u64_env("SESSION_TTL_SECONDS", DEFAULT_SESSION_TTL_SECONDS)?;
        if session_ttl_seconds == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "SESSION_TTL_SECONDS must be greater than zero".to_string(),
            ));
        }

        let session_max_entries =
            parse_u64_env("SESSION_MAX_ENTRIES", DEFAULT_SESSION_MAX_ENTRIES)?;
        if session_max_entries == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "SESSION_MAX_ENTRIES must be greater than zero".to_string(),
            ));
        }
        let session_max_entries = usize::try_from(session_max_entries).map_err(|_| {
            ConfigError::InvalidConfiguration("SESSION_MAX_ENTRIES is too large".to_string())
        })?;

        Ok(Self {
            bind_addr,
            knowledge_data_path: knowledge_data_path(optional_trimmed_env("KNOWLEDGE_DATA_PATH")),
            institution_name: optional_trimmed_env("INSTITUTION_NAME")
                .unwrap_or_else(|| DEFAULT_INSTITUTION_NAME.to_string()),
            session_ttl_seconds,
            session_max_entries,
            completion: GroqGatewayConfig::from_env()?,
        })
    }
}

/// Relative paths resolve against the working directory, like the bundled `data/` layout.
fn knowledge_data_path(configured: Option<String>) -> PathBuf {
    configured
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_KNOWLEDGE_DATA_PATH))
}

/// Loads a `.env` file from the working directory if one exists.
pub fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::Dotenv(err.to_string())),
    }
}
