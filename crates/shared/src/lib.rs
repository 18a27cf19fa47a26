pub mod config;
mod config_env;
pub mod conversation;
pub mod knowledge;
pub mod llm;
pub mod models;
