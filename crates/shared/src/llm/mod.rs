pub mod assistant;
pub mod gateway;
pub mod groq;
pub mod prompts;

pub use assistant::{
    AdmissionsAssistant, CompletionBackend, NOT_CONFIGURED_REPLY, SERVICE_UNAVAILABLE_REPLY,
};
pub use gateway::{
    ChatCompletionFuture, ChatCompletionGateway, ChatCompletionRequest, ChatCompletionResponse,
    ChatMessage, LlmGatewayError, LlmTokenUsage, MessageRole,
};
pub use groq::{GroqClientError, GroqGateway, GroqGatewayConfig};
pub use prompts::{SystemPrompt, build_system_prompt};
