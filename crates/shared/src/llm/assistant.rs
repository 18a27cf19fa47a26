use std::sync::Arc;

use tracing::{debug, error};

use super::gateway::{ChatCompletionGateway, ChatCompletionRequest};
use super::prompts::SystemPrompt;
use crate::conversation::ConversationTurn;

pub const NOT_CONFIGURED_REPLY: &str = "⚠️ The AI service is not configured yet. \
Please add your Groq API key to the .env file.\n\
Get a free key at: https://console.groq.com";

pub const SERVICE_UNAVAILABLE_REPLY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again in a moment.";

/// Whether a completion credential was available at startup. Resolved once.
#[derive(Clone)]
pub enum CompletionBackend {
    Configured(Arc<dyn ChatCompletionGateway>),
    Unconfigured,
}

#[derive(Clone)]
pub struct AdmissionsAssistant {
    system_prompt: SystemPrompt,
    backend: CompletionBackend,
}

impl AdmissionsAssistant {
    pub fn new(system_prompt: SystemPrompt, backend: CompletionBackend) -> Self {
        Self {
            system_prompt,
            backend,
        }
    }

    pub fn system_prompt(&self) -> &SystemPrompt {
        &self.system_prompt
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.backend, CompletionBackend::Configured(_))
    }

    /// Produces the assistant's reply to `user_input`. Never fails: an unconfigured
    /// backend or a failed provider call yields a fixed user-facing notice.
    pub async fn generate_reply(&self, user_input: &str, history: &[ConversationTurn]) -> String {
        let CompletionBackend::Configured(gateway) = &self.backend else {
            return NOT_CONFIGURED_REPLY.to_string();
        };

        let request =
            ChatCompletionRequest::for_turn(self.system_prompt.as_str(), history, user_input);
        let message_count = request.messages.len();

        match gateway.complete(request).await {
            Ok(response) => {
                debug!(
                    model = %response.model,
                    provider_request_id = response.provider_request_id.as_deref().unwrap_or("-"),
                    message_count,
                    total_tokens = response.usage.as_ref().map(|usage| usage.total_tokens),
                    "completion succeeded"
                );
                response.content
            }
            Err(err) => {
                error!(error = %err, kind = err.kind(), message_count, "completion request failed");
                SERVICE_UNAVAILABLE_REPLY.to_string()
            }
        }
    }
}
