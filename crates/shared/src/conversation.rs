use serde::{Deserialize, Serialize};

/// Upper bound on stored turns per session (20 user/assistant exchanges).
pub const MAX_HISTORY_TURNS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered turns of one session, bounded to the most recent [`MAX_HISTORY_TURNS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Appends the user turn then the assistant turn, evicting the oldest turns
    /// once the cap is exceeded.
    pub fn record_exchange(&mut self, user_message: &str, reply: &str) {
        self.turns.push(ConversationTurn::user(user_message));
        self.turns.push(ConversationTurn::assistant(reply));

        if self.turns.len() > MAX_HISTORY_TURNS {
            let overflow = self.turns.len() - MAX_HISTORY_TURNS;
            self.turns.drain(..overflow);
        }
    }
}
