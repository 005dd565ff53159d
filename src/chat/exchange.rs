//! Single-turn chat exchange
//!
//! [`ChatExchange`] handles one visitor message end to end:
//! 1. Resolves the session id (a fresh one when the caller has none)
//! 2. Loads the recent turns of that session
//! 3. Builds the prompt: persona + resume context, history, new message
//! 4. Records the user turn before calling the model
//! 5. Makes exactly one inference call
//! 6. Records the reply, or answers with a fixed fallback on failure
//!
//! An exchange always ends with a reply text and a session id. Failures are
//! logged, never returned to the visitor.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::PersonaPrompt;
use crate::conversation::{new_session_id, Message, Role};
use crate::providers::{ChatProvider, GenerationOptions, ProviderError};
use crate::resume::{render_context, ResumeFacts};

use super::history::{HistoryError, HistoryStore};

/// Number of previous turns replayed to the model
pub const HISTORY_LIMIT: usize = 10;

/// Reply when the inference service cannot be reached
pub const UNREACHABLE_FALLBACK: &str = "I'm sorry, I'm having trouble connecting to the AI service right now. Please make sure the AI service is running.";

/// Reply for any other failure while producing an answer
pub const GENERIC_FALLBACK: &str = "I'm sorry, something went wrong. Please try again.";

/// Request body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The visitor's message
    pub message: String,

    /// Session to continue
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant's reply, or a fallback text
    pub response: String,

    /// Session the reply belongs to
    pub session_id: String,
}

/// Failure kinds inside an exchange, each with its own recovery
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// History store or inference endpoint unreachable, timed out or refusing
    #[error("Infrastructure unavailable: {0}")]
    TransientInfra(String),

    /// No resume facts to ground the answer on
    #[error("Resume data absent")]
    DataAbsent,

    /// Anything else
    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl From<ProviderError> for ExchangeError {
    fn from(e: ProviderError) -> Self {
        if e.is_transient() {
            ExchangeError::TransientInfra(e.to_string())
        } else {
            ExchangeError::Unexpected(e.to_string())
        }
    }
}

impl From<HistoryError> for ExchangeError {
    fn from(e: HistoryError) -> Self {
        match e {
            HistoryError::Database(e) => ExchangeError::TransientInfra(e.to_string()),
            HistoryError::Io(e) => ExchangeError::TransientInfra(e.to_string()),
            HistoryError::Corrupt(msg) => ExchangeError::Unexpected(msg),
        }
    }
}

impl ExchangeError {
    /// The text the visitor sees for this failure
    pub fn fallback_reply(&self) -> &'static str {
        match self {
            ExchangeError::TransientInfra(_) => UNREACHABLE_FALLBACK,
            ExchangeError::DataAbsent | ExchangeError::Unexpected(_) => GENERIC_FALLBACK,
        }
    }
}

/// Coordinates one chat exchange against the history store and the model
pub struct ChatExchange {
    facts: Arc<ResumeFacts>,
    persona: PersonaPrompt,
    history: Arc<dyn HistoryStore>,
    provider: Arc<dyn ChatProvider>,
    options: GenerationOptions,
    history_limit: usize,
}

impl ChatExchange {
    pub fn new(
        facts: Arc<ResumeFacts>,
        history: Arc<dyn HistoryStore>,
        provider: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            facts,
            persona: PersonaPrompt::default(),
            history,
            provider,
            options: GenerationOptions::default(),
            history_limit: HISTORY_LIMIT,
        }
    }

    /// Use a custom persona
    pub fn with_persona(mut self, persona: PersonaPrompt) -> Self {
        self.persona = persona;
        self
    }

    /// The system prompt sent at the top of every exchange
    pub fn system_prompt(&self) -> String {
        self.persona.system_message(&render_context(&self.facts))
    }

    /// Answer one message
    pub async fn exchange(&self, message: &str, session_id: Option<String>) -> ChatResponse {
        let session_id = session_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(new_session_id);

        let history = match self.history.fetch_recent(&session_id, self.history_limit).await {
            Ok(history) => history,
            Err(e) => {
                let e = ExchangeError::from(e);
                tracing::error!(session_id = %session_id, error = %e, "Failed to fetch chat history");
                Vec::new()
            }
        };

        let messages = self.build_messages(history, message);

        // Recorded before the call so the visitor's input survives a failed inference
        self.persist(&session_id, Role::User, message).await;

        let response = match self.infer(&messages).await {
            Ok(reply) => {
                self.persist(&session_id, Role::Assistant, &reply).await;
                reply
            }
            Err(e) => {
                match &e {
                    ExchangeError::TransientInfra(_) => tracing::error!(
                        session_id = %session_id,
                        provider = self.provider.name(),
                        error = %e,
                        "AI service unreachable"
                    ),
                    _ => tracing::error!(
                        session_id = %session_id,
                        provider = self.provider.name(),
                        error = %e,
                        "Failed to get AI response"
                    ),
                }
                e.fallback_reply().to_string()
            }
        };

        ChatResponse {
            response,
            session_id,
        }
    }

    fn build_messages(&self, history: Vec<Message>, message: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.system_prompt()));
        messages.extend(history);
        messages.push(Message::user(message));
        messages
    }

    async fn infer(&self, messages: &[Message]) -> Result<String, ExchangeError> {
        let reply = self.provider.chat(messages, &self.options).await?;
        Ok(reply.content)
    }

    async fn persist(&self, session_id: &str, role: Role, content: &str) {
        if let Err(e) = self.history.append_turn(session_id, role, content).await {
            let e = ExchangeError::from(e);
            tracing::error!(session_id, role = %role, error = %e, "Failed to save chat message");
        }
    }
}
