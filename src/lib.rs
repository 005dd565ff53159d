//! Portfolio Chat - resume content API with an AI assistant
//!
//! Serves the sections of a personal portfolio from a JSON knowledge base and
//! answers visitor questions about it through a locally or remotely hosted
//! LLM, keeping each visitor's conversation in SQLite.

use std::sync::Arc;

pub mod chat;
pub mod config;
pub mod conversation;
pub mod error;
pub mod providers;
pub mod resume;
pub mod routes;

use chat::ChatExchange;
use config::Config;
use resume::ContentStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat_exchange: Arc<ChatExchange>,
    pub content: Arc<dyn ContentStore>,
}
