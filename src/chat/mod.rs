//! Chat exchange and conversation history

mod exchange;
mod history;

pub use exchange::{
    ChatExchange, ChatRequest, ChatResponse, ExchangeError, GENERIC_FALLBACK, HISTORY_LIMIT,
    UNREACHABLE_FALLBACK,
};
pub use history::{HistoryError, HistoryStore, SqliteHistoryStore};
