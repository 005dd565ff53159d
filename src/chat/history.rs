//! Chat history storage using SQLite
//!
//! Every message of every session is appended to a single `chat_history`
//! table. A session has no row of its own; it is just the set of turns that
//! share a `session_id`.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::conversation::{Message, Role};

/// Errors from the history store
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt history row: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only log of chat turns
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Record one turn at the end of the session
    async fn append_turn(&self, session_id: &str, role: Role, content: &str)
        -> Result<(), HistoryError>;

    /// The last `limit` turns of the session, oldest first
    async fn fetch_recent(&self, session_id: &str, limit: usize)
        -> Result<Vec<Message>, HistoryError>;
}

/// SQLite-backed history store
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    /// Open (or create) the history database at the given path
    pub async fn new(db_path: &Path) -> Result<Self, HistoryError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create an in-memory store
    ///
    /// Limited to one connection, since every SQLite `:memory:` connection is
    /// its own database.
    pub async fn new_in_memory() -> Result<Self, HistoryError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_chat_history_session
            ON chat_history(session_id, created_at)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append_turn(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<(), HistoryError> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        sqlx::query(
            r#"
            INSERT INTO chat_history (session_id, role, content, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(session_id)
        .bind(role.as_str())
        .bind(content)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_recent(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, HistoryError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT role, content
            FROM chat_history
            WHERE session_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(session_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        // Newest-first from the query; replay wants chronological order
        rows.into_iter()
            .rev()
            .map(|(role, content)| -> Result<Message, HistoryError> {
                let role = Role::from_str(&role).map_err(|e| HistoryError::Corrupt(e.to_string()))?;
                Ok(Message { role, content })
            })
            .collect()
    }
}
