use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_chat::chat::{ChatExchange, SqliteHistoryStore};
use portfolio_chat::config::{Config, PersonaPrompt};
use portfolio_chat::resume::{JsonContentStore, ResumeFacts};
use portfolio_chat::{providers, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_chat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Loaded once, read-only for the life of the process
    let facts = Arc::new(ResumeFacts::load(&config.resume_path));

    let history = Arc::new(SqliteHistoryStore::new(&config.history_db).await?);
    tracing::info!("Chat history at {}", config.history_db.display());

    let provider = providers::from_config(&config.llm)?;
    tracing::info!(
        provider = provider.name(),
        model = %config.llm.model,
        endpoint = %config.llm.base_url,
        "Using inference provider"
    );

    let persona = PersonaPrompt::load_or_default(config.persona_path.as_deref()).await;

    let chat_exchange =
        Arc::new(ChatExchange::new(facts.clone(), history, provider).with_persona(persona));

    let state = AppState {
        config: Arc::new(config),
        chat_exchange,
        content: Arc::new(JsonContentStore::new(facts)),
    };

    let app = routes::app(state);

    tracing::info!("Portfolio API running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
