//! API routes

use axum::{
    extract::State,
    http::HeaderValue,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chat::{ChatRequest, ChatResponse};
use crate::error::AppError;
use crate::resume::{ExperienceRecord, ProfileRecord, ProjectRecord, SkillRecord};
use crate::AppState;

/// Origin of the frontend dev server, always allowed
const DEV_FRONTEND: &str = "http://localhost:5173";

#[derive(Debug, Serialize)]
struct ServiceInfo {
    message: &'static str,
    version: &'static str,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Portfolio AI Chat API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

async fn profile(State(state): State<AppState>) -> Result<Json<ProfileRecord>, AppError> {
    Ok(Json(state.content.get_profile().await?))
}

async fn experiences(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExperienceRecord>>, AppError> {
    Ok(Json(state.content.get_experiences().await?))
}

async fn projects(State(state): State<AppState>) -> Result<Json<Vec<ProjectRecord>>, AppError> {
    Ok(Json(state.content.get_projects().await?))
}

async fn skills(State(state): State<AppState>) -> Result<Json<Vec<SkillRecord>>, AppError> {
    Ok(Json(state.content.get_skills().await?))
}

/// Always answers 200: failures become fallback text inside the exchange
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    Json(
        state
            .chat_exchange
            .exchange(&request.message, request.session_id)
            .await,
    )
}

pub fn router() -> Router<AppState> {
    let api = Router::new()
        .route("/profile", get(profile))
        .route("/experiences", get(experiences))
        .route("/projects", get(projects))
        .route("/skills", get(skills))
        .route("/chat", post(chat));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api)
}

/// CORS for the portfolio frontend; cookies are allowed, so origins are explicit
pub fn cors_layer(frontend_url: &str) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = Vec::new();
    for origin in [frontend_url.trim_end_matches('/'), DEV_FRONTEND] {
        match HeaderValue::from_str(origin) {
            Ok(value) if !origins.contains(&value) => origins.push(value),
            Ok(_) => {}
            Err(_) => tracing::warn!(origin, "Ignoring invalid CORS origin"),
        }
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// The full application: routes, CORS and request tracing
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_url);
    router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::chat::{ChatExchange, SqliteHistoryStore, UNREACHABLE_FALLBACK};
    use crate::config::Config;
    use crate::conversation::Message;
    use crate::providers::{ChatProvider, GenerationOptions, ProviderError};
    use crate::resume::{JsonContentStore, ResumeFacts};

    struct EchoProvider;

    #[async_trait]
    impl ChatProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn chat(
            &self,
            messages: &[Message],
            _: &GenerationOptions,
        ) -> Result<Message, ProviderError> {
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(Message::assistant(format!("echo: {}", last)))
        }
    }

    struct DownProvider;

    #[async_trait]
    impl ChatProvider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        async fn chat(&self, _: &[Message], _: &GenerationOptions) -> Result<Message, ProviderError> {
            Err(ProviderError::Status {
                status: 503,
                body: "unavailable".into(),
            })
        }
    }

    async fn test_app(provider: Arc<dyn ChatProvider>) -> Router {
        let facts = Arc::new(
            ResumeFacts::from_json_str(
                r#"{
                    "personal_info": { "name": "Ada", "email": "ada@example.com" },
                    "projects": [{ "name": "Widget", "technologies": ["Go"] }],
                    "technical_skills": { "programming_languages": ["Go"] }
                }"#,
            )
            .unwrap(),
        );
        let history = Arc::new(SqliteHistoryStore::new_in_memory().await.unwrap());
        let config = Config::from_lookup(|_| None).unwrap();

        app(AppState {
            config: Arc::new(config),
            chat_exchange: Arc::new(ChatExchange::new(facts.clone(), history, provider)),
            content: Arc::new(JsonContentStore::new(facts)),
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_chat(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let app = test_app(Arc::new(EchoProvider)).await;

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "healthy" }));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "running");
    }

    #[tokio::test]
    async fn test_content_endpoints() {
        let app = test_app(Arc::new(EchoProvider)).await;

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "Ada");

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/projects").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await[0]["title"], "Widget");

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/skills").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await[0]["proficiency"], "Advanced");

        let response = app
            .oneshot(Request::builder().uri("/api/experiences").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_chat_allocates_and_reuses_sessions() {
        let app = test_app(Arc::new(EchoProvider)).await;

        let response = app
            .clone()
            .oneshot(post_chat(json!({ "message": "hi" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let first = body_json(response).await;
        assert_eq!(first["response"], "echo: hi");
        let session_id = first["session_id"].as_str().unwrap().to_string();
        assert!(!session_id.is_empty());

        let response = app
            .oneshot(post_chat(json!({ "message": "again", "session_id": session_id })))
            .await
            .unwrap();
        let second = body_json(response).await;
        assert_eq!(second["session_id"], session_id.as_str());
    }

    #[tokio::test]
    async fn test_chat_failure_is_still_ok() {
        let app = test_app(Arc::new(DownProvider)).await;

        let response = app
            .oneshot(post_chat(json!({ "message": "hi", "session_id": "S1" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["response"], UNREACHABLE_FALLBACK);
        assert_eq!(body["session_id"], "S1");
    }

    #[tokio::test]
    async fn test_cors_allows_frontend() {
        let app = test_app(Arc::new(EchoProvider)).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/chat")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }
}
