//! HTTP Server
//!
//! Axum application wiring: shared state, router construction, and the serve
//! loop. Handlers live in [`routes`].

mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::ai::{ClientHandle, WatsonSttClient};
use crate::config::Config;
use crate::types::Result;

/// Shared application state, cheap to clone into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub clients: Arc<ClientHandle>,
    /// Present only when speech-to-text credentials are configured; the voice
    /// route reports a configuration error otherwise.
    pub stt: Option<Arc<WatsonSttClient>>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let stt = if config.stt.is_configured() {
            Some(Arc::new(WatsonSttClient::new(&config.stt)?))
        } else {
            None
        };

        Ok(Self {
            clients: Arc::new(ClientHandle::new(config.provider.clone())),
            config: Arc::new(config),
            stt,
        })
    }
}

/// Build the application router with CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(routes::root))
        .route("/api/v1/health", get(routes::health))
        .route("/api/v1/docs_content", get(routes::docs_content))
        .route("/api/v1/comment", post(routes::comment))
        .route("/api/v1/comment-line", post(routes::comment_line))
        .route("/api/v1/document", post(routes::document))
        .route("/api/v1/debug", post(routes::debug))
        .route("/api/v1/run", post(routes::run))
        .route("/api/v1/voice-comment", post(routes::voice_comment))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
