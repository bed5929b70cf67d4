use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::{CreatorError, CreatorResult};
use crate::gateway::{DeploymentStatus, Gateway};

type AppState = Arc<Gateway>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatApiRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatApiResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploying: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Any failure in a handler becomes a 500 carrying the error text.
pub struct ApiError(CreatorError);

impl From<CreatorError> for ApiError {
    fn from(e: CreatorError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

pub struct ApiServer {
    gateway: Arc<Gateway>,
}

impl ApiServer {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn start(&self, host: &str, port: u16) -> CreatorResult<()> {
        let app = self.create_router();
        let addr = format!("{}:{}", host, port);

        info!("🚀 Creator Agent server running on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn create_router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/chat", post(chat_handler))
            .route("/deployment/status", get(status_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(Arc::clone(&self.gateway))
    }
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn chat_handler(
    State(gateway): State<AppState>,
    Json(request): Json<ChatApiRequest>,
) -> Result<Json<ChatApiResponse>, ApiError> {
    match gateway.handle_message(&request.message).await {
        Ok(reply) => Ok(Json(ChatApiResponse {
            response: reply.reply,
            deploying: reply.deploying.then_some(true),
        })),
        Err(e) => {
            error!("Error: {}", e);
            Err(e.into())
        }
    }
}

async fn status_handler(State(gateway): State<AppState>) -> Result<Json<DeploymentStatus>, ApiError> {
    match gateway.poll_status().await {
        Ok(status) => Ok(Json(status)),
        Err(e) => {
            error!("Error checking deployment status: {}", e);
            Err(e.into())
        }
    }
}
