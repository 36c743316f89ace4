use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::types::*;
use crate::{mcp, models, search, AppState};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/search", post(search_handler))
        .route("/models/validate", post(validate_model_handler))
        .route("/mcp/tools", get(mcp::list_tools))
        .route("/mcp/call", post(mcp::call_tool))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "iqra-search",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    match search::perform_search(&state, &request.query).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Search error: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

async fn validate_model_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValidateModelRequest>,
) -> Result<Json<ValidateModelResponse>, (StatusCode, Json<ErrorResponse>)> {
    match models::validate_model(state.env.as_ref(), &request.model) {
        Ok(model) => {
            info!("Model {} is available", model);
            Ok(Json(ValidateModelResponse { valid: true }))
        }
        Err(e) => {
            warn!("Model {} rejected: {}", request.model, e);
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
