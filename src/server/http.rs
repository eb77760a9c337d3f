//! Axum router and handlers for the analysis API.
//!
//! | Method | Path                | Response                 |
//! |--------|---------------------|--------------------------|
//! | POST   | `/api/ai/classify`  | `ClassificationResult`   |
//! | POST   | `/api/ai/sentiment` | `SentimentResult`        |
//! | POST   | `/api/ai/summarize` | `SummaryResult`          |
//! | POST   | `/api/ai/intent`    | `IntentResult`           |
//! | GET    | `/api/ai/routes`    | task → model table       |
//! | GET    | `/health`           | `OK`                     |

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::config::ServerConfig;
use super::error::ApiError;
use crate::dispatcher::Dispatcher;
use crate::routing::ModelRoutes;
use crate::types::{
    Analysis, ClassificationResult, IntentResult, SentimentResult, SummaryResult, TextRequest,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    dispatcher: Dispatcher,
    routes: ModelRoutes,
}

impl AppState {
    /// `routes` is only reported by `GET /api/ai/routes`; it should match
    /// the table the dispatcher's backend uses.
    pub fn new(dispatcher: Dispatcher, routes: ModelRoutes) -> Self {
        Self { dispatcher, routes }
    }
}

/// Routes without middleware.
///
/// axum's default 2 MB body cap is lifted: request text of any length is
/// forwarded to the backend.
pub fn api_router(state: AppState) -> Router {
    let analysis = Router::new()
        .route("/classify", post(analyze::<ClassificationResult>))
        .route("/sentiment", post(analyze::<SentimentResult>))
        .route("/summarize", post(analyze::<SummaryResult>))
        .route("/intent", post(analyze::<IntentResult>))
        .route("/routes", get(model_routes));

    Router::new()
        .nest("/api/ai", analysis)
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Routes with CORS, request tracing and the concurrency limit applied.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = api_router(state).layer(GlobalConcurrencyLimitLayer::new(
        config.limits.max_concurrent_requests.max(1),
    ));

    if config.cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.layer(TraceLayer::new_for_http())
}

/// Shared body of the four analysis endpoints.
///
/// The body is validated before dispatch, so a rejected request never
/// reaches the backend.
async fn analyze<R>(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<R>, ApiError>
where
    R: Analysis + Serialize,
{
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let request = TextRequest::parse(content_type, &body)?;
    let result = state.dispatcher.dispatch::<R>(request.text()).await?;
    Ok(Json(result))
}

async fn model_routes(State(state): State<AppState>) -> Json<BTreeMap<String, String>> {
    Json(state.routes.routes())
}

async fn health_check() -> &'static str {
    "OK"
}
