mod imports;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use dropforge_import::PipelineOptions;
use dropforge_supplier::RateLimitGovernor;

use crate::middleware::request_id;

/// Shared server state. The governor is process-wide so every batch — and
/// every future endpoint that talks to a supplier — observes the same
/// cooldowns.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub governor: RateLimitGovernor,
    pub options: PipelineOptions,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthBody {
    status: &'static str,
    database: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/catalog/imports", post(imports::create_import))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match dropforge_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthBody {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthBody {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}
