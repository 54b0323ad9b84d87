//! The batch import endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use dropforge_import::{run_import, ImportError, ImportRequest};

use crate::api::AppState;
use crate::middleware::RequestId;

/// Body for a 400 validation rejection: just the message, no batch fields.
#[derive(Debug, Serialize)]
struct ValidationErrorBody {
    error: String,
}

/// Body for a rate-limit rejection or an internal failure. Successful batches
/// return the [`BatchSummary`](dropforge_import::BatchSummary) directly, item
/// failures included.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate_limit_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate_limit_message: Option<String>,
}

pub(super) async fn create_import(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<ImportRequest>,
) -> Response {
    match run_import(&state.pool, &state.governor, &state.options, &request).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(ImportError::Validation(message)) => (
            StatusCode::BAD_REQUEST,
            Json(ValidationErrorBody { error: message }),
        )
            .into_response(),
        Err(ImportError::RateLimited { wait_secs }) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ImportErrorBody {
                success: false,
                error: "Rate limit in effect".to_owned(),
                details: None,
                rate_limit_seconds: Some(wait_secs),
                rate_limit_message: Some(format!(
                    "Supplier API rate limit in effect. Try again in {wait_secs} seconds."
                )),
            }),
        )
            .into_response(),
        Err(ImportError::Db(e)) => {
            tracing::error!(request_id = %req_id.0, error = %e, "import failed on database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ImportErrorBody {
                    success: false,
                    error: "Failed to import products".to_owned(),
                    details: Some(e.to_string()),
                    rate_limit_seconds: None,
                    rate_limit_message: None,
                }),
            )
                .into_response()
        }
    }
}
