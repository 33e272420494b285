use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::allocator::{AllocateOptions, Strategy, allocate_input};
use crate::data::{ScheduleInput, ScheduleResult};
use crate::error::{SchedulerError, SchedulerResult};
use crate::report::{Summary, build_summary};

/// Body of `POST /v1/schedule/allocate`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocateRequest {
    #[serde(flatten)]
    pub input: ScheduleInput,
    #[serde(default)]
    pub strategy: Option<Strategy>,
    #[serde(default)]
    pub year: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocateResponse {
    pub result: ScheduleResult,
    pub summary: Summary,
}

#[derive(Debug, Clone, Copy)]
struct AppState {
    default_strategy: Strategy,
}

type ApiError = (StatusCode, String);

fn api_error(err: SchedulerError) -> ApiError {
    if err.is_client_error() {
        (StatusCode::BAD_REQUEST, err.to_string())
    } else {
        error!("Allocation failed: {}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

/// Bodies that parse as JSON but do not fit the records (a negative capacity,
/// a missing field) are bad requests, not unprocessable entities.
fn body_error(rejection: JsonRejection) -> ApiError {
    let status = match rejection {
        JsonRejection::JsonDataError(_) => StatusCode::BAD_REQUEST,
        ref other => other.status(),
    };
    (status, rejection.body_text())
}

async fn allocate_handler(
    State(state): State<AppState>,
    body: Result<Json<AllocateRequest>, JsonRejection>,
) -> Result<Json<AllocateResponse>, ApiError> {
    let Json(request) = body.map_err(body_error)?;
    let options = AllocateOptions {
        strategy: request.strategy.unwrap_or(state.default_strategy),
        year_filter: request.year,
    };
    // each request is an independent computation; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || allocate_input(&request.input, options))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(api_error)?;
    let summary = build_summary(&result);
    Ok(Json(AllocateResponse { result, summary }))
}

async fn summary_handler(
    body: Result<Json<ScheduleResult>, JsonRejection>,
) -> Result<Json<Summary>, ApiError> {
    let Json(result) = body.map_err(body_error)?;
    Ok(Json(build_summary(&result)))
}

async fn health_handler() -> &'static str {
    "ok"
}

pub fn router(default_strategy: Strategy) -> Router {
    Router::new()
        .route("/v1/schedule/allocate", post(allocate_handler))
        .route("/v1/schedule/summary", post(summary_handler))
        .route("/v1/health", get(health_handler))
        .with_state(AppState { default_strategy })
}

pub async fn run_server(bind_addr: &str, default_strategy: Strategy) -> SchedulerResult<()> {
    let app = router(default_strategy);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| SchedulerError::io_error(format!("bind {}", bind_addr), e.to_string()))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| SchedulerError::io_error("local_addr", e.to_string()))?;
    info!("Server running at http://{} (default strategy: {})", local_addr, default_strategy);

    axum::serve(listener, app)
        .await
        .map_err(|e| SchedulerError::io_error("serve", e.to_string()))
}
