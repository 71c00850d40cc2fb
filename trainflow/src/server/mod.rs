//! The HTTP surface of the coordinator.
//!
//! Request order on the webhook path: authenticate the signature over the
//! raw body, validate and route the payload, admit the job, spawn the run.
//! Only signature verification, validation, and the atomic admission check
//! happen on the request path; the pipeline itself runs in the background.

use crate::core::JobRequest;
use crate::errors::{CoordinatorError, ValidationError};
use crate::executor::BackgroundExecutor;
use crate::pipeline::PipelineRegistry;
use crate::webhook::{signature, validate};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state behind every handler.
///
/// The registry and secret are immutable for the process lifetime; the
/// executor's admission registry is the only mutable part.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<PipelineRegistry>,
    executor: BackgroundExecutor,
    secret: Arc<Vec<u8>>,
}

impl AppState {
    /// Creates the server state.
    #[must_use]
    pub fn new(
        registry: Arc<PipelineRegistry>,
        executor: BackgroundExecutor,
        secret: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            registry,
            executor,
            secret: Arc::new(secret.into()),
        }
    }
}

/// Errors mapped to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Signature missing or mismatched.
    #[error("computed signature does not match signature provided in the headers")]
    Unauthorized,

    /// The payload failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A run already holds this job name.
    #[error("job `{0}` is already running")]
    Duplicate(String),
}

impl From<CoordinatorError> for AppError {
    fn from(err: CoordinatorError) -> Self {
        match err {
            CoordinatorError::Authentication => Self::Unauthorized,
            CoordinatorError::Validation(err) => Self::Validation(err),
            CoordinatorError::DuplicateJob { job_name } => Self::Duplicate(job_name),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Duplicate(_) => StatusCode::CONFLICT,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Builds the coordinator router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/job_count", get(job_count))
        .route("/models", get(models))
        .route("/model_run", post(model_run))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn authenticate(headers: &HeaderMap, body: &[u8], secret: &[u8]) -> Result<(), AppError> {
    let provided = headers
        .get(signature::SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    if signature::verify(body, provided, secret) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

async fn ping() -> &'static str {
    "pong"
}

async fn job_count(State(state): State<AppState>) -> Json<usize> {
    Json(state.executor.admission().count())
}

/// Lists registered pipeline kinds. Gated because it leaks deployment shape;
/// the signature is computed over an empty message.
async fn models(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    authenticate(&headers, &[], &state.secret)?;

    let listing: serde_json::Map<String, serde_json::Value> = state
        .registry
        .kind_names()
        .into_iter()
        .map(|name| (name, json!({})))
        .collect();
    Ok(Json(serde_json::Value::Object(listing)))
}

async fn model_run(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    // The signature covers the raw body bytes; nothing is parsed before
    // this check passes.
    authenticate(&headers, &body, &state.secret)?;

    let request: JobRequest = validate(&body, &state.registry)?;
    info!(
        job_name = request.job_name(),
        kind = %request.kind(),
        model_run_id = request.model_run_id(),
        "training job request received"
    );

    let pipeline = state
        .registry
        .get(request.kind())
        .ok_or_else(|| ValidationError::UnknownPipeline {
            given: request.kind().to_string(),
            expected: state.registry.kind_names(),
        })?;

    let ack = json!({
        "job_name": request.job_name(),
        "model_run_id": request.model_run_id(),
        "status": "scheduled",
    });
    state.executor.schedule(request, pipeline)?;

    Ok(Json(ack))
}
