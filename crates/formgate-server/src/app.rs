use crate::config::ServerConfig;
use crate::delivery::dispatch;
use crate::form_body::{collect_fields, decode_pairs, is_form_content_type, FormBodyError};
use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use formgate_core::{ContactSchema, LogNotifier, Notifier, Submission, SubmissionValidator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Immutable per-process state shared by all requests.
pub struct AppState {
    pub validator: SubmissionValidator,
    pub notifier: Arc<dyn Notifier>,
    pub delivery_timeout: Duration,
}

impl AppState {
    pub fn new(
        validator: SubmissionValidator,
        notifier: Arc<dyn Notifier>,
        delivery_timeout: Duration,
    ) -> Self {
        Self {
            validator,
            notifier,
            delivery_timeout,
        }
    }

    /// Validator from the configured schema (or the embedded one) with the
    /// log notifier.
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let schema = match &config.schema {
            Some(path) => ContactSchema::from_file(path)
                .with_context(|| format!("failed to load contact schema {}", path.display()))?,
            None => ContactSchema::default_contact().context("embedded contact schema")?,
        };
        let validator = SubmissionValidator::new(schema, config.honeypot.clone());
        Ok(Self::new(
            validator,
            Arc::new(LogNotifier),
            config.delivery_timeout(),
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    pub form: Submission,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub form: Submission,
    pub reason_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body that could not be read as a form at all; no verdict was reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(&config.route, get(load_form).post(submit_form))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(state)
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn load_form(State(state): State<Arc<AppState>>) -> Json<FormResponse> {
    Json(FormResponse {
        form: state.validator.prepare_initial_form(),
    })
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !is_form_content_type(content_type) {
        return body_error(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            FormBodyError::UnsupportedContentType,
        );
    }
    let pairs = match decode_pairs(&body) {
        Ok(pairs) => pairs,
        Err(e) => {
            tracing::info!(error = %e, "contact submission body refused");
            return body_error(StatusCode::BAD_REQUEST, e);
        }
    };
    let raw = collect_fields(pairs, state.validator.trap_field());

    let verdict = state.validator.process_submission(&raw);
    tracing::info!(
        status = %verdict.status,
        reason_code = %verdict.reason_code,
        "contact submission processed"
    );

    if verdict.is_accepted() {
        // Failure is already logged; the verdict stands.
        let _ = dispatch(
            state.notifier.as_ref(),
            &verdict.submission,
            state.delivery_timeout,
        )
        .await;
    }

    let status = StatusCode::from_u16(verdict.http_status).unwrap_or(StatusCode::BAD_REQUEST);
    (
        status,
        Json(SubmitResponse {
            form: verdict.submission,
            reason_code: verdict.reason_code,
            message: verdict.message,
        }),
    )
        .into_response()
}

fn body_error(status: StatusCode, error: FormBodyError) -> Response {
    (
        status,
        Json(BodyErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}
