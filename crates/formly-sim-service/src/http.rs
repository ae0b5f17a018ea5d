use std::any::Any;
use std::convert::Infallible;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use formly_metrics::{RequestOutcome, SimulationMetrics};
use formly_sim_core::{SimulationError, SimulationRequest, SimulationService};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use tracing::{error, info, warn};

pub type HttpBody = Full<Bytes>;

pub const RUN_PATH: &str = "/run";
pub const METRICS_PATH: &str = "/metrics";
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SimulationService>,
    pub metrics: Option<Arc<SimulationMetrics>>,
}

impl AppState {
    pub fn new(service: SimulationService, metrics: Option<SimulationMetrics>) -> Self {
        Self {
            service: Arc::new(service),
            metrics: metrics.map(Arc::new),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    detail: String,
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<HttpBody> {
    let (status, body) = match serde_json::to_vec(value) {
        Ok(body) => (status, Bytes::from(body)),
        Err(e) => {
            error!(error = %e, "failed to encode response body");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Bytes::from_static(b"{\"detail\":\"failed to encode response\"}"),
            )
        }
    };

    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn detail_response(status: StatusCode, detail: impl Into<String>) -> Response<HttpBody> {
    json_response(
        status,
        &ErrorDetail {
            detail: detail.into(),
        },
    )
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "simulation panicked".to_string()
    }
}

fn run_simulation(state: &AppState, body: &[u8]) -> Response<HttpBody> {
    let request: SimulationRequest = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            return detail_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("invalid request body: {e}"),
            )
        }
    };

    // Anything the scoring strategy throws is reported as a 500, never a dropped connection.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| state.service.run(&request)))
        .unwrap_or_else(|payload| Err(SimulationError::Internal(panic_message(payload))));

    match outcome {
        Ok(response) => {
            if let Some(metrics) = &state.metrics {
                metrics.observe_response(&response);
            }
            json_response(StatusCode::OK, &response)
        }
        Err(e) => {
            let status = StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            detail_response(status, e.to_string())
        }
    }
}

fn render_metrics(metrics: &SimulationMetrics) -> Response<HttpBody> {
    match metrics.render() {
        Ok(text) => {
            let mut response = Response::new(Full::new(Bytes::from(text)));
            response.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            );
            response
        }
        Err(e) => detail_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Dispatches a fully read request. `/metrics` only exists when metrics are enabled.
pub fn route(state: &AppState, method: &Method, path: &str, body: &[u8]) -> Response<HttpBody> {
    match (method, path) {
        (&Method::POST, RUN_PATH) => run_simulation(state, body),
        (_, RUN_PATH) => {
            let mut response = detail_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static("POST"));
            response
        }
        (&Method::GET, METRICS_PATH) => match &state.metrics {
            Some(metrics) => render_metrics(metrics),
            None => detail_response(StatusCode::NOT_FOUND, "Not Found"),
        },
        _ => detail_response(StatusCode::NOT_FOUND, "Not Found"),
    }
}

pub async fn handle_request<B>(
    state: AppState,
    req: Request<B>,
) -> Result<Response<HttpBody>, Infallible>
where
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let path = parts.uri.path();

    let response = match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => route(&state, &parts.method, path, &collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => detail_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("request body exceeds {MAX_BODY_BYTES} bytes"),
        ),
        Err(e) => detail_response(
            StatusCode::BAD_REQUEST,
            format!("could not read request body: {e}"),
        ),
    };

    let status = response.status();
    if let Some(metrics) = &state.metrics {
        metrics.record_outcome(RequestOutcome::from_status(status.as_u16()));
    }

    let elapsed_us = started.elapsed().as_micros() as u64;
    if status.is_server_error() {
        error!(method = %parts.method, path, status = status.as_u16(), elapsed_us, "request failed");
    } else if status.is_client_error() {
        warn!(method = %parts.method, path, status = status.as_u16(), elapsed_us, "request rejected");
    } else {
        info!(method = %parts.method, path, status = status.as_u16(), elapsed_us, "request served");
    }

    Ok(response)
}
