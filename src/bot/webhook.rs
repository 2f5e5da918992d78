//! Webhook endpoint
//!
//! Serves `/{token}`: `POST` delivers one update, `GET` is a health probe.
//! The same router exposes `/health/live`, `/health/ready` and `/metrics`.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tracing::{info, warn, Instrument};

use super::dispatcher::CommandDispatcher;
use super::BotContext;
use crate::errors::error_logging;
use crate::observability;
use crate::telegram::Update;

/// State shared by all webhook routes
#[derive(Clone)]
pub struct WebhookState {
    ctx: Arc<BotContext>,
    dispatcher: Arc<CommandDispatcher>,
    metrics: Option<PrometheusHandle>,
}

impl WebhookState {
    pub fn new(ctx: Arc<BotContext>, dispatcher: CommandDispatcher) -> Self {
        Self {
            ctx,
            dispatcher: Arc::new(dispatcher),
            metrics: None,
        }
    }

    /// Serve `/metrics` from this Prometheus handle
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    fn token_matches(&self, token: &str) -> bool {
        self.ctx.api.config().token == token
    }
}

/// Build the webhook router
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/health/live", get(live_handler))
        .route("/health/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .route("/{token}", get(webhook_probe).post(receive_update))
        .with_state(state)
}

/// Serve the router on `listener` until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    state: WebhookState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(address = %addr, "Webhook server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Webhook server stopped");
    Ok(())
}

async fn webhook_probe(State(state): State<WebhookState>, Path(token): Path<String>) -> StatusCode {
    if state.token_matches(&token) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn receive_update(
    State(state): State<WebhookState>,
    Path(token): Path<String>,
    body: Bytes,
) -> StatusCode {
    let start = Instant::now();
    let status = handle_update(&state, &token, &body).await;
    observability::record_webhook_request_metrics("POST", status.as_u16(), start.elapsed());
    status
}

async fn handle_update(state: &WebhookState, token: &str, body: &[u8]) -> StatusCode {
    if !state.token_matches(token) {
        // The path segment is not echoed back; it may be a mistyped token
        warn!("Webhook call on unknown path");
        return StatusCode::NOT_FOUND;
    }

    let update: Update = match serde_json::from_slice(body) {
        Ok(update) => update,
        Err(e) => {
            error_logging::log_validation_error(
                &e,
                "parse_update",
                "webhook_body",
                std::str::from_utf8(body).ok(),
            );
            observability::record_error_metrics("malformed_update", "webhook");
            return StatusCode::BAD_REQUEST;
        }
    };

    observability::record_update_metrics(update.kind());
    let span = observability::webhook_span(update.update_id);

    // The platform redelivers on non-2xx, so dispatch failures are only logged
    if let Err(e) = state
        .dispatcher
        .dispatch(&state.ctx, &update)
        .instrument(span)
        .await
    {
        observability::record_error_metrics("dispatch", "webhook");
        tracing::error!(error = %e, update_id = ?update.update_id, "Failed to handle update");
    }

    StatusCode::OK
}

async fn live_handler() -> &'static str {
    "OK"
}

async fn ready_handler(State(state): State<WebhookState>) -> Response {
    let token = state.ctx.api.config().token.as_str();
    match observability::perform_readiness_checks(state.ctx.pool.as_deref(), Some(token)).await {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "NOT READY").into_response()
        }
    }
}

async fn metrics_handler(State(state): State<WebhookState>) -> Response {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
