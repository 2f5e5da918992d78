//! Observability module for centralized metrics, tracing, and logging setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - Metrics collection and Prometheus export
//! - Health checks backing the liveness/readiness endpoints

pub mod health_checks;
pub mod metrics;
pub mod tracing_mod;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::observability_config::ObservabilityConfig;

pub use self::health_checks::{check_bot_token_health, check_database_health, perform_readiness_checks};
pub use self::metrics::{
    record_api_request_metrics, record_command_metrics, record_db_metrics, record_error_metrics,
    record_health_check_metrics, record_update_metrics, record_webhook_request_metrics,
};
pub use self::tracing_mod::{db_span, init_tracing_with_config, telegram_span, webhook_span};

/// Initialize the observability stack
///
/// Returns the Prometheus handle when metrics export is enabled so the
/// webhook server can render `/metrics`.
pub fn init_observability(config: &ObservabilityConfig) -> Result<Option<PrometheusHandle>> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    init_tracing_with_config(config)?;
    let handle = self::metrics::init_metrics_with_config(config)?;

    tracing::info!(
        environment = %config.environment,
        metrics_enabled = %handle.is_some(),
        "Observability stack initialized successfully"
    );
    Ok(handle)
}
