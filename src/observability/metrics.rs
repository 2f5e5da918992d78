//! Metrics collection and Prometheus export module.
//!
//! Recording functions are safe to call before a recorder is installed;
//! the `metrics` facade drops samples until then.

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::observability_config::ObservabilityConfig;

/// Install the Prometheus recorder when metrics export is enabled
pub fn init_metrics_with_config(config: &ObservabilityConfig) -> Result<Option<PrometheusHandle>> {
    if !config.enable_metrics_export {
        tracing::info!("Metrics export disabled");
        return Ok(None);
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Metrics collection initialized");
    Ok(Some(handle))
}

/// Record one inbound update by kind
pub fn record_update_metrics(update_kind: &str) {
    let update_kind = update_kind.to_string();
    metrics::counter!("telegram_updates_total", "type" => update_kind).increment(1);
}

/// Record a matched command
pub fn record_command_metrics(command: &str) {
    let command = command.to_string();
    metrics::counter!("telegram_commands_total", "command" => command).increment(1);
}

/// Record an outbound Bot API call
pub fn record_api_request_metrics(method: &str, status: u16, duration: std::time::Duration) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!("telegram_api_requests_total", "method" => method.clone(), "status" => status)
        .increment(1);
    metrics::histogram!("telegram_api_request_duration_seconds", "method" => method)
        .record(duration.as_secs_f64());
}

/// Record an inbound webhook HTTP request
pub fn record_webhook_request_metrics(method: &str, status: u16, duration: std::time::Duration) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!("webhook_requests_total", "method" => method, "status" => status).increment(1);
    metrics::histogram!("webhook_request_duration_seconds").record(duration.as_secs_f64());
}

/// Record database operation metrics
pub fn record_db_metrics(operation: &str, duration: std::time::Duration) {
    let operation = operation.to_string();
    metrics::counter!("db_operations_total", "operation" => operation).increment(1);
    metrics::histogram!("db_operation_duration_seconds").record(duration.as_secs_f64());
}

/// Record health check metrics
pub fn record_health_check_metrics(check_type: &str, success: bool, duration: std::time::Duration) {
    let check_type = check_type.to_string();
    metrics::counter!("health_checks_total", "type" => check_type.clone(), "result" => if success { "success" } else { "failure" }.to_string()).increment(1);
    metrics::histogram!("health_check_duration_seconds", "type" => check_type.clone())
        .record(duration.as_secs_f64());

    metrics::gauge!("health_check_status", "type" => check_type).set(if success {
        1.0
    } else {
        0.0
    });
}

/// Record error rate metrics
pub fn record_error_metrics(error_type: &str, component: &str) {
    let error_type = error_type.to_string();
    let component = component.to_string();
    metrics::counter!("errors_total", "type" => error_type, "component" => component).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_recording_without_recorder_does_not_panic() {
        record_update_metrics("text");
        record_command_metrics("/start");
        record_api_request_metrics("sendMessage", 200, Duration::from_millis(12));
        record_webhook_request_metrics("POST", 200, Duration::from_millis(3));
        record_db_metrics("insert", Duration::from_millis(5));
        record_health_check_metrics("database", false, Duration::from_millis(1));
        record_error_metrics("network", "api_client");
    }

    #[test]
    fn test_disabled_export_installs_nothing() {
        let config = ObservabilityConfig {
            enable_metrics_export: false,
            ..Default::default()
        };
        assert!(init_metrics_with_config(&config).unwrap().is_none());
    }
}
