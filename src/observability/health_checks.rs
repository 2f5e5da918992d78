//! Health check functionality module.
//!
//! This module provides:
//! - Database connectivity checks
//! - Bot token validation checks
//! - Comprehensive readiness checks

use std::time::Instant;

use anyhow::Result;
use sqlx::PgPool;

use super::metrics::record_health_check_metrics;

/// Perform comprehensive readiness checks
pub async fn perform_readiness_checks(
    db_pool: Option<&PgPool>,
    bot_token: Option<&str>,
) -> Result<()> {
    if let Some(pool) = db_pool {
        let check_start = Instant::now();
        let result = check_database_health(pool).await;
        record_health_check_metrics("database", result.is_ok(), check_start.elapsed());
        result?;
    }

    if let Some(token) = bot_token {
        let check_start = Instant::now();
        let result = check_bot_token_health(token);
        record_health_check_metrics("telegram_bot", result.is_ok(), check_start.elapsed());
        result?;
    }

    Ok(())
}

/// Check database connectivity and basic query capability
pub async fn check_database_health(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Database health check failed: {}", e))?;

    tracing::debug!("Database health check passed");
    Ok(())
}

/// Check the bot token has the `id:secret` shape
///
/// No API call is made; this only guards against a misconfigured token.
pub fn check_bot_token_health(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(anyhow::anyhow!("Bot token is empty"));
    }

    match token.split_once(':') {
        Some((id, secret)) if id.parse::<u64>().is_ok() && !secret.is_empty() => {
            tracing::debug!("Bot token health check passed");
            Ok(())
        }
        _ => Err(anyhow::anyhow!("Bot token format is invalid")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_token_health() {
        assert!(check_bot_token_health("123456:abcdef").is_ok());
        assert!(check_bot_token_health("").is_err());
        assert!(check_bot_token_health("no-colon").is_err());
        assert!(check_bot_token_health("abc:def").is_err());
        assert!(check_bot_token_health("123:").is_err());
    }

    #[tokio::test]
    async fn test_readiness_without_database() {
        assert!(perform_readiness_checks(None, Some("123456:abcdef"))
            .await
            .is_ok());
        assert!(perform_readiness_checks(None, Some("bad")).await.is_err());
        assert!(perform_readiness_checks(None, None).await.is_ok());
    }
}
