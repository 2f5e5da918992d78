//! # Unified Application Configuration
//!
//! This module provides a centralized configuration system that consolidates
//! all application settings into a single, structured configuration object.
//! Settings are read once at process start from environment variables,
//! validated, and then injected into the API client and webhook server.

use crate::errors::{AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Default platform base URL for outbound Bot API calls
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Bot-specific configuration settings
#[derive(Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Telegram bot token
    pub token: String,
    /// Platform base URL, without the `/bot<token>` suffix
    pub api_base_url: String,
    /// HTTP client timeout in seconds
    pub http_timeout_secs: u64,
}

// Debug output never includes the token
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout_secs: 30,
        }
    }
}

impl BotConfig {
    /// Validate bot configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.token.trim().is_empty() {
            return Err(AppError::Config("Bot token cannot be empty".to_string()));
        }

        let parts: Vec<&str> = self.token.split(':').collect();
        if parts.len() != 2 {
            return Err(AppError::Config(
                "Bot token format is invalid. Expected format: 'bot_id:bot_token'".to_string(),
            ));
        }

        if parts[0].parse::<u64>().is_err() {
            return Err(AppError::Config(
                "Bot token bot ID must be numeric".to_string(),
            ));
        }

        if parts[1].len() < 20 {
            return Err(AppError::Config(
                "Bot token appears to be too short. Please verify it's a valid token".to_string(),
            ));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(AppError::Config(format!(
                "API base URL must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }

        if self.http_timeout_secs == 0 {
            return Err(AppError::Config("HTTP timeout cannot be 0".to_string()));
        }

        if self.http_timeout_secs > 300 {
            return Err(AppError::Config(
                "HTTP timeout cannot be greater than 300 seconds".to_string(),
            ));
        }

        Ok(())
    }

    /// Full endpoint URL for a Bot API method: `<base>/bot<token>/<method>`
    pub fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.token,
            method
        )
    }
}

/// Database configuration settings
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; persistence is disabled when unset
    pub url: Option<String>,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    pub fn validate(&self) -> AppResult<()> {
        if let Some(url) = &self.url {
            if url.trim().is_empty() {
                return Err(AppError::Config("Database URL cannot be empty".to_string()));
            }

            if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                return Err(AppError::Config(
                    "Database URL must start with 'postgresql://' or 'postgres://'".to_string(),
                ));
            }
        }

        if self.max_connections == 0 {
            return Err(AppError::Config("Max connections cannot be 0".to_string()));
        }

        if self.max_connections > 100 {
            return Err(AppError::Config(
                "Max connections cannot be greater than 100".to_string(),
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(AppError::Config(
                "Min connections cannot be greater than max connections".to_string(),
            ));
        }

        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 300 {
            return Err(AppError::Config(
                "Connect timeout must be between 1 and 300 seconds".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether a database is configured
    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }
}

/// Webhook server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Webhook listener port
    pub port: u16,
    /// Whether to allow privileged ports (< 1024)
    pub allow_privileged_ports: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8443,
            allow_privileged_ports: false,
        }
    }
}

impl ServerConfig {
    /// Validate server configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.host.parse::<std::net::IpAddr>().is_err() {
            return Err(AppError::Config(format!(
                "Webhook host '{}' is not a valid IP address",
                self.host
            )));
        }

        if self.port == 0 {
            return Err(AppError::Config("Webhook port cannot be 0".to_string()));
        }

        if !self.allow_privileged_ports && self.port < 1024 {
            return Err(AppError::Config(format!(
                "Webhook port {} is privileged. Set allow_privileged_ports=true or use port >= 1024",
                self.port
            )));
        }

        Ok(())
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Bot configuration
    pub bot: BotConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Server configuration
    pub server: ServerConfig,
    /// Observability configuration
    pub observability: ObservabilityConfig,
}

fn parse_env<T: std::str::FromStr>(key: &str, default: &str) -> AppResult<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a valid number", key)))
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        // Load bot configuration
        config.bot.token = env::var("TELEGRAM_BOT_TOKEN").map_err(|_| {
            AppError::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;
        config.bot.api_base_url =
            env::var("TELEGRAM_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        config.bot.http_timeout_secs = parse_env("HTTP_CLIENT_TIMEOUT_SECS", "30")?;

        // Load database configuration
        config.database.url = env::var("DATABASE_URL").ok();
        config.database.max_connections = parse_env("DATABASE_MAX_CONNECTIONS", "10")?;
        config.database.min_connections = parse_env("DATABASE_MIN_CONNECTIONS", "1")?;
        config.database.connect_timeout_secs = parse_env("DATABASE_CONNECT_TIMEOUT_SECS", "30")?;

        // Load server configuration
        config.server.host = env::var("WEBHOOK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        config.server.port = env::var("WEBHOOK_PORT")
            .unwrap_or_else(|_| "8443".to_string())
            .parse()
            .map_err(|_| AppError::Config("WEBHOOK_PORT must be a valid port number".to_string()))?;
        config.server.allow_privileged_ports = env::var("ALLOW_PRIVILEGED_PORTS")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.bot.validate()?;
        self.database.validate()?;
        self.server.validate()?;
        self.observability.validate().map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: bot_token=[REDACTED], api_base_url={}, db_url={}, bind={}, environment={}, metrics_enabled={}",
            self.bot.api_base_url,
            if self.database.is_enabled() { "[REDACTED]" } else { "none" },
            self.server.bind_address(),
            self.observability.environment,
            self.observability.enable_metrics_export
        )
    }
}
