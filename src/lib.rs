//! # Webhook Bot
//!
//! A Telegram bot served over a webhook: inbound updates are parsed,
//! matched against a small command table, and answered through the
//! HTTP Bot API. Senders and file references can be kept in PostgreSQL.

pub mod bot;
pub mod config;
pub mod db;
pub mod errors;
pub mod localization;
pub mod observability;
pub mod observability_config;
pub mod telegram;

// Re-export types for easier access
pub use bot::{BotContext, CommandDispatcher};
pub use config::AppConfig;
pub use errors::{AppError, AppResult};
pub use telegram::ApiClient;
