//! Bot module for handling inbound webhook updates
//!
//! This module is split into several submodules:
//! - `webhook`: HTTP endpoint receiving updates from the platform
//! - `dispatcher`: maps update text to a command handler
//! - `command_handlers`: one handler per supported command

pub mod command_handlers;
pub mod dispatcher;
pub mod webhook;

use std::sync::Arc;

use sqlx::postgres::PgPool;

use crate::localization::LocalizationManager;
use crate::telegram::ApiClient;

/// Shared dependencies handed to every command handler
#[derive(Debug, Clone)]
pub struct BotContext {
    pub api: ApiClient,
    pub localization: Arc<LocalizationManager>,
    /// Persistence is optional; handlers skip database work without it
    pub pool: Option<Arc<PgPool>>,
}

impl BotContext {
    pub fn new(
        api: ApiClient,
        localization: Arc<LocalizationManager>,
        pool: Option<Arc<PgPool>>,
    ) -> Self {
        Self {
            api,
            localization,
            pool,
        }
    }
}

pub use command_handlers::{handle_start_command, start_message, CommandInput};
pub use dispatcher::{CommandDispatcher, CommandHandler, HandlerFuture};
pub use webhook::{router, serve, WebhookState};
