//! Command Handlers module for processing bot commands

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use super::BotContext;
use crate::db::{get_or_create_user, NewUser};
use crate::errors::error_logging;
use crate::localization::{t_args_lang, t_lang, LocalizationManager};
use crate::telegram::{Message, SendOptions, User};

/// The parts of an update a command handler needs
#[derive(Debug, Clone, PartialEq)]
pub struct CommandInput {
    pub chat_id: i64,
    pub text: String,
    pub from: Option<User>,
}

impl CommandInput {
    /// Extract handler input from a message; `None` when it carries no text
    pub fn from_message(message: &Message) -> Option<Self> {
        let text = message.text.clone()?;
        Some(Self {
            chat_id: message.chat.id,
            text,
            from: message.from.clone(),
        })
    }

    pub fn language_code(&self) -> Option<&str> {
        self.from
            .as_ref()
            .and_then(|user| user.language_code.as_deref())
    }
}

/// Render the start template for the sender
pub fn start_message(localization: &LocalizationManager, from: Option<&User>) -> String {
    let language_code = from.and_then(|user| user.language_code.as_deref());
    match from {
        Some(user) => t_args_lang(
            localization,
            "start-message",
            &[("name", user.first_name.as_str())],
            language_code,
        ),
        None => t_lang(localization, "start-message-anonymous", language_code),
    }
}

/// Handle the /start command
///
/// Registers the sender when a database is configured, then replies with
/// the start template. A failed insert is logged and does not block the reply.
pub async fn handle_start_command(ctx: Arc<BotContext>, input: CommandInput) -> Result<()> {
    debug!(chat_id = %input.chat_id, "Handling /start command");

    if let (Some(pool), Some(sender)) = (ctx.pool.as_deref(), input.from.as_ref()) {
        if let Err(e) = get_or_create_user(pool, &NewUser::from(sender)).await {
            error_logging::log_database_error(&e, "register_user", Some(sender.id));
        }
    }

    let text = start_message(&ctx.localization, input.from.as_ref());
    let response = ctx
        .api
        .send_message(input.chat_id, &text, &SendOptions::new())
        .await?;

    if !response.status().is_success() {
        warn!(
            chat_id = %input.chat_id,
            status = %response.status(),
            "Start reply was not accepted by the platform"
        );
    }

    Ok(())
}
