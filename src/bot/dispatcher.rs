//! Command dispatch
//!
//! A command matches when its literal occurs anywhere in the message text,
//! so `"hello /start world"` runs `/start`. Entries are tried in
//! registration order and at most one handler runs per update.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, Instrument};

use super::command_handlers::{handle_start_command, CommandInput};
use super::BotContext;
use crate::observability;
use crate::telegram::Update;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// Entry point of one command
pub type CommandHandler = fn(Arc<BotContext>, CommandInput) -> HandlerFuture;

fn start(ctx: Arc<BotContext>, input: CommandInput) -> HandlerFuture {
    Box::pin(handle_start_command(ctx, input))
}

/// Table of command literal to handler
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    commands: Vec<(&'static str, CommandHandler)>,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new().with_command("/start", start)
    }
}

impl CommandDispatcher {
    /// An empty table; see [`Default`] for the wired commands
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command; earlier registrations win on overlapping text
    pub fn with_command(mut self, command: &'static str, handler: CommandHandler) -> Self {
        self.commands.push((command, handler));
        self
    }

    pub fn commands(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|(command, _)| *command)
    }

    /// First registered command contained in `text`
    pub fn find(&self, text: &str) -> Option<(&'static str, CommandHandler)> {
        self.commands
            .iter()
            .find(|(command, _)| text.contains(command))
            .copied()
    }

    /// Run the handler matching the update's text
    ///
    /// Returns the matched command, or `None` when the update carried no
    /// text or no command matched. Neither case is an error.
    pub async fn dispatch(
        &self,
        ctx: &Arc<BotContext>,
        update: &Update,
    ) -> Result<Option<&'static str>> {
        let Some(input) = update.message.as_ref().and_then(CommandInput::from_message) else {
            debug!("Update carries no message text, nothing to dispatch");
            return Ok(None);
        };

        let Some((command, handler)) = self.find(&input.text) else {
            debug!(chat_id = %input.chat_id, "No command matched");
            return Ok(None);
        };

        observability::record_command_metrics(command);
        let span = observability::telegram_span(command, Some(input.chat_id));
        handler(Arc::clone(ctx), input).instrument(span).await?;

        Ok(Some(command))
    }
}
