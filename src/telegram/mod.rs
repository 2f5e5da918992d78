//! Telegram Bot API plumbing
//!
//! - `types`: inbound update payloads and shared value types
//! - `client`: outbound calls (send message, media, edits, inline answers)
//! - `keyboard`: inline keyboard row chunking
//! - `inline_results`: inline query result objects

pub mod client;
pub mod inline_results;
pub mod keyboard;
pub mod types;

pub use client::{build_request_body, ApiClient, MediaKind, Payload, SendOptions};
pub use inline_results::{build_inline_result, InlineQueryResult, MediaType};
pub use keyboard::{Keyboard, KeyboardButton, DEFAULT_ROW_LIMIT};
pub use types::{Chat, Message, ParseMode, Update, User};
