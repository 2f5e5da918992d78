//! Outbound Bot API client
//!
//! Every platform action goes through [`ApiClient::send`], which builds a
//! JSON body from a [`Payload`] and shared [`SendOptions`] and performs one
//! HTTP POST. The raw response is handed back to the caller untouched.

use std::time::{Duration, Instant};

use serde_json::{json, Map, Value};
use tracing::{debug, Instrument};

use super::inline_results::InlineQueryResult;
use super::keyboard::Keyboard;
use super::types::ParseMode;
use crate::config::BotConfig;
use crate::errors::{error_logging, AppResult};
use crate::observability;

/// Media kinds that share the send-a-file call shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Animation,
    Voice,
    VideoNote,
    Document,
}

impl MediaKind {
    /// Bot API method name
    pub fn method(&self) -> &'static str {
        match self {
            MediaKind::Photo => "sendPhoto",
            MediaKind::Video => "sendVideo",
            MediaKind::Animation => "sendAnimation",
            MediaKind::Voice => "sendVoice",
            MediaKind::VideoNote => "sendVideoNote",
            MediaKind::Document => "sendDocument",
        }
    }

    /// Body field carrying the file reference
    pub fn file_field(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Animation => "animation",
            MediaKind::Voice => "voice",
            MediaKind::VideoNote => "video_note",
            MediaKind::Document => "document",
        }
    }
}

/// Kind-specific required fields of an outbound call
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Message {
        text: String,
    },
    EditMessageText {
        message_id: i64,
        text: String,
    },
    Media {
        kind: MediaKind,
        file_id: String,
        caption: Option<String>,
    },
}

impl Payload {
    pub fn method(&self) -> &'static str {
        match self {
            Payload::Message { .. } => "sendMessage",
            Payload::EditMessageText { .. } => "editMessageText",
            Payload::Media { kind, .. } => kind.method(),
        }
    }

    fn write_fields(&self, body: &mut Map<String, Value>) {
        match self {
            Payload::Message { text } => {
                body.insert("text".to_string(), json!(text));
            }
            Payload::EditMessageText { message_id, text } => {
                body.insert("message_id".to_string(), json!(message_id));
                body.insert("text".to_string(), json!(text));
            }
            Payload::Media {
                kind,
                file_id,
                caption,
            } => {
                body.insert(kind.file_field().to_string(), json!(file_id));
                if let Some(caption) = caption {
                    body.insert("caption".to_string(), json!(caption));
                }
            }
        }
    }
}

/// Optional fields shared by every send operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendOptions {
    pub parse_mode: Option<ParseMode>,
    pub keyboard: Option<Keyboard>,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = Some(parse_mode);
        self
    }

    pub fn keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Build the JSON body for one outbound call
///
/// Unset optional fields are left out of the body entirely.
pub fn build_request_body(chat_id: i64, payload: &Payload, options: &SendOptions) -> Value {
    let mut body = Map::new();
    body.insert("chat_id".to_string(), json!(chat_id));
    payload.write_fields(&mut body);

    if let Some(parse_mode) = options.parse_mode {
        body.insert("parse_mode".to_string(), json!(parse_mode));
    }

    if let Some(keyboard) = &options.keyboard {
        body.insert("reply_markup".to_string(), json!(keyboard));
    }

    Value::Object(body)
}

/// Stateless client for the platform's HTTP Bot API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: BotConfig,
}

impl ApiClient {
    /// Create a client with the configured request timeout
    pub fn new(config: BotConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Perform one platform call
    ///
    /// Non-success statuses are returned as-is; only transport failures
    /// become errors.
    pub async fn send(
        &self,
        chat_id: i64,
        payload: &Payload,
        options: &SendOptions,
    ) -> AppResult<reqwest::Response> {
        let body = build_request_body(chat_id, payload, options);
        self.post(payload.method(), &body)
            .instrument(observability::telegram_span(payload.method(), Some(chat_id)))
            .await
    }

    /// Send a text message
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: &SendOptions,
    ) -> AppResult<reqwest::Response> {
        let payload = Payload::Message {
            text: text.to_string(),
        };
        self.send(chat_id, &payload, options).await
    }

    /// Replace the text of a previously sent message
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        options: &SendOptions,
    ) -> AppResult<reqwest::Response> {
        let payload = Payload::EditMessageText {
            message_id,
            text: text.to_string(),
        };
        self.send(chat_id, &payload, options).await
    }

    /// Send a file of the given kind by file id or URL
    pub async fn send_media(
        &self,
        chat_id: i64,
        kind: MediaKind,
        file_id: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> AppResult<reqwest::Response> {
        let payload = Payload::Media {
            kind,
            file_id: file_id.to_string(),
            caption: caption.map(str::to_string),
        };
        self.send(chat_id, &payload, options).await
    }

    pub async fn send_photo(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> AppResult<reqwest::Response> {
        self.send_media(chat_id, MediaKind::Photo, file_id, caption, options)
            .await
    }

    pub async fn send_video(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> AppResult<reqwest::Response> {
        self.send_media(chat_id, MediaKind::Video, file_id, caption, options)
            .await
    }

    /// Send a GIF or soundless video
    pub async fn send_animation(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> AppResult<reqwest::Response> {
        self.send_media(chat_id, MediaKind::Animation, file_id, caption, options)
            .await
    }

    pub async fn send_voice(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> AppResult<reqwest::Response> {
        self.send_media(chat_id, MediaKind::Voice, file_id, caption, options)
            .await
    }

    pub async fn send_video_note(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> AppResult<reqwest::Response> {
        self.send_media(chat_id, MediaKind::VideoNote, file_id, caption, options)
            .await
    }

    pub async fn send_document(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> AppResult<reqwest::Response> {
        self.send_media(chat_id, MediaKind::Document, file_id, caption, options)
            .await
    }

    /// Answer an inline query with prepared results
    pub async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: &[InlineQueryResult],
    ) -> AppResult<reqwest::Response> {
        let body = json!({
            "inline_query_id": inline_query_id,
            "results": results,
        });
        self.post("answerInlineQuery", &body)
            .instrument(observability::telegram_span("answerInlineQuery", None))
            .await
    }

    async fn post(&self, method: &str, body: &Value) -> AppResult<reqwest::Response> {
        let url = self.config.method_url(method);
        debug!(method = %method, "Posting Bot API request");

        let start = Instant::now();
        let result = self.http.post(&url).json(body).send().await;
        let duration = start.elapsed();

        match result {
            Ok(response) => {
                let status = response.status();
                observability::record_api_request_metrics(method, status.as_u16(), duration);
                if !status.is_success() {
                    tracing::warn!(method = %method, status = %status, "Bot API returned non-success status");
                }
                Ok(response)
            }
            Err(e) => {
                observability::record_error_metrics("network", "api_client");
                // reqwest errors embed the request URL, which carries the token
                let e = e.without_url();
                error_logging::log_network_error(&e, "bot_api_request", Some(method));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::keyboard::KeyboardButton;

    fn keys(value: &Value) -> Vec<&str> {
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn test_message_body_without_options() {
        let payload = Payload::Message {
            text: "hi".to_string(),
        };
        let body = build_request_body(5, &payload, &SendOptions::new());
        assert_eq!(body, json!({"chat_id": 5, "text": "hi"}));
    }

    #[test]
    fn test_edit_body_fields() {
        let payload = Payload::EditMessageText {
            message_id: 99,
            text: "edited".to_string(),
        };
        let body = build_request_body(5, &payload, &SendOptions::new());
        assert_eq!(keys(&body), vec!["chat_id", "message_id", "text"]);
        assert_eq!(payload.method(), "editMessageText");
    }

    #[test]
    fn test_media_bodies_omit_unset_optionals() {
        let kinds = [
            (MediaKind::Photo, "photo", "sendPhoto"),
            (MediaKind::Video, "video", "sendVideo"),
            (MediaKind::Animation, "animation", "sendAnimation"),
            (MediaKind::Voice, "voice", "sendVoice"),
            (MediaKind::VideoNote, "video_note", "sendVideoNote"),
            (MediaKind::Document, "document", "sendDocument"),
        ];

        for (kind, field, method) in kinds {
            let payload = Payload::Media {
                kind,
                file_id: "FILE".to_string(),
                caption: None,
            };
            let body = build_request_body(1, &payload, &SendOptions::new());
            let mut expected = vec!["chat_id", field];
            expected.sort_unstable();
            assert_eq!(keys(&body), expected);
            assert_eq!(body[field], "FILE");
            assert_eq!(payload.method(), method);
        }
    }

    #[test]
    fn test_all_optionals_present() {
        let keyboard = Keyboard::new(vec![KeyboardButton::new("Yes", "yes")], 2).unwrap();
        let payload = Payload::Media {
            kind: MediaKind::Animation,
            file_id: "GIF".to_string(),
            caption: Some("*bold*".to_string()),
        };
        let options = SendOptions::new()
            .parse_mode(ParseMode::MarkdownV2)
            .keyboard(keyboard);

        let body = build_request_body(1, &payload, &options);
        assert_eq!(body["caption"], "*bold*");
        assert_eq!(body["parse_mode"], "MarkdownV2");
        assert_eq!(
            body["reply_markup"],
            json!({"inline_keyboard": [[{"text": "Yes", "callback_data": "yes"}]]})
        );
    }

    #[test]
    fn test_no_null_values_in_body() {
        let payload = Payload::Media {
            kind: MediaKind::Document,
            file_id: "DOC".to_string(),
            caption: None,
        };
        let body = build_request_body(1, &payload, &SendOptions::new());
        assert!(body.as_object().unwrap().values().all(|v| !v.is_null()));
    }
}
