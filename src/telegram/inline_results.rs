//! Inline query result construction
//!
//! One result object per supported media type, each carrying a freshly
//! generated random identifier and exactly one type-specific URL field.

use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::types::ParseMode;
use crate::errors::{AppError, AppResult};

/// Media types accepted for inline query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Photo,
    Gif,
    Mpeg4Gif,
    Video,
    Audio,
    Voice,
    Document,
}

impl MediaType {
    pub const ALL: [MediaType; 7] = [
        MediaType::Photo,
        MediaType::Gif,
        MediaType::Mpeg4Gif,
        MediaType::Video,
        MediaType::Audio,
        MediaType::Voice,
        MediaType::Document,
    ];

    /// Wire value of the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Photo => "photo",
            MediaType::Gif => "gif",
            MediaType::Mpeg4Gif => "mpeg4_gif",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Voice => "voice",
            MediaType::Document => "document",
        }
    }

    /// Name of the field holding the resource URL
    pub fn url_field(&self) -> &'static str {
        match self {
            MediaType::Photo => "photo_url",
            MediaType::Gif => "gif_url",
            MediaType::Mpeg4Gif => "mpeg4_url",
            MediaType::Video => "video_url",
            MediaType::Audio => "audio_url",
            MediaType::Voice => "voice_url",
            MediaType::Document => "document_url",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unsupported inline result type: '{s}'")))
    }
}

/// A rich media suggestion returned for an inline query
#[derive(Debug, Clone, PartialEq)]
pub struct InlineQueryResult {
    media_type: MediaType,
    id: String,
    url: String,
    title: String,
    caption: Option<String>,
    parse_mode: Option<ParseMode>,
}

impl InlineQueryResult {
    pub fn new(
        media_type: MediaType,
        url: impl Into<String>,
        title: impl Into<String>,
        caption: Option<String>,
        parse_mode: Option<ParseMode>,
    ) -> Self {
        Self {
            media_type,
            id: generate_result_id(),
            url: url.into(),
            title: title.into(),
            caption,
            parse_mode,
        }
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }
}

impl Serialize for InlineQueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 4 + usize::from(self.caption.is_some()) + usize::from(self.parse_mode.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", self.media_type.as_str())?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("title", &self.title)?;
        map.serialize_entry(self.media_type.url_field(), &self.url)?;
        if let Some(caption) = &self.caption {
            map.serialize_entry("caption", caption)?;
        }
        if let Some(parse_mode) = &self.parse_mode {
            map.serialize_entry("parse_mode", parse_mode)?;
        }
        map.end()
    }
}

/// Random 64-bit identifier rendered as a decimal string
fn generate_result_id() -> String {
    rand::random::<u64>().to_string()
}

/// Build an inline result from an untrusted media type tag
///
/// # Errors
///
/// Returns [`AppError::Validation`] when `media_type` is not one of the
/// supported types.
pub fn build_inline_result(
    media_type: &str,
    url: &str,
    title: &str,
    caption: Option<&str>,
    parse_mode: Option<ParseMode>,
) -> AppResult<InlineQueryResult> {
    let media_type: MediaType = media_type.parse()?;
    Ok(InlineQueryResult::new(
        media_type,
        url,
        title,
        caption.map(str::to_string),
        parse_mode,
    ))
}
