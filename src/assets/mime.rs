//! Content type tags and their MIME strings.
//!
//! Tags are the file extensions the host knows how to serve. A tag outside this
//! table is rejected at registration time so the emitter never meets one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A servable content category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContentType {
    #[default]
    Html,
    Gif,
    Css,
    Mjs,
    Js,
    Json,
    Jpg,
    Png,
    Svg,
    Ttf,
    Woff2,
    Avif,
    Mp4,
    Webm,
    JsMap,
    MjsMap,
}

impl ContentType {
    /// Resolve a tag such as `"html"` or `"js.map"`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let ty = match tag {
            "html" => Self::Html,
            "gif" => Self::Gif,
            "css" => Self::Css,
            "mjs" => Self::Mjs,
            "js" => Self::Js,
            "json" => Self::Json,
            "jpg" => Self::Jpg,
            "png" => Self::Png,
            "svg" => Self::Svg,
            "ttf" => Self::Ttf,
            "woff2" => Self::Woff2,
            "avif" => Self::Avif,
            "mp4" => Self::Mp4,
            "webm" => Self::Webm,
            "js.map" => Self::JsMap,
            "mjs.map" => Self::MjsMap,
            _ => return None,
        };
        Some(ty)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Gif => "gif",
            Self::Css => "css",
            Self::Mjs => "mjs",
            Self::Js => "js",
            Self::Json => "json",
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Ttf => "ttf",
            Self::Woff2 => "woff2",
            Self::Avif => "avif",
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::JsMap => "js.map",
            Self::MjsMap => "mjs.map",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::Gif => "image/gif",
            Self::Css => "text/css",
            Self::Mjs | Self::Js => "text/javascript",
            Self::Json | Self::JsMap | Self::MjsMap => "application/json",
            Self::Jpg => "image/jpeg",
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
            Self::Ttf => "font/ttf",
            Self::Woff2 => "font/woff2",
            Self::Avif => "image/avif",
            Self::Mp4 => "video/mp4",
            Self::Webm => "video/webm",
        }
    }

    /// Value for the `content-type` header of a page reply.
    pub fn header_value(&self) -> String {
        format!("{}; charset=utf-8", self.mime())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Returned when a tag has no MIME mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown content type tag {0:?}")]
pub struct UnknownTag(pub String);

impl FromStr for ContentType {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| UnknownTag(s.to_string()))
    }
}

impl TryFrom<String> for ContentType {
    type Error = UnknownTag;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        value.tag().to_string()
    }
}
