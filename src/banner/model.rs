//! The banner value type shared by the fetcher and the display layer.
//!
//! A [`Banner`] is an immutable snapshot: the fetcher builds a fresh one on
//! every successful fetch and never mutates it afterwards.  Display code reads
//! it and decides how to render it, but the stored markup and colour tag stay
//! exactly as the server sent them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A broadcast banner: a markup fragment plus a colour tag.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    /// Markup fragment, exactly as received (wire field `content_html`).
    #[serde(rename = "content_html")]
    pub content: String,

    /// Presentation hint (wire field `color`).
    #[serde(rename = "color")]
    pub color_tag: BannerColor,
}

impl Banner {
    pub fn new(content: impl Into<String>, color_tag: impl Into<BannerColor>) -> Self {
        Self {
            content: content.into(),
            color_tag: color_tag.into(),
        }
    }

    /// Render the markup as plain terminal text.
    ///
    /// Tags are dropped, `<br>` and `</p>` become line breaks and the common
    /// HTML entities are decoded.  An unterminated `<` is kept literally.
    pub fn plain_text(&self) -> String {
        let mut out = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(start) = rest.find('<') {
            out.push_str(&rest[..start]);
            match rest[start..].find('>') {
                Some(len) => {
                    if is_line_break(&rest[start + 1..start + len]) {
                        out.push('\n');
                    }
                    rest = &rest[start + len + 1..];
                }
                None => {
                    rest = &rest[start..];
                    break;
                }
            }
        }
        out.push_str(rest);

        decode_entities(out.trim())
    }
}

fn is_line_break(tag: &str) -> bool {
    let closing = tag.starts_with('/');
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("");

    name.eq_ignore_ascii_case("br") || (closing && name.eq_ignore_ascii_case("p"))
}

fn decode_entities(text: &str) -> String {
    // `&amp;` last so that "&amp;lt;" decodes to "&lt;", not "<".
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

// ---------------------------------------------------------------------------
// Colour tag
// ---------------------------------------------------------------------------

/// The banner's colour tag.
///
/// The server uses a closed set of two tags, but the fetcher does not
/// validate: anything else arrives as [`BannerColor::Other`] with the raw
/// string preserved.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BannerColor {
    Pink,
    Green,
    Other(String),
}

impl BannerColor {
    /// The tag exactly as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            BannerColor::Pink => "pink",
            BannerColor::Green => "green",
            BannerColor::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BannerColor::Other(_))
    }
}

impl From<&str> for BannerColor {
    fn from(raw: &str) -> Self {
        match raw {
            "pink" => BannerColor::Pink,
            "green" => BannerColor::Green,
            other => BannerColor::Other(other.to_string()),
        }
    }
}

impl From<String> for BannerColor {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pink" => BannerColor::Pink,
            "green" => BannerColor::Green,
            _ => BannerColor::Other(raw),
        }
    }
}

impl From<BannerColor> for String {
    fn from(color: BannerColor) -> Self {
        match color {
            BannerColor::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BannerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
