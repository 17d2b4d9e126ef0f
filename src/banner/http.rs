//! The HTTP seam the fetcher talks through.
//!
//! [`BannerFetcher`](super::BannerFetcher) never touches `reqwest` directly:
//! it is handed an [`HttpClient`] at construction.  The production
//! implementation is [`ReqwestClient`]; tests substitute a scripted double.
//!
//! ## Relative URLs
//!
//! In browser mode the fetcher requests a path with no origin
//! (`/lazer/api/banner/`), just as a page would when calling `fetch` with a
//! relative URL.  [`ReqwestClient`] plays the browser's part and resolves such
//! paths against its configured serving origin.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;

/// A completed HTTP exchange: status code plus the raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can perform a GET and hand back the status and body.
///
/// Implementations must be shareable across tasks: overlapping fetches call
/// `get` concurrently on the same client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Failures below the HTTP status level.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A relative URL was requested but no serving origin is configured.
    #[error("no origin configured to resolve relative url `{0}`")]
    NoOrigin(String),

    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// reqwest implementation
// ---------------------------------------------------------------------------

/// [`HttpClient`] backed by an async [`reqwest::Client`].
pub struct ReqwestClient {
    client: Client,
    origin: Option<Url>,
}

impl ReqwestClient {
    /// Build a client with the crate's user agent.
    ///
    /// `timeout` of `None` leaves reqwest's own default in place.
    pub fn new(origin: Option<Url>, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::from_client(builder.build()?, origin))
    }

    /// Wrap an already-configured reqwest client.
    pub fn from_client(client: Client, origin: Option<Url>) -> Self {
        Self { client, origin }
    }

    #[cfg(test)]
    pub fn origin(&self) -> Option<&Url> {
        self.origin.as_ref()
    }

    /// Turn a request URL into an absolute one.
    ///
    /// Absolute URLs pass through; anything else is joined onto the origin.
    pub fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        if let Ok(absolute) = Url::parse(url) {
            return Ok(absolute);
        }

        let origin = self
            .origin
            .as_ref()
            .ok_or_else(|| TransportError::NoOrigin(url.to_string()))?;

        origin.join(url).map_err(|e| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let url = self.resolve(url)?;
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
