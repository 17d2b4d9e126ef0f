//! Fetch, validate and publish the current banner.
//!
//! [`BannerFetcher::fetch_banner`] never fails.  Every problem, from a dead
//! network to a half-filled payload, collapses into the same outcome: the held
//! state becomes `None`.  Callers learn the result by reading the held state,
//! either as a snapshot ([`BannerFetcher::banner`]) or by watching it
//! ([`BannerFetcher::subscribe`]).
//!
//! Overlapping calls are not coalesced.  Each one issues its own request and
//! writes the held state when it settles, so the call that settles last wins
//! regardless of which one was issued first.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::http::{HttpClient, TransportError};
use super::model::Banner;

/// Path of the banner endpoint, relative to the base URL.
pub const BANNER_PATH: &str = "/lazer/api/banner/";

/// Why a fetch produced no banner.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("payload lacks a non-empty `content_html` or `color`")]
    Incomplete,
}

impl FetchFailure {
    /// Whether this failure is worth a diagnostic log line.
    ///
    /// Error statuses and incomplete payloads are ordinary "no banner right
    /// now" answers and stay silent.
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, FetchFailure::Transport(_) | FetchFailure::Malformed(_))
    }
}

/// Owns the held `Option<Banner>` and the means to refresh it.
pub struct BannerFetcher {
    client: Arc<dyn HttpClient>,
    base_url: String,
    endpoint: String,
    held: watch::Sender<Option<Banner>>,
}

impl BannerFetcher {
    /// Create a fetcher that starts out with no banner.
    ///
    /// `base_url` is fixed for the fetcher's lifetime.  An empty base makes
    /// the endpoint a relative path.
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let endpoint = format!("{base_url}{BANNER_PATH}");
        let (held, _) = watch::channel(None);

        Self {
            client,
            base_url,
            endpoint,
            held,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The full URL every fetch requests.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Snapshot of the held state.
    pub fn banner(&self) -> Option<Banner> {
        self.held.borrow().clone()
    }

    /// Observe the held state.  The receiver is notified on every settlement,
    /// even when the new value equals the old one.
    pub fn subscribe(&self) -> watch::Receiver<Option<Banner>> {
        self.held.subscribe()
    }

    /// Request the banner once and replace the held state with the outcome.
    pub async fn fetch_banner(&self) {
        let banner = match self.try_fetch().await {
            Ok(banner) => {
                debug!(color = %banner.color_tag, "banner fetched");
                Some(banner)
            }
            Err(failure) => {
                if failure.is_diagnostic() {
                    warn!(endpoint = %self.endpoint, error = %failure, "failed to fetch banner");
                }
                None
            }
        };

        self.held.send_replace(banner);
    }

    async fn try_fetch(&self) -> Result<Banner, FetchFailure> {
        let response = self.client.get(&self.endpoint).await?;
        if !response.is_success() {
            return Err(FetchFailure::Status(response.status));
        }
        parse_banner(&response.body)
    }
}

/// Validate a response body and build the banner it describes.
///
/// Both `content_html` and `color` must be non-empty strings.  Their values
/// are copied verbatim; the colour is not checked against the known tags.
pub fn parse_banner(body: &[u8]) -> Result<Banner, FetchFailure> {
    let payload: Value = serde_json::from_slice(body)?;

    let field = |name: &str| {
        payload
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    match (field("content_html"), field("color")) {
        (Some(content), Some(color)) => Ok(Banner::new(content, color)),
        _ => Err(FetchFailure::Incomplete),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
