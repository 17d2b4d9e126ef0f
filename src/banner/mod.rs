//! The banner component.
//!
//! This module owns everything needed to obtain the broadcast banner: the
//! [`Banner`] value type, the [`HttpClient`] seam the request goes through,
//! and the [`BannerFetcher`] that validates the response and publishes the
//! result as held state.
//!
//! ## Wiring
//!
//! ```ignore
//! let client = Arc::new(ReqwestClient::new(origin, None)?);
//! let fetcher = BannerFetcher::new(client, platform.banner_base_url());
//!
//! fetcher.fetch_banner().await;      // never fails
//! if let Some(banner) = fetcher.banner() {
//!     println!("{}", banner.plain_text());
//! }
//! ```
//!
//! The fetcher is built once by the composition root (`main.rs`) and shared
//! behind an `Arc`.  The base URL is decided by the caller, usually from
//! [`Platform`](crate::platform::Platform), and never changes afterwards.

mod fetcher;
mod http;
mod model;

pub use fetcher::BannerFetcher;
pub use http::{HttpClient, ReqwestClient};
#[cfg(test)]
pub use http::{HttpResponse, TransportError};
pub use model::{Banner, BannerColor};
