//! Execution environment, as reported by the platform detector.
//!
//! The packaged mobile shell and a plain browser tab reach the banner API
//! differently: the shell has no serving origin of its own and must call the
//! public site, while a browser calls back to whichever origin served the
//! page.  [`Platform::banner_base_url`] turns that distinction into the base
//! URL handed to [`BannerFetcher`](crate::banner::BannerFetcher).

use std::fmt;

use clap::ValueEnum;

/// Absolute origin used from inside the hybrid shell.
pub const HYBRID_ORIGIN: &str = "https://bikeaction.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Platform {
    /// Packaged native/hybrid shell.
    Hybrid,
    /// Plain browser tab, served from the app's own origin.
    #[default]
    Browser,
}

impl Platform {
    pub fn is_hybrid(self) -> bool {
        self == Platform::Hybrid
    }

    /// Base URL for banner requests: the public origin inside the hybrid
    /// shell, empty (relative to the serving origin) otherwise.
    pub fn banner_base_url(self) -> &'static str {
        match self {
            Platform::Hybrid => HYBRID_ORIGIN,
            Platform::Browser => "",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Hybrid => "hybrid",
            Platform::Browser => "browser",
        })
    }
}
