//! Command-line and environment configuration.
//!
//! Every option can also be set through a `LAZER_*` environment variable,
//! which is how the packaged shell passes its platform to the client.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::platform::Platform;

/// Fetch the Lazer broadcast banner and keep it on screen.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Environment the client runs in; decides where the banner is fetched from.
    #[arg(long, value_enum, env = "LAZER_PLATFORM", default_value_t = Platform::Browser)]
    pub platform: Platform,

    /// Serving origin that relative requests resolve against (browser mode).
    #[arg(long, env = "LAZER_ORIGIN", value_name = "URL")]
    pub origin: Option<Url>,

    /// Re-fetch the banner every N seconds instead of only once on start.
    #[arg(
        long,
        env = "LAZER_REFRESH_SECS",
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub refresh_secs: Option<u64>,

    /// Give up on a request after N seconds.
    #[arg(
        long,
        env = "LAZER_TIMEOUT_SECS",
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: Option<u64>,

    /// Append log output to this file.
    #[arg(long, env = "LAZER_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Fetch once, print the banner as JSON and exit.
    #[arg(long)]
    pub once: bool,
}

impl Args {
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_secs.map(Duration::from_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("lazer-banner").chain(args.iter().copied()))
    }

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.platform, Platform::Browser);
        assert!(args.origin.is_none());
        assert!(args.refresh_interval().is_none());
        assert!(args.timeout().is_none());
        assert!(args.log_file.is_none());
        assert!(!args.once);
    }

    #[test]
    fn parses_all_options() {
        let args = parse(&[
            "--platform",
            "hybrid",
            "--origin",
            "http://localhost:8000",
            "--refresh-secs",
            "30",
            "--timeout-secs",
            "5",
            "--log-file",
            "/tmp/banner.log",
            "--once",
        ])
        .unwrap();

        assert_eq!(args.platform, Platform::Hybrid);
        assert_eq!(
            args.origin.as_ref().map(Url::as_str),
            Some("http://localhost:8000/")
        );
        assert_eq!(args.refresh_interval(), Some(Duration::from_secs(30)));
        assert_eq!(args.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/banner.log")));
        assert!(args.once);
    }

    #[test]
    fn rejects_unknown_platform() {
        assert!(parse(&["--platform", "desktop"]).is_err());
    }

    #[test]
    fn rejects_zero_intervals() {
        assert!(parse(&["--refresh-secs", "0"]).is_err());
        assert!(parse(&["--timeout-secs", "0"]).is_err());
    }

    #[test]
    fn rejects_malformed_origin() {
        assert!(parse(&["--origin", "not a url"]).is_err());
    }
}
