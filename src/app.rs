use chrono::{DateTime, Local};

use crate::banner::Banner;
use crate::platform::Platform;

/// Everything the UI shows, updated from the fetcher's held state and from
/// key presses.
pub struct App {
    /// Last banner observed from the fetcher; `None` when absent.
    pub banner: Option<Banner>,
    /// The user hid the current banner.
    pub dismissed: bool,
    /// Whether the details pane is expanded.
    pub show_details: bool,
    /// When the most recent fetch settled.
    pub last_settled: Option<DateTime<Local>>,
    /// Number of settlements observed so far.
    pub settlements: u64,
    pub platform: Platform,
    /// URL the fetcher requests.
    pub endpoint: String,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Set by the `r` key, drained by the main loop.
    refresh_requested: bool,
    /// Last status message.
    pub status: String,
}

impl App {
    pub fn new(platform: Platform, endpoint: impl Into<String>) -> Self {
        Self {
            banner: None,
            dismissed: false,
            show_details: true,
            last_settled: None,
            settlements: 0,
            platform,
            endpoint: endpoint.into(),
            quit: false,
            refresh_requested: false,
            status: "Fetching banner…".into(),
        }
    }

    /// Take in a settlement from the fetcher.
    ///
    /// A banner that differs from the one on screen clears the dismissal;
    /// the same banner arriving again stays hidden.
    pub fn apply_banner(&mut self, banner: Option<Banner>, settled_at: DateTime<Local>) {
        if banner != self.banner {
            self.dismissed = false;
        }

        let time = settled_at.format("%H:%M:%S");
        self.status = match &banner {
            Some(_) => format!("Banner updated at {time}"),
            None => format!("No banner at {time}"),
        };

        self.banner = banner;
        self.last_settled = Some(settled_at);
        self.settlements += 1;
    }

    /// The banner to draw, if any.
    pub fn visible_banner(&self) -> Option<&Banner> {
        self.banner.as_ref().filter(|_| !self.dismissed)
    }

    // -- actions -------------------------------------------------------------

    pub fn dismiss(&mut self) {
        if self.visible_banner().is_some() {
            self.dismissed = true;
            self.status = "Banner dismissed".into();
        }
    }

    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
        self.status = "Refreshing…".into();
    }

    /// Returns whether a refresh was requested since the last call.
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    pub fn toggle_details(&mut self) {
        self.show_details = !self.show_details;
    }
}
