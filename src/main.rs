//! lazer-banner — fetches the Lazer broadcast banner and keeps it on screen.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌────────────┐ spawn  ┌──────────────┐ watch  ┌──────────┐  draw()  ┌──────────┐
//! │ refresh.rs │ ─────► │ banner/      │ ─────► │  app.rs  │ ───────► │  ui.rs   │
//! │  (task)    │        │ BannerFetcher│ (held) │ (state)  │          │ (render) │
//! └────────────┘        └──────────────┘        └──────────┘          └──────────┘
//!       ▲                                             ▲
//!       │ RefreshHandle::request()                    │ handle_key_event()
//!       └──────────────── main loop ────────── ┌──────────┐
//!                                              │ input.rs │
//!                                              └──────────┘
//! ```
//!
//! * **`banner/`** — the `Banner` type, the `HttpClient` seam and the
//!   `BannerFetcher` that validates responses and holds the current banner.
//! * **`platform`** — hybrid shell vs. browser, and the base URL each implies.
//! * **`refresh`** — triggers fetches on start, on a timer and on demand.
//! * **`app`** — display state (banner snapshot, dismissal, status line).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`cli`** — flags and `LAZER_*` environment variables.
//! * **`main`** — the composition root: builds the client and fetcher once,
//!   sets up logging and the terminal, and runs the event loop.

mod app;
mod banner;
mod cli;
mod input;
mod platform;
mod refresh;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::App;
use banner::{BannerFetcher, HttpClient, ReqwestClient};
use cli::Args;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install the tracing subscriber.
///
/// The TUI owns stdout and stderr while it runs, so without a log file
/// nothing is installed in TUI mode and log events are dropped.
fn init_logging(log_file: Option<&Path>, once: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lazer_banner=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if once => builder.with_writer(io::stderr).init(),
        None => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref(), args.once)?;

    // -- composition root: one client, one fetcher, shared ------------------
    let client: Arc<dyn HttpClient> =
        Arc::new(ReqwestClient::new(args.origin.clone(), args.timeout())?);
    let fetcher = Arc::new(BannerFetcher::new(client, args.platform.banner_base_url()));

    info!(
        platform = %args.platform,
        base_url = fetcher.base_url(),
        endpoint = fetcher.endpoint(),
        "starting lazer-banner v{}",
        env!("CARGO_PKG_VERSION")
    );
    if !args.platform.is_hybrid() && args.origin.is_none() {
        warn!("browser platform without --origin; relative banner requests cannot resolve");
    }

    if args.once {
        return print_once(&fetcher).await;
    }

    run_tui(fetcher, &args)
}

/// Fetch a single time and print the banner as JSON, or nothing when absent.
async fn print_once(fetcher: &BannerFetcher) -> Result<()> {
    fetcher.fetch_banner().await;
    if let Some(banner) = fetcher.banner() {
        println!("{}", serde_json::to_string_pretty(&banner)?);
    }
    Ok(())
}

fn run_tui(fetcher: Arc<BannerFetcher>, args: &Args) -> Result<()> {
    install_panic_hook();

    let mut banner_rx = fetcher.subscribe();
    let mut app = App::new(args.platform, fetcher.endpoint());
    let refresh = refresh::spawn(Arc::clone(&fetcher), args.refresh_interval());

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Pick up a new settlement from the fetcher, if any.
    //   2. Render the UI.
    //   3. Poll for keyboard input (up to tick_rate).
    //   4. Forward a pending refresh request.
    let tick_rate = Duration::from_millis(100);

    loop {
        if banner_rx.has_changed().unwrap_or(false) {
            let banner = banner_rx.borrow_and_update().clone();
            app.apply_banner(banner, Local::now());
        }

        guard.terminal.draw(|f| ui::draw(&app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.take_refresh_request() && !refresh.request() {
            app.status = "Refresh task stopped".into();
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
