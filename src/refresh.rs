//! Background banner refreshing.
//!
//! Runs as a tokio task that triggers [`BannerFetcher::fetch_banner`]:
//!
//! * once immediately, as the banner component does when it first appears;
//! * on every tick of the optional refresh interval;
//! * whenever the UI asks for it through [`RefreshHandle::request`].
//!
//! Every trigger spawns its own fetch.  Nothing is coalesced, so a manual
//! refresh that lands while a timed one is still in flight produces two
//! requests, and whichever settles last decides the held state.  Results are
//! not sent from here: the UI watches the fetcher's held state directly.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::banner::BannerFetcher;

/// Asks the refresh task for an extra fetch.
///
/// The task stops when every handle is dropped.
#[derive(Clone)]
pub struct RefreshHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl RefreshHandle {
    /// Request a fetch now.  Returns `false` if the task has already stopped.
    pub fn request(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

/// Spawn the refresh task.  Must be called from within a tokio runtime.
pub fn spawn(fetcher: Arc<BannerFetcher>, interval: Option<Duration>) -> RefreshHandle {
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        spawn_fetch(&fetcher, "start");

        let mut ticker = interval.map(|period| {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        loop {
            tokio::select! {
                request = rx.recv() => match request {
                    Some(()) => spawn_fetch(&fetcher, "manual"),
                    // Every handle is gone; the UI has exited.
                    None => return,
                },
                _ = next_tick(&mut ticker) => spawn_fetch(&fetcher, "interval"),
            }
        }
    });

    RefreshHandle { tx }
}

fn spawn_fetch(fetcher: &Arc<BannerFetcher>, trigger: &'static str) {
    debug!(trigger, "refreshing banner");
    let fetcher = Arc::clone(fetcher);
    tokio::spawn(async move { fetcher.fetch_banner().await });
}

/// Wait for the next tick, or forever when no interval is configured.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::{BannerColor, HttpClient, HttpResponse, TransportError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::watch;

    /// Answers every request with the same pink banner and counts the calls.
    #[derive(Default)]
    struct CountingClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HttpClient for CountingClient {
        async fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse::new(
                200,
                r#"{"content_html":"Ride with us","color":"pink"}"#,
            ))
        }
    }

    async fn next_settlement(rx: &mut watch::Receiver<Option<crate::banner::Banner>>) {
        time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("settlement timed out")
            .unwrap();
    }

    #[tokio::test]
    async fn fetches_once_on_start() {
        let client = Arc::new(CountingClient::default());
        let fetcher = Arc::new(BannerFetcher::new(client.clone(), ""));
        let mut rx = fetcher.subscribe();

        let _handle = spawn(Arc::clone(&fetcher), None);
        next_settlement(&mut rx).await;

        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            rx.borrow().as_ref().map(|b| b.color_tag.clone()),
            Some(BannerColor::Pink)
        );
    }

    #[tokio::test]
    async fn manual_request_triggers_another_fetch() {
        let client = Arc::new(CountingClient::default());
        let fetcher = Arc::new(BannerFetcher::new(client.clone(), ""));
        let mut rx = fetcher.subscribe();

        let handle = spawn(Arc::clone(&fetcher), None);
        next_settlement(&mut rx).await;

        assert!(handle.request());
        next_settlement(&mut rx).await;

        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn interval_keeps_fetching() {
        let client = Arc::new(CountingClient::default());
        let fetcher = Arc::new(BannerFetcher::new(client.clone(), ""));
        let mut rx = fetcher.subscribe();

        let _handle = spawn(Arc::clone(&fetcher), Some(Duration::from_millis(20)));
        for _ in 0..3 {
            next_settlement(&mut rx).await;
        }

        assert!(client.calls.load(Ordering::SeqCst) >= 3);
    }
}
