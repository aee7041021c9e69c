//! Background page fetching.
//!
//! The UI thread never waits on the network.  [`Fetcher::dispatch`] hands a
//! [`FetchRequest`] to a worker on a small tokio runtime; the worker calls the
//! [`FeedSource`] (which may block) and sends the [`FetchOutcome`] back over an
//! [`mpsc`] channel that the main loop drains every tick.
//!
//! Requests are not cancelled.  The presenter ignores outcomes it no longer
//! waits for, and dropping the fetcher lets any remaining workers finish in the
//! background without blocking shutdown.

use std::sync::mpsc;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::debug;

use crate::feed::{FetchOutcome, FetchRequest};
use crate::source::FeedSource;

/// Worker threads available for in-flight requests.  The presenter keeps at
/// most one refresh and one page fetch alive, plus superseded stragglers.
const MAX_WORKERS: usize = 4;

pub struct Fetcher {
    runtime: Option<Runtime>,
    source: Arc<dyn FeedSource>,
    tx: mpsc::Sender<FetchOutcome>,
}

impl Fetcher {
    /// Start the worker runtime.  Returns the fetcher and the receiver the
    /// main loop should drain.
    pub fn spawn(source: Arc<dyn FeedSource>) -> std::io::Result<(Self, mpsc::Receiver<FetchOutcome>)> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(MAX_WORKERS)
            .thread_name("feed-fetch")
            .build()?;
        let (tx, rx) = mpsc::channel();
        Ok((
            Self {
                runtime: Some(runtime),
                source,
                tx,
            },
            rx,
        ))
    }

    /// Run `request` in the background.
    pub fn dispatch(&self, request: FetchRequest) {
        let Some(runtime) = &self.runtime else {
            return;
        };
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        runtime.spawn_blocking(move || {
            debug!(seq = request.seq, kind = ?request.kind, source = source.name(), "fetch started");
            let result = source.fetch_page(request.query.as_deref(), request.cursor.as_ref());
            // If the receiver is gone the UI has exited; nothing to report to.
            let _ = tx.send(FetchOutcome { request, result });
        });
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::error::FetchError;
    use crate::feed::{Applied, Feed, RequestKind};
    use crate::source::{Cursor, Page, Post};

    /// Records every call and answers from a fixed script.
    struct ScriptedSource {
        calls: Mutex<Vec<(Option<String>, Option<Cursor>)>>,
        fail_with: Option<u16>,
    }

    impl ScriptedSource {
        fn ok() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: Some(status),
            }
        }
    }

    impl FeedSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        fn fetch_page(&self, query: Option<&str>, cursor: Option<&Cursor>) -> Result<Page, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.map(String::from), cursor.cloned()));
            if let Some(status) = self.fail_with {
                return Err(FetchError::Status { status });
            }
            let id = match cursor {
                Some(c) => format!("after-{c}"),
                None => "first".to_string(),
            };
            Ok(Page::new(vec![Post::new(id)], None))
        }
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn dispatch_returns_outcome_for_request() {
        let source = Arc::new(ScriptedSource::ok());
        let (fetcher, rx) = Fetcher::spawn(source.clone()).unwrap();

        let mut feed = Feed::new(Some(vec![Post::new("1")]), Some(Cursor::new("c1")), Some("cats".into()), false);
        let request = feed.paginate().unwrap();
        fetcher.dispatch(request.clone());

        let outcome = rx.recv_timeout(WAIT).expect("outcome delivered");
        assert_eq!(outcome.request, request);
        assert_eq!(feed.apply(outcome), Applied::Appended(1));
        assert_eq!(feed.items().unwrap()[1].id, "after-c1");

        let calls = source.calls.lock().unwrap();
        assert_eq!(*calls, vec![(Some("cats".to_string()), Some(Cursor::new("c1")))]);
    }

    #[test]
    fn failures_come_back_as_outcomes() {
        let (fetcher, rx) = Fetcher::spawn(Arc::new(ScriptedSource::failing(503))).unwrap();
        let mut feed = Feed::new(None, None, None, false);
        fetcher.dispatch(feed.refresh());

        let outcome = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(outcome.request.kind, RequestKind::Refresh);
        assert!(matches!(outcome.result, Err(FetchError::Status { status: 503 })));
        assert!(matches!(feed.apply(outcome), Applied::Failed(_)));
        assert!(!feed.is_refreshing());
    }

    #[test]
    fn every_dispatched_request_is_answered() {
        let (fetcher, rx) = Fetcher::spawn(Arc::new(ScriptedSource::ok())).unwrap();
        let mut feed = Feed::new(None, None, None, false);
        let sent: Vec<u64> = (0..3)
            .map(|_| {
                let req = feed.refresh();
                let seq = req.seq;
                fetcher.dispatch(req);
                seq
            })
            .collect();

        let mut got: Vec<u64> = (0..3)
            .map(|_| rx.recv_timeout(WAIT).unwrap().request.seq)
            .collect();
        got.sort_unstable();
        assert_eq!(got, sent);
    }
}
