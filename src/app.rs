use std::time::{Duration, Instant};

use ratatui::widgets::ListState;
use tracing::info;

use crate::feed::{Applied, Feed, FetchOutcome, FetchRequest};

/// Load the next page once the selection is this close to the end.
const LOAD_MORE_THRESHOLD: usize = 5;

pub struct App {
    /// Items, cursor and fetch bookkeeping.
    pub feed: Feed,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last fetch status message.
    pub status: String,
    /// Query being typed, while the search prompt is open.
    pub search_input: Option<String>,
    /// Advances every tick; drives the spinner.
    pub tick_count: usize,
    /// Requests waiting to be handed to the fetcher.
    outbox: Vec<FetchRequest>,
    refresh_every: Option<Duration>,
    last_refresh: Instant,
}

impl App {
    pub fn new(feed: Feed, refresh_every: Option<Duration>) -> Self {
        Self {
            feed,
            list_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
            search_input: None,
            tick_count: 0,
            outbox: Vec::new(),
            refresh_every,
            last_refresh: Instant::now(),
        }
    }

    /// Drain the requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Fold a finished fetch into the feed and update the status line.
    pub fn handle_outcome(&mut self, outcome: FetchOutcome) {
        match self.feed.apply(outcome) {
            Applied::Replaced(count) => {
                self.last_refresh = Instant::now();
                self.list_state.select(if count == 0 { None } else { Some(0) });
                *self.list_state.offset_mut() = 0;
                self.status = format!("Fetched {count} posts");
            }
            Applied::Appended(count) => {
                self.status = format!("Loaded {count} more posts");
                self.maybe_load_more();
            }
            Applied::Stale => {}
            Applied::Failed(message) => {
                self.status = format!("Error: {message}");
            }
        }
    }

    /// Manual refresh: always re-fetches page one.
    pub fn refresh(&mut self) {
        let request = self.feed.refresh();
        self.status = "Refreshing…".into();
        self.outbox.push(request);
    }

    /// Periodic housekeeping, called once per main-loop iteration.
    pub fn tick(&mut self, now: Instant) {
        self.tick_count = self.tick_count.wrapping_add(1);

        if let Some(every) = self.refresh_every {
            if !self.feed.is_refreshing() && now.duration_since(self.last_refresh) >= every {
                info!(every_secs = every.as_secs(), "periodic refresh");
                self.last_refresh = now;
                self.refresh();
            }
        }
    }

    /// Request the next page when the selection is near the end of the list.
    fn maybe_load_more(&mut self) {
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        if selected + LOAD_MORE_THRESHOLD < self.feed.len() {
            return;
        }
        if let Some(request) = self.feed.paginate() {
            self.outbox.push(request);
        }
    }

    // -- search prompt -------------------------------------------------------

    pub fn is_searching(&self) -> bool {
        self.search_input.is_some()
    }

    pub fn begin_search(&mut self) {
        self.search_input = Some(self.feed.query().unwrap_or_default().to_string());
    }

    pub fn search_push(&mut self, c: char) {
        if let Some(input) = &mut self.search_input {
            input.push(c);
        }
    }

    pub fn search_pop(&mut self) {
        if let Some(input) = &mut self.search_input {
            input.pop();
        }
    }

    pub fn cancel_search(&mut self) {
        self.search_input = None;
    }

    /// Close the prompt and apply the typed query.  An empty query returns to
    /// the default feed.
    pub fn commit_search(&mut self) {
        let Some(input) = self.search_input.take() else {
            return;
        };
        let query = input.trim().to_string();
        self.feed.set_search_mode(!query.is_empty());
        if let Some(request) = self.feed.set_query(Some(query)) {
            self.status = "Searching…".into();
            self.outbox.push(request);
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.feed.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
        self.maybe_load_more();
    }

    pub fn select_previous(&mut self) {
        if self.feed.len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.feed.len() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.feed.len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
            self.maybe_load_more();
        }
    }
}
