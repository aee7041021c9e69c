//! The feed presenter: items, cursor and the two fetch state machines.
//!
//! `Feed` never performs I/O.  [`Feed::paginate`], [`Feed::refresh`] and
//! [`Feed::set_query`] return a [`FetchRequest`] describing the page to load;
//! the caller runs it (see [`crate::fetch`]) and hands the result back through
//! [`Feed::apply`].
//!
//! Every request carries a sequence number.  Only the newest request of each
//! kind is outstanding at any time, and an outcome whose sequence number is
//! not the outstanding one is dropped as stale:
//!
//! ```text
//! pagination:  Idle ──paginate()──► FetchingNext ──apply()──► Idle
//! refresh:     Idle ──refresh()───► Refreshing   ──apply()──► Idle
//! ```
//!
//! Starting a refresh abandons any outstanding page fetch.  Pagination is
//! refused while a refresh is running.

use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::source::{Cursor, Page, Post};

/// Which of the two operations a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Page one, replacing the whole list.
    Refresh,
    /// The page after `cursor`, appended to the list.
    NextPage,
}

/// A page the presenter wants loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub kind: RequestKind,
    pub query: Option<String>,
    pub cursor: Option<Cursor>,
}

/// A finished request.
#[derive(Debug)]
pub struct FetchOutcome {
    pub request: FetchRequest,
    pub result: Result<Page, FetchError>,
}

/// What [`Feed::apply`] did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A next page was appended; this many items were added.
    Appended(usize),
    /// A refresh replaced the list; it now holds this many items.
    Replaced(usize),
    /// The request had been superseded, nothing changed.
    Stale,
    /// The request failed; the message is also kept in [`Feed::last_error`].
    Failed(String),
}

pub struct Feed {
    /// `None` until the first page (seed or fetched) is known.
    items: Option<Vec<Post>>,
    cursor: Option<Cursor>,
    query: Option<String>,
    search_mode: bool,
    next_seq: u64,
    refreshing: Option<u64>,
    paging: Option<u64>,
    last_error: Option<String>,
}

impl Feed {
    /// Build the initial state.  The query given here is the baseline; it
    /// never triggers a refresh by itself.
    pub fn new(
        seed_items: Option<Vec<Post>>,
        seed_cursor: Option<Cursor>,
        query: Option<String>,
        search_mode: bool,
    ) -> Self {
        Self {
            items: seed_items,
            cursor: seed_cursor,
            query: normalize_query(query),
            search_mode,
            next_seq: 0,
            refreshing: None,
            paging: None,
            last_error: None,
        }
    }

    // -- accessors -----------------------------------------------------------

    pub fn items(&self) -> Option<&[Post]> {
        self.items.as_deref()
    }

    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.is_some()
    }

    pub fn is_paginating(&self) -> bool {
        self.paging.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn title(&self) -> &'static str {
        if self.search_mode {
            "Search Results"
        } else {
            "Latest feed"
        }
    }

    // -- inputs --------------------------------------------------------------

    pub fn set_search_mode(&mut self, search_mode: bool) {
        self.search_mode = search_mode;
    }

    /// Change the query.  Returns the refresh request when the value actually
    /// changed; an empty query is the same as no query.
    pub fn set_query(&mut self, query: Option<String>) -> Option<FetchRequest> {
        let query = normalize_query(query);
        if query == self.query {
            return None;
        }
        info!(from = ?self.query, to = ?query, "query changed");
        self.query = query;
        Some(self.refresh())
    }

    // -- operations ----------------------------------------------------------

    /// Ask for the next page, if there is one and nothing else is in flight.
    pub fn paginate(&mut self) -> Option<FetchRequest> {
        let cursor = self.cursor.clone()?;
        if self.paging.is_some() || self.refreshing.is_some() {
            return None;
        }

        let seq = self.bump_seq();
        self.paging = Some(seq);
        debug!(seq, %cursor, "paginate");
        Some(FetchRequest {
            seq,
            kind: RequestKind::NextPage,
            query: self.query.clone(),
            cursor: Some(cursor),
        })
    }

    /// Reload page one for the current query.  Always issues a request and
    /// supersedes any refresh or page fetch still in flight.
    pub fn refresh(&mut self) -> FetchRequest {
        let seq = self.bump_seq();
        if let Some(abandoned) = self.paging.take() {
            debug!(seq = abandoned, "page fetch abandoned by refresh");
        }
        self.refreshing = Some(seq);
        self.last_error = None;
        debug!(seq, query = ?self.query, "refresh");
        FetchRequest {
            seq,
            kind: RequestKind::Refresh,
            query: self.query.clone(),
            cursor: None,
        }
    }

    /// Fold a finished request back into the state.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Applied {
        let FetchOutcome { request, result } = outcome;
        let slot = match request.kind {
            RequestKind::Refresh => &mut self.refreshing,
            RequestKind::NextPage => &mut self.paging,
        };
        if *slot != Some(request.seq) {
            debug!(seq = request.seq, kind = ?request.kind, "discarding stale response");
            return Applied::Stale;
        }
        *slot = None;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!(seq = request.seq, kind = ?request.kind, error = %e, "fetch failed");
                let message = e.user_message();
                self.last_error = Some(message.clone());
                return Applied::Failed(message);
            }
        };

        self.last_error = None;
        self.cursor = page.next;
        match request.kind {
            RequestKind::Refresh => {
                let count = page.items.len();
                self.items = Some(page.items);
                info!(count, has_more = self.cursor.is_some(), "feed refreshed");
                Applied::Replaced(count)
            }
            RequestKind::NextPage => {
                let count = page.items.len();
                self.items.get_or_insert_with(Vec::new).extend(page.items);
                debug!(count, total = self.len(), has_more = self.cursor.is_some(), "page appended");
                Applied::Appended(count)
            }
        }
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

fn normalize_query(query: Option<String>) -> Option<String> {
    query.filter(|q| !q.is_empty())
}
