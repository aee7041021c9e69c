//! HTTP feed source.
//!
//! Talks to a `GET /api/tweets` style endpoint:
//!
//! * first page: `GET <endpoint>?query=<q>`
//! * next pages: `GET <endpoint>?nextToken=<cursor>&query=<q>`
//!
//! and decodes the `{ "tweets": [...], "nextToken": "..." }` body.

use std::time::Duration;

use tracing::debug;
use url::Url;

use super::{Cursor, FeedSource, Page};
use crate::error::FetchError;

/// A feed served over HTTP.
pub struct HttpSource {
    endpoint: Url,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    /// Create a source for `endpoint` (e.g. `http://localhost:3000/api/tweets`).
    ///
    /// Must be called outside of an async context; the blocking client owns a
    /// small runtime of its own.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let endpoint = Url::parse(endpoint)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { endpoint, client })
    }

    /// Build the request URL for one page.  Pure, so tests can check it.
    ///
    /// The `query` parameter is left out entirely when there is no query.
    pub fn page_url(endpoint: &Url, query: Option<&str>, cursor: Option<&Cursor>) -> Url {
        let mut url = endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(cursor) = cursor {
                pairs.append_pair("nextToken", cursor.as_str());
            }
            if let Some(query) = query {
                pairs.append_pair("query", query);
            }
        }
        // `query_pairs_mut` leaves a dangling `?` when nothing was appended.
        if url.query() == Some("") {
            url.set_query(None);
        }
        url
    }
}

impl FeedSource for HttpSource {
    fn name(&self) -> &str {
        self.endpoint.as_str()
    }

    fn fetch_page(&self, query: Option<&str>, cursor: Option<&Cursor>) -> Result<Page, FetchError> {
        let url = Self::page_url(&self.endpoint, query, cursor);
        debug!(%url, "requesting page");

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes()?;
        Page::from_json(&body)
    }
}
