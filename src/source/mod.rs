//! Feed source abstraction layer.
//!
//! This module defines the [`FeedSource`] trait and the data it trades in:
//! [`Post`], [`Cursor`] and [`Page`].  The concrete HTTP implementation lives
//! in [`http`].
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `fixture.rs`).
//! 2. Define a struct and implement [`FeedSource`] for it.
//! 3. Add `mod fixture;` below and re-export your struct.
//! 4. Construct it in `main.rs` instead of [`HttpSource`].
//!
//! The fetcher, the presenter and the UI never look past the trait.

mod http;
mod page;
mod post;

pub use http::HttpSource;
pub use page::{Cursor, Page};
pub use post::Post;

use crate::error::FetchError;

/// Anything that can hand out pages of posts.
///
/// [`fetch_page()`](FeedSource::fetch_page) is called from the fetcher's
/// worker pool, so implementations must be [`Send`] and [`Sync`] and may
/// block.
///
/// ```ignore
/// pub struct Canned(Vec<Page>);
///
/// impl FeedSource for Canned {
///     fn name(&self) -> &str { "canned" }
///
///     fn fetch_page(&self, _query: Option<&str>, _cursor: Option<&Cursor>)
///         -> Result<Page, FetchError>
///     {
///         Ok(self.0[0].clone())
///     }
/// }
/// ```
pub trait FeedSource: Send + Sync {
    /// Label used in log lines.
    fn name(&self) -> &str;

    /// Fetch one page.  `cursor == None` asks for the first page.
    fn fetch_page(&self, query: Option<&str>, cursor: Option<&Cursor>) -> Result<Page, FetchError>;
}
