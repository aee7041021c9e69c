//! Error types for the source layer.
//!
//! Everything that can go wrong while obtaining a [`Page`](crate::source::Page)
//! is a [`FetchError`].  The binary edge (`main.rs`) uses [`anyhow`] like the
//! rest of the startup code; library modules return this enum so callers can
//! tell a bad status apart from a dead connection.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}")]
    Status { status: u16 },

    /// The body was not a valid page document.
    #[error("invalid page body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The endpoint URL could not be turned into a request URL.
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// A seed page file could not be read.
    #[error("cannot read seed file {path}: {source}")]
    Seed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Short text for the one-line status bar.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Transport(e) if e.is_timeout() => "request timed out".into(),
            FetchError::Transport(_) => "could not reach the feed server".into(),
            FetchError::Status { status } => format!("feed server returned HTTP {status}"),
            FetchError::Decode(_) => "feed server sent an unreadable page".into(),
            FetchError::Endpoint(e) => format!("bad endpoint URL: {e}"),
            FetchError::Seed { path, .. } => format!("cannot read {}", path.display()),
        }
    }
}
