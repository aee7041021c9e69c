//! One page of results and the cursor that leads to the next one.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Post;
use crate::error::FetchError;

/// Opaque continuation token issued by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fetch result: items in server order plus the cursor for the next page.
///
/// `next == None` means there are no more pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "tweets")]
    pub items: Vec<Post>,

    #[serde(rename = "nextToken", default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Cursor>,
}

impl Page {
    pub fn new(items: Vec<Post>, next: Option<Cursor>) -> Self {
        Self { items, next }
    }

    /// Decode a response body.  An empty `nextToken` counts as "no more pages".
    pub fn from_json(body: &[u8]) -> Result<Self, FetchError> {
        let mut page: Page = serde_json::from_slice(body)?;
        page.next = page.next.filter(|c| !c.as_str().is_empty());
        Ok(page)
    }

    /// Read a page saved to disk, used to seed the feed at startup.
    pub fn load(path: &Path) -> Result<Self, FetchError> {
        let body = std::fs::read(path).map_err(|source| FetchError::Seed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn decodes_items_and_cursor() {
        let page =
            Page::from_json(br#"{"tweets": [{"id": "1"}, {"id": "2"}], "nextToken": "c2"}"#)
                .unwrap();
        let ids: Vec<_> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(page.next, Some(Cursor::new("c2")));
    }

    #[test]
    fn null_absent_and_empty_cursor_mean_last_page() {
        for body in [
            &br#"{"tweets": [], "nextToken": null}"#[..],
            &br#"{"tweets": []}"#[..],
            &br#"{"tweets": [], "nextToken": ""}"#[..],
        ] {
            assert_eq!(Page::from_json(body).unwrap().next, None);
        }
    }

    #[test]
    fn missing_items_is_a_decode_error() {
        let err = Page::from_json(br#"{"nextToken": "c"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn load_reads_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tweets": [{{"id": "seed"}}], "nextToken": "c1"}}"#).unwrap();

        let page = Page::load(file.path()).unwrap();
        assert_eq!(page.items[0].id, "seed");
        assert_eq!(page.next.as_ref().map(Cursor::as_str), Some("c1"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Page::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, FetchError::Seed { .. }));
    }
}
