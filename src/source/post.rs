//! The item type shown in the feed.
//!
//! `Post` is what the endpoint returns inside `tweets`.  Only `id` is
//! required; it is the rendering key for the list.  The remaining fields are
//! displayed when present, and anything the client doesn't know about is kept
//! in [`Post::extra`] untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single feed entry as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier.  Numeric ids (signed, unsigned or float) are
    /// accepted and stored as text.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Body text of the post.
    #[serde(default)]
    pub text: Option<String>,

    /// Display name of the author.
    #[serde(default)]
    pub author: Option<String>,

    /// Handle of the author, without the leading `@`.
    #[serde(default)]
    pub username: Option<String>,

    /// Creation time.  Unparseable timestamps degrade to `None`.
    #[serde(default, deserialize_with = "lenient_rfc3339")]
    pub created_at: Option<DateTime<Utc>>,

    /// Fields this client doesn't interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Post {
    /// A post with nothing but an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: None,
            author: None,
            username: None,
            created_at: None,
            extra: serde_json::Map::new(),
        }
    }

    /// `Name (@handle)`, whichever parts exist.
    pub fn byline(&self) -> String {
        match (&self.author, &self.username) {
            (Some(name), Some(handle)) => format!("{name} (@{handle})"),
            (Some(name), None) => name.clone(),
            (None, Some(handle)) => format!("@{handle}"),
            (None, None) => "unknown".into(),
        }
    }

    /// Post text collapsed onto a single line.
    pub fn one_line_text(&self) -> String {
        match &self.text {
            Some(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
            None => "(no text)".into(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Unsigned(n) => n.to_string(),
        Id::Signed(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    })
}

fn lenient_rfc3339<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}
