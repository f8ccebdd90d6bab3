//! Domain representation of feeds.
//!
//! These types are what the fetcher produces, what the cache stores and what
//! the HTTP server returns. The cache never looks inside them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ArcStr;

/// A feed normalized from RSS or Atom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    #[serde(default, skip_serializing_if = "ArcStr::is_empty")]
    pub title: ArcStr,
    #[serde(default, skip_serializing_if = "ArcStr::is_empty")]
    pub description: ArcStr,
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// A single item of a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, skip_serializing_if = "ArcStr::is_empty")]
    pub title: ArcStr,
    #[serde(default, skip_serializing_if = "ArcStr::is_empty")]
    pub description: ArcStr,
    #[serde(default, skip_serializing_if = "ArcStr::is_empty")]
    pub content: ArcStr,
    #[serde(default, skip_serializing_if = "Image::is_empty")]
    pub image: Image,
    #[serde(default, skip_serializing_if = "ArcStr::is_empty")]
    pub url: ArcStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

/// The image attached to an article, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default, skip_serializing_if = "ArcStr::is_empty")]
    pub url: ArcStr,
    #[serde(default, skip_serializing_if = "ArcStr::is_empty")]
    pub title: ArcStr,
}

impl Image {
    pub fn is_empty(&self) -> bool {
        self.url.is_empty() && self.title.is_empty()
    }
}
