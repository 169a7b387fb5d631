//! Shared data structures for the application state
//! 
//! These structs represent the data model that flows between
//! the listing endpoint and the UI layer.

use serde::{Deserialize, Serialize};

/// A single entry of the remote image listing
///
/// Only `id` and `url` are required; the remaining fields are what the
/// picsum listing sends along and are kept when present. Unknown fields
/// are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Identifier assigned by the listing (unique per page, not across pages)
    pub id: String,
    /// Page URL of the image on the listing site
    pub url: String,
    /// Photographer credited by the listing
    #[serde(default)]
    pub author: Option<String>,
    /// Original width in pixels
    #[serde(default)]
    pub width: Option<u32>,
    /// Original height in pixels
    #[serde(default)]
    pub height: Option<u32>,
    /// Direct download link for the full-size image
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ImageRecord {
    /// Create a record with just the required fields
    #[cfg(test)]
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            author: None,
            width: None,
            height: None,
            download_url: None,
        }
    }

    /// Render key of this record at `ordinal` in the accumulated sequence.
    ///
    /// Ids repeat across pages, so the ordinal is part of the key.
    pub fn key(&self, ordinal: usize) -> String {
        format!("{}-{}", self.id, ordinal)
    }

    /// Decode one listing page from a JSON body
    pub fn page_from_json(body: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(body)
    }
}
