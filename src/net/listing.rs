//! HTTP client for the paginated image listing.
//!
//! `GET {base}/v2/list?page={page}&limit={limit}` answers with a JSON array
//! of image records. The client is cheap to clone; every fetch runs as its
//! own task and hands its result back to the update cycle.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{GalleryError, Result};
use crate::state::config::GalleryConfig;
use crate::state::data::ImageRecord;
use crate::state::gallery::PageRequest;

#[derive(Debug, Clone)]
pub struct ListingClient {
    client: Client,
    base_url: String,
}

impl ListingClient {
    pub fn new(config: &GalleryConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client, falling back to defaults");
                Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Listing URL for one page
    pub fn page_url(&self, request: PageRequest) -> String {
        format!(
            "{}/v2/list?page={}&limit={}",
            self.base_url, request.page, request.limit
        )
    }

    /// Fetch and decode one page of the listing
    pub async fn fetch_page(self, request: PageRequest) -> Result<Vec<ImageRecord>> {
        let url = self.page_url(request);
        let body = self.get_text(&url).await?;
        let records = ImageRecord::page_from_json(&body)?;
        debug!(url = %url, count = records.len(), "Decoded listing page");
        Ok(records)
    }

    /// Download raw bytes, used for the placeholder image
    pub async fn fetch_bytes(self, url: String) -> Result<Vec<u8>> {
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GalleryError::Fetch(format!("{} answered {}", url, status)));
        }

        let bytes = response.bytes().await?;
        debug!(url = %url, size = bytes.len(), "Downloaded image");
        Ok(bytes.to_vec())
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GalleryError::Fetch(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GalleryError::Fetch(format!("{} answered {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| GalleryError::Fetch(format!("Failed to read body of {}: {}", url, e)))
    }
}
