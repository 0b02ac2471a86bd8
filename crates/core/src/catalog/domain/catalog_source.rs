use thiserror::Error;

use crate::catalog::domain::catalog_entry::FrameCatalogEntry;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("store credentials are not configured")]
    MissingCredentials,
    #[error("catalog request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("catalog returned status {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("malformed catalog payload: {0}")]
    Payload(#[source] serde_json::Error),
}

/// Domain interface for listing the frames a store currently sells.
pub trait CatalogSource: Send {
    /// At most `max_count` in-stock entries, in store order.
    fn list_available_frames(
        &self,
        max_count: usize,
    ) -> Result<Vec<FrameCatalogEntry>, CatalogError>;

    /// Identifies what this source lists. A cache is only reused by a source
    /// with the same key.
    fn cache_key(&self) -> String;
}
