//! Blocking HTTP client for one library

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use super::FetchError;
use super::models::{ItemsPage, LibraryItem};
use crate::config::{FetchConfig, LibraryConfig};
use crate::model::RawItem;

/// Server-side sort applied to the item listing
pub const SORT_ORDER: &str = "media.metadata.authorName";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Every raw record of a library, in server order
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedLibrary {
    /// Raw records
    pub items: Vec<RawItem>,
    /// When fetching started
    pub fetched_at: DateTime<Utc>,
}

/// Client for the items endpoint of one library
pub struct LibraryClient {
    client: Client,
    base_url: String,
    library: String,
    token: String,
    page_size: u32,
}

impl LibraryClient {
    /// Create a client for the configured library
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the HTTP client cannot be built.
    pub fn new(library: &LibraryConfig, fetch: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: library.url.trim().trim_end_matches('/').to_string(),
            library: library.library.trim().to_string(),
            token: library.token.trim().to_string(),
            page_size: fetch.page_size,
        })
    }

    /// URL of the item listing, without query parameters
    #[must_use]
    pub fn items_url(&self) -> String {
        format!("{}/api/libraries/{}/items", self.base_url, self.library)
    }

    /// Fetch every item of the library
    ///
    /// Pages are requested until the reported total is reached, a page comes
    /// back empty, or, when the server reports no total, a short page arrives.
    /// A page starting with the same item as the previous one means the
    /// server ignored the page parameter; it is dropped and fetching stops.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` on the first failed page; no partial result is
    /// returned.
    pub fn fetch_items(&self) -> Result<FetchedLibrary, FetchError> {
        let fetched_at = Utc::now();
        let mut items = Vec::new();
        let mut page = 0;
        let mut previous_first: Option<String> = None;

        loop {
            let ItemsPage { results, total, .. } = self.fetch_page(page)?;
            let first = results.first().and_then(|item| item.id.clone());
            if first.is_some() && first == previous_first {
                warn!(library = %self.library, page, "server repeated the previous page, stopping");
                break;
            }
            previous_first = first;

            let received = results.len();
            items.extend(results.into_iter().map(LibraryItem::into_raw));
            debug!(library = %self.library, page, received, total, "fetched page");

            let done = match total {
                Some(total) => received == 0 || items.len() >= total,
                None => received < self.page_size as usize,
            };
            if done {
                break;
            }
            page += 1;
        }

        info!(library = %self.library, items = items.len(), "fetched library");
        Ok(FetchedLibrary { items, fetched_at })
    }

    fn fetch_page(&self, page: u32) -> Result<ItemsPage, FetchError> {
        let url = self.items_url();
        let limit = self.page_size.to_string();
        let page = page.to_string();

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("limit", limit.as_str()), ("page", page.as_str()), ("sort", SORT_ORDER)])
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = response.text().map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { url, source })
    }
}
