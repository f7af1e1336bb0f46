//! Audiobookshelf API client
//!
//! Fetching is the only part of the crate that touches the network. It turns
//! the server's paged item listing into the flat `RawItem` records the
//! normalizer consumes.

mod client;
mod models;

use reqwest::StatusCode;
use thiserror::Error;

pub use client::{FetchedLibrary, LibraryClient, SORT_ORDER};
pub use models::{ItemsPage, LibraryItem, Media, Metadata, split_series};

/// Failure to retrieve a library's items
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    /// The request could not be sent or the body could not be read
    #[error("request to {url} failed")]
    Transport {
        /// Requested URL, without credentials
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status
    #[error("{url} returned {status}")]
    Status {
        /// Requested URL, without credentials
        url: String,
        /// HTTP status returned
        status: StatusCode,
    },
    /// The response body was not the expected JSON
    #[error("unexpected response from {url}")]
    Decode {
        /// Requested URL, without credentials
        url: String,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },
}
