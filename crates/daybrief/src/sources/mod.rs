//! Clients for the three digest data sources.

pub mod news;
pub mod tasks;
pub mod weather;

pub use news::{Headline, NewsClient};
pub use tasks::{TaskAgenda, TaskItem, TodoistClient};
pub use weather::{WeatherClient, WeatherReport};

use std::time::Duration;
use thiserror::Error;

/// Request timeout applied to every source client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when fetching a digest section.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP transport failure (connect, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status
    #[error("API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body could not be deserialized
    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded but is missing required data
    #[error("unexpected payload: {0}")]
    Payload(String),
}

/// Build the HTTP client shared by the source fetchers.
pub(crate) fn http_client() -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Convert a transport error, dropping the request URL.
/// Query strings carry API keys and must never reach logs or output.
pub(crate) fn scrub(err: reqwest::Error) -> SourceError {
    SourceError::Http(err.without_url())
}
