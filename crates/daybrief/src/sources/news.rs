//! Mediastack news client.

use chrono::NaiveDate;
use serde::Deserialize;

use super::{scrub, SourceError};

/// Default Mediastack API endpoint.
const MEDIASTACK_API_BASE: &str = "http://api.mediastack.com/v1";

/// Headlines requested per run.
const HEADLINE_LIMIT: usize = 3;

/// A single headline for the news section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    /// Article title.
    pub title: String,
    /// Short article summary.
    pub summary: String,
    /// Link to the full article.
    pub url: String,
    /// Publishing outlet, when reported.
    pub source: Option<String>,
}

/// Mediastack `/news` response envelope.
#[derive(Debug, Deserialize)]
struct MediastackResponse {
    #[serde(default)]
    data: Vec<MediastackArticle>,
}

#[derive(Debug, Deserialize)]
struct MediastackArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    source: Option<String>,
}

/// Client for the Mediastack news API.
pub struct NewsClient {
    api_key: String,
    categories: String,
    base_url: String,
    client: reqwest::Client,
}

impl NewsClient {
    /// Create a new client for the given API key and category filter.
    pub fn new(api_key: String, categories: String) -> Result<Self, SourceError> {
        Ok(Self {
            api_key,
            categories,
            base_url: MEDIASTACK_API_BASE.to_string(),
            client: super::http_client()?,
        })
    }

    /// Point the client at a different endpoint (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch the latest English-language headlines published on `date`.
    ///
    /// An empty result set is valid: early in the day the API may not have
    /// indexed anything for the date filter yet.
    pub async fn fetch(&self, date: NaiveDate) -> Result<Vec<Headline>, SourceError> {
        let url = format!("{}/news", self.base_url);
        let date_param = date.format("%Y-%m-%d").to_string();
        let limit = HEADLINE_LIMIT.to_string();

        tracing::debug!(date = %date_param, categories = %self.categories, "Fetching headlines");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_key", self.api_key.as_str()),
                ("languages", "en"),
                ("sort", "published_desc"),
                ("date", date_param.as_str()),
                ("limit", limit.as_str()),
                ("categories", self.categories.as_str()),
            ])
            .send()
            .await
            .map_err(scrub)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api { status, body });
        }

        let body = response.text().await.map_err(scrub)?;
        let payload: MediastackResponse = serde_json::from_str(&body)?;

        let headlines = payload
            .data
            .into_iter()
            .take(HEADLINE_LIMIT)
            .map(|article| Headline {
                title: article.title.unwrap_or_else(|| "No title".to_string()),
                summary: article
                    .description
                    .unwrap_or_else(|| "No description".to_string()),
                url: article.url.unwrap_or_default(),
                source: article.source,
            })
            .collect();

        Ok(headlines)
    }
}
