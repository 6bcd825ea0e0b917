//! Scrape provider client
//!
//! Fetches a regulatory page as markdown through a hosted scraping API
//! (Firecrawl-style `/v1/scrape` endpoint).

use comply_common::ProviderConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::ProviderError;

/// A scraped page in markdown form
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    pub url: String,
    pub content: String,
}

/// Client for the page scraping provider
#[derive(Debug, Clone)]
pub struct ScrapeClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    data: Option<ScrapeData>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
}

impl ScrapeClient {
    #[must_use]
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Scrape `url` and return its markdown content
    pub async fn fetch(&self, url: &str) -> Result<ScrapedPage, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("scrape"))?;

        debug!(url, "scraping regulatory page");

        let response = self
            .client
            .post(format!("{}/v1/scrape", self.base_url))
            .bearer_auth(api_key)
            .json(&json!({
                "url": url,
                "formats": ["markdown"],
                "onlyMainContent": true,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        let parsed: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let content = parsed
            .data
            .and_then(|d| d.markdown)
            .filter(|m| !m.trim().is_empty())
            .ok_or(ProviderError::MissingContent)?;

        Ok(ScrapedPage {
            url: url.to_string(),
            content,
        })
    }
}
