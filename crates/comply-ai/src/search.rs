//! Search provider client
//!
//! Queries a hosted web search API (Tavily-style `/search` endpoint).
//! Used to verify that source URLs suggested by the reasoning model
//! actually exist before they are shown to reviewers.

use comply_common::ProviderConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::ProviderError;

/// One search result
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
}

/// Client for the web search provider
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

impl SearchClient {
    #[must_use]
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Run a web search and return up to `max_results` hits
    pub async fn search(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("search"))?;

        debug!(query, max_results, "running web search");

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(api_key)
            .json(&json!({
                "query": query,
                "max_results": max_results,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(parsed.results)
    }
}
