//! Vision provider client
//!
//! Sends a label panel image plus an extraction prompt to an
//! OpenAI-compatible multimodal chat endpoint. Images travel inline as
//! base64 data URLs.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use comply_common::ProviderConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::ProviderError;

const DEFAULT_MODEL: &str = "gpt-4o";

/// Client for the image understanding provider
#[derive(Debug, Clone)]
pub struct VisionClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl VisionClient {
    #[must_use]
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// Analyze one image with the given prompt and return the reply text
    pub async fn analyze_image(
        &self,
        prompt: &str,
        image_bytes: &[u8],
        content_type: &str,
    ) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("vision"))?;

        let data_url = format!("data:{};base64,{}", content_type, BASE64.encode(image_bytes));
        debug!(model = %self.model, image_bytes = image_bytes.len(), "sending vision request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&json!({
                "model": self.model,
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": prompt},
                        {"type": "image_url", "image_url": {"url": data_url}},
                    ],
                }],
                "temperature": 0.0,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ProviderError::MissingContent)
    }
}
