//! Client boundary for the hosted text-generation model.
//!
//! The [`ModelClient`] trait is the seam between the pipeline and the model
//! service; the concrete [`AnthropicClient`] talks to the Anthropic Messages
//! API over HTTP. The trait is annotated for `mockall` so tests can run the
//! pipeline against canned replies.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::ModelConfig;

pub type ModelError = Box<dyn std::error::Error + Send + Sync>;

/// Sends one prompt to a text-generation model and returns the reply text.
///
/// One request per feature, no retry: network errors, rate limits and
/// malformed replies all surface as errors from [`ModelClient::generate`].
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Submit the prompt as a single user message and return the first text
    /// segment of the reply verbatim.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Concrete client for the Anthropic Messages API.
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentSegment>,
}

#[derive(Deserialize)]
struct ContentSegment {
    #[serde(default)]
    text: String,
}

impl AnthropicClient {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.name.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        info!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending prompt to model service"
        );

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to decode response body>"));
            error!(status = %status, "Model service returned error: {text}");
            return Err(format!("model service error ({status}): {text}").into());
        }

        let reply: MessagesResponse = response.json().await?;
        let text = reply
            .content
            .into_iter()
            .next()
            .map(|segment| segment.text)
            .ok_or("model reply contained no content segments")?;

        info!(reply_len = text.len(), "Model reply received");
        Ok(text)
    }
}
