use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{compose_input, execute, nested_error_message, ProviderError, ProviderId, SummaryProvider};

pub struct AnthropicClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    pub text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first content block, if non-empty
    pub fn text(self) -> Option<String> {
        self.content
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

impl AnthropicClient {
    pub const MODEL: &'static str = "claude-3-sonnet-20240229";
    pub const API_VERSION: &'static str = "2023-06-01";
    pub const MAX_TOKENS: u32 = 1000;

    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: "https://api.anthropic.com/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl SummaryProvider for AnthropicClient {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    async fn summarize(
        &self,
        transcript: &str,
        credential: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        tracing::info!("Requesting summary from Anthropic ({})", Self::MODEL);

        let body = serde_json::json!({
            "model": Self::MODEL,
            "max_tokens": Self::MAX_TOKENS,
            "messages": [
                {
                    "role": "user",
                    "content": compose_input(prompt, transcript)
                }
            ]
        });

        let request = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", credential)
            .header("anthropic-version", Self::API_VERSION)
            .json(&body);

        let envelope = execute::<MessagesResponse>(self.id(), request, nested_error_message).await?;

        Ok(envelope
            .and_then(MessagesResponse::text)
            .unwrap_or_else(|| self.id().placeholder()))
    }
}
