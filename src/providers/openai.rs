use async_trait::async_trait;
use reqwest::Client;

use super::{chat, ProviderError, ProviderId, SummaryProvider};

pub struct OpenAIClient {
    client: Client,
    base_url: String,
}

impl OpenAIClient {
    pub const MODEL: &'static str = "gpt-4";

    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: "https://api.openai.com/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl SummaryProvider for OpenAIClient {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    async fn summarize(
        &self,
        transcript: &str,
        credential: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        tracing::info!("Requesting summary from OpenAI ({})", Self::MODEL);

        chat::complete(
            self.id(),
            &self.client,
            &format!("{}/chat/completions", self.base_url),
            Self::MODEL,
            credential,
            prompt,
            transcript,
        )
        .await
    }
}
