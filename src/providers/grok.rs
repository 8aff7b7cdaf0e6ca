use async_trait::async_trait;
use reqwest::Client;

use super::{chat, ProviderError, ProviderId, SummaryProvider};

/// xAI's OpenAI-compatible chat endpoint
pub struct GrokClient {
    client: Client,
    base_url: String,
}

impl GrokClient {
    pub const MODEL: &'static str = "grok-beta";

    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: "https://api.x.ai/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl SummaryProvider for GrokClient {
    fn id(&self) -> ProviderId {
        ProviderId::Grok
    }

    async fn summarize(
        &self,
        transcript: &str,
        credential: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        tracing::info!("Requesting summary from xAI Grok ({})", Self::MODEL);

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

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_summarize_sends_grok_model() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer xai-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "grok-beta",
                "max_tokens": 1000
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"Grok summary"}}]}"#)
            .create_async()
            .await;

        let client = GrokClient::new(Client::new()).with_base_url(server.url());
        let summary = client.summarize("t", "xai-key", "p").await.unwrap();

        assert_eq!(summary, "Grok summary");
    }

    #[tokio::test]
    async fn test_non_json_success_yields_placeholder() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let client = GrokClient::new(Client::new()).with_base_url(server.url());
        let summary = client.summarize("t", "k", "p").await.unwrap();

        assert_eq!(summary, "No response from xAI Grok");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Nothing listens on port 1
        let client = GrokClient::new(Client::new()).with_base_url("http://127.0.0.1:1");
        let err = client.summarize("t", "k", "p").await.unwrap_err();

        assert!(matches!(err, ProviderError::Network { provider: "xAI Grok", .. }));
    }
}
