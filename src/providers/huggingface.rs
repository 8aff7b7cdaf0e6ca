use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{compose_input, execute, flat_error_message, ProviderError, ProviderId, SummaryProvider};

/// Hugging Face hosted inference with a summarization model
pub struct HuggingFaceClient {
    client: Client,
    base_url: String,
}

/// Inference responses come back as a list or a single object depending on
/// the model, and name the text field differently per task
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InferenceResponse {
    Many(Vec<Generation>),
    One(Generation),
}

#[derive(Debug, Deserialize)]
pub struct Generation {
    pub generated_text: Option<String>,
    pub summary_text: Option<String>,
}

impl Generation {
    fn text(self) -> Option<String> {
        let non_empty = |text: &Option<String>| text.as_deref().is_some_and(|t| !t.is_empty());
        if non_empty(&self.generated_text) {
            self.generated_text
        } else if non_empty(&self.summary_text) {
            self.summary_text
        } else {
            None
        }
    }
}

impl InferenceResponse {
    pub fn text(self) -> Option<String> {
        match self {
            InferenceResponse::Many(generations) => generations.into_iter().next()?.text(),
            InferenceResponse::One(generation) => generation.text(),
        }
    }
}

impl HuggingFaceClient {
    pub const MODEL: &'static str = "facebook/bart-large-cnn";
    pub const MAX_LENGTH: u32 = 500;
    pub const MIN_LENGTH: u32 = 100;

    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: "https://api-inference.huggingface.co".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl SummaryProvider for HuggingFaceClient {
    fn id(&self) -> ProviderId {
        ProviderId::HuggingFace
    }

    async fn summarize(
        &self,
        transcript: &str,
        credential: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        tracing::info!("Requesting summary from Hugging Face ({})", Self::MODEL);

        let body = serde_json::json!({
            "inputs": compose_input(prompt, transcript),
            "parameters": {
                "max_length": Self::MAX_LENGTH,
                "min_length": Self::MIN_LENGTH,
                "do_sample": false
            }
        });

        let request = self
            .client
            .post(format!("{}/models/{}", self.base_url, Self::MODEL))
            .bearer_auth(credential)
            .json(&body);

        let envelope = execute::<InferenceResponse>(self.id(), request, flat_error_message).await?;

        Ok(envelope
            .and_then(InferenceResponse::text)
            .unwrap_or_else(|| self.id().placeholder()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn parse(body: &str) -> Option<String> {
        serde_json::from_str::<InferenceResponse>(body).ok()?.text()
    }

    #[test]
    fn test_response_shapes() {
        assert_eq!(parse(r#"[{"summary_text":"s"}]"#).as_deref(), Some("s"));
        assert_eq!(
            parse(r#"[{"generated_text":"g","summary_text":"s"}]"#).as_deref(),
            Some("g")
        );
        assert_eq!(parse(r#"{"generated_text":"g"}"#).as_deref(), Some("g"));
        assert_eq!(parse(r#"{"summary_text":"s"}"#).as_deref(), Some("s"));
        assert_eq!(parse(r#"[{"generated_text":"","summary_text":"s"}]"#).as_deref(), Some("s"));
        assert_eq!(parse(r#"[]"#), None);
        assert_eq!(parse(r#"{"label":"POSITIVE"}"#), None);
        assert_eq!(parse(r#"42"#), None);
    }

    #[tokio::test]
    async fn test_summarize_success() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/facebook/bart-large-cnn")
            .match_header("authorization", "Bearer hf_token")
            .match_body(Matcher::Json(serde_json::json!({
                "inputs": "Summarize\n\nTranscript:\nHello",
                "parameters": {
                    "max_length": 500,
                    "min_length": 100,
                    "do_sample": false
                }
            })))
            .with_status(200)
            .with_body(r#"[{"summary_text":"Short summary"}]"#)
            .create_async()
            .await;

        let client = HuggingFaceClient::new(Client::new()).with_base_url(server.url());
        let summary = client.summarize("Hello", "hf_token", "Summarize").await.unwrap();

        assert_eq!(summary, "Short summary");
    }

    #[tokio::test]
    async fn test_flat_error_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/facebook/bart-large-cnn")
            .with_status(503)
            .with_body(r#"{"error":"Model facebook/bart-large-cnn is currently loading","estimated_time":20.0}"#)
            .create_async()
            .await;

        let client = HuggingFaceClient::new(Client::new()).with_base_url(server.url());
        let err = client.summarize("t", "k", "p").await.unwrap_err();

        assert!(matches!(
            err,
            ProviderError::Api { status: 503, ref message, .. }
                if message == "Model facebook/bart-large-cnn is currently loading"
        ));
    }

    #[tokio::test]
    async fn test_unrecognized_shape_yields_placeholder() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/facebook/bart-large-cnn")
            .with_status(200)
            .with_body(r#"[]"#)
            .create_async()
            .await;

        let client = HuggingFaceClient::new(Client::new()).with_base_url(server.url());
        let summary = client.summarize("t", "k", "p").await.unwrap();

        assert_eq!(summary, "No response from Hugging Face");
    }
}
