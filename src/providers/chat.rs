//! Chat-completions wire format shared by OpenAI and xAI.

use reqwest::Client;
use serde::Deserialize;

use super::{compose_input, execute, nested_error_message, ProviderError, ProviderId};

pub const MAX_TOKENS: u32 = 1000;
pub const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Content of the first choice, if non-empty
    pub fn text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()?
            .message?
            .content
            .filter(|content| !content.is_empty())
    }
}

pub(crate) async fn complete(
    provider: ProviderId,
    client: &Client,
    url: &str,
    model: &str,
    credential: &str,
    prompt: &str,
    transcript: &str,
) -> Result<String, ProviderError> {
    let body = serde_json::json!({
        "model": model,
        "messages": [
            {
                "role": "user",
                "content": compose_input(prompt, transcript)
            }
        ],
        "max_tokens": MAX_TOKENS,
        "temperature": TEMPERATURE
    });

    let request = client.post(url).bearer_auth(credential).json(&body);

    let envelope = execute::<CompletionResponse>(provider, request, nested_error_message).await?;

    Ok(envelope
        .and_then(CompletionResponse::text)
        .unwrap_or_else(|| provider.placeholder()))
}
