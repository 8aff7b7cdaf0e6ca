use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod anthropic;
pub mod chat;
pub mod dispatcher;
pub mod grok;
pub mod huggingface;
pub mod openai;

pub use dispatcher::AiDispatcher;

/// Placed between the prompt and the transcript in every request
pub const TRANSCRIPT_SEPARATOR: &str = "\n\nTranscript:\n";

/// Supported summarization providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "grok", alias = "xai")]
    Grok,
    #[serde(rename = "huggingface", alias = "hf")]
    HuggingFace,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::OpenAi,
        ProviderId::Anthropic,
        ProviderId::Grok,
        ProviderId::HuggingFace,
    ];

    /// Identifier used in settings and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Grok => "grok",
            ProviderId::HuggingFace => "huggingface",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "OpenAI",
            ProviderId::Anthropic => "Anthropic",
            ProviderId::Grok => "xAI Grok",
            ProviderId::HuggingFace => "Hugging Face",
        }
    }

    /// Environment variable consulted when no key is configured
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "OPENAI_API_KEY",
            ProviderId::Anthropic => "ANTHROPIC_API_KEY",
            ProviderId::Grok => "XAI_API_KEY",
            ProviderId::HuggingFace => "HF_TOKEN",
        }
    }

    /// Where users create an API key
    pub fn key_url(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "https://platform.openai.com/api-keys",
            ProviderId::Anthropic => "https://console.anthropic.com/",
            ProviderId::Grok => "https://console.x.ai/",
            ProviderId::HuggingFace => "https://huggingface.co/settings/tokens",
        }
    }

    pub fn default_prompt(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "Please provide a comprehensive summary of this YouTube video transcript with key points and insights.",
            ProviderId::Anthropic => "Please analyze and summarize this YouTube video transcript, highlighting the main topics and key takeaways.",
            ProviderId::Grok => "Please summarize this YouTube video transcript in a clear and concise manner.",
            ProviderId::HuggingFace => "Please summarize this video transcript from YouTube",
        }
    }

    /// Returned when a successful response carries no recognizable text
    pub fn placeholder(&self) -> String {
        format!("No response from {}", self.display_name())
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderId::OpenAi),
            "anthropic" => Ok(ProviderId::Anthropic),
            "grok" | "xai" => Ok(ProviderId::Grok),
            "huggingface" | "hf" => Ok(ProviderId::HuggingFace),
            _ => Err(ProviderError::UnsupportedProvider(s.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("Unsupported AI service: {0}")]
    UnsupportedProvider(String),

    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Network error: Unable to connect to {provider} API. Please check your internet connection.")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// A summarization backend
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Summarize `transcript` following `prompt`, authenticating with `credential`
    async fn summarize(
        &self,
        transcript: &str,
        credential: &str,
        prompt: &str,
    ) -> Result<String, ProviderError>;
}

/// Prompt and transcript as one user message
pub fn compose_input(prompt: &str, transcript: &str) -> String {
    format!("{}{}{}", prompt, TRANSCRIPT_SEPARATOR, transcript)
}

/// `{"error": {"message": "..."}}`, used by OpenAI, Anthropic and xAI
#[derive(Debug, Deserialize)]
struct NestedErrorBody {
    error: Option<NestedErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct NestedErrorDetail {
    message: Option<String>,
}

pub(crate) fn nested_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<NestedErrorBody>(body)
        .ok()?
        .error?
        .message
}

/// `{"error": "..."}`, used by the Hugging Face inference API
#[derive(Debug, Deserialize)]
struct FlatErrorBody {
    error: Option<String>,
}

pub(crate) fn flat_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<FlatErrorBody>(body).ok()?.error
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

/// Send a request and decode its success envelope.
///
/// A non-success status becomes [`ProviderError::Api`], with the message taken
/// from the body via `error_message` or else the status text. A success body
/// that does not decode as `T` yields `Ok(None)`.
pub(crate) async fn execute<T: DeserializeOwned>(
    provider: ProviderId,
    request: reqwest::RequestBuilder,
    error_message: fn(&str) -> Option<String>,
) -> Result<Option<T>, ProviderError> {
    let network = |source| ProviderError::Network {
        provider: provider.display_name(),
        source,
    };

    let resp = request
        .send()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))
        .map_err(network)?;

    let status = resp.status();
    tracing::debug!("{} responded with {}", provider.display_name(), status);

    if !status.is_success() {
        let message = resp
            .text()
            .await
            .ok()
            .and_then(|body| error_message(&body))
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| status_text(status));

        return Err(ProviderError::Api {
            provider: provider.display_name(),
            status: status.as_u16(),
            message,
        });
    }

    let body = resp.text().await.map_err(network)?;
    match serde_json::from_str::<T>(&body) {
        Ok(envelope) => Ok(Some(envelope)),
        Err(e) => {
            tracing::warn!("Unrecognized {} response: {}", provider.display_name(), e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_id() {
        assert_eq!("openai".parse::<ProviderId>().unwrap(), ProviderId::OpenAi);
        assert_eq!(" Anthropic ".parse::<ProviderId>().unwrap(), ProviderId::Anthropic);
        assert_eq!("xai".parse::<ProviderId>().unwrap(), ProviderId::Grok);
        assert_eq!("hf".parse::<ProviderId>().unwrap(), ProviderId::HuggingFace);
        assert!(matches!(
            "gemini".parse::<ProviderId>(),
            Err(ProviderError::UnsupportedProvider(name)) if name == "gemini"
        ));
    }

    #[test]
    fn test_ids_round_trip_through_as_str() {
        for id in ProviderId::ALL {
            assert_eq!(id.as_str().parse::<ProviderId>().unwrap(), id);
        }
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(ProviderId::OpenAi.placeholder(), "No response from OpenAI");
        assert_eq!(ProviderId::Grok.placeholder(), "No response from xAI Grok");
    }

    #[test]
    fn test_compose_input() {
        assert_eq!(
            compose_input("Summarize", "Hello world"),
            "Summarize\n\nTranscript:\nHello world"
        );
    }

    #[test]
    fn test_error_message_parsing() {
        assert_eq!(
            nested_error_message(r#"{"error":{"message":"invalid key","type":"auth"}}"#).as_deref(),
            Some("invalid key")
        );
        assert_eq!(nested_error_message(r#"{"error":"flat"}"#), None);
        assert_eq!(nested_error_message("<html>502</html>"), None);
        assert_eq!(
            flat_error_message(r#"{"error":"Model is loading"}"#).as_deref(),
            Some("Model is loading")
        );
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(StatusCode::UNAUTHORIZED), "Unauthorized");
        assert_eq!(status_text(StatusCode::from_u16(599).unwrap()), "599");
    }
}
