use reqwest::Client;
use std::collections::HashMap;

use super::anthropic::AnthropicClient;
use super::grok::GrokClient;
use super::huggingface::HuggingFaceClient;
use super::openai::OpenAIClient;
use super::{ProviderError, ProviderId, SummaryProvider};

/// Registry mapping provider identifiers to their clients
pub struct AiDispatcher {
    providers: HashMap<ProviderId, Box<dyn SummaryProvider>>,
}

impl AiDispatcher {
    /// Create a dispatcher with a client for every known provider
    pub fn new(client: Client) -> Self {
        let mut dispatcher = Self::empty();

        for id in ProviderId::ALL {
            dispatcher.register(default_client(id, client.clone()));
        }

        dispatcher
    }

    /// Create a dispatcher with no providers registered
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider, replacing any previous one with the same id
    pub fn register(&mut self, provider: Box<dyn SummaryProvider>) {
        self.providers.insert(provider.id(), provider);
    }

    /// Summarize with the provider named by `provider_id`.
    ///
    /// The provider's answer is returned unchanged; nothing is retried.
    pub async fn invoke(
        &self,
        provider_id: &str,
        transcript: &str,
        prompt: &str,
        credential: &str,
    ) -> Result<String, ProviderError> {
        let id: ProviderId = provider_id.parse()?;
        let provider = self
            .providers
            .get(&id)
            .ok_or_else(|| ProviderError::UnsupportedProvider(provider_id.to_string()))?;

        tracing::debug!(
            "Dispatching {} chars of transcript to {}",
            transcript.len(),
            id.display_name()
        );

        provider.summarize(transcript, credential, prompt).await
    }
}

fn default_client(id: ProviderId, client: Client) -> Box<dyn SummaryProvider> {
    match id {
        ProviderId::OpenAi => Box::new(OpenAIClient::new(client)),
        ProviderId::Anthropic => Box::new(AnthropicClient::new(client)),
        ProviderId::Grok => Box::new(GrokClient::new(client)),
        ProviderId::HuggingFace => Box::new(HuggingFaceClient::new(client)),
    }
}

impl Default for AiDispatcher {
    fn default() -> Self {
        Self::new(Client::new())
    }
}
