use crate::bridge::{MessageBridge, TabMessenger};
use crate::config::AiConfig;
use crate::output::SummaryReport;
use crate::providers::AiDispatcher;
use crate::SummarizerError;

/// The UI-side flow: ask the page for its transcript, then summarize it
pub struct SummaryPipeline {
    dispatcher: AiDispatcher,
    settings: AiConfig,
}

impl SummaryPipeline {
    pub fn new(dispatcher: AiDispatcher, settings: AiConfig) -> Self {
        Self {
            dispatcher,
            settings,
        }
    }

    pub fn settings(&self) -> &AiConfig {
        &self.settings
    }

    /// Request the transcript through the bridge
    pub async fn extract<T: TabMessenger>(
        &self,
        bridge: &MessageBridge<T>,
    ) -> Result<SummaryReport, SummarizerError> {
        let result = bridge.request_extraction().await?;

        match result.transcript() {
            Some(transcript) if result.is_success() => Ok(SummaryReport::new(
                result.video_title().to_string(),
                result.video_url().to_string(),
                transcript.to_string(),
            )),
            _ => Err(SummarizerError::Extraction(
                result
                    .error()
                    .unwrap_or("No transcript found")
                    .to_string(),
            )),
        }
    }

    /// Attach a summary to the report, or return it untouched when no API
    /// key is available
    pub async fn summarize(&self, report: SummaryReport) -> Result<SummaryReport, SummarizerError> {
        let Some(api_key) = self.settings.resolve_api_key() else {
            tracing::warn!(
                "No API key for {}; skipping summary (set one with `ytsum config --api-key` or {})",
                self.settings.provider.display_name(),
                self.settings.provider.api_key_env()
            );
            return Ok(report);
        };

        let provider = self.settings.provider;
        let prompt = self.settings.resolve_prompt();

        let text = self
            .dispatcher
            .invoke(provider.as_str(), &report.transcript, &prompt, &api_key)
            .await?;

        Ok(report.with_summary(provider, text))
    }
}
