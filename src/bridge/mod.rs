//! Request/response relay between the UI side and the agent attached to a
//! page.
//!
//! The UI never drives the page itself. It sends a [`BridgeRequest`] to the
//! page agent and gets an [`ExtractionResult`] back. If the page has no
//! agent yet, the bridge injects one and retries exactly once.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod tab;

pub use tab::AttachedTab;

use crate::extractor::ExtractionResult;

/// Commands understood by the page agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BridgeRequest {
    ExtractTranscript,
}

#[derive(thiserror::Error, Debug)]
pub enum MessagingError {
    #[error("Could not establish connection. Receiving end does not exist.")]
    NoReceiver,

    #[error("Injection failed: {0}")]
    Injection(String),
}

pub const INJECTION_FAILED: &str =
    "Failed to inject content script. Please refresh the YouTube page and try again.";
pub const NO_RESPONSE: &str =
    "No response from content script. It may not be properly injected.";

/// Failures to reach the page agent at all, as opposed to extraction
/// failures reported inside an [`ExtractionResult`]
#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    #[error("{message}")]
    Communication {
        message: &'static str,
        #[source]
        source: Option<MessagingError>,
    },
}

impl BridgeError {
    fn injection_failed(source: MessagingError) -> Self {
        BridgeError::Communication {
            message: INJECTION_FAILED,
            source: Some(source),
        }
    }

    fn no_response() -> Self {
        BridgeError::Communication {
            message: NO_RESPONSE,
            source: None,
        }
    }
}

/// Messaging endpoint of one browser tab
#[async_trait]
pub trait TabMessenger: Send + Sync {
    /// Deliver a request to the tab's agent. `Ok(None)` means the agent
    /// closed the channel without answering.
    async fn send_message(
        &self,
        request: BridgeRequest,
    ) -> Result<Option<ExtractionResult>, MessagingError>;

    /// Load the agent into the tab. Must not register a second listener if
    /// one is already present.
    async fn inject_agent(&self) -> Result<(), MessagingError>;
}

pub struct MessageBridge<T: TabMessenger> {
    tab: T,
    injection_settle: Duration,
}

impl<T: TabMessenger> MessageBridge<T> {
    pub fn new(tab: T, injection_settle: Duration) -> Self {
        Self {
            tab,
            injection_settle,
        }
    }

    pub fn tab(&self) -> &T {
        &self.tab
    }

    /// Ask the tab's agent to extract the transcript, injecting the agent
    /// first if the tab has none
    pub async fn request_extraction(&self) -> Result<ExtractionResult, BridgeError> {
        let request = BridgeRequest::ExtractTranscript;

        let response = match self.tab.send_message(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!(error = %e, "Page agent not reachable, attempting to inject");

                self.tab
                    .inject_agent()
                    .await
                    .inspect_err(|e| tracing::error!(error = %e, "Page agent injection failed"))
                    .map_err(BridgeError::injection_failed)?;

                // Give the agent time to register its listener
                tokio::time::sleep(self.injection_settle).await;

                self.tab
                    .send_message(request)
                    .await
                    .inspect_err(|e| tracing::error!(error = %e, "Retry after injection failed"))
                    .map_err(BridgeError::injection_failed)?
            }
        };

        response.ok_or_else(BridgeError::no_response)
    }
}
