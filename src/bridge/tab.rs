use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, OnceCell};
use uuid::Uuid;

use super::{BridgeRequest, MessagingError, TabMessenger};
use crate::config::ExtractionConfig;
use crate::extractor::{ExtractionResult, TranscriptExtractor};
use crate::page::Page;

struct Envelope {
    id: Uuid,
    request: BridgeRequest,
    reply: oneshot::Sender<ExtractionResult>,
}

/// A page together with the agent that can be injected into it.
///
/// The agent is a task that owns a [`TranscriptExtractor`] over the page and
/// answers requests one at a time. At most one agent is ever started per tab.
pub struct AttachedTab {
    page: Arc<dyn Page>,
    config: ExtractionConfig,
    listener: OnceCell<mpsc::Sender<Envelope>>,
    runs: Arc<AtomicUsize>,
}

impl AttachedTab {
    pub fn new(page: Arc<dyn Page>, config: ExtractionConfig) -> Self {
        Self {
            page,
            config,
            listener: OnceCell::new(),
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Whether an agent is listening
    pub fn is_instrumented(&self) -> bool {
        self.listener.initialized()
    }

    /// Extractions the agent has completed
    pub fn extraction_runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    fn spawn_agent(&self) -> mpsc::Sender<Envelope> {
        let (tx, mut rx) = mpsc::channel::<Envelope>(8);
        let extractor = TranscriptExtractor::new(Arc::clone(&self.page), self.config.clone());
        let runs = Arc::clone(&self.runs);

        tokio::spawn(async move {
            while let Some(envelope) = rx.recv().await {
                match envelope.request {
                    BridgeRequest::ExtractTranscript => {
                        tracing::info!(request_id = %envelope.id, "Page agent extracting transcript");
                        let result = extractor.extract().await;
                        runs.fetch_add(1, Ordering::SeqCst);

                        if envelope.reply.send(result).is_err() {
                            tracing::debug!(request_id = %envelope.id, "Requester gone before reply");
                        }
                    }
                }
            }
            tracing::debug!("Page agent stopped");
        });

        tx
    }
}

#[async_trait]
impl TabMessenger for AttachedTab {
    async fn send_message(
        &self,
        request: BridgeRequest,
    ) -> Result<Option<ExtractionResult>, MessagingError> {
        let sender = self.listener.get().ok_or(MessagingError::NoReceiver)?;

        let (reply, response) = oneshot::channel();
        let envelope = Envelope {
            id: Uuid::new_v4(),
            request,
            reply,
        };

        sender
            .send(envelope)
            .await
            .map_err(|_| MessagingError::NoReceiver)?;

        Ok(response.await.ok())
    }

    async fn inject_agent(&self) -> Result<(), MessagingError> {
        if self.is_instrumented() {
            tracing::debug!("Page agent already present, skipping injection");
            return Ok(());
        }

        self.listener
            .get_or_init(|| async {
                tracing::info!("Injecting page agent");
                self.spawn_agent()
            })
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::ScriptedPage;

    fn tab(page: &Arc<ScriptedPage>) -> AttachedTab {
        let config = ExtractionConfig {
            close_panel: false,
            ..ExtractionConfig::default()
        };
        AttachedTab::new(page.clone(), config)
    }

    #[tokio::test]
    async fn test_send_without_agent() {
        let page = Arc::new(ScriptedPage::watch_page("T", &["a"]));
        let tab = tab(&page);

        assert!(matches!(
            tab.send_message(BridgeRequest::ExtractTranscript).await,
            Err(MessagingError::NoReceiver)
        ));
        assert!(!tab.is_instrumented());
        assert_eq!(page.lookups(), 0);
    }

    #[tokio::test]
    async fn test_double_injection_registers_one_listener() {
        let page = Arc::new(ScriptedPage::watch_page("T", &["one", "two"]));
        let tab = tab(&page);

        tab.inject_agent().await.unwrap();
        assert!(tab.is_instrumented());
        tab.inject_agent().await.unwrap();

        let first = tab.send_message(BridgeRequest::ExtractTranscript).await.unwrap();
        assert_eq!(tab.extraction_runs(), 1);
        let second = tab.send_message(BridgeRequest::ExtractTranscript).await.unwrap();
        assert_eq!(tab.extraction_runs(), 2);

        assert_eq!(first.unwrap().transcript(), Some("one two"));
        assert!(second.is_some());
    }
}
