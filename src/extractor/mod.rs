use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub mod normalize;
pub mod selectors;

use crate::config::ExtractionConfig;
use crate::page::{ElementHandle, Locator, Page, PageError};
use crate::utils;

/// Title reported when no title element can be read
pub const UNKNOWN_TITLE: &str = "Unknown Video";

/// Outcome of one extraction attempt.
///
/// `success` is true exactly when a non-empty transcript is present, and
/// `error` is present exactly when `success` is false. The constructors are
/// the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    transcript: Option<String>,

    video_title: String,

    video_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ExtractionResult {
    /// Successful result. An empty transcript yields a failure instead.
    pub fn success(transcript: String, video_title: String, video_url: String) -> Self {
        if transcript.trim().is_empty() {
            return Self::failure(TranscriptError::EmptyTranscript.to_string(), video_title, video_url);
        }

        Self {
            success: true,
            transcript: Some(transcript),
            video_title,
            video_url,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>, video_title: String, video_url: String) -> Self {
        Self {
            success: false,
            transcript: None,
            video_title,
            video_url,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    pub fn video_title(&self) -> &str {
        &self.video_title
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Not on a YouTube video page")]
    NotVideoPage,

    #[error("\"{0}\" not found")]
    ControlNotFound(&'static str),

    #[error("Transcript did not appear within {} ms", .waited.as_millis())]
    TranscriptUnavailable { attempts: u32, waited: Duration },

    #[error("No text in transcript panel")]
    EmptyTranscript,

    #[error("Page interaction failed: {0}")]
    Page(#[from] PageError),
}

/// Where the transcript text was found
#[derive(Debug)]
enum Content {
    Segments(Vec<ElementHandle>),
    Container(ElementHandle),
}

/// Drives the watch page until its transcript panel is open and reads it
pub struct TranscriptExtractor {
    page: Arc<dyn Page>,
    config: ExtractionConfig,
}

impl TranscriptExtractor {
    pub fn new(page: Arc<dyn Page>, config: ExtractionConfig) -> Self {
        Self { page, config }
    }

    /// Run one extraction attempt against the attached page.
    ///
    /// Never fails: every error is folded into the returned result, which
    /// always carries the page URL and a best-effort title.
    pub async fn extract(&self) -> ExtractionResult {
        let video_url = match self.page.current_url().await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Could not read page URL: {}", e);
                String::new()
            }
        };

        let outcome = self.run(&video_url).await;
        let video_title = self.video_title().await;

        match outcome {
            Ok(transcript) => {
                tracing::info!(
                    "Extracted transcript for \"{}\" ({} chars)",
                    video_title,
                    transcript.len()
                );
                ExtractionResult::success(transcript, video_title, video_url)
            }
            Err(e) => {
                tracing::warn!("Transcript extraction failed: {}", e);
                ExtractionResult::failure(e.to_string(), video_title, video_url)
            }
        }
    }

    async fn run(&self, video_url: &str) -> Result<String, TranscriptError> {
        if !utils::is_watch_page(video_url) {
            return Err(TranscriptError::NotVideoPage);
        }

        self.expand_description().await;
        self.open_transcript().await?;

        let transcript = match self.await_content().await {
            Ok(content) => self.harvest(content).await,
            Err(e) => Err(e),
        };

        if self.config.close_panel {
            self.close_panel().await;
        }

        transcript
    }

    /// First element matched by any of the locators, tried in order
    async fn first_match(&self, locators: &[Locator]) -> Result<Option<ElementHandle>, PageError> {
        for locator in locators {
            if let Some(handle) = self.page.find_element(locator).await? {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    /// Click the description expander if there is one. Its absence is normal
    /// on pages where the description is already expanded.
    async fn expand_description(&self) {
        match self.first_match(selectors::EXPANDER).await {
            Ok(Some(handle)) => match self.page.click(&handle).await {
                Ok(()) => tracing::debug!("Clicked description expander ({})", handle.locator),
                Err(e) => tracing::warn!("Description expander click failed: {}", e),
            },
            Ok(None) => tracing::warn!("\"...more\" not found"),
            Err(e) => tracing::warn!("Description expander lookup failed: {}", e),
        }

        self.page.wait(self.config.expand_settle()).await;
    }

    async fn open_transcript(&self) -> Result<(), TranscriptError> {
        let handle = self
            .first_match(selectors::TRANSCRIPT_BUTTON)
            .await?
            .ok_or(TranscriptError::ControlNotFound("Show transcript"))?;

        self.page.click(&handle).await?;
        tracing::debug!("Clicked \"Show transcript\" ({})", handle.locator);

        self.page.wait(self.config.open_settle()).await;
        Ok(())
    }

    /// Poll until segments or the legacy container exist, up to the
    /// configured number of attempts
    async fn await_content(&self) -> Result<Content, TranscriptError> {
        let interval = self.config.poll_interval();

        for attempt in 1..=self.config.max_poll_attempts {
            if let Some(content) = self.locate_content().await? {
                tracing::debug!("Transcript content located on attempt {}", attempt);
                return Ok(content);
            }
            self.page.wait(interval).await;
        }

        Err(TranscriptError::TranscriptUnavailable {
            attempts: self.config.max_poll_attempts,
            waited: interval * self.config.max_poll_attempts,
        })
    }

    async fn locate_content(&self) -> Result<Option<Content>, PageError> {
        let segments = self.page.find_all(&selectors::SEGMENTS).await?;
        if !segments.is_empty() {
            return Ok(Some(Content::Segments(segments)));
        }

        Ok(self
            .page
            .find_element(&selectors::CONTAINER)
            .await?
            .map(Content::Container))
    }

    async fn harvest(&self, content: Content) -> Result<String, TranscriptError> {
        let transcript = match content {
            Content::Segments(handles) => {
                let mut texts = Vec::with_capacity(handles.len());
                for handle in &handles {
                    texts.push(self.page.text_of(handle).await?);
                }
                tracing::debug!("Harvested {} transcript segments", texts.len());
                normalize::join_segments(&texts)
            }
            Content::Container(handle) => {
                let raw = self.page.text_of(&handle).await?;
                tracing::debug!("Harvested legacy transcript container");
                normalize::clean_container_text(&raw)
            }
        };

        if transcript.is_empty() {
            return Err(TranscriptError::EmptyTranscript);
        }
        Ok(transcript)
    }

    /// Best effort: leave the page as the user had it
    async fn close_panel(&self) {
        let closed = match self.first_match(selectors::CLOSE_PANEL).await {
            Ok(Some(handle)) => self.page.click(&handle).await,
            Ok(None) => {
                tracing::debug!("No transcript close control found");
                return;
            }
            Err(e) => Err(e),
        };

        if let Err(e) = closed {
            tracing::debug!("Closing transcript panel failed: {}", e);
        }
    }

    async fn video_title(&self) -> String {
        for locator in selectors::TITLE {
            let handle = match self.page.find_element(locator).await {
                Ok(Some(handle)) => handle,
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!("Title lookup via {} failed: {}", locator, e);
                    continue;
                }
            };

            if let Ok(text) = self.page.text_of(&handle).await {
                let title = text.trim();
                if !title.is_empty() {
                    return title.to_string();
                }
            }
        }

        UNKNOWN_TITLE.to_string()
    }
}
