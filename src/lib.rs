//! YouTube Transcript Summarizer - read a video's transcript off its watch page and summarize it
//!
//! The transcript is scraped by driving the watch page itself (opening the
//! transcript panel and reading its segments), relayed from the page agent
//! through a message bridge, and optionally summarized by OpenAI, Anthropic,
//! xAI Grok or Hugging Face.

pub mod bridge;
pub mod cli;
pub mod config;
pub mod extractor;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod providers;
pub mod utils;

pub use bridge::{AttachedTab, BridgeError, MessageBridge, TabMessenger};
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractor::{ExtractionResult, TranscriptExtractor};
pub use output::SummaryReport;
pub use page::{Page, PageError};
pub use pipeline::SummaryPipeline;
pub use providers::{AiDispatcher, ProviderError, ProviderId, SummaryProvider};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the summarizer
#[derive(thiserror::Error, Debug)]
pub enum SummarizerError {
    #[error(transparent)]
    Communication(#[from] BridgeError),

    #[error("Transcript extraction failed: {0}")]
    Extraction(String),

    #[error("Failed to generate summary: {0}")]
    Summary(#[from] ProviderError),

    #[error(transparent)]
    Browser(#[from] PageError),
}

impl SummarizerError {
    /// What the user can do about it
    pub fn remedy(&self) -> &'static str {
        match self {
            SummarizerError::Communication(_) => "Reload the video page and try again.",
            SummarizerError::Extraction(_) => {
                "Check that the video has a transcript, or try a different video."
            }
            SummarizerError::Summary(ProviderError::UnsupportedProvider(_)) => {
                "Run `ytsum providers` to list supported providers."
            }
            SummarizerError::Summary(_) => {
                "Check your API key and provider with `ytsum config --show`."
            }
            SummarizerError::Browser(_) => {
                "Check that Chrome is installed, or set browser.chrome_path in the config."
            }
        }
    }
}
