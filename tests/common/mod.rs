#![allow(dead_code)]

use std::sync::Arc;

use yt_summarizer::config::{AiConfig, ExtractionConfig};
use yt_summarizer::page::ScriptedPage;
use yt_summarizer::{AttachedTab, MessageBridge, ProviderId};

pub const SEGMENTS: [&str; 3] = ["Welcome back", "today we talk   about", "borrow checking"];

/// Extraction settings with a short injection settle so bridge retries stay fast
pub fn fast_config() -> ExtractionConfig {
    ExtractionConfig {
        injection_settle_ms: 10,
        ..ExtractionConfig::default()
    }
}

pub fn bridge_for(page: &Arc<ScriptedPage>) -> MessageBridge<AttachedTab> {
    let config = fast_config();
    let settle = config.injection_settle();
    MessageBridge::new(AttachedTab::new(page.clone(), config), settle)
}

pub fn ai_settings(provider: ProviderId, api_key: &str) -> AiConfig {
    AiConfig {
        provider,
        api_key: Some(api_key.to_string()),
        custom_prompt: None,
    }
}
