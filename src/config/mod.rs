use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::providers::ProviderId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Summarization settings
    pub ai: AiConfig,

    /// Transcript extraction timing
    pub extraction: ExtractionConfig,

    /// Browser launch settings
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Provider used for summaries
    pub provider: ProviderId,

    /// API key for the provider
    pub api_key: Option<String>,

    /// Prompt sent ahead of the transcript
    pub custom_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Wait after clicking the description expander
    pub expand_settle_ms: u64,

    /// Wait after clicking "Show transcript"
    pub open_settle_ms: u64,

    /// Delay between transcript polls
    pub poll_interval_ms: u64,

    /// Polls before giving up on the transcript
    pub max_poll_attempts: u32,

    /// Wait after injecting the page agent before retrying
    pub injection_settle_ms: u64,

    /// Close the transcript panel once read
    pub close_panel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run Chrome without a window
    pub headless: bool,

    /// Chrome binary (auto-detected if not set)
    pub chrome_path: Option<PathBuf>,

    /// Wait after navigation before touching the page
    pub navigation_settle_ms: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            expand_settle_ms: 3000,
            open_settle_ms: 1000,
            poll_interval_ms: 100,
            max_poll_attempts: 50,
            injection_settle_ms: 1000,
            close_panel: true,
        }
    }
}

impl ExtractionConfig {
    pub fn expand_settle(&self) -> Duration {
        Duration::from_millis(self.expand_settle_ms)
    }

    pub fn open_settle(&self) -> Duration {
        Duration::from_millis(self.open_settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn injection_settle(&self) -> Duration {
        Duration::from_millis(self.injection_settle_ms)
    }

    /// Upper bound on the time spent polling for the transcript
    pub fn poll_ceiling(&self) -> Duration {
        self.poll_interval() * self.max_poll_attempts
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            navigation_settle_ms: 2000,
        }
    }
}

impl AiConfig {
    /// Credential to use: the saved key, else the provider's environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var(self.provider.api_key_env())
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }

    /// The saved custom prompt, else the provider's default prompt
    pub fn resolve_prompt(&self) -> String {
        self.custom_prompt
            .as_deref()
            .map(str::trim)
            .filter(|prompt| !prompt.is_empty())
            .unwrap_or_else(|| self.provider.default_prompt())
            .to_string()
    }
}

impl Config {
    /// Load configuration from file, or defaults if there is none yet
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("yt-summarizer").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.extraction.poll_interval_ms == 0 {
            anyhow::bail!("extraction.poll_interval_ms must be greater than zero");
        }

        if self.extraction.max_poll_attempts == 0 {
            anyhow::bail!("extraction.max_poll_attempts must be greater than zero");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Provider: {}", self.ai.provider.display_name());
        println!(
            "  API Key: {}",
            self.ai.api_key.as_deref().map(mask_key).unwrap_or_else(|| "(not set)".to_string())
        );
        println!("  Prompt: {}", self.ai.resolve_prompt());
        println!(
            "  Transcript wait: up to {}ms (every {}ms)",
            self.extraction.poll_ceiling().as_millis(),
            self.extraction.poll_interval_ms
        );
        println!("  Close panel afterwards: {}", self.extraction.close_panel);
        println!("  Headless browser: {}", self.browser.headless);
        if let Some(path) = &self.browser.chrome_path {
            println!("  Chrome: {}", path.display());
        }
    }
}

/// Show only the last four characters of a secret
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
