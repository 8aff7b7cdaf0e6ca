use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "YouTube Transcript Summarizer - Extract a video's transcript and summarize it with AI",
    version,
    long_about = "Opens a YouTube video in Chrome, reveals its transcript panel, reads the transcript and optionally summarizes it with OpenAI, Anthropic, xAI Grok or Hugging Face."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the transcript of a YouTube video
    Extract {
        /// YouTube video URL (watch page or youtu.be link)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Show the browser window instead of running headless
        #[arg(long)]
        show_browser: bool,
    },

    /// Extract the transcript and summarize it
    Summarize {
        /// YouTube video URL (watch page or youtu.be link)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        /// AI provider (openai, anthropic, grok, huggingface); overrides the saved setting
        #[arg(short, long, value_name = "PROVIDER")]
        provider: Option<String>,

        /// API key for the provider; overrides the saved setting
        #[arg(long, env = "YTSUM_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Prompt sent ahead of the transcript; overrides the saved setting
        #[arg(long, value_name = "TEXT")]
        prompt: Option<String>,

        /// Show the browser window instead of running headless
        #[arg(long)]
        show_browser: bool,
    },

    /// Show or change saved settings
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Provider to save
        #[arg(long, value_name = "PROVIDER")]
        provider: Option<String>,

        /// API key to save
        #[arg(long)]
        api_key: Option<String>,

        /// Custom prompt to save (empty string restores the provider default)
        #[arg(long, value_name = "TEXT")]
        prompt: Option<String>,
    },

    /// List supported AI providers
    Providers,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// Markdown document
    Markdown,
    /// JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
