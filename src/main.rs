use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_summarizer::bridge::{AttachedTab, MessageBridge};
use yt_summarizer::cli::{Cli, Commands, OutputFormat};
use yt_summarizer::config::Config;
use yt_summarizer::output::{self, SummaryReport};
use yt_summarizer::page::ChromePage;
use yt_summarizer::providers::{AiDispatcher, ProviderId};
use yt_summarizer::{utils, SummarizerError, SummaryPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "ytsum=debug,yt_summarizer=debug"
    } else {
        "ytsum=info,yt_summarizer=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load().await?;

    match cli.command {
        Commands::Extract {
            url,
            output,
            format,
            show_browser,
        } => {
            if show_browser {
                config.browser.headless = false;
            }
            let pipeline = SummaryPipeline::new(AiDispatcher::default(), config.ai.clone());
            let report = run(&pipeline, &config, &url, false, cli.quiet).await?;
            emit(&report, output, &format).await?;
        }
        Commands::Summarize {
            url,
            output,
            format,
            provider,
            api_key,
            prompt,
            show_browser,
        } => {
            if show_browser {
                config.browser.headless = false;
            }
            if let Some(provider) = provider {
                config.ai.provider = parse_provider(&provider)?;
            }
            if api_key.is_some() {
                config.ai.api_key = api_key;
            }
            if prompt.is_some() {
                config.ai.custom_prompt = prompt;
            }

            let pipeline = SummaryPipeline::new(AiDispatcher::default(), config.ai.clone());
            let report = run(&pipeline, &config, &url, true, cli.quiet).await?;
            emit(&report, output, &format).await?;
        }
        Commands::Config {
            show,
            provider,
            api_key,
            prompt,
        } => {
            let changed = provider.is_some() || api_key.is_some() || prompt.is_some();

            if let Some(provider) = provider {
                config.ai.provider = parse_provider(&provider)?;
            }
            if let Some(api_key) = api_key {
                config.ai.api_key = Some(api_key).filter(|key| !key.is_empty());
            }
            if let Some(prompt) = prompt {
                config.ai.custom_prompt = Some(prompt).filter(|p| !p.trim().is_empty());
            }

            if changed {
                let path = config.save().await?;
                println!("{} Settings saved to {}", style("✓").green(), path.display());
            }
            if show || !changed {
                config.display();
            }
        }
        Commands::Providers => {
            println!("Supported AI providers:");
            for id in ProviderId::ALL {
                println!(
                    "  • {:<12} {} (key: {} or ${})",
                    id.as_str(),
                    id.display_name(),
                    id.key_url(),
                    id.api_key_env()
                );
            }
        }
    }

    Ok(())
}

fn parse_provider(name: &str) -> Result<ProviderId> {
    name.parse::<ProviderId>()
        .map_err(|e| anyhow::anyhow!("{}. Run `ytsum providers` to list supported providers.", e))
}

/// Open the video, pull its transcript through the bridge and optionally summarize it
async fn run(
    pipeline: &SummaryPipeline,
    config: &Config,
    url: &str,
    summarize: bool,
    quiet: bool,
) -> Result<SummaryReport> {
    let started = Instant::now();
    let watch_url = utils::to_watch_url(url)?;

    let progress = spinner(quiet);
    progress.set_message("Opening video page...");

    let outcome = async {
        let page = ChromePage::open(&watch_url, &config.browser).await?;
        let tab = AttachedTab::new(Arc::new(page), config.extraction.clone());
        let bridge = MessageBridge::new(tab, config.extraction.injection_settle());

        progress.set_message("Extracting transcript...");
        let report = pipeline.extract(&bridge).await?;

        if summarize {
            progress.set_message(format!(
                "Generating summary with {}...",
                pipeline.settings().provider.display_name()
            ));
            return pipeline.summarize(report).await;
        }

        Ok::<_, SummarizerError>(report)
    }
    .await;

    match outcome {
        Ok(report) => {
            progress.finish_with_message(format!(
                "Done in {}",
                utils::format_duration(started.elapsed().as_secs_f64())
            ));
            tracing::info!("Processed \"{}\"", report.video_title);
            Ok(report)
        }
        Err(e) => {
            progress.finish_and_clear();
            eprintln!("{} {}", style("✗").red(), e);
            eprintln!("  {}", style(e.remedy()).dim());
            Err(e.into())
        }
    }
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        progress.set_style(style);
    }
    progress.enable_steady_tick(std::time::Duration::from_millis(120));
    progress
}

async fn emit(report: &SummaryReport, path: Option<PathBuf>, format: &OutputFormat) -> Result<()> {
    tracing::debug!("Rendering report as {}", format);
    match path {
        Some(path) => {
            output::save_to_file(report, &path, format).await?;
            println!("Saved to: {}", path.display());
        }
        None => output::print_to_console(report, format)?,
    }
    Ok(())
}
