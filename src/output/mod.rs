use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::providers::ProviderId;

/// A transcript and, if one was requested, its summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub video_title: String,
    pub video_url: String,
    pub transcript: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub provider: ProviderId,
    pub text: String,
}

impl SummaryReport {
    pub fn new(video_title: String, video_url: String, transcript: String) -> Self {
        Self {
            video_title,
            video_url,
            transcript,
            summary: None,
        }
    }

    pub fn with_summary(mut self, provider: ProviderId, text: String) -> Self {
        self.summary = Some(Summary { provider, text });
        self
    }
}

pub fn format_as_text(report: &SummaryReport) -> String {
    let mut out = format!("{}\n{}\n", report.video_title, report.video_url);

    if let Some(summary) = &report.summary {
        out.push_str(&format!(
            "\nSummary ({}):\n{}\n",
            summary.provider.display_name(),
            summary.text.trim()
        ));
    }

    out.push_str(&format!("\nTranscript:\n{}\n", report.transcript));
    out
}

/// Summaries usually come back as Markdown already, so they are embedded as-is
pub fn format_as_markdown(report: &SummaryReport) -> String {
    let mut out = format!("# {}\n\n<{}>\n", report.video_title, report.video_url);

    if let Some(summary) = &report.summary {
        out.push_str(&format!(
            "\n## Summary\n\n_Generated by {}_\n\n{}\n",
            summary.provider.display_name(),
            summary.text.trim()
        ));
    }

    out.push_str(&format!("\n## Transcript\n\n{}\n", report.transcript));
    out
}

pub fn format_as_json(report: &SummaryReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn render(report: &SummaryReport, format: &OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => format_as_text(report),
        OutputFormat::Markdown => format_as_markdown(report),
        OutputFormat::Json => format_as_json(report)?,
    })
}

/// Save report to file
pub async fn save_to_file(report: &SummaryReport, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = render(report, format)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print report to console
pub fn print_to_console(report: &SummaryReport, format: &OutputFormat) -> Result<()> {
    println!("{}", render(report, format)?);
    Ok(())
}
