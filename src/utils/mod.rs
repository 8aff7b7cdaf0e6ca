use anyhow::Result;
use url::Url;

/// Hosts serving the desktop and mobile watch pages
const WATCH_HOSTS: &[&str] = &["www.youtube.com", "youtube.com", "m.youtube.com"];

/// Validate a URL and return normalized version
pub fn validate_and_normalize_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url)
        .map_err(|_| anyhow::anyhow!("Invalid URL format: {}", url))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("URL must use HTTP or HTTPS protocol");
    }

    Ok(parsed.to_string())
}

/// Whether the URL is a YouTube video watch page
pub fn is_watch_page(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    parsed
        .host_str()
        .is_some_and(|host| WATCH_HOSTS.contains(&host))
        && parsed.path() == "/watch"
}

/// The `v` parameter of a watch page URL, or the path of a youtu.be link
pub fn extract_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    if parsed.host_str() == Some("youtu.be") {
        return parsed
            .path_segments()?
            .next()
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }

    parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}

/// Turn any supported YouTube link into its desktop watch page URL
pub fn to_watch_url(url: &str) -> Result<String> {
    let normalized = validate_and_normalize_url(url)?;
    if is_watch_page(&normalized) {
        return Ok(normalized);
    }

    let video_id = extract_video_id(&normalized)
        .ok_or_else(|| anyhow::anyhow!("Not a YouTube video URL: {}", url))?;

    Ok(format!("https://www.youtube.com/watch?v={}", video_id))
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}
