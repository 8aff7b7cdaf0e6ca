//! Host-page locators, in priority order.
//!
//! These mirror YouTube's markup and break whenever YouTube changes it.

use crate::page::Locator;

/// Description expander ("...more")
pub const EXPANDER: &[Locator] = &[
    Locator::Text("...more"),
    Locator::Css("tp-yt-paper-button#expand"),
];

/// Button that opens the transcript engagement panel
pub const TRANSCRIPT_BUTTON: &[Locator] = &[
    Locator::Css(r#"[aria-label="Show transcript"]"#),
    Locator::Css("ytd-video-description-transcript-section-renderer button"),
];

/// Discrete transcript segments inside the engagement panel
pub const SEGMENTS: Locator = Locator::Css(
    r#"[target-id="engagement-panel-searchable-transcript"] ytd-transcript-segment-renderer .segment-text"#,
);

/// Legacy container holding every segment, timestamps included
pub const CONTAINER: Locator = Locator::Css("#segments-container");

/// Controls that close the transcript panel again
pub const CLOSE_PANEL: &[Locator] = &[
    Locator::Css(r#"[aria-label="Close transcript"]"#),
    Locator::Css("ytd-engagement-panel-title-header-renderer #visibility-button button"),
];

pub const TITLE: &[Locator] = &[
    Locator::Css("h1.ytd-watch-metadata"),
    Locator::Css("h1.ytd-video-primary-info-renderer"),
    Locator::Css("h1.title"),
    Locator::Css("h1"),
    Locator::Css(r#"[data-testid="video-title"]"#),
];
