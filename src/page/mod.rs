use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

pub mod chrome;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

pub use chrome::ChromePage;
#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedPage;

/// How an element is located on the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    /// CSS selector
    Css(&'static str),

    /// Element whose trimmed visible text equals the given string
    Text(&'static str),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css `{}`", selector),
            Locator::Text(text) => write!(f, "text \"{}\"", text),
        }
    }
}

/// Reference to an element previously returned by a [`Page`] lookup.
///
/// Handles are positional: the `index`-th match of `locator` in document
/// order at the time of the lookup. Backends re-resolve them on use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    pub locator: Locator,
    pub index: usize,
}

impl ElementHandle {
    pub fn new(locator: Locator, index: usize) -> Self {
        Self { locator, index }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PageError {
    #[error("Element no longer present: {0}")]
    StaleElement(Locator),

    #[error("Browser error: {0}")]
    Backend(String),
}

/// The operations the transcript extractor needs from a live page.
///
/// The host page is an uncontrolled mutable resource; everything the
/// extractor does to it goes through this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Page: Send + Sync {
    /// Full URL of the document currently loaded
    async fn current_url(&self) -> Result<String, PageError>;

    /// First element matching the locator, if any
    async fn find_element(&self, locator: &Locator) -> Result<Option<ElementHandle>, PageError>;

    /// All elements matching the locator, in document order
    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementHandle>, PageError>;

    async fn click(&self, handle: &ElementHandle) -> Result<(), PageError>;

    /// Rendered text content of the element
    async fn text_of(&self, handle: &ElementHandle) -> Result<String, PageError>;

    /// Suspend for the given duration
    async fn wait(&self, duration: Duration);
}
