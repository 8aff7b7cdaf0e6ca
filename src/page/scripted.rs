//! In-memory page with scripted elements and a virtual clock.
//!
//! Elements can be present from the start or appear once another element has
//! been clicked, optionally after a delay measured on the page's own clock.
//! `wait` advances that clock instead of sleeping, so timing-dependent
//! sequences run instantly and deterministically.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::{ElementHandle, Locator, Page, PageError};
use crate::extractor::selectors;

#[derive(Debug, Clone)]
enum Appearance {
    Always,
    AfterClick { trigger: Locator, delay: Duration },
}

#[derive(Debug, Clone)]
struct ScriptedElement {
    locator: Locator,
    text: String,
    appearance: Appearance,
}

#[derive(Debug, Default)]
struct State {
    elements: Vec<ScriptedElement>,
    failing_clicks: HashSet<Locator>,
    clicked_at: HashMap<Locator, Duration>,
    clicks: Vec<Locator>,
    lookups: usize,
    elapsed: Duration,
}

impl State {
    fn is_visible(&self, element: &ScriptedElement) -> bool {
        match &element.appearance {
            Appearance::Always => true,
            Appearance::AfterClick { trigger, delay } => self
                .clicked_at
                .get(trigger)
                .is_some_and(|at| self.elapsed >= *at + *delay),
        }
    }

    fn visible(&self, locator: &Locator) -> Vec<&ScriptedElement> {
        self.elements
            .iter()
            .filter(|element| element.locator == *locator && self.is_visible(element))
            .collect()
    }
}

pub struct ScriptedPage {
    url: String,
    state: Mutex<State>,
}

impl ScriptedPage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: Mutex::new(State::default()),
        }
    }

    /// A watch page whose transcript segments show up one second after the
    /// transcript button is clicked
    pub fn watch_page(title: &str, segments: &[&str]) -> Self {
        let mut page = Self::new("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .with_element(selectors::TITLE[0], title)
            .with_element(selectors::EXPANDER[0], "...more")
            .with_element(selectors::TRANSCRIPT_BUTTON[0], "Show transcript")
            .with_element(selectors::CLOSE_PANEL[0], "");

        for segment in segments {
            page = page.with_revealed_element(
                selectors::SEGMENTS,
                segment,
                selectors::TRANSCRIPT_BUTTON[0],
                Duration::from_millis(1000),
            );
        }

        page
    }

    /// Element present from the start
    pub fn with_element(self, locator: Locator, text: &str) -> Self {
        self.push(ScriptedElement {
            locator,
            text: text.to_string(),
            appearance: Appearance::Always,
        })
    }

    /// Element that appears `delay` after `trigger` is first clicked
    pub fn with_revealed_element(
        self,
        locator: Locator,
        text: &str,
        trigger: Locator,
        delay: Duration,
    ) -> Self {
        self.push(ScriptedElement {
            locator,
            text: text.to_string(),
            appearance: Appearance::AfterClick { trigger, delay },
        })
    }

    /// Clicking elements matched by `locator` fails
    pub fn with_failing_click(self, locator: Locator) -> Self {
        self.lock().failing_clicks.insert(locator);
        self
    }

    fn push(self, element: ScriptedElement) -> Self {
        self.lock().elements.push(element);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a test thread panicked mid-update
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Locators clicked so far, in order
    pub fn clicks(&self) -> Vec<Locator> {
        self.lock().clicks.clone()
    }

    /// Number of `find_element`/`find_all` calls served
    pub fn lookups(&self) -> usize {
        self.lock().lookups
    }

    /// Virtual time spent in `wait`
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }
}

#[async_trait]
impl Page for ScriptedPage {
    async fn current_url(&self) -> Result<String, PageError> {
        Ok(self.url.clone())
    }

    async fn find_element(&self, locator: &Locator) -> Result<Option<ElementHandle>, PageError> {
        let mut state = self.lock();
        state.lookups += 1;
        let found = !state.visible(locator).is_empty();
        Ok(found.then(|| ElementHandle::new(*locator, 0)))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementHandle>, PageError> {
        let mut state = self.lock();
        state.lookups += 1;
        let count = state.visible(locator).len();
        Ok((0..count).map(|index| ElementHandle::new(*locator, index)).collect())
    }

    async fn click(&self, handle: &ElementHandle) -> Result<(), PageError> {
        let mut state = self.lock();
        if state.visible(&handle.locator).len() <= handle.index {
            return Err(PageError::StaleElement(handle.locator));
        }
        if state.failing_clicks.contains(&handle.locator) {
            return Err(PageError::Backend(format!("click on {} rejected", handle.locator)));
        }

        let now = state.elapsed;
        state.clicked_at.entry(handle.locator).or_insert(now);
        state.clicks.push(handle.locator);
        Ok(())
    }

    async fn text_of(&self, handle: &ElementHandle) -> Result<String, PageError> {
        let state = self.lock();
        state
            .visible(&handle.locator)
            .get(handle.index)
            .map(|element| element.text.clone())
            .ok_or(PageError::StaleElement(handle.locator))
    }

    async fn wait(&self, duration: Duration) {
        self.lock().elapsed += duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTON: Locator = Locator::Css("#button");
    const ITEM: Locator = Locator::Css(".item");

    #[tokio::test]
    async fn test_revealed_element_waits_for_click_and_delay() {
        let page = ScriptedPage::new("https://example.com")
            .with_element(BUTTON, "Go")
            .with_revealed_element(ITEM, "one", BUTTON, Duration::from_millis(200));

        assert!(page.find_element(&ITEM).await.unwrap().is_none());

        let button = page.find_element(&BUTTON).await.unwrap().unwrap();
        page.click(&button).await.unwrap();
        assert!(page.find_element(&ITEM).await.unwrap().is_none());

        page.wait(Duration::from_millis(200)).await;
        let item = page.find_element(&ITEM).await.unwrap().unwrap();
        assert_eq!(page.text_of(&item).await.unwrap(), "one");
        assert_eq!(page.clicks(), vec![BUTTON]);
        assert_eq!(page.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_find_all_preserves_order() {
        let page = ScriptedPage::new("https://example.com")
            .with_element(ITEM, "a")
            .with_element(BUTTON, "x")
            .with_element(ITEM, "b");

        let handles = page.find_all(&ITEM).await.unwrap();
        assert_eq!(handles.len(), 2);
        assert_eq!(page.text_of(&handles[1]).await.unwrap(), "b");
        assert_eq!(page.lookups(), 1);
    }

    #[tokio::test]
    async fn test_failing_click() {
        let page = ScriptedPage::new("https://example.com")
            .with_element(BUTTON, "Go")
            .with_failing_click(BUTTON);

        let button = page.find_element(&BUTTON).await.unwrap().unwrap();
        assert!(page.click(&button).await.is_err());
        assert!(page.clicks().is_empty());
    }

    #[test]
    fn test_stale_handle() {
        let page = ScriptedPage::new("https://example.com");
        let handle = ElementHandle::new(ITEM, 0);
        assert!(matches!(
            tokio_test::block_on(page.text_of(&handle)),
            Err(PageError::StaleElement(_))
        ));
    }
}
