use async_trait::async_trait;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;

use super::{ElementHandle, Locator, Page, PageError};
use crate::config::BrowserConfig;

/// A Chrome tab driven over the DevTools protocol
pub struct ChromePage {
    // Dropping the browser closes the tab
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromePage {
    /// Launch Chrome and load the given URL
    pub async fn open(url: &str, config: &BrowserConfig) -> Result<Self, PageError> {
        let headless = config.headless;
        let path = config.chrome_path.clone();
        let target = url.to_string();

        let (browser, tab) = run_blocking(move || {
            let browser = Browser::new(LaunchOptions {
                headless,
                path,
                ..Default::default()
            })
            .map_err(|e| PageError::Backend(format!("Failed to launch browser: {}", e)))?;

            let tab = browser
                .new_tab()
                .map_err(|e| PageError::Backend(format!("Failed to create tab: {}", e)))?;

            tab.navigate_to(&target)
                .map_err(|e| PageError::Backend(format!("Failed to navigate: {}", e)))?;
            tab.wait_until_navigated()
                .map_err(|e| PageError::Backend(format!("Failed to wait for navigation: {}", e)))?;

            Ok((browser, tab))
        })
        .await?;

        tracing::debug!("Loaded {} in Chrome", url);

        // The watch page keeps hydrating after the load event
        tokio::time::sleep(Duration::from_millis(config.navigation_settle_ms)).await;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    async fn with_tab<T, F>(&self, f: F) -> Result<T, PageError>
    where
        T: Send + 'static,
        F: FnOnce(&Tab) -> Result<T, PageError> + Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        run_blocking(move || f(&tab)).await
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, PageError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PageError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PageError::Backend(format!("Browser task failed: {}", e)))?
}

/// XPath matching elements whose own normalized text equals `text`
fn text_xpath(text: &str) -> String {
    if text.contains('\'') {
        format!("//*[normalize-space(text())=\"{}\"]", text)
    } else {
        format!("//*[normalize-space(text())='{}']", text)
    }
}

/// All current matches for a locator. `headless_chrome` reports "no match"
/// as an error, so lookup errors are treated as an empty result.
fn query<'a>(tab: &'a Tab, locator: &Locator) -> Vec<Element<'a>> {
    let found = match locator {
        Locator::Css(selector) => tab.find_elements(selector),
        Locator::Text(text) => tab.find_elements_by_xpath(&text_xpath(text)),
    };

    match found {
        Ok(elements) => elements,
        Err(e) => {
            tracing::trace!("No match for {}: {}", locator, e);
            Vec::new()
        }
    }
}

fn resolve<'a>(tab: &'a Tab, handle: &ElementHandle) -> Result<Element<'a>, PageError> {
    query(tab, &handle.locator)
        .into_iter()
        .nth(handle.index)
        .ok_or(PageError::StaleElement(handle.locator))
}

#[async_trait]
impl Page for ChromePage {
    async fn current_url(&self) -> Result<String, PageError> {
        Ok(self.tab.get_url())
    }

    async fn find_element(&self, locator: &Locator) -> Result<Option<ElementHandle>, PageError> {
        let locator = *locator;
        self.with_tab(move |tab| {
            let found = !query(tab, &locator).is_empty();
            Ok(found.then(|| ElementHandle::new(locator, 0)))
        })
        .await
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementHandle>, PageError> {
        let locator = *locator;
        self.with_tab(move |tab| {
            let count = query(tab, &locator).len();
            Ok((0..count).map(|index| ElementHandle::new(locator, index)).collect())
        })
        .await
    }

    async fn click(&self, handle: &ElementHandle) -> Result<(), PageError> {
        let handle = *handle;
        self.with_tab(move |tab| {
            resolve(tab, &handle)?
                .click()
                .map_err(|e| PageError::Backend(format!("Click on {} failed: {}", handle.locator, e)))?;
            Ok(())
        })
        .await
    }

    async fn text_of(&self, handle: &ElementHandle) -> Result<String, PageError> {
        let handle = *handle;
        self.with_tab(move |tab| {
            resolve(tab, &handle)?
                .get_inner_text()
                .map_err(|e| PageError::Backend(format!("Reading {} failed: {}", handle.locator, e)))
        })
        .await
    }

    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
