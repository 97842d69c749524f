use crate::browser::wait::{describe_locator, WaitError, WaitPolicy};
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};
use std::time::Instant;
use tokio::time::sleep;
use url::Url;

/// DOM-level helpers over one browser session.
///
/// Lookups come in two flavors: [`find`](Page::find) / [`find_all`](Page::find_all)
/// query the page exactly once, while the `wait_*` methods poll under a
/// [`WaitPolicy`] until the condition holds or the deadline passes.
#[derive(Clone)]
pub struct Page {
    client: Client,
}

impl Page {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Navigate the session to `url`.
    pub async fn goto(&self, url: &str) -> Result<(), CmdError> {
        self.client.goto(url).await
    }

    /// URL the browser currently shows.
    pub async fn current_url(&self) -> Result<Url, CmdError> {
        self.client.current_url().await
    }

    /// Single lookup with no wait.
    pub async fn find(&self, locator: Locator<'_>) -> Result<PageElement, CmdError> {
        let element = self.client.find(locator).await?;
        Ok(PageElement::new(element))
    }

    /// Every match, in document order, with no wait.
    pub async fn find_all(&self, locator: Locator<'_>) -> Result<Vec<PageElement>, CmdError> {
        let elements = self.client.find_all(locator).await?;
        Ok(elements.into_iter().map(PageElement::new).collect())
    }

    /// Poll until at least one element matches `locator`.
    pub async fn wait_present(
        &self,
        locator: Locator<'_>,
        policy: &WaitPolicy,
    ) -> Result<PageElement, WaitError> {
        let started = Instant::now();
        loop {
            match self.client.find(locator).await {
                Ok(element) => return Ok(PageElement::new(element)),
                Err(err) if err.is_no_such_element() => {}
                Err(other) => return Err(WaitError::Command(other)),
            }
            if started.elapsed() >= policy.timeout {
                return Err(WaitError::NotFound {
                    locator: describe_locator(&locator),
                    waited: started.elapsed(),
                });
            }
            sleep(policy.poll).await;
        }
    }

    /// Poll until the element is displayed and enabled. Returns the element
    /// unclicked so the caller decides what to do with it.
    // FIXME: a handle going stale between find and the displayed check
    // surfaces as Command; re-find within the deadline instead of failing
    // the whole wait.
    pub async fn wait_clickable(
        &self,
        locator: Locator<'_>,
        policy: &WaitPolicy,
    ) -> Result<PageElement, WaitError> {
        let started = Instant::now();
        let mut located = false;
        loop {
            match self.client.find(locator).await {
                Ok(element) => {
                    located = true;
                    if element.is_displayed().await? && element.is_enabled().await? {
                        return Ok(PageElement::new(element));
                    }
                }
                Err(err) if err.is_no_such_element() => {}
                Err(other) => return Err(WaitError::Command(other)),
            }
            if started.elapsed() >= policy.timeout {
                let locator = describe_locator(&locator);
                let waited = started.elapsed();
                return Err(if located {
                    WaitError::NotClickable { locator, waited }
                } else {
                    WaitError::NotFound { locator, waited }
                });
            }
            sleep(policy.poll).await;
        }
    }
}

/// One located DOM element.
#[derive(Clone)]
pub struct PageElement {
    element: Element,
}

impl PageElement {
    fn new(element: Element) -> Self {
        Self { element }
    }

    /// Type `text` into the element.
    pub async fn send_keys(&self, text: &str) -> Result<(), CmdError> {
        self.element.send_keys(text).await
    }

    /// Click the element. Consumes the handle since navigation may follow.
    pub async fn click(self) -> Result<(), CmdError> {
        self.element.click().await?;
        Ok(())
    }

    /// The element's visible text.
    pub async fn text(&self) -> Result<String, CmdError> {
        self.element.text().await
    }
}
