use crate::browser::page::Page;
use fantoccini::error::{CmdError, NewSessionError};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;
use webdriver::capabilities::Capabilities;

/// Where and how to launch the browser session.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// WebDriver endpoint; Chromedriver listens on `http://localhost:9515`.
    pub webdriver_url: String,
    /// Run without a visible window.
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
        }
    }
}

/// The browser session could not be acquired.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not open a WebDriver session at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: NewSessionError,
    },
}

/// Exclusive handle on one browser session.
///
/// Exactly one exists per run; [`Browser::close`] consumes it so the session
/// cannot be used after teardown.
pub struct Browser {
    client: Client,
}

impl Browser {
    /// Open a new session against a running WebDriver service.
    pub async fn launch(config: &BrowserConfig) -> Result<Self, SessionError> {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();

        let mut args: Vec<String> = Vec::new();
        if config.headless {
            args.push("--headless".to_string());
            args.push("--disable-gpu".to_string());
        }
        chrome_opts.insert("args".to_string(), json!(args));
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        debug!(
            url = %config.webdriver_url,
            headless = config.headless,
            "connecting to webdriver"
        );
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await
            .map_err(|source| SessionError::Connect {
                url: config.webdriver_url.clone(),
                source,
            })?;

        Ok(Self { client })
    }

    /// Hand out a [`Page`] sharing this session.
    pub fn page(&self) -> Page {
        Page::new(self.client.clone())
    }

    /// End the WebDriver session.
    pub async fn close(self) -> Result<(), CmdError> {
        self.client.close().await
    }
}
