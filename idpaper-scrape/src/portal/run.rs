//! End-to-end scrape run.
//!
//! [`run_scrape`] owns the session lifecycle: launch, drive the portal flow,
//! optionally linger, then close. The close happens on every exit path once
//! a session exists, and a close failure is logged rather than allowed to
//! mask the run's own outcome.

use idpaper_config::{ScrapeConfig, WaitConfig};
use idpaper_drivers::browser::{self, Browser, CmdError, SessionError, WaitError, WaitPolicy};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use super::login::{sign_in, SubmitPath};
use super::report::{ContentBlock, ReportWriter};
use super::{landed_back_on_login, login_url, results_url, CONTENT_BLOCKS};

/// Where a scrape run failed.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The WebDriver session never came up.
    #[error("could not start a browser session")]
    Session(#[from] SessionError),

    /// A login-form element could not be worked with in time.
    #[error("login failed")]
    Login(#[source] WaitError),

    /// The results page rendered without any description blocks. The report
    /// file is not touched in this case.
    #[error("no description blocks appeared on the results page")]
    MissingContent(#[source] WaitError),

    /// The report file could not be created or written.
    #[error("could not write the report to {}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A WebDriver command failed outside any wait.
    #[error("webdriver command failed")]
    Command(#[from] CmdError),
}

/// The configured wait timeouts resolved into per-operation policies.
#[derive(Debug, Clone, Copy)]
pub struct Waits {
    pub element: WaitPolicy,
    pub clickable: WaitPolicy,
    pub content: WaitPolicy,
}

impl From<&WaitConfig> for Waits {
    fn from(config: &WaitConfig) -> Self {
        let poll = Duration::from_millis(config.poll_millis);
        Self {
            element: WaitPolicy::with_poll(Duration::from_secs(config.element_secs), poll),
            clickable: WaitPolicy::with_poll(Duration::from_secs(config.clickable_secs), poll),
            content: WaitPolicy::with_poll(Duration::from_secs(config.content_secs), poll),
        }
    }
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub submit_path: SubmitPath,
    pub post_login_url: Url,
    pub blocks: usize,
    pub output_path: PathBuf,
}

/// Run the whole workflow: launch a session, log in, capture the report.
pub async fn run_scrape(config: &ScrapeConfig) -> Result<RunSummary, ScrapeError> {
    let run_id = Uuid::new_v4();
    info!(%run_id, portal = %config.portal.base_url, "starting scrape run");

    let browser_config = browser::BrowserConfig {
        webdriver_url: config.browser.webdriver_url.clone(),
        headless: config.browser.headless,
    };
    let browser = Browser::launch(&browser_config).await?;

    let outcome = drive(&browser, config, run_id).await;

    // Linger applies only to completed runs; failed ones tear down at once.
    if outcome.is_ok() && config.linger_secs > 0 {
        info!(seconds = config.linger_secs, "holding the browser open");
        sleep(Duration::from_secs(config.linger_secs)).await;
    }

    if let Err(err) = browser.close().await {
        warn!(error = %err, "webdriver session did not close cleanly");
    }

    outcome
}

async fn drive(
    browser: &Browser,
    config: &ScrapeConfig,
    run_id: Uuid,
) -> Result<RunSummary, ScrapeError> {
    let waits = Waits::from(&config.waits);
    let page = browser.page();

    page.goto(&login_url(&config.portal.base_url)).await?;
    let submit_path = sign_in(&page, &config.credentials, &waits).await?;

    // The portal answers bad credentials by re-rendering the form, not with
    // an error we can read, so a login-area URL here is only a warning.
    let url = page.current_url().await?;
    info!(%url, "logged in");
    if landed_back_on_login(&url) {
        warn!(%url, "still on a login page after submit; proceeding anyway");
    }

    page.goto(&results_url(&config.portal.base_url, config.portal.report_type))
        .await?;

    page.wait_present(CONTENT_BLOCKS, &waits.content)
        .await
        .map_err(ScrapeError::MissingContent)?;
    let elements = page.find_all(CONTENT_BLOCKS).await?;
    info!(count = elements.len(), "found description blocks");

    // Created only after content is known to exist, so a failed run never
    // clobbers an earlier report.
    let output_path = config.portal.output_path.clone();
    let mut writer = ReportWriter::create(&output_path).map_err(|source| ScrapeError::Output {
        path: output_path.clone(),
        source,
    })?;

    let mut blocks = 0;
    for (index, element) in elements.iter().enumerate() {
        let block = ContentBlock {
            ordinal: index + 1,
            text: element.text().await?,
        };
        writer
            .write_block(&block)
            .map_err(|source| ScrapeError::Output {
                path: output_path.clone(),
                source,
            })?;
        blocks += 1;
    }

    info!(path = %output_path.display(), blocks, "saved results");

    Ok(RunSummary {
        run_id,
        submit_path,
        post_login_url: url,
        blocks,
        output_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_resolve_from_configured_seconds() {
        let config = WaitConfig {
            element_secs: 2,
            clickable_secs: 9,
            content_secs: 30,
            poll_millis: 100,
        };
        let waits = Waits::from(&config);
        let poll = Duration::from_millis(100);
        assert_eq!(waits.element, WaitPolicy::with_poll(Duration::from_secs(2), poll));
        assert_eq!(waits.clickable, WaitPolicy::with_poll(Duration::from_secs(9), poll));
        assert_eq!(waits.content, WaitPolicy::with_poll(Duration::from_secs(30), poll));
    }

    #[test]
    fn output_errors_name_the_report_path() {
        let err = ScrapeError::Output {
            path: PathBuf::from("reports/result.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("result.txt"), "got: {message}");
    }
}
