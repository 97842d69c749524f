//! Credential entry and form submission.
//!
//! The submit control is located with the primary CSS locator under a
//! clickability wait. Only wait-classified failures (see
//! [`WaitError::warrants_fallback`]) move on to the structural XPath
//! fallback, which is clicked cold; anything else is fatal.

use async_trait::async_trait;
use idpaper_common::Credentials;
use idpaper_drivers::browser::{describe_locator, Page, WaitError, WaitPolicy};
use std::time::Duration;
use tracing::{info, warn};

use super::run::{ScrapeError, Waits};
use super::{PASSWORD_FIELD, SUBMIT_FALLBACK, SUBMIT_PRIMARY, USERNAME_FIELD};

/// Which locator strategy ended up submitting the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPath {
    Primary,
    Fallback,
}

/// Fill both credential fields and submit the form.
pub async fn sign_in(
    page: &Page,
    credentials: &Credentials,
    waits: &Waits,
) -> Result<SubmitPath, ScrapeError> {
    let username = page
        .wait_present(USERNAME_FIELD, &waits.element)
        .await
        .map_err(ScrapeError::Login)?;
    username.send_keys(&credentials.username).await?;

    let password = page
        .wait_present(PASSWORD_FIELD, &waits.element)
        .await
        .map_err(ScrapeError::Login)?;
    password.send_keys(&credentials.password).await?;

    let controls = PageSubmit {
        page,
        clickable: &waits.clickable,
    };
    let path = drive_submit(&controls).await.map_err(ScrapeError::Login)?;
    info!(?path, "login form submitted");
    Ok(path)
}

/// The two ways the submit control can be activated. Factored out so the
/// fallback decision is testable without a live session.
#[async_trait]
pub(crate) trait SubmitControls {
    async fn click_primary(&self) -> Result<(), WaitError>;
    async fn click_fallback(&self) -> Result<(), WaitError>;
}

pub(crate) async fn drive_submit<C>(controls: &C) -> Result<SubmitPath, WaitError>
where
    C: SubmitControls + Sync,
{
    match controls.click_primary().await {
        Ok(()) => Ok(SubmitPath::Primary),
        Err(err) if err.warrants_fallback() => {
            warn!(error = %err, "primary submit locator failed; trying the fallback");
            controls.click_fallback().await?;
            Ok(SubmitPath::Fallback)
        }
        Err(err) => Err(err),
    }
}

struct PageSubmit<'a> {
    page: &'a Page,
    clickable: &'a WaitPolicy,
}

#[async_trait]
impl SubmitControls for PageSubmit<'_> {
    async fn click_primary(&self) -> Result<(), WaitError> {
        let control = self.page.wait_clickable(SUBMIT_PRIMARY, self.clickable).await?;
        control.click().await.map_err(WaitError::Command)
    }

    async fn click_fallback(&self) -> Result<(), WaitError> {
        let control = self.page.find(SUBMIT_FALLBACK).await.map_err(|err| match err {
            err if err.is_no_such_element() => WaitError::NotFound {
                locator: describe_locator(&SUBMIT_FALLBACK),
                waited: Duration::ZERO,
            },
            other => WaitError::Command(other),
        })?;
        control.click().await.map_err(WaitError::Command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idpaper_drivers::browser::CmdError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        primary: fn() -> Result<(), WaitError>,
        fallback: fn() -> Result<(), WaitError>,
        fallback_clicks: AtomicUsize,
    }

    impl Scripted {
        fn new(
            primary: fn() -> Result<(), WaitError>,
            fallback: fn() -> Result<(), WaitError>,
        ) -> Self {
            Self {
                primary,
                fallback,
                fallback_clicks: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SubmitControls for Scripted {
        async fn click_primary(&self) -> Result<(), WaitError> {
            (self.primary)()
        }

        async fn click_fallback(&self) -> Result<(), WaitError> {
            self.fallback_clicks.fetch_add(1, Ordering::SeqCst);
            (self.fallback)()
        }
    }

    fn clicked() -> Result<(), WaitError> {
        Ok(())
    }

    fn not_clickable() -> Result<(), WaitError> {
        Err(WaitError::NotClickable {
            locator: "css `.login_box a[href='#']`".to_string(),
            waited: Duration::from_secs(10),
        })
    }

    fn not_found() -> Result<(), WaitError> {
        Err(WaitError::NotFound {
            locator: "css `.login_box a[href='#']`".to_string(),
            waited: Duration::from_secs(10),
        })
    }

    fn command_failure() -> Result<(), WaitError> {
        Err(WaitError::Command(CmdError::NotJson(
            "session went away".to_string(),
        )))
    }

    #[tokio::test]
    async fn primary_success_never_touches_the_fallback() {
        let controls = Scripted::new(clicked, clicked);
        let path = drive_submit(&controls).await.unwrap();
        assert_eq!(path, SubmitPath::Primary);
        assert_eq!(controls.fallback_clicks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unclickable_primary_falls_back_and_completes() {
        let controls = Scripted::new(not_clickable, clicked);
        let path = drive_submit(&controls).await.unwrap();
        assert_eq!(path, SubmitPath::Fallback);
        assert_eq!(controls.fallback_clicks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_primary_falls_back_and_completes() {
        let controls = Scripted::new(not_found, clicked);
        let path = drive_submit(&controls).await.unwrap();
        assert_eq!(path, SubmitPath::Fallback);
        assert_eq!(controls.fallback_clicks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn command_failures_do_not_fall_back() {
        let controls = Scripted::new(command_failure, clicked);
        let err = drive_submit(&controls).await.unwrap_err();
        assert!(matches!(err, WaitError::Command(_)));
        assert_eq!(controls.fallback_clicks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fallback_failure_is_fatal() {
        let controls = Scripted::new(not_clickable, not_found);
        let err = drive_submit(&controls).await.unwrap_err();
        assert!(matches!(err, WaitError::NotFound { .. }));
        assert_eq!(controls.fallback_clicks.load(Ordering::SeqCst), 1);
    }
}
