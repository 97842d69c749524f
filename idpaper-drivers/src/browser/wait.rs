//! Bounded polling waits with a typed failure taxonomy.
//!
//! Every wait in this workspace is explicit: the caller names a
//! [`WaitPolicy`] (timeout plus poll interval) per operation instead of
//! leaning on a global implicit wait. Deadline misses classify as
//! [`WaitError::NotFound`] or [`WaitError::NotClickable`], so callers can
//! tell "the element never showed up" from "it showed up but stayed inert"
//! and only fall back when that distinction allows it.

use fantoccini::error::CmdError;
use fantoccini::Locator;
use std::time::Duration;
use thiserror::Error;

/// Timeout and poll interval for one explicit wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll: Duration,
}

impl WaitPolicy {
    /// Poll interval applied when none is chosen explicitly.
    pub const DEFAULT_POLL: Duration = Duration::from_millis(250);

    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll: Self::DEFAULT_POLL,
        }
    }

    pub fn with_poll(timeout: Duration, poll: Duration) -> Self {
        Self { timeout, poll }
    }
}

/// Why an explicit wait gave up.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The deadline passed without the locator matching anything.
    #[error("no element matched {locator} within {waited:?}")]
    NotFound { locator: String, waited: Duration },

    /// The element was on the page but never displayed-and-enabled.
    #[error("element {locator} never became clickable within {waited:?}")]
    NotClickable { locator: String, waited: Duration },

    /// The WebDriver rejected a command mid-poll; retrying will not help.
    #[error("webdriver command failed while waiting: {0}")]
    Command(#[from] CmdError),
}

impl WaitError {
    /// True exactly for the failures a caller may answer with an alternate
    /// locator strategy.
    pub fn warrants_fallback(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotClickable { .. })
    }
}

/// Human-readable form of a locator for error messages and logs.
pub fn describe_locator(locator: &Locator<'_>) -> String {
    match locator {
        Locator::Css(selector) => format!("css `{selector}`"),
        Locator::Id(id) => format!("id `{id}`"),
        Locator::XPath(path) => format!("xpath `{path}`"),
        Locator::LinkText(text) => format!("link text `{text}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_misses_warrant_the_fallback() {
        let not_found = WaitError::NotFound {
            locator: "css `.login_box a[href='#']`".to_string(),
            waited: Duration::from_secs(10),
        };
        let not_clickable = WaitError::NotClickable {
            locator: "css `.login_box a[href='#']`".to_string(),
            waited: Duration::from_secs(10),
        };
        assert!(not_found.warrants_fallback());
        assert!(not_clickable.warrants_fallback());
    }

    #[test]
    fn command_failures_do_not_warrant_the_fallback() {
        let command = WaitError::from(CmdError::NotJson("session went away".to_string()));
        assert!(!command.warrants_fallback());
    }

    #[test]
    fn default_poll_is_a_quarter_second() {
        let policy = WaitPolicy::new(Duration::from_secs(10));
        assert_eq!(policy.poll, Duration::from_millis(250));
        assert_eq!(policy.timeout, Duration::from_secs(10));
    }

    #[test]
    fn locators_describe_themselves() {
        assert_eq!(describe_locator(&Locator::Css("div.desc")), "css `div.desc`");
        assert_eq!(describe_locator(&Locator::Id("userIdVal1")), "id `userIdVal1`");
        assert_eq!(
            describe_locator(&Locator::XPath("//*[@id='loginFrm']")),
            "xpath `//*[@id='loginFrm']`"
        );
    }
}
