//! Chrome-flavored WebDriver session plumbing.

pub mod driver;
pub mod page;
pub mod wait;

pub use driver::{Browser, BrowserConfig, SessionError};
pub use page::{Page, PageElement};
pub use wait::{describe_locator, WaitError, WaitPolicy};

// Re-exported so dependents can name locators and command errors without
// depending on fantoccini directly.
pub use fantoccini::error::CmdError;
pub use fantoccini::Locator;
