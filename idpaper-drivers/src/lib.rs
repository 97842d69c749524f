//! Driver layer for browser automation.
//!
//! This crate wraps the `fantoccini` WebDriver client in the small surface
//! the scrape workflow actually needs:
//!
//! - [`browser::Browser`]: session acquisition and teardown
//! - [`browser::Page`]: DOM lookups plus explicit, bounded waits
//! - [`browser::WaitPolicy`] / [`browser::WaitError`]: per-operation
//!   timeouts with a typed failure taxonomy
pub mod browser;
