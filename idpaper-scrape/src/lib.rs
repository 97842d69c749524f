//! Browser-driven scrape of idpaper.co.kr test results.
//!
//! The [`portal`] module owns the whole workflow: authenticate on the login
//! form, open the all-results report, and persist every description block as
//! a fixed three-line record, mirrored to the console and an output file in
//! page order.
pub mod portal;

pub use portal::{run_scrape, ContentBlock, RunSummary, ScrapeError, SubmitPath};
