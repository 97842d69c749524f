//! The idpaper.co.kr site workflow: log in, open the results report, capture
//! every description block.
//!
//! Submodules split the flow the way the site does: [`login`] fills and
//! submits the credential form (with the one sanctioned fallback locator),
//! [`report`] renders and persists captured blocks, and [`run`] drives the
//! sequence end to end and owns session shutdown.
//!
//! Locators and paths below are site facts, not deployment parameters, so
//! they live here as constants rather than in configuration.

use idpaper_drivers::browser::Locator;
use url::Url;

pub mod login;
pub mod report;
pub mod run;

pub use login::SubmitPath;
pub use report::ContentBlock;
pub use run::{run_scrape, RunSummary, ScrapeError};

/// Path of the login form on the portal.
pub const LOGIN_PATH: &str = "/user/login/login_form.html";
/// Path of the all-results report page.
pub const RESULTS_PATH: &str = "/test/result_all.html";

/// Username input on the login form.
pub const USERNAME_FIELD: Locator<'static> = Locator::Id("userIdVal1");
/// Password input on the login form.
pub const PASSWORD_FIELD: Locator<'static> = Locator::Id("userPwVal1");
/// Submit anchor inside the login box; waited on for clickability.
pub const SUBMIT_PRIMARY: Locator<'static> = Locator::Css(".login_box a[href='#']");
/// Structural fallback for the same control, clicked without a wait.
pub const SUBMIT_FALLBACK: Locator<'static> =
    Locator::XPath("//*[@id='loginFrm']//a[contains(@href, '#')]");
/// The text blocks scraped off the results page.
pub const CONTENT_BLOCKS: Locator<'static> = Locator::Css("div.desc");

/// Login form URL under `base`.
pub fn login_url(base: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), LOGIN_PATH)
}

/// Results URL under `base` for one report type.
///
/// ```
/// use idpaper_scrape::portal::results_url;
///
/// assert_eq!(
///     results_url("https://idpaper.co.kr", 11),
///     "https://idpaper.co.kr/test/result_all.html?testType=11",
/// );
/// ```
pub fn results_url(base: &str, report_type: u32) -> String {
    format!(
        "{}{}?testType={}",
        base.trim_end_matches('/'),
        RESULTS_PATH,
        report_type
    )
}

/// Whether `url` still points into the login area. The site never reports
/// rejected credentials explicitly; this is the one weak signal we surface.
pub fn landed_back_on_login(url: &Url) -> bool {
    url.path().starts_with("/user/login/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_cleanly_with_and_without_trailing_slash() {
        assert_eq!(
            login_url("https://idpaper.co.kr"),
            "https://idpaper.co.kr/user/login/login_form.html"
        );
        assert_eq!(
            login_url("https://idpaper.co.kr/"),
            "https://idpaper.co.kr/user/login/login_form.html"
        );
        assert_eq!(
            results_url("https://idpaper.co.kr/", 7),
            "https://idpaper.co.kr/test/result_all.html?testType=7"
        );
    }

    #[test]
    fn login_area_urls_are_recognised() {
        let still_there = Url::parse("https://idpaper.co.kr/user/login/login_form.html?failed=1")
            .unwrap();
        let moved_on = Url::parse("https://idpaper.co.kr/user/main.html").unwrap();
        assert!(landed_back_on_login(&still_there));
        assert!(!landed_back_on_login(&moved_on));
    }
}
