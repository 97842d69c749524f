//! Types and observability helpers shared across the idpaper workspace.
//!
//! This crate is intentionally small so every other crate can depend on it
//! without pulling in heavy transitive costs.
//!
//! - [`Credentials`]: the portal login pair, with a `Debug` impl that never
//!   exposes the password
//! - [`observability`]: centralised tracing/logging initialisation
use serde::Deserialize;
use std::fmt;

pub mod observability;

/// Login identity for the portal.
///
/// Populated from configuration or the environment at process start; literal
/// secrets never belong in source. The password stays out of `Debug` output
/// so config dumps and error chains are safe to log.
///
/// ```
/// use idpaper_common::Credentials;
///
/// let creds = Credentials {
///     username: "demo".to_string(),
///     password: "hunter2".to_string(),
/// };
/// let rendered = format!("{creds:?}");
/// assert!(rendered.contains("demo"));
/// assert!(!rendered.contains("hunter2"));
/// ```
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_the_password() {
        let creds = Credentials {
            username: "demo-user".to_string(),
            password: "p4per-s3cret".to_string(),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("demo-user"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("p4per-s3cret"));
    }
}
