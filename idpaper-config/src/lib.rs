//! Typed configuration for the idpaper scrape workspace.
//!
//! Sources merge in order: a YAML file (usually `idpaper.yaml`), then
//! `IDPAPER__`-prefixed environment variables, then `${VAR}` placeholder
//! expansion over the merged tree. Every non-secret field has a default;
//! credentials are the one thing a deployment must supply.
use config::{Config, ConfigError, Environment, File};
use idpaper_common::Credentials;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use url::Url;

const MAX_PLACEHOLDER_DEPTH: usize = 8;

/// Top-level configuration consumed by the scrape workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub waits: WaitConfig,
    /// Seconds to hold the session open after extraction; 0 disables.
    #[serde(default = "default_linger_secs")]
    pub linger_secs: u64,
    /// Required; validated non-empty and fully expanded.
    pub credentials: Credentials,
}

/// Which site to talk to and where the captured blocks land.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub base_url: String,
    /// `testType` query value on the results page.
    pub report_type: u32,
    pub output_path: PathBuf,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://idpaper.co.kr".to_string(),
            report_type: 11,
            output_path: PathBuf::from("result.txt"),
        }
    }
}

/// How the browser session is launched.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub webdriver_url: String,
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

/// Named explicit-wait timeouts, one per waiting operation, plus the shared
/// poll interval. There is no implicit wait anywhere in the workflow.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Form-field lookups on the login page.
    pub element_secs: u64,
    /// Clickability of the primary submit control.
    pub clickable_secs: u64,
    /// Presence of the first content block on the results page.
    pub content_secs: u64,
    pub poll_millis: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            element_secs: 3,
            clickable_secs: 10,
            content_secs: 10,
            poll_millis: 250,
        }
    }
}

fn default_linger_secs() -> u64 {
    5
}

impl ScrapeConfig {
    /// Reject configurations that would only fail later in the browser.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_resolved("credentials.username", &self.credentials.username)?;
        require_resolved("credentials.password", &self.credentials.password)?;
        Url::parse(&self.portal.base_url).map_err(|err| {
            ConfigError::Message(format!("portal.base_url is not a valid URL: {err}"))
        })?;
        Ok(())
    }
}

fn require_resolved(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Message(format!("{field} must not be empty")));
    }
    // A leftover `${VAR}` means the referenced variable was never set.
    if value.contains("${") {
        return Err(ConfigError::Message(format!(
            "{field} still contains an unresolved ${{VAR}} placeholder"
        )));
    }
    Ok(())
}

fn expand_placeholders(value: &mut Value) {
    match value {
        Value::String(s) if s.contains('$') => *s = expand_str(std::mem::take(s)),
        Value::Array(items) => items.iter_mut().for_each(expand_placeholders),
        Value::Object(map) => map.values_mut().for_each(expand_placeholders),
        _ => {}
    }
}

/// Expand `${VAR}` references, chasing values that themselves contain
/// placeholders. The depth cap keeps cyclic definitions from looping;
/// undefined variables are left exactly as written.
fn expand_str(mut raw: String) -> String {
    for _ in 0..MAX_PLACEHOLDER_DEPTH {
        let expanded =
            shellexpand::env_with_context_no_errors(&raw, |var| std::env::var(var).ok())
                .into_owned();
        if expanded == raw {
            break;
        }
        raw = expanded;
    }
    raw
}

/// Builder hiding the `config` crate wiring (YAML file + env overrides).
pub struct ScrapeConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ScrapeConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrapeConfigLoader {
    /// Start an empty loader; the `IDPAPER__` environment overlay is always
    /// applied on [`load`](Self::load).
    ///
    /// ```
    /// use idpaper_config::ScrapeConfigLoader;
    ///
    /// let config = ScrapeConfigLoader::new()
    ///     .with_yaml_str("credentials:\n  username: demo\n  password: hunter2")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.portal.report_type, 11);
    /// assert_eq!(config.waits.element_secs, 3);
    /// assert_eq!(config.linger_secs, 5);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a config file; the `config` crate infers the format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Merge an inline YAML snippet; used by tests and one-off invocations.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand placeholders, and validate.
    ///
    /// ```
    /// use idpaper_config::ScrapeConfigLoader;
    ///
    /// unsafe { std::env::set_var("IDPAPER_DOCS_PASSWORD", "injected-from-env"); }
    ///
    /// let config = ScrapeConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// credentials:
    ///   username: demo
    ///   password: "${IDPAPER_DOCS_PASSWORD}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.credentials.password, "injected-from-env");
    ///
    /// unsafe { std::env::remove_var("IDPAPER_DOCS_PASSWORD"); }
    /// ```
    pub fn load(self) -> Result<ScrapeConfig, ConfigError> {
        // The environment source goes in last: later sources override earlier
        // ones, and `IDPAPER__` variables must beat anything a file sets.
        // `try_parsing` turns env text into booleans and numbers, since the
        // typed fields reject raw strings at extraction.
        let merged = self
            .builder
            .add_source(
                Environment::with_prefix("IDPAPER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Deserialize into a raw tree first so `${VAR}` expansion sees every
        // string, whichever source it came from.
        let mut tree: Value = merged.try_deserialize()?;
        expand_placeholders(&mut tree);

        let typed: ScrapeConfig = serde_json::from_value(tree)
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;
        Ok(typed)
    }
}
