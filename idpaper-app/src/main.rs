use anyhow::{Context, Result};
use clap::Parser;
use idpaper_common::observability::{init_logging, LogConfig};
use idpaper_config::{ScrapeConfig, ScrapeConfigLoader};
use idpaper_scrape::run_scrape;
use std::path::PathBuf;
use tracing::info;

/// Log in to idpaper.co.kr and capture every description block off the
/// all-results report.
#[derive(Parser)]
#[command(name = "idpaper", version, about)]
struct Cli {
    /// Configuration file; credentials can be left to IDPAPER__ env vars.
    #[arg(long, default_value = "idpaper.yaml")]
    config: PathBuf,

    /// Run the browser without a visible window.
    #[arg(long)]
    headless: bool,

    /// Write the captured blocks here instead of the configured path.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Override the report's testType query value.
    #[arg(long)]
    report_type: Option<u32>,

    /// Seconds to hold the browser open after a completed run; 0 disables.
    #[arg(long)]
    linger_secs: Option<u64>,
}

impl Cli {
    fn apply(&self, config: &mut ScrapeConfig) {
        if self.headless {
            config.browser.headless = true;
        }
        if let Some(path) = &self.output {
            config.portal.output_path = path.clone();
        }
        if let Some(report_type) = self.report_type {
            config.portal.report_type = report_type;
        }
        if let Some(linger) = self.linger_secs {
            config.linger_secs = linger;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // FIXME: support running without a file once IDPAPER__ variables can
    // cover every required field, instead of demanding the file exists.
    let mut config: ScrapeConfig = ScrapeConfigLoader::new()
        .with_file(&cli.config)
        .load()
        .with_context(|| format!("could not load {}", cli.config.display()))?;
    cli.apply(&mut config);

    let log_path = init_logging(LogConfig {
        emit_stderr: true,
        ..LogConfig::default()
    })?;
    info!(log = %log_path.display(), "logging initialised");

    let summary = run_scrape(&config).await?;
    info!(
        run_id = %summary.run_id,
        blocks = summary.blocks,
        submit = ?summary.submit_path,
        landed_on = %summary.post_login_url,
        path = %summary.output_path.display(),
        "scrape finished"
    );
    Ok(())
}
