mod client;
mod config;
mod error;
mod logging;
mod roster;
mod scraper;
#[cfg(test)]
mod test_utils;
mod utils;

use crate::client::{retry::RetryPolicy, Client, PageSource};
use crate::config::Config;
use crate::error::Result;
use crate::logging::{init_logging, LoggerConfig};
use crate::roster::{build_roster, RosterContext};

const CONFIG_FILE: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load(CONFIG_FILE)?;
    init_logging(LoggerConfig::from_config(&config.logging)?)?;
    log_info!("[main] Configuration loaded successfully");

    log_info!("[main] Starting senate roster scrape ({:?} mode)", config.mode);

    if let Err(e) = run(&config).await {
        log_error!(&e => "[main] Scrape aborted, no CSV written");
        return Err(e);
    }

    Ok(())
}

async fn run(config: &Config) -> Result<()> {
    let client = Client::builder()
        .base_url(&config.base_url)
        .header("user-agent", &config.user_agent)?
        .header("accept-language", "en-US,en;q=0.7")?
        .chrome_impersonation(config.chrome_impersonation)
        .retry(RetryPolicy::from(&config.retry))
        .build()?;

    let written = scrape(config, &client).await?;
    log_info!(
        "[main] CSV file '{}' has been created with {} municipalities.",
        config.output_file,
        written
    );
    Ok(())
}

/// Builds the roster from `source` and writes it out. Nothing is written on failure.
async fn scrape<S: PageSource>(config: &Config, source: &S) -> Result<usize> {
    let ctx = RosterContext::from_config(config)?;
    let rows = build_roster(config.mode, source, &ctx).await?;
    utils::save_csv(&rows, &config.output_file)?;
    Ok(rows.len())
}
