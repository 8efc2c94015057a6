#![cfg(not(tarpaulin_include))]

use anyhow::Context;
use psl_dashboard::{Config, app, load_dataset};

/// Main entry point for the dashboard server
///
/// Loads the match table once, then serves the dashboard and its JSON
/// endpoints. A missing or malformed dataset aborts startup.
///
/// # Arguments
/// * `[data-path] [bind-addr]` - Optional, see `Config`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let dataset = load_dataset(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    app::run(config, dataset).await.context("serving dashboard")
}
