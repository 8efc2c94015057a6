#![cfg(not(tarpaulin_include))]

use anyhow::Context;
use log::{info, warn};
use psl_dashboard::{Config, load_dataset, render, reports};
use std::path::PathBuf;

const WIDTH: u32 = 900;

/// Writes one PNG per charted report
///
/// Usage: `render_charts [data-path] [output-dir]`. The data path falls
/// back to the server configuration; the output directory defaults to
/// `graph_output`.
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let data_path = match args.next() {
        Some(path) => PathBuf::from(path),
        None => Config::from_env()?.data_path,
    };
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| "graph_output".to_string()));

    let dataset = load_dataset(&data_path)
        .with_context(|| format!("loading {}", data_path.display()))?;
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    for (name, chart) in reports::charts(&dataset) {
        let path = output_dir.join(format!("{name}.png"));
        match render::render_chart(&chart, &path, WIDTH) {
            Ok(()) => info!("Created {} chart at {}", name, path.display()),
            Err(e) => warn!("Failed to render {}: {}", name, e),
        }
    }

    Ok(())
}
