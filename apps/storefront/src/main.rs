//! # Storefront Entry Point
//!
//! `storefront [PATH] [--config FILE]`
//!
//! ## Startup Sequence
//! 1. Initialize tracing
//! 2. Load configuration (file, then `SWEETSHOP_*` environment overrides)
//! 3. Restore the saved session, build the API gateway
//! 4. Resolve PATH and mount the view once
//! 5. Print the page as pretty JSON

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use storefront::App;
use sweetshop_client::ClientConfig;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Render one Sweet Shop storefront page as JSON")]
struct Args {
    /// Location to open, e.g. /admin/manage-sweets
    #[arg(default_value = "/home")]
    path: String,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    storefront::init_tracing();
    let config = ClientConfig::load(args.config).context("Failed to load storefront config")?;
    info!(base_url = %config.base_url(), path = %args.path, "Starting storefront");

    let app = App::from_config(&config).context("Failed to build API gateway")?;
    let page = app.mount(&args.path).await;

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
