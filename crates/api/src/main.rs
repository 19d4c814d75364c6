//! CAN Dashboard - Main Entry Point

use api::{init_logging, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::load()?;
    info!("=== CAN Dashboard v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "CAN interface {}, serving on {}",
        config.ingest.interface, config.bind
    );

    // No edge source is wired in this build; notification mode falls
    // back to polling unless an embedder supplies one
    api::run(config, None).await
}
