//! Catalog API server entry point.

use catalog_api::Config;
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Starting catalog API on {}", config.server.address());
    catalog_api::run(config).await
}
