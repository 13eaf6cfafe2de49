use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;

use tracing::{info, warn};

use portal::{AppConfig, Logger, PortalApplicationServer, metrics::Metrics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Arc::new(AppConfig::parse());

    // guards are kept alive to flush logs and keep the sentry client around
    let _guards = Logger::init(&config);

    info!("logger and env prepped...");

    // the portal works fine without metrics so this isn't fatal
    if let Err(e) = Metrics::init() {
        warn!("metrics disabled: {:#}", e);
    }

    PortalApplicationServer::serve(config)
        .await
        .context("portal server failed to start")?;

    Ok(())
}
