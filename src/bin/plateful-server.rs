// ABOUTME: Server binary serving meal plan suggestions over HTTP
// ABOUTME: Loads configuration, initializes logging and the catalog, then serves the axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! # Plateful Server Binary

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use plateful_server::{
    config::environment::ServerConfig, logging, resources::ServerResources, routes,
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "plateful-server")]
#[command(about = "Plateful - scaled meal suggestions from free-text requests")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the catalog file
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(catalog) = args.catalog {
        config.catalog.path = catalog;
    }
    config.validate()?;

    logging::init_from_env()?;

    info!("Starting Plateful server");
    info!("{}", config.summary());

    let address = format!("{}:{}", config.host, config.http_port);
    let resources = Arc::new(ServerResources::from_config(config).await?);
    let app = routes::router(resources);

    let listener = TcpListener::bind(&address).await?;
    info!("Listening on http://{address}");
    info!("   Plan:   POST http://{address}/api/plan");
    info!("   Health: GET  http://{address}/api/health");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}
