mod actor_framework;
mod app_system;
mod config;
mod dispatcher;
mod domain;
mod error;
mod id_allocator;
mod response;
mod server;

#[cfg(test)]
mod mock_framework;

use clap::Parser;
use tracing::{error, info};

use crate::app_system::{setup_tracing, CatalogSystem};
use crate::config::Config;
use crate::server::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    // Setup tracing once for the entire application
    setup_tracing();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting POS catalog service");

    // Stores first, then routes, then the listener
    let system = CatalogSystem::new(&config);
    let server = match Server::bind(&config.listen_addr(), system.dispatcher()).await {
        Ok(server) => server,
        Err(e) => {
            error!(addr = %config.listen_addr(), error = %e, "Failed to bind");
            system.shutdown().await?;
            return Err(e.into());
        }
    };
    info!("Server listening on: {}", server.local_addr());

    server.run(shutdown_signal()).await;

    system.shutdown().await?;
    info!("Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
