//! Tagmark server entry point.
//!
//! Loads settings, opens the bookmark database and serves the websocket
//! protocol until interrupted.

use std::net::SocketAddr;
use std::sync::Arc;

use tagmark::app::App;
use tagmark::ws_server::serve_ws;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "tagmark failed to start");
        eprintln!("tagmark: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (app, settings) = App::from_environment()?;
    let addr: SocketAddr = format!("{}:{}", settings.bind_address, settings.port).parse()?;

    serve_ws(addr, Arc::new(app), async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutting down");
    })
    .await?;
    Ok(())
}
