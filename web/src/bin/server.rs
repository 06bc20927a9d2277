//! Standalone web server binary.
//!
//! Usage: cargo run -p holdem_web --bin holdem-web-server

use clap::Parser;
use holdem_web::{ServerConfig, WebServer};

#[derive(Parser, Debug)]
#[command(name = "holdem-web-server")]
#[command(author, version, about = "No-Limit Hold'em tournament engine HTTP API", long_about = None)]
struct Args {
    /// Host address to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind to.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    holdem_web::init_logging();

    let args = Args::parse();
    let config = ServerConfig::new(args.host.clone(), args.port);

    tracing::info!(host = %config.host(), port = config.port(), "starting holdem web server");

    let server = WebServer::new(config);
    let handle = server.start().await?;

    tracing::info!(address = %handle.address(), "server running");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down server");
    handle.shutdown().await?;
    tracing::info!("server stopped cleanly");

    Ok(())
}
