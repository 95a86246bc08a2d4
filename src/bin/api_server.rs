//! REST API server for state and county ANSI code lookups
//!
//! Usage:
//!   ./target/release/api_server [--port PORT]
//!
//! REST endpoints:
//!   GET  /api/v1/health                           - Health check
//!   GET  /api/v1/states                           - All states
//!   GET  /api/v1/states/:query                    - State by code, abbreviation, or name
//!   GET  /api/v1/states/:query/counties           - A state and its counties
//!   GET  /api/v1/states/:query/counties/:county   - County by code or name
//!   GET  /api/v1/counties                         - All counties (with optional ?limit=N)
//!   POST /api/v1/lookup                           - Lookup with JSON integer or string keys

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// REST server for census state and county lookups
#[derive(Parser, Debug)]
#[command(name = "api_server")]
#[command(about = "Serve US census state and county ANSI code lookups over HTTP")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,
}

fn print_banner(port: u16) {
    println!("============================================================");
    println!("           US CENSUS ANSI CODES API SERVER");
    println!("============================================================");
    println!();
    println!("  Port:     {}", port);
    println!("  REST:     http://localhost:{}/api/v1/", port);
    println!();
    println!("REST Endpoints:");
    println!("  GET  /api/v1/health                   Health check");
    println!("  GET  /api/v1/states                   All states");
    println!("  GET  /api/v1/states/:q                State lookup");
    println!("  GET  /api/v1/states/:q/counties       State counties");
    println!("  GET  /api/v1/states/:q/counties/:c    County lookup");
    println!("  GET  /api/v1/counties                 All counties");
    println!("  POST /api/v1/lookup                   Typed-key lookup");
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();

    print_banner(args.port);

    // Load both registries up front so a bad resource fails startup, not the first request
    ansi_codes::init()?;

    let addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;
    let app = ansi_codes::api::router();
    tracing::info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
