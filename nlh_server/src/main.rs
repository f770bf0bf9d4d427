//! Single-table poker server using an async actor model.
//!
//! Spawns one `TableActor` owning all table state and serves JSON over
//! WebSocket on top of its handle.

use std::net::SocketAddr;

use anyhow::Error;
use pico_args::Arguments;

use nl_holdem::table::TableActor;
use nlh_server::{config::ServerConfig, logging, ws};

const HELP: &str = "\
Run a No-Limit Hold'em table server

USAGE:
  nlh_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:7777]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  TABLE_SMALL_BLIND        Small blind amount          [default: 10]
  TABLE_BIG_BLIND          Big blind amount            [default: 20]
  TABLE_MIN_BUY_IN         Minimum buy-in in chips     [default: 100]
  TABLE_MAX_BUY_IN         Maximum buy-in in chips     [default: 1000000]
  TABLE_MAX_SEATS          Seats at the table          [default: 6]
  TABLE_SHOWDOWN_PAUSE_MS  Showdown display pause      [default: 2500]
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env if present; existing environment variables win.
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;

    logging::init();

    let config = ServerConfig::from_env(bind_override);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {e}"))?;
    tracing::info!(
        "table configured: blinds {}/{}, buy-in {}..{}, {} seats",
        config.table.small_blind,
        config.table.big_blind,
        config.table.min_buy_in,
        config.table.max_buy_in,
        config.table.max_seats
    );

    let (actor, handle) = TableActor::new(config.table.clone());
    tokio::spawn(actor.run());

    let app = ws::create_router(ws::AppState::new(handle));

    tracing::info!("starting WebSocket server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {e}", config.bind))?;

    tracing::info!(
        "server is running at ws://{}/ws. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    tracing::info!("shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
