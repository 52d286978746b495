//! API gateway for the goal-tracking services.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                  GATEWAY                     │
//!   Client Request        │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ──────────────────────┼─▶│request id│──▶│   cors   │──▶│ routing  │  │
//!                         │  └──────────┘   └──────────┘   └────┬─────┘  │
//!                         │                                     ▼        │
//!                         │                               ┌──────────┐   │
//!                         │                               │ registry │   │
//!                         │                               └────┬─────┘   │
//!   Client Response       │                                    ▼         │
//!   ◀─────────────────────┼───────────────────────────────┌──────────┐   │     user / goal /
//!                         │                               │ upstream │◀──┼──── points / notification /
//!                         │                               │  client  │   │     challenge services
//!                         │                               └──────────┘   │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use goal_gateway::lifecycle::{signals, startup, Shutdown};
use goal_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "goal-gateway", version)]
#[command(about = "Path-routing API gateway for the goal-tracking services", long_about = None)]
struct Args {
    /// TOML configuration file. Built-in routes are used when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = startup::load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability);

    tracing::info!("goal-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        services = config.services.len(),
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    startup::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
