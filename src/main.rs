//! card-proxy binary entry point.
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                  CARD PROXY                   │
//!                    │                                               │
//!   Client Request   │  ┌────────┐   ┌─────────┐   ┌─────────────┐  │
//!   ─────────────────┼─▶│  auth  │──▶│  query  │──▶│  upstream   │──┼──▶ Card API
//!                    │  │ bearer │   │sanitizer│   │   client    │  │
//!                    │  └────────┘   └─────────┘   └──────┬──────┘  │
//!                    │                                    │         │
//!   Client Response  │  ┌──────────┐   ┌──────────┐       │         │
//!   ◀────────────────┼──│ response │◀──│ payload  │◀──────┘         │
//!                    │  │ envelope │   │sanitizer │                 │
//!                    │  └──────────┘   └──────────┘                 │
//!                    └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;

use card_proxy::config;
use card_proxy::observability::{logging, metrics};
use card_proxy::HttpServer;

/// Read-only forwarding proxy for a card-issuing API.
#[derive(Debug, Parser)]
#[command(name = "card-proxy", version)]
struct Args {
    /// Bind address, overriding BIND_ADDRESS.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing();

    let args = Args::parse();

    let mut config = match config::load_from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(error = %error, "Invalid worker environment configuration");
            return Err(error.into());
        }
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_base_url = %config.upstream.base_url,
        upstream_timeout_ms = config.upstream.timeout_ms,
        transaction_token_route = config.enable_transaction_token_route,
        "Configuration loaded"
    );

    if let Some(metrics_address) = &config.observability.metrics_address {
        match metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
