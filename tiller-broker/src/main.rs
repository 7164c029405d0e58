use anyhow::Result;
use axum::{Router, routing::get};
use clap::Parser;
use std::sync::Arc;
use tiller_broker::broker::Broker;
use tiller_broker::ws::{ConnectionRegistry, ws_handler};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tiller-broker", about = "Two-slot room relay for teleoperation clients")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Port for the WebSocket endpoint.
    #[arg(long, default_value_t = 8001)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let (broker_tx, broker_rx) = mpsc::channel(256);
    let registry = ConnectionRegistry::new(broker_tx);

    let broker = Broker::new(broker_rx, Arc::new(registry.clone()));
    tokio::spawn(broker.run());

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(registry);

    let addr = format!("{}:{}", args.bind, args.port);
    info!("broker listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
