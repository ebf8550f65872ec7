use floodnet::config::{NodeConfig, USAGE};
use floodnet::error::ConfigError;
use floodnet::node::server::{MAINTENANCE_INTERVAL, serve, shutdown_signal, spawn_maintenance};
use floodnet::node::service::FloodNode;
use floodnet::node::transport::HttpTransport;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match NodeConfig::from_args(std::env::args()) {
        Ok(config) => config,
        Err(ConfigError::HelpRequested) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}\n", e);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(if config.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    tracing::info!("Starting node at {}", config.addr);
    if config.routing_table.is_empty() {
        tracing::info!("Empty routing table, lookups can only resolve locally");
    } else {
        tracing::info!("Routing table: {:?}", config.routing_table);
    }
    tracing::info!("Seeded {} local entries", config.data.len());

    // 1. Bind first; a listener failure stops the node.
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;

    // 2. Node core:
    let transport = Arc::new(HttpTransport::new(config.send_attempts));
    let node = FloodNode::new(config, transport);
    tracing::info!("Node ID: {:?}", node.id);

    // 3. Ledger pruning and stats:
    let maintenance = spawn_maintenance(node.clone(), MAINTENANCE_INTERVAL);

    // 4. Serve until Ctrl-C / SIGTERM:
    tracing::info!("Press Ctrl+C to shutdown");
    let result = serve(node, listener, shutdown_signal()).await;

    maintenance.abort();
    result
}
