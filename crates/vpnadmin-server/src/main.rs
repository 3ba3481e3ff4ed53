//! vpnadmin management server.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use vpnadmin_server::http;
use vpnadmin_server::{AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load config
    let config = Config::from_env()?;
    let addr: SocketAddr = config.bind_addr.parse()?;

    info!(
        easy_rsa_dir = %config.pki_paths.easy_rsa_dir.display(),
        openvpn_dir = %config.pki_paths.openvpn_dir.display(),
        users_file = %config.users_file.display(),
        "Starting vpnadmin server"
    );

    // Create shared state and router
    let state = AppState::new(&config);
    let router = http::create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
