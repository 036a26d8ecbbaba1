use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pingbeat::config::PingConfig;
use pingbeat::heartbeat::HeartbeatService;

/// Periodic HTTP liveness pinger. Runs until interrupted.
#[derive(Parser)]
#[command(name = "pingbeat")]
#[command(version, about = "Periodic HTTP liveness pinger", long_about = None)]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .init();

    info!(
        pid = std::process::id(),
        "pingbeat {} starting",
        env!("CARGO_PKG_VERSION")
    );

    let mut service = HeartbeatService::new(PingConfig::default());
    service.start()?;

    wait_for_shutdown().await;

    service.shutdown().await;
    Ok(())
}

/// Block until an interrupt signal arrives.
async fn wait_for_shutdown() {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to register SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT, shutting down");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        info!("Received interrupt, shutting down");
    }
}
