use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trainer_scheduler::{app, AppState, SystemClock};

/// Stateless JSON API over the session / deadline scheduling core.
#[derive(Parser, Debug)]
#[command(name = "trainer-scheduler", version, about)]
struct Args {
    /// Host to bind.
    #[arg(long, env = "TRAINER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, env = "TRAINER_PORT", default_value_t = 3000)]
    port: u16,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Print the link to the server
    tracing::info!("Server running at http://{}", addr);
    tracing::info!("API base:     http://{}/api", addr);

    axum::serve(listener, app(AppState::new(SystemClock)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
    }
}
