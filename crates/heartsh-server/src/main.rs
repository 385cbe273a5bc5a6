//! heartsh server binary.
//!
//! # Usage
//!
//! ```bash
//! # Serve on localhost:23234, generating .ssh/term_info_ed25519 if needed
//! heartsh-server
//!
//! # Then, from another terminal
//! ssh -p 23234 localhost
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use heartsh_server::{Server, ServerConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// heartsh SSH server
#[derive(Parser, Debug)]
#[command(name = "heartsh-server")]
#[command(about = "Serves a decorative terminal view over SSH")]
#[command(version)]
struct Args {
    /// Host to listen on
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "23234")]
    port: u16,

    /// Path to the ed25519 host key (generated if missing)
    #[arg(long, default_value = ".ssh/term_info_ed25519")]
    host_key: PathBuf,

    /// Path to the banner shown in every session
    #[arg(long, default_value = "assets/heart.txt")]
    asset: PathBuf,

    /// Seconds to wait for sessions on shutdown
    #[arg(long, default_value = "30")]
    shutdown_timeout: u64,

    /// Clock refresh period in milliseconds
    #[arg(long, default_value = "1000")]
    tick_interval_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            host_key_path: args.host_key,
            asset_path: args.asset,
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout),
            tick_interval: Duration::from_millis(args.tick_interval_ms),
            ..Self::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("heartsh server starting");

    let server = Server::bind(ServerConfig::from(args)).await?;

    tracing::info!("Starting SSH server on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
