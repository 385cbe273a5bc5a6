//! heartsh SSH server.
//!
//! Accepts SSH connections and gives every terminal its own
//! [`heartsh_app::App`], driven by a [`heartsh_app::Runtime`] over the SSH
//! channel.
//!
//! # Components
//!
//! - [`Server`]: listener, accept loop and graceful shutdown
//! - [`SessionHandler`]: russh callbacks for one connection
//! - [`SessionDriver`]: [`heartsh_app::Driver`] over an SSH channel
//! - [`KeyDecoder`]: raw channel bytes to keys
//! - [`Ticker`]: per-session clock refresh

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod config;
mod error;
mod handler;
mod host_key;
mod input;
pub mod shutdown;
mod terminal;
mod ticker;

use std::{future::Future, net::SocketAddr, sync::Arc};

pub use asset::load_banner;
pub use config::ServerConfig;
pub use error::{AssetError, ServerError, SessionError};
pub use handler::{SessionContext, SessionHandler};
use heartsh_app::Theme;
pub use host_key::load_or_generate as load_host_key;
pub use input::KeyDecoder;
use russh::MethodSet;
pub use terminal::{ChannelBackend, ChannelWriter, OUTPUT_QUEUE_DEPTH, SessionDriver};
pub use ticker::Ticker;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::watch,
    task::JoinSet,
};

/// Production heartsh server.
pub struct Server {
    config: ServerConfig,
    listener: TcpListener,
    ssh: Arc<russh::server::Config>,
    theme: Arc<Theme>,
}

impl Server {
    /// Load the host key and bind the listener.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let key = load_host_key(&config.host_key_path)?;
        let ssh = russh::server::Config {
            methods: MethodSet::NONE | MethodSet::PUBLICKEY,
            auth_rejection_time: config.auth_rejection_time,
            auth_rejection_time_initial: Some(std::time::Duration::ZERO),
            keys: vec![key],
            ..Default::default()
        };

        let listener = TcpListener::bind(config.bind_address()).await?;

        Ok(Self { config, listener, ssh: Arc::new(ssh), theme: Arc::new(Theme::default()) })
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Run until ctrl-c or SIGTERM, then shut down gracefully.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown::signal()).await
    }

    /// Run until `signal` resolves, then shut down gracefully.
    ///
    /// Shutdown stops accepting connections, tells every session to end and
    /// waits up to the configured timeout. Sessions still running after that
    /// are aborted and reported as [`ServerError::ShutdownTimeout`].
    pub async fn run_until(self, signal: impl Future<Output = ()>) -> Result<(), ServerError> {
        tracing::info!("listening on {}", self.local_addr()?);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let ctx = SessionContext {
            theme: Arc::clone(&self.theme),
            asset_path: self.config.asset_path.clone(),
            tick_interval: self.config.tick_interval,
            shutdown: shutdown_rx,
        };
        let mut connections = JoinSet::new();

        tokio::pin!(signal);
        loop {
            tokio::select! {
                () = &mut signal => break,

                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tracing::debug!(%peer, "connection accepted");
                        connections.spawn(serve_connection(Arc::clone(&self.ssh), stream, peer, ctx.clone()));
                    },
                    Err(e) => tracing::error!("accept error: {}", e),
                },

                // Reap finished connections so the set does not grow unbounded
                Some(_) = connections.join_next(), if !connections.is_empty() => {},
            }
        }

        drop(self.listener);
        tracing::info!(sessions = connections.len(), "shutting down");
        let _ = shutdown_tx.send(true);

        let timeout = self.config.shutdown_timeout;
        let drained = tokio::time::timeout(timeout, async {
            while connections.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            let remaining = connections.len();
            connections.shutdown().await;
            tracing::error!(remaining, ?timeout, "sessions did not finish in time, aborted");
            return Err(ServerError::ShutdownTimeout { remaining, timeout });
        }

        tracing::info!("shutdown complete");
        Ok(())
    }
}

async fn serve_connection(
    config: Arc<russh::server::Config>,
    stream: TcpStream,
    peer: SocketAddr,
    ctx: SessionContext,
) {
    let handler = SessionHandler::new(ctx, Some(peer));
    let session = match russh::server::run_stream(config, stream, handler).await {
        Ok(session) => session,
        Err(e) => {
            tracing::debug!(%peer, "ssh handshake failed: {}", e);
            return;
        },
    };

    if let Err(e) = session.await {
        tracing::debug!(%peer, "connection closed with error: {}", e);
    }
    tracing::debug!(%peer, "connection closed");
}
