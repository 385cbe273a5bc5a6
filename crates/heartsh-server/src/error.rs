//! Server error types.
//!
//! Three layers, from narrowest to widest:
//! - [`AssetError`]: the banner file could not be read. Fails one session.
//! - [`SessionError`]: anything that ends one session early.
//! - [`ServerError`]: startup and shutdown failures of the whole process.

use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

/// The banner asset could not be loaded.
#[derive(Debug, Error)]
pub enum AssetError {
    /// File missing, unreadable, or not UTF-8.
    ///
    /// Affects only the session that tried to load it; other sessions and
    /// the listener keep running.
    #[error("resource unavailable: {}: {source}", path.display())]
    ResourceUnavailable {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Errors that end a single session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Terminal output or channel write failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// SSH protocol or transport failure.
    #[error("ssh error: {0}")]
    Ssh(#[from] russh::Error),

    /// Banner could not be loaded.
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error (zero tick interval, unresolvable address).
    ///
    /// Fatal: prevents startup. Fix configuration and restart.
    #[error("configuration error: {0}")]
    Config(String),

    /// Listener or filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Host key could not be loaded, generated or written.
    #[error("host key error: {}: {reason}", path.display())]
    HostKey {
        /// Key path.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Sessions still running when the shutdown window closed.
    ///
    /// They have been aborted by the time this is returned.
    #[error("{remaining} session(s) still running after {timeout:?}, aborted")]
    ShutdownTimeout {
        /// Number of aborted sessions.
        remaining: usize,
        /// Length of the shutdown window.
        timeout: Duration,
    },
}
