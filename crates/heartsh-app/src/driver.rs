//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the session runtime from the transport.
//! The SSH server implements it over a channel and a ratatui terminal; tests
//! implement it over scripted event lists.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{App, AppEvent};

/// Abstracts I/O operations for one session.
///
/// Implementations provide the event source, the clock and the output
/// terminal while the generic [`Runtime`](crate::Runtime) handles
/// orchestration.
pub trait Driver: Send {
    /// Transport-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input event.
    ///
    /// Returns `None` once the session is over: the client went away or the
    /// server is shutting down.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be written.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Redraw the viewport region from scratch after a layout change.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be cleared.
    fn sync(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Restore the client terminal and release resources.
    fn stop(&mut self);
}
