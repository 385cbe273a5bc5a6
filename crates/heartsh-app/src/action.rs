//! Session side-effects.
//!
//! This module defines the [`AppAction`] enum, the instructions produced by
//! the [`crate::App`] state machine for the runtime to execute.

/// Actions produced by the App state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// Draw the next frame.
    Render,

    /// Redraw the whole viewport region instead of only the changed cells.
    SyncViewport,

    /// End the session.
    Quit,
}
