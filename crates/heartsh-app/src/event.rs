//! Session input events.
//!
//! This module defines [`AppEvent`], the complete set of inputs that drive
//! the [`crate::App`] state machine: key presses and window resizes from the
//! client, and ticks from the session timer.

use chrono::{DateTime, Utc};

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Periodic tick, stamped with the time it fired.
    Tick(DateTime<Utc>),
}
