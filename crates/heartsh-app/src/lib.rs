//! Session layer for heartsh
//!
//! Pure view-model state machine and generic runtime for one terminal
//! session, so the same code can be exercised by tests and served over SSH.
//!
//! # Components
//!
//! - [`App`]: session state machine (clock, tabs, viewport layout)
//! - [`Viewport`]: scrollable window over the rendered banner
//! - [`ui`]: pure rendering of header, body and footer
//! - [`Driver`]: trait for transport-specific I/O
//! - [`Runtime`]: generic event loop using a Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod event;
mod input;
mod runtime;
mod theme;
pub mod ui;
mod viewport;

pub use action::AppAction;
pub use app::{App, MIN_BODY_HEIGHT, TAB_COUNT};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::KeyInput;
pub use runtime::{Exit, Runtime};
pub use theme::{Border, BoxStyle, Padding, Theme, Whitespace};
pub use viewport::Viewport;
