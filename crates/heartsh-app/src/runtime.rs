//! Generic runtime for one session.
//!
//! The Runtime drives the session event loop, coordinating between:
//! - [`App`]: view-model state machine
//! - [`Driver`]: transport-specific I/O

use crate::{App, AppAction, Driver};

/// How a session loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The user pressed a quit key.
    Quit,
    /// The event source closed (disconnect or server shutdown).
    Closed,
}

/// Generic runtime that orchestrates an [`App`] and a [`Driver`].
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime for `app` over `driver`.
    pub fn new(driver: D, app: App) -> Self {
        Self { driver, app }
    }

    /// Run the event loop until the user quits or the events stop.
    ///
    /// Events are handled strictly one at a time, in arrival order. The
    /// driver is always stopped before returning, error or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to read events or render.
    pub async fn run(&mut self) -> Result<Exit, D::Error> {
        let result = self.event_loop().await;
        self.driver.stop();
        result
    }

    async fn event_loop(&mut self) -> Result<Exit, D::Error> {
        self.driver.render(&self.app)?;

        loop {
            let Some(event) = self.driver.poll_event().await? else {
                return Ok(Exit::Closed);
            };

            let now = self.driver.now();
            let actions = self.app.handle(event, now);
            if self.process_actions(actions)? {
                return Ok(Exit::Quit);
            }
        }
    }

    /// Execute actions in order.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::SyncViewport => self.driver.sync(&self.app)?,
                AppAction::Quit => return Ok(true),
            }
        }
        Ok(false)
    }

    /// Session state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Consume the runtime, returning the driver and final state.
    pub fn into_parts(self) -> (D, App) {
        (self.driver, self.app)
    }
}
