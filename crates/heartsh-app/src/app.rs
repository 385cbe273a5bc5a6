//! Session state machine.
//!
//! This module defines the [`App`] state machine, the view-model of one
//! connected terminal. It is completely decoupled from I/O.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//! [`App::view`] turns the current state into the text of the next frame.
//!
//! # Responsibilities
//!
//! - Tracks the current time for the header clock.
//! - Tracks the selected tab.
//! - Lays out the viewport when the terminal size is known or changes.
//! - Forwards navigation keys to the [`Viewport`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ratatui::text::Text;

use crate::{AppAction, AppEvent, KeyInput, Theme, Viewport, ui};

/// Number of selectable tabs.
pub const TAB_COUNT: usize = 3;

/// Minimum height of the centered banner block.
pub const MIN_BODY_HEIGHT: u16 = 21;

/// Session state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable without a terminal.
#[derive(Debug, Clone)]
pub struct App {
    /// Time shown in the header. Never decreases.
    time: DateTime<Utc>,
    /// Selected tab, always below [`TAB_COUNT`].
    selected: usize,
    /// Set by the first resize, never cleared.
    ready: bool,
    /// Scrollable body.
    viewport: Viewport,
    /// Banner text, loaded once per session.
    content: String,
    /// Shared read-only styling.
    theme: Arc<Theme>,
}

impl App {
    /// Create a session that has not seen a window size yet.
    pub fn new(content: impl Into<String>, theme: Arc<Theme>, now: DateTime<Utc>) -> Self {
        Self {
            time: now,
            selected: 0,
            ready: false,
            viewport: Viewport::default(),
            content: content.into(),
            theme,
        }
    }

    /// Process an event observed at `now` and return actions.
    pub fn handle(&mut self, event: AppEvent, now: DateTime<Utc>) -> Vec<AppAction> {
        self.advance_clock(now);

        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize(cols, rows) => self.handle_resize(cols, rows),
            AppEvent::Tick(at) => {
                self.advance_clock(at);
                vec![AppAction::Render]
            },
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if key.is_quit() {
            return self.quit();
        }

        let mut actions = match key {
            KeyInput::Tab => {
                self.next_tab();
                vec![]
            },
            KeyInput::BackTab => {
                self.previous_tab();
                vec![]
            },
            other => self.viewport.handle_key(other),
        };

        if !actions.contains(&AppAction::Render) {
            actions.push(AppAction::Render);
        }
        actions
    }

    fn handle_resize(&mut self, cols: u16, rows: u16) -> Vec<AppAction> {
        let header_height = self.height_of(&ui::header(&self.theme, self.time, cols));
        let footer_height = self.height_of(&ui::footer(&self.theme, self.viewport.scroll_percent(), cols));
        let available = rows.saturating_sub(header_height.saturating_add(footer_height));

        if self.ready {
            let body = ui::body(&self.theme, &self.content, cols.saturating_sub(2), MIN_BODY_HEIGHT);
            self.viewport.set_content(body);
            self.viewport.resize(cols, available);
        } else {
            self.viewport = Viewport::new(cols.saturating_sub(1), available);
            let body = ui::body(
                &self.theme,
                &self.content,
                cols.saturating_sub(3),
                available.max(MIN_BODY_HEIGHT),
            );
            self.viewport.set_content(body);
            self.viewport.set_y_position(header_height.saturating_add(1));
            self.ready = true;
            tracing::debug!(cols, rows, "viewport initialized");
        }

        vec![AppAction::SyncViewport, AppAction::Render]
    }

    fn height_of(&self, text: &Text<'_>) -> u16 {
        u16::try_from(text.height()).unwrap_or(u16::MAX)
    }

    fn advance_clock(&mut self, now: DateTime<Utc>) {
        self.time = self.time.max(now);
    }

    /// Select the next tab, wrapping from the last to the first.
    pub fn next_tab(&mut self) {
        self.selected = (self.selected + 1) % TAB_COUNT;
    }

    /// Select the previous tab, wrapping from the first to the last.
    pub fn previous_tab(&mut self) {
        self.selected = if self.selected == 0 { TAB_COUNT - 1 } else { self.selected - 1 };
    }

    /// End the session.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Header rendered at the current viewport width.
    pub fn header_view(&self) -> Text<'static> {
        ui::header(&self.theme, self.time, self.viewport.width())
    }

    /// Footer rendered at the current viewport width.
    pub fn footer_view(&self) -> Text<'static> {
        ui::footer(&self.theme, self.viewport.scroll_percent(), self.viewport.width())
    }

    /// Text of the next frame.
    ///
    /// Pure: the same state always renders the same text.
    pub fn view(&self) -> Text<'static> {
        if !self.ready {
            return Text::raw(ui::INITIALIZING);
        }

        let mut lines = self.header_view().lines;
        lines.extend(self.viewport.visible_lines());
        lines.extend(self.footer_view().lines);
        Text::from(lines)
    }

    /// Time shown in the header.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Selected tab index, in `0..TAB_COUNT`.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Whether the first window size has been received.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The scrollable body.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable access to the scrollable body.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Banner text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Shared styling.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::ui::block;

    const BANNER: &str = "<3";

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn app() -> App {
        App::new(BANNER, Arc::new(Theme::default()), epoch())
    }

    fn key(app: &mut App, key: KeyInput) -> Vec<AppAction> {
        app.handle(AppEvent::Key(key), epoch())
    }

    #[test]
    fn next_tab_wraps_from_last_to_first() {
        let mut app = app();

        key(&mut app, KeyInput::Tab);
        assert_eq!(app.selected(), 1);
        key(&mut app, KeyInput::Tab);
        assert_eq!(app.selected(), 2);
        key(&mut app, KeyInput::Tab);
        assert_eq!(app.selected(), 0);
    }

    #[test]
    fn previous_tab_wraps_from_first_to_last() {
        let mut app = app();

        key(&mut app, KeyInput::BackTab);
        assert_eq!(app.selected(), 2);
        key(&mut app, KeyInput::BackTab);
        assert_eq!(app.selected(), 1);
    }

    #[test]
    fn quit_keys_only_quit() {
        for quit in [KeyInput::Ctrl('c'), KeyInput::Char('q'), KeyInput::Esc] {
            let mut app = app();
            let actions = key(&mut app, quit);

            assert_eq!(actions, vec![AppAction::Quit]);
            assert!(!app.is_ready());
            assert_eq!(app.selected(), 0);
        }
    }

    #[test]
    fn first_resize_initializes_viewport() {
        let mut app = app();
        let actions = app.handle(AppEvent::Resize(80, 24), epoch());

        assert_eq!(actions, vec![AppAction::SyncViewport, AppAction::Render]);
        assert!(app.is_ready());
        assert_eq!(app.viewport().width(), 79);
        assert_eq!(app.viewport().height(), 18);
        assert_eq!(app.viewport().line_count(), usize::from(MIN_BODY_HEIGHT));
        assert_eq!(app.viewport().y_position(), 4);
    }

    #[test]
    fn later_resize_uses_full_width() {
        let mut app = app();
        app.handle(AppEvent::Resize(80, 24), epoch());
        let actions = app.handle(AppEvent::Resize(100, 40), epoch());

        assert_eq!(actions, vec![AppAction::SyncViewport, AppAction::Render]);
        assert_eq!(app.viewport().width(), 100);
        assert_eq!(app.viewport().height(), 34);
        assert_eq!(app.viewport().line_count(), usize::from(MIN_BODY_HEIGHT));
    }

    #[test]
    fn tiny_window_saturates() {
        let mut app = app();
        app.handle(AppEvent::Resize(0, 2), epoch());

        assert!(app.is_ready());
        assert_eq!(app.viewport().width(), 0);
        assert_eq!(app.viewport().height(), 0);
        assert!(!block::to_plain(&app.view()).is_empty());
    }

    #[test]
    fn tick_only_moves_the_clock() {
        let mut app = app();
        app.handle(AppEvent::Resize(80, 24), epoch());
        let before = app.viewport().clone();

        let later = epoch() + Duration::seconds(5);
        let actions = app.handle(AppEvent::Tick(later), epoch());

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.time(), later);
        assert_eq!(app.viewport(), &before);
        assert_eq!(app.selected(), 0);
    }

    #[test]
    fn clock_never_goes_backwards() {
        let mut app = app();
        let later = epoch() + Duration::seconds(10);

        app.handle(AppEvent::Tick(later), later);
        app.handle(AppEvent::Key(KeyInput::Tab), epoch());

        assert_eq!(app.time(), later);
    }

    #[test]
    fn other_keys_scroll_the_viewport() {
        let mut app = app();
        app.handle(AppEvent::Resize(80, 10), epoch());
        assert_eq!(app.viewport().height(), 4);

        let actions = key(&mut app, KeyInput::Down);

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.viewport().y_offset(), 1);
    }

    #[test]
    fn not_ready_view_is_placeholder() {
        let app = app();

        assert_eq!(block::to_plain(&app.view()), "\n  Initializing...");
    }

    #[test]
    fn ready_view_stacks_header_body_footer() {
        let mut app = app();
        app.handle(AppEvent::Resize(80, 24), epoch());

        let view = app.view();

        assert_eq!(view.height(), 3 + 18 + 3);
        assert_eq!(app.header_view().width(), 79);
        assert_eq!(app.footer_view().width(), 79);
    }
}
