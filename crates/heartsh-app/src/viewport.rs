//! Scrollable viewport.
//!
//! A [`Viewport`] shows a `width` x `height` window into a list of rendered
//! lines. The vertical offset is always kept within
//! `[0, max(0, lines - height)]`, whatever sequence of resizes, content
//! changes and scroll keys it sees.

use ratatui::text::{Line, Text};

use crate::{AppAction, KeyInput, ui::block};

/// Scrollable window over rendered content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Viewport {
    /// Visible columns.
    width: u16,
    /// Visible rows.
    height: u16,
    /// Index of the first visible line.
    y_offset: usize,
    /// Terminal row the viewport starts on, for partial redraws.
    y_position: u16,
    /// Full content.
    lines: Vec<Line<'static>>,
}

impl Viewport {
    /// Create an empty viewport with the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height, ..Self::default() }
    }

    /// Replace the content, keeping the offset in range.
    pub fn set_content(&mut self, content: Text<'static>) {
        self.lines = content.lines;
        self.clamp_offset();
    }

    /// Change the visible size, keeping the offset in range.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp_offset();
    }

    /// Record the terminal row the viewport is drawn at.
    pub fn set_y_position(&mut self, row: u16) {
        self.y_position = row;
    }

    /// Visible columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Visible rows.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Index of the first visible line.
    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    /// Terminal row the viewport is drawn at.
    pub fn y_position(&self) -> u16 {
        self.y_position
    }

    /// Number of content lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Largest valid offset.
    pub fn max_y_offset(&self) -> usize {
        self.lines.len().saturating_sub(usize::from(self.height))
    }

    /// Scroll position as a fraction in `[0.0, 1.0]`.
    ///
    /// Content that fits entirely counts as fully scrolled.
    pub fn scroll_percent(&self) -> f64 {
        let max = self.max_y_offset();
        if max == 0 {
            return 1.0;
        }
        (self.y_offset as f64 / max as f64).clamp(0.0, 1.0)
    }

    /// Whether the first line is visible.
    pub fn at_top(&self) -> bool {
        self.y_offset == 0
    }

    /// Whether the last line is visible.
    pub fn at_bottom(&self) -> bool {
        self.y_offset >= self.max_y_offset()
    }

    /// Lines currently on screen, truncated to the width and padded with
    /// empty lines to the full height.
    pub fn visible_lines(&self) -> Vec<Line<'static>> {
        let height = usize::from(self.height);
        let width = usize::from(self.width);

        let mut visible: Vec<Line<'static>> = self
            .lines
            .iter()
            .skip(self.y_offset)
            .take(height)
            .map(|line| block::truncate(line, width))
            .collect();
        visible.resize(height, Line::default());
        visible
    }

    /// Set the offset, clamped to the valid range.
    pub fn set_y_offset(&mut self, offset: usize) {
        self.y_offset = offset.min(self.max_y_offset());
    }

    /// Scroll down `n` lines.
    pub fn scroll_down(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_add(n));
    }

    /// Scroll up `n` lines.
    pub fn scroll_up(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_sub(n));
    }

    /// Scroll down one page.
    pub fn page_down(&mut self) {
        self.scroll_down(usize::from(self.height));
    }

    /// Scroll up one page.
    pub fn page_up(&mut self) {
        self.scroll_up(usize::from(self.height));
    }

    /// Scroll down half a page.
    pub fn half_page_down(&mut self) {
        self.scroll_down(usize::from(self.height / 2));
    }

    /// Scroll up half a page.
    pub fn half_page_up(&mut self) {
        self.scroll_up(usize::from(self.height / 2));
    }

    /// Jump to the first line.
    pub fn goto_top(&mut self) {
        self.y_offset = 0;
    }

    /// Jump so the last line is at the bottom.
    pub fn goto_bottom(&mut self) {
        self.y_offset = self.max_y_offset();
    }

    /// Apply a navigation key.
    ///
    /// Returns [`AppAction::Render`] if the offset moved, nothing otherwise.
    pub fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        let before = self.y_offset;

        match key {
            KeyInput::Down | KeyInput::Char('j') => self.scroll_down(1),
            KeyInput::Up | KeyInput::Char('k') => self.scroll_up(1),
            KeyInput::PageDown | KeyInput::Char(' ' | 'f') => self.page_down(),
            KeyInput::PageUp | KeyInput::Char('b') => self.page_up(),
            KeyInput::Char('d') | KeyInput::Ctrl('d') => self.half_page_down(),
            KeyInput::Char('u') | KeyInput::Ctrl('u') => self.half_page_up(),
            KeyInput::Home | KeyInput::Char('g') => self.goto_top(),
            KeyInput::End | KeyInput::Char('G') => self.goto_bottom(),
            _ => {},
        }

        if self.y_offset == before { vec![] } else { vec![AppAction::Render] }
    }

    fn clamp_offset(&mut self) {
        self.y_offset = self.y_offset.min(self.max_y_offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize, height: u16) -> Viewport {
        let mut viewport = Viewport::new(10, height);
        viewport.set_content(Text::from((0..count).map(|i| Line::from(i.to_string())).collect::<Vec<_>>()));
        viewport
    }

    #[test]
    fn scroll_percent_over_max_offset() {
        let mut viewport = numbered(100, 20);
        assert_eq!(viewport.max_y_offset(), 80);

        viewport.set_y_offset(0);
        assert!((viewport.scroll_percent() - 0.0).abs() < f64::EPSILON);

        viewport.set_y_offset(32);
        assert_eq!(crate::ui::format_percent(viewport.scroll_percent()), " 40%");

        viewport.set_y_offset(40);
        assert!((viewport.scroll_percent() - 0.5).abs() < f64::EPSILON);

        viewport.set_y_offset(80);
        assert!((viewport.scroll_percent() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn content_that_fits_is_fully_scrolled() {
        let viewport = numbered(5, 20);

        assert!((viewport.scroll_percent() - 1.0).abs() < f64::EPSILON);
        assert!(viewport.at_top());
        assert!(viewport.at_bottom());
    }

    #[test]
    fn offset_is_clamped() {
        let mut viewport = numbered(30, 10);

        viewport.set_y_offset(1000);
        assert_eq!(viewport.y_offset(), 20);

        viewport.resize(10, 25);
        assert_eq!(viewport.y_offset(), 5);

        viewport.set_content(Text::from("one line"));
        assert_eq!(viewport.y_offset(), 0);
    }

    #[test]
    fn navigation_keys_move_offset() {
        let mut viewport = numbered(100, 10);

        assert_eq!(viewport.handle_key(KeyInput::Down), vec![AppAction::Render]);
        assert_eq!(viewport.y_offset(), 1);

        viewport.handle_key(KeyInput::PageDown);
        assert_eq!(viewport.y_offset(), 11);

        viewport.handle_key(KeyInput::Ctrl('u'));
        assert_eq!(viewport.y_offset(), 6);

        viewport.handle_key(KeyInput::Char('G'));
        assert_eq!(viewport.y_offset(), 90);

        viewport.handle_key(KeyInput::Home);
        assert!(viewport.at_top());
    }

    #[test]
    fn unmoved_offset_produces_no_action() {
        let mut viewport = numbered(100, 10);

        assert!(viewport.handle_key(KeyInput::Up).is_empty());
        assert!(viewport.handle_key(KeyInput::Char('x')).is_empty());
    }

    #[test]
    fn visible_lines_are_padded_to_height() {
        let mut viewport = numbered(3, 5);
        viewport.set_y_offset(2);

        let visible = viewport.visible_lines();
        assert_eq!(visible.len(), 5);
        assert_eq!(visible[0], Line::from("0"));
        assert_eq!(visible[3], Line::default());
    }
}
