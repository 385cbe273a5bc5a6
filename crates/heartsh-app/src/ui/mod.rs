//! Frame rendering
//!
//! Rendering functions that turn session state into styled text. All
//! functions are pure (no I/O); [`draw`] is the only place the result meets
//! a ratatui [`Frame`].

pub mod block;

use chrono::{DateTime, Utc};
use ratatui::{Frame, text::Text, widgets::Paragraph};

use crate::{App, Theme};

/// Clock format in the header (RFC 1123).
pub const CLOCK_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %Z";

/// Placeholder shown until the first window size is known.
pub const INITIALIZING: &str = "\n  Initializing...";

const TITLE: &str = "Home";

/// Header: bordered title, a rule filling the remaining width, bordered
/// clock.
pub fn header(theme: &Theme, time: DateTime<Utc>, width: u16) -> Text<'static> {
    let title = block::bordered(TITLE, &theme.title);
    let clock = block::bordered(&time.format(CLOCK_FORMAT).to_string(), &theme.title);
    let filler = usize::from(width).saturating_sub(title.width() + clock.width());

    block::join_horizontal(&[title, block::rule(filler, theme.rule), clock])
}

/// Footer: a rule followed by the bordered scroll indicator.
pub fn footer(theme: &Theme, scroll_fraction: f64, width: u16) -> Text<'static> {
    let info = block::bordered(&format_percent(scroll_fraction), &theme.info);
    let filler = usize::from(width).saturating_sub(info.width());

    block::join_horizontal(&[block::rule(filler, theme.rule), info])
}

/// Scroll indicator label, e.g. `" 40%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:3.0}%", (fraction * 100.0).clamp(0.0, 100.0))
}

/// The banner, styled and padded, centered in a `width` x `height` box.
pub fn body(theme: &Theme, content: &str, width: u16, height: u16) -> Text<'static> {
    let banner = block::padded(content, theme.banner_padding, theme.banner);
    block::place(usize::from(width), usize::from(height), banner, &theme.whitespace)
}

/// Draw the current frame of `app` over the whole terminal area.
pub fn draw(frame: &mut Frame, app: &App) {
    frame.render_widget(Paragraph::new(app.view()), frame.area());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn clock_uses_rfc1123() {
        assert_eq!(noon().format(CLOCK_FORMAT).to_string(), "Sun, 18 Oct 2026 12:00:00 UTC");
    }

    #[test]
    fn header_fills_width() {
        let theme = Theme::default();

        for width in [41, 60, 80, 200] {
            assert_eq!(header(&theme, noon(), width).width(), usize::from(width));
        }
    }

    #[test]
    fn header_rule_clamps_on_narrow_width() {
        let theme = Theme::default();
        let text = header(&theme, noon(), 10);

        // title (8) + clock (33), no rule
        assert_eq!(text.width(), 41);
        assert_eq!(text.height(), 3);
    }

    #[test]
    fn footer_fills_width() {
        let theme = Theme::default();
        let text = footer(&theme, 0.4, 50);

        assert_eq!(text.width(), 50);
        assert_eq!(text.height(), 3);
        assert!(block::to_plain(&text).contains("┤  40% │"));
    }

    #[test]
    fn percent_is_clamped_and_padded() {
        assert_eq!(format_percent(0.0), "  0%");
        assert_eq!(format_percent(0.4), " 40%");
        assert_eq!(format_percent(1.0), "100%");
        assert_eq!(format_percent(1.7), "100%");
        assert_eq!(format_percent(-0.3), "  0%");
    }

    #[test]
    fn body_has_requested_size() {
        let theme = Theme::default();
        let text = body(&theme, "<3\n<3", 20, 21);

        assert_eq!(text.height(), 21);
        assert!(text.lines.iter().all(|line| line.width() == 20));
    }
}
