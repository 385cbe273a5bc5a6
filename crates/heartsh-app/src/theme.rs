//! Read-only styling shared by every session.
//!
//! A [`Theme`] is built once at startup and handed to each [`crate::App`]
//! behind an `Arc`. Nothing in it changes after construction.

use ratatui::{
    style::{Color, Style},
    symbols::line,
};

/// Accent used for the header/footer borders and rules.
const ACCENT: Color = Color::Rgb(0x7D, 0x56, 0xF4);
/// Banner foreground.
const BANNER: Color = Color::Rgb(0xFF, 0x00, 0x00);
/// Foreground of the whitespace pattern around the banner.
const SUBTLE: Color = Color::Rgb(0x38, 0x38, 0x38);

/// Glyphs used to draw a box around a single-line label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    /// Top-left corner.
    pub top_left: &'static str,
    /// Top-right corner.
    pub top_right: &'static str,
    /// Bottom-left corner.
    pub bottom_left: &'static str,
    /// Bottom-right corner.
    pub bottom_right: &'static str,
    /// Horizontal edge (top and bottom).
    pub horizontal: &'static str,
    /// Left edge.
    pub left: &'static str,
    /// Right edge.
    pub right: &'static str,
}

impl Border {
    /// Rounded corners with plain vertical edges.
    pub const ROUNDED: Self = Self {
        top_left: line::ROUNDED_TOP_LEFT,
        top_right: line::ROUNDED_TOP_RIGHT,
        bottom_left: line::ROUNDED_BOTTOM_LEFT,
        bottom_right: line::ROUNDED_BOTTOM_RIGHT,
        horizontal: line::HORIZONTAL,
        left: line::VERTICAL,
        right: line::VERTICAL,
    };
}

/// Style of a bordered label (title, clock, scroll indicator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxStyle {
    /// Border glyphs.
    pub border: Border,
    /// Style applied to the border glyphs.
    pub border_style: Style,
    /// Style applied to the label.
    pub label_style: Style,
    /// Blank columns on each side of the label, inside the border.
    pub padding: u16,
}

/// Blank rows and columns added around a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    /// Rows above and below.
    pub vertical: u16,
    /// Columns left and right.
    pub horizontal: u16,
}

/// Repeating pattern used to fill the space around a placed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitespace {
    /// Characters cycled through to fill a gap.
    pub chars: String,
    /// Style applied to the fill.
    pub style: Style,
}

impl Default for Whitespace {
    fn default() -> Self {
        Self { chars: " ".to_string(), style: Style::default() }
    }
}

/// Styling for one rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Header title and clock boxes.
    pub title: BoxStyle,
    /// Footer scroll indicator box.
    pub info: BoxStyle,
    /// Horizontal rules between boxes.
    pub rule: Style,
    /// Banner text.
    pub banner: Style,
    /// Space around the banner, inside its styled block.
    pub banner_padding: Padding,
    /// Fill around the centered banner block.
    pub whitespace: Whitespace,
}

impl Default for Theme {
    fn default() -> Self {
        let accent = Style::default().fg(ACCENT);
        let title = BoxStyle {
            border: Border { right: line::VERTICAL_RIGHT, ..Border::ROUNDED },
            border_style: accent,
            label_style: Style::default(),
            padding: 1,
        };
        let info = BoxStyle { border: Border { left: line::VERTICAL_LEFT, ..Border::ROUNDED }, ..title.clone() };

        Self {
            title,
            info,
            rule: accent,
            banner: Style::default().fg(BANNER),
            banner_padding: Padding { vertical: 1, horizontal: 3 },
            whitespace: Whitespace { chars: "猫咪".to_string(), style: Style::default().fg(SUBTLE) },
        }
    }
}
