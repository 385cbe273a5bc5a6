//! Text layout primitives
//!
//! Small building blocks for composing multi-line styled text: bordered
//! labels, rules, padding, side-by-side joins and whitespace-filled
//! centering. Widths are terminal cells as measured by `unicode-width`, the
//! same measure ratatui uses when it draws the result.

use std::iter;

use ratatui::{
    style::Style,
    symbols::line,
    text::{Line, Span, Text},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::{BoxStyle, Padding, Whitespace};

/// Draw a single-line label inside a three-row border.
pub fn bordered(label: &str, style: &BoxStyle) -> Text<'static> {
    let padding = " ".repeat(usize::from(style.padding));
    let inner = label.width() + 2 * padding.len();
    let border = &style.border;
    let edge = |left: &str, right: &str| {
        Line::from(Span::styled(
            format!("{left}{}{right}", border.horizontal.repeat(inner)),
            style.border_style,
        ))
    };

    Text::from(vec![
        edge(border.top_left, border.top_right),
        Line::from(vec![
            Span::styled(border.left, style.border_style),
            Span::styled(format!("{padding}{label}{padding}"), style.label_style),
            Span::styled(border.right, style.border_style),
        ]),
        edge(border.bottom_left, border.bottom_right),
    ])
}

/// One-row horizontal rule, `width` cells long.
pub fn rule(width: usize, style: Style) -> Text<'static> {
    Text::from(Line::from(Span::styled(line::HORIZONTAL.repeat(width), style)))
}

/// Style `content` and surround it with blank rows and columns.
///
/// Every row is padded to the width of the widest one, so the result is a
/// rectangle.
pub fn padded(content: &str, padding: Padding, style: Style) -> Text<'static> {
    let rows: Vec<&str> = content.lines().collect();
    let width = rows.iter().map(|row| row.width()).max().unwrap_or(0);
    let side = usize::from(padding.horizontal);
    let full = width + 2 * side;
    let blank = || Line::from(Span::styled(" ".repeat(full), style));
    let vertical = usize::from(padding.vertical);

    let mut lines = Vec::with_capacity(rows.len() + 2 * vertical);
    lines.extend(iter::repeat_with(blank).take(vertical));
    for row in rows {
        let right = full.saturating_sub(side + row.width());
        lines.push(Line::from(Span::styled(
            format!("{}{row}{}", " ".repeat(side), " ".repeat(right)),
            style,
        )));
    }
    lines.extend(iter::repeat_with(blank).take(vertical));

    Text::from(lines)
}

/// Place blocks side by side.
///
/// Shorter blocks are centered vertically; every block keeps its own width
/// on every row.
pub fn join_horizontal(blocks: &[Text<'static>]) -> Text<'static> {
    let height = blocks.iter().map(Text::height).max().unwrap_or(0);
    let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new(); height];

    for block in blocks {
        let width = block.width();
        let top = (height - block.height()) / 2;

        for (index, row) in rows.iter_mut().enumerate() {
            let used = match index.checked_sub(top).and_then(|i| block.lines.get(i)) {
                Some(line) => {
                    row.extend(line.spans.iter().cloned());
                    line.width()
                },
                None => 0,
            };
            if width > used {
                row.push(Span::raw(" ".repeat(width - used)));
            }
        }
    }

    Text::from(rows.into_iter().map(Line::from).collect::<Vec<_>>())
}

/// Center `block` in a `width` x `height` box, filling the gaps with the
/// whitespace pattern.
///
/// A block that is already wider (or taller) than the box is left as is in
/// that dimension.
pub fn place(width: usize, height: usize, block: Text<'static>, whitespace: &Whitespace) -> Text<'static> {
    let block_width = block.width();

    let mut lines: Vec<Line<'static>> = if width > block_width {
        block
            .lines
            .into_iter()
            .map(|line| {
                let gap = width.saturating_sub(line.width());
                let left = gap / 2;
                let mut spans = Vec::with_capacity(line.spans.len() + 2);
                spans.extend(fill(left, whitespace));
                spans.extend(line.spans);
                spans.extend(fill(gap - left, whitespace));
                Line::from(spans)
            })
            .collect()
    } else {
        block.lines
    };

    if height > lines.len() {
        let row_width = width.max(block_width);
        let row = || Line::from(fill(row_width, whitespace).into_iter().collect::<Vec<_>>());
        let gap = height - lines.len();
        let top = gap / 2;

        let mut placed = Vec::with_capacity(height);
        placed.extend(iter::repeat_with(row).take(top));
        placed.append(&mut lines);
        placed.extend(iter::repeat_with(row).take(gap - top));
        lines = placed;
    }

    Text::from(lines)
}

/// Cut a line down to at most `width` cells.
pub fn truncate(line: &Line<'static>, width: usize) -> Line<'static> {
    if line.width() <= width {
        return line.clone();
    }

    let mut remaining = width;
    let mut spans = Vec::new();
    for span in &line.spans {
        let span_width = span.width();
        if span_width <= remaining {
            spans.push(span.clone());
            remaining -= span_width;
            continue;
        }

        let mut content = String::new();
        for c in span.content.chars() {
            let cell = c.width().unwrap_or(0);
            if cell > remaining {
                break;
            }
            content.push(c);
            remaining -= cell;
        }
        if !content.is_empty() {
            spans.push(Span::styled(content, span.style));
        }
        break;
    }

    Line::from(spans)
}

/// Flatten styled text into plain lines joined by `\n`.
pub fn to_plain(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whitespace run of exactly `width` cells. `None` for zero width.
///
/// Wide pattern characters are never split; a cell they cannot fill is
/// padded with a space.
fn fill(width: usize, whitespace: &Whitespace) -> Option<Span<'static>> {
    if width == 0 {
        return None;
    }

    let glyphs: Vec<(char, usize)> = whitespace
        .chars
        .chars()
        .filter_map(|c| c.width().filter(|&cell| cell > 0).map(|cell| (c, cell)))
        .collect();

    let mut content = String::with_capacity(width);
    let mut used = 0;
    for &(c, cell) in glyphs.iter().cycle() {
        if used + cell > width {
            break;
        }
        content.push(c);
        used += cell;
    }
    content.extend(iter::repeat_n(' ', width - used));

    Some(Span::styled(content, whitespace.style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Border, Theme};

    fn plain_box() -> BoxStyle {
        BoxStyle {
            border: Border::ROUNDED,
            border_style: Style::default(),
            label_style: Style::default(),
            padding: 1,
        }
    }

    #[test]
    fn bordered_label_is_three_rows() {
        let text = bordered("Home", &plain_box());

        assert_eq!(to_plain(&text), "╭──────╮\n│ Home │\n╰──────╯");
        assert_eq!(text.width(), 8);
    }

    #[test]
    fn title_border_uses_tee_on_the_right() {
        let theme = Theme::default();
        let text = bordered("Home", &theme.title);

        assert_eq!(to_plain(&text), "╭──────╮\n│ Home ├\n╰──────╯");
    }

    #[test]
    fn rule_with_zero_width_is_one_empty_row() {
        let text = rule(0, Style::default());

        assert_eq!(text.height(), 1);
        assert_eq!(text.width(), 0);
    }

    #[test]
    fn padded_block_is_rectangular() {
        let text = padded("ab\nabcd", Padding { vertical: 1, horizontal: 2 }, Style::default());

        assert_eq!(text.height(), 4);
        assert!(text.lines.iter().all(|line| line.width() == 8));
    }

    #[test]
    fn join_centers_short_blocks() {
        let tall = bordered("x", &plain_box());
        let short = rule(3, Style::default());
        let joined = join_horizontal(&[tall, short]);

        assert_eq!(to_plain(&joined), "╭───╮   \n│ x │───\n╰───╯   ");
    }

    #[test]
    fn fill_never_overshoots_with_wide_glyphs() {
        let whitespace = Whitespace { chars: "猫咪".to_string(), style: Style::default() };

        let span = fill(5, &whitespace);

        assert_eq!(span.map(|s| s.content.into_owned()), Some("猫咪 ".to_string()));
    }

    #[test]
    fn place_centers_both_ways() {
        let block = Text::from("ab");
        let placed = place(6, 3, block, &Whitespace { chars: ".".to_string(), style: Style::default() });

        assert_eq!(to_plain(&placed), "......\n..ab..\n......");
    }

    #[test]
    fn place_leaves_oversized_block_alone() {
        let block = Text::from("abcdef");
        let placed = place(3, 1, block, &Whitespace::default());

        assert_eq!(to_plain(&placed), "abcdef");
    }

    #[test]
    fn truncate_respects_wide_chars() {
        let line = Line::from(vec![Span::raw("ab"), Span::raw("猫咪")]);

        assert_eq!(to_plain(&Text::from(truncate(&line, 5))), "ab猫");
        assert_eq!(to_plain(&Text::from(truncate(&line, 10))), "ab猫咪");
    }
}
