// File: ./src/terminal.rs
//! Styled text lines, column layout and terminal queries.
//!
//! Lines are kept as styled spans until the very end so that width
//! calculations never have to look through ANSI escape sequences.
use crossterm::style::Color;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Columns assumed when stdout is not a terminal.
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Narrowest width text is ever wrapped to.
pub const MIN_WRAP_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub bold: bool,
    pub reverse: bool,
    pub color: Option<Color>,
}

impl Style {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn reversed() -> Self {
        Self {
            reverse: true,
            ..Self::default()
        }
    }

    pub fn colored(color: Option<Color>) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    fn is_plain(&self) -> bool {
        !self.bold && !self.reverse && self.color.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn render(&self, color: bool) -> String {
        if !color || self.style.is_plain() {
            return self.text.clone();
        }
        let mut codes = Vec::new();
        if self.style.bold {
            codes.push("1".to_string());
        }
        if self.style.reverse {
            codes.push("7".to_string());
        }
        if let Some(color) = self.style.color {
            codes.push(foreground_sgr(color));
        }
        format!("\x1b[{}m{}\x1b[0m", codes.join(";"), self.text)
    }
}

/// SGR parameter for a foreground colour. Named colours use the basic
/// 30-37 and 90-97 codes so they follow the terminal palette.
fn foreground_sgr(color: Color) -> String {
    let code = match color {
        Color::Reset => 39,
        Color::Black => 30,
        Color::DarkRed => 31,
        Color::DarkGreen => 32,
        Color::DarkYellow => 33,
        Color::DarkBlue => 34,
        Color::DarkMagenta => 35,
        Color::DarkCyan => 36,
        Color::Grey => 37,
        Color::DarkGrey => 90,
        Color::Red => 91,
        Color::Green => 92,
        Color::Yellow => 93,
        Color::Blue => 94,
        Color::Magenta => 95,
        Color::Cyan => 96,
        Color::White => 97,
        Color::Rgb { r, g, b } => return format!("38;2;{};{};{}", r, g, b),
        Color::AnsiValue(n) => return format!("38;5;{}", n),
    };
    code.to_string()
}

/// One display line made of styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<Span>,
}

impl StyledLine {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::new(vec![Span::raw(text)])
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self::new(vec![Span::styled(text, style)])
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::styled(text, Style::bold())
    }

    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    /// The text without any styling.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn display_width(&self) -> usize {
        self.spans.iter().map(|s| s.text.width()).sum()
    }

    pub fn render(&self, color: bool) -> String {
        self.spans.iter().map(|s| s.render(color)).collect()
    }

    /// Pads with spaces or cuts so the line occupies exactly `width` columns.
    pub fn fit_to_width(&self, width: usize) -> StyledLine {
        let mut out = StyledLine::default();
        let mut used = 0;
        for span in &self.spans {
            if used >= width {
                break;
            }
            let span_width = span.text.width();
            if used + span_width <= width {
                out.push(span.clone());
                used += span_width;
                continue;
            }
            let mut text = String::new();
            for ch in span.text.chars() {
                let w = ch.width().unwrap_or(0);
                if used + w > width {
                    break;
                }
                text.push(ch);
                used += w;
            }
            out.push(Span::styled(text, span.style));
            break;
        }
        if used < width {
            out.push(Span::raw(" ".repeat(width - used)));
        }
        out
    }
}

/// A column of lines laid out independently of its neighbours.
pub type Column = Vec<StyledLine>;

/// Word-wraps `text` to `width` columns. Words longer than the width are split.
/// Widths below [`MIN_WRAP_WIDTH`] are clamped up to it.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let width = width.max(MIN_WRAP_WIDTH);
    textwrap::wrap(text, width)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Places `left` and `right` side by side.
///
/// Produces `max(left.len(), right.len())` rows. Every left cell is fitted to
/// `left_width` columns (missing cells become blanks) and separated from the
/// right cell by `gutter` spaces.
pub fn merge_columns(left: &[StyledLine], right: &[StyledLine], left_width: usize, gutter: usize) -> Column {
    let rows = left.len().max(right.len());
    let blank = StyledLine::default();
    (0..rows)
        .map(|i| {
            let mut row = left.get(i).unwrap_or(&blank).fit_to_width(left_width);
            row.push(Span::raw(" ".repeat(gutter)));
            if let Some(cell) = right.get(i) {
                row.spans.extend(cell.spans.iter().cloned());
            }
            row
        })
        .collect()
}

/// Renders lines and joins them with `\n` (no trailing newline).
pub fn render_lines(lines: &[StyledLine], color: bool) -> String {
    lines
        .iter()
        .map(|l| l.render(color))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Terminal size as (columns, rows), with a fixed fallback when stdout is not a tty.
pub fn terminal_size() -> (u16, u16) {
    match crossterm::terminal::size() {
        Ok((cols, rows)) if cols > 0 => (cols, rows),
        Ok(_) => FALLBACK_SIZE,
        Err(e) => {
            log::debug!("Terminal size unavailable ({}), assuming {:?}", e, FALLBACK_SIZE);
            FALLBACK_SIZE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[StyledLine]) -> Vec<String> {
        lines.iter().map(StyledLine::plain).collect()
    }

    #[test]
    fn merge_pads_shorter_left_column() {
        let left: Vec<_> = ["a", "b", "c"].iter().map(|s| StyledLine::raw(*s)).collect();
        let right: Vec<_> = ["1", "2", "3", "4", "5"]
            .iter()
            .map(|s| StyledLine::raw(*s))
            .collect();
        let merged = plain(&merge_columns(&left, &right, 5, 4));
        assert_eq!(merged.len(), 5);
        assert_eq!(merged[0], "a        1");
        assert_eq!(merged[3], "         4");
        assert_eq!(merged[4], "         5");
    }

    #[test]
    fn merge_keeps_rows_of_longer_left_column() {
        let left: Vec<_> = ["a", "b", "c"].iter().map(|s| StyledLine::raw(*s)).collect();
        let right = vec![StyledLine::raw("x")];
        let merged = plain(&merge_columns(&left, &right, 2, 1));
        assert_eq!(merged, vec!["a  x", "b  ", "c  "]);
    }

    #[test]
    fn ragged_left_cells_align() {
        let left = vec![StyledLine::bold("Mo Tu"), StyledLine::raw("toolongforcolumn")];
        let right = vec![StyledLine::raw("r1"), StyledLine::raw("r2")];
        let merged = plain(&merge_columns(&left, &right, 8, 2));
        assert_eq!(merged[0], "Mo Tu     r1");
        assert_eq!(merged[1], "toolongf  r2");
    }

    #[test]
    fn fit_respects_wide_chars() {
        let line = StyledLine::raw("日本語");
        assert_eq!(line.fit_to_width(5).plain(), "日本 ");
        assert_eq!(line.fit_to_width(5).display_width(), 5);
    }

    #[test]
    fn wrap_splits_long_text() {
        let text = "09:30-10:30: A rather long event description that will not fit";
        let lines = wrap(text, 20);
        assert!(lines.len() >= 2);
        assert!(lines.iter().all(|l| l.width() <= 20));
    }

    #[test]
    fn wrap_clamps_tiny_widths() {
        let lines = wrap("abcdefghijklmnop", 0);
        assert!(lines.iter().all(|l| l.width() <= MIN_WRAP_WIDTH));
        assert_eq!(lines.concat(), "abcdefghijklmnop");
    }

    #[test]
    fn wrap_of_empty_text_is_empty() {
        assert!(wrap("   ", 40).is_empty());
    }

    #[test]
    fn render_without_color_is_plain() {
        let line = StyledLine::new(vec![
            Span::styled("Today:", Style::bold()),
            Span::styled(" x", Style::colored(Some(Color::DarkBlue))),
        ]);
        assert_eq!(line.render(false), "Today: x");
        let colored = line.render(true);
        assert_eq!(colored, "\x1b[1mToday:\x1b[0m\x1b[34m x\x1b[0m");
    }

    #[test]
    fn colors_map_to_basic_and_extended_codes() {
        let paint = |style: Style| Span::styled("x", style).render(true);
        assert_eq!(paint(Style::colored(Some(Color::Red))), "\x1b[91mx\x1b[0m");
        assert_eq!(paint(Style::colored(Some(Color::Grey))), "\x1b[37mx\x1b[0m");
        assert_eq!(
            paint(Style::colored(Some(Color::Rgb { r: 255, g: 0, b: 16 }))),
            "\x1b[38;2;255;0;16mx\x1b[0m"
        );
        assert_eq!(
            paint(Style::colored(Some(Color::AnsiValue(208)))),
            "\x1b[38;5;208mx\x1b[0m"
        );
        let mut style = Style::reversed();
        style.color = Some(Color::DarkGreen);
        assert_eq!(paint(style), "\x1b[7;32mx\x1b[0m");
    }
}
