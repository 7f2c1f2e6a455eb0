// File: src/tui/view.rs
use crate::agenda::{AgendaBuilder, AgendaRequest, DateInput};
use crate::calendar_display::{MONTH_COUNT, vertical_month};
use crate::config::{Config, WeekNumbers};
use crate::controller::{CALENDAR_WIDTH, WEEK_NUMBER_WIDTH};
use crate::storage::EventSource;
use crate::terminal::{self, StyledLine};
use crate::tui::state::AppState;

use crossterm::style::Color as TermColor;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const HELP: &str = " ←/h →/l:Day  ↑/k ↓/j:Week  PgUp/PgDn:Month  t:Today  q:Quit";

/// Maps crossterm's palette onto ratatui's. Crossterm's "dark" names are the
/// normal ANSI colours and its plain names are the bright ones.
pub fn to_color(color: TermColor) -> Option<Color> {
    Some(match color {
        TermColor::Reset => Color::Reset,
        TermColor::Black => Color::Black,
        TermColor::DarkRed => Color::Red,
        TermColor::DarkGreen => Color::Green,
        TermColor::DarkYellow => Color::Yellow,
        TermColor::DarkBlue => Color::Blue,
        TermColor::DarkMagenta => Color::Magenta,
        TermColor::DarkCyan => Color::Cyan,
        TermColor::Grey => Color::Gray,
        TermColor::DarkGrey => Color::DarkGray,
        TermColor::Red => Color::LightRed,
        TermColor::Green => Color::LightGreen,
        TermColor::Yellow => Color::LightYellow,
        TermColor::Blue => Color::LightBlue,
        TermColor::Magenta => Color::LightMagenta,
        TermColor::Cyan => Color::LightCyan,
        TermColor::White => Color::White,
        TermColor::Rgb { r, g, b } => Color::Rgb(r, g, b),
        TermColor::AnsiValue(v) => Color::Indexed(v),
    })
}

fn to_style(style: &terminal::Style) -> Style {
    let mut out = Style::default();
    if style.bold {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.reverse {
        out = out.add_modifier(Modifier::REVERSED);
    }
    if let Some(fg) = style.color.and_then(to_color) {
        out = out.fg(fg);
    }
    out
}

pub fn to_line(line: &StyledLine) -> Line<'static> {
    Line::from(
        line.spans
            .iter()
            .map(|s| Span::styled(s.text.clone(), to_style(&s.style)))
            .collect::<Vec<_>>(),
    )
}

pub fn draw(f: &mut Frame, state: &AppState, config: &Config, source: &dyn EventSource) {
    let grid_width = match config.locale.weeknumbers {
        WeekNumbers::Right => CALENDAR_WIDTH + WEEK_NUMBER_WIDTH,
        _ => CALENDAR_WIDTH,
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(grid_width as u16 + 2),
            Constraint::Min(10),
        ])
        .split(rows[0]);

    // The grid highlights the selection rather than the real today.
    let grid: Vec<Line> = vertical_month(
        state.selected,
        config.locale.first_weekday(),
        config.locale.weeknumbers,
        MONTH_COUNT,
    )
    .iter()
    .map(to_line)
    .collect();
    let grid_title = format!(" {} ", state.selected.format("%B %Y"));
    f.render_widget(
        Paragraph::new(grid).block(Block::default().borders(Borders::ALL).title(grid_title)),
        columns[0],
    );

    let agenda_width = columns[1].width.saturating_sub(2) as usize;
    let request = AgendaRequest {
        dates: vec![DateInput::Date(state.selected)],
        days: Some(1),
        events: None,
        width: agenda_width,
        show_all_days: true,
    };
    let agenda: Vec<Line> = match AgendaBuilder::new(&config.locale, state.today).build(source, &request) {
        Ok(column) => column.iter().map(to_line).collect(),
        Err(e) => vec![Line::from(Span::styled(
            e.to_string(),
            Style::default().fg(Color::Red),
        ))],
    };
    let agenda_title = format!(
        " {} ",
        state.selected.format(&config.locale.longdateformat)
    );
    f.render_widget(
        Paragraph::new(agenda).block(Block::default().borders(Borders::ALL).title(agenda_title)),
        columns[1],
    );

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            HELP,
            Style::default().fg(Color::DarkGray),
        ))),
        rows[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DateType, Event};
    use crate::storage::EventList;
    use chrono::NaiveDate;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn colors_keep_their_brightness() {
        assert_eq!(to_color(TermColor::DarkBlue), Some(Color::Blue));
        assert_eq!(to_color(TermColor::Blue), Some(Color::LightBlue));
        assert_eq!(to_color(TermColor::Grey), Some(Color::Gray));
        assert_eq!(
            to_color(TermColor::Rgb { r: 1, g: 2, b: 3 }),
            Some(Color::Rgb(1, 2, 3))
        );
    }

    #[test]
    fn styled_lines_convert_span_by_span() {
        let line = StyledLine::new(vec![
            terminal::Span::styled("09", terminal::Style::reversed()),
            terminal::Span::raw(" 10"),
        ]);
        let converted = to_line(&line);
        assert_eq!(converted.spans.len(), 2);
        assert!(converted.spans[0].style.add_modifier.contains(Modifier::REVERSED));
        assert_eq!(converted.spans[1].content, " 10");
    }

    #[test]
    fn draws_grid_and_selected_day() {
        let day = NaiveDate::from_ymd_opt(2014, 4, 9).unwrap();
        let event = Event {
            uid: "a".to_string(),
            summary: "An Event".to_string(),
            description: None,
            location: None,
            start: DateType::Specific(day.and_hms_opt(9, 30, 0).unwrap()),
            end: DateType::Specific(day.and_hms_opt(10, 30, 0).unwrap()),
            rrule: None,
            calendar: "one".to_string(),
            href: "a.ics".to_string(),
            color: None,
        };
        let source = EventList::new(vec![event]);
        let state = AppState::new(day);
        let config = Config::default();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| draw(f, &state, &config, &source))
            .unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Mo Tu We Th Fr Sa Su"));
        assert!(text.contains("April 2014"));
        assert!(text.contains("Today:"));
        assert!(text.contains("09:30-10:30: An Event"));
        assert!(text.contains("q:Quit"));
    }
}
