// File: src/controller.rs
//! The presentation modes behind each command.
//!
//! Every method is a fresh, independent render: it queries the event source it
//! is handed and returns the text to print. Writing the text (and exiting on
//! errors) is left to the command-line layer.
use crate::agenda::{AgendaBuilder, AgendaRequest, DateInput};
use crate::calendar_display::{MONTH_COUNT, vertical_month};
use crate::config::{Config, PrintNew, RenderOptions, WeekNumbers};
use crate::error::{AlmanacError, Result};
use crate::model::{EventOptions, construct_event};
use crate::storage::EventSource;
use crate::terminal::{merge_columns, render_lines, terminal_size};
use chrono::NaiveDate;

/// Width of the month grid column.
pub const CALENDAR_WIDTH: usize = 25;
/// Extra room needed for week numbers printed right of the grid.
pub const WEEK_NUMBER_WIDTH: usize = 3;
/// Spaces between the grid and the agenda.
pub const GUTTER: usize = 4;

/// Reference timestamp used by `printformats`: 2013-12-11 10:09.
fn sample_datetime() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2013, 12, 11)
        .and_then(|d| d.and_hms_opt(10, 9, 0))
        .unwrap_or_default()
}

/// Arguments of the `new` command besides the free text.
#[derive(Debug, Clone, Default)]
pub struct NewEventArgs {
    pub calendar: Option<String>,
    pub location: Option<String>,
    pub repeat: Option<String>,
    pub until: Option<String>,
}

pub struct Controller<'a> {
    config: &'a Config,
}

impl<'a> Controller<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    fn agenda_request(options: &RenderOptions, width: usize) -> AgendaRequest {
        AgendaRequest {
            dates: options
                .dates
                .iter()
                .map(|d| DateInput::Text(d.clone()))
                .collect(),
            days: options.days,
            events: None,
            width,
            show_all_days: options.show_all_days,
        }
    }

    fn terminal_width(options: &RenderOptions) -> usize {
        options
            .width
            .unwrap_or_else(|| usize::from(terminal_size().0))
    }

    /// Month grid on the left, agenda on the right.
    pub fn month_with_agenda(&self, source: &dyn EventSource, options: &RenderOptions) -> Result<String> {
        let term_width = Self::terminal_width(options);
        let left_width = match options.week_numbers {
            WeekNumbers::Right => CALENDAR_WIDTH + WEEK_NUMBER_WIDTH,
            _ => CALENDAR_WIDTH,
        };
        let right_width = term_width.saturating_sub(left_width + GUTTER);
        log::debug!(
            "Calendar view: terminal {} columns, agenda {} columns",
            term_width,
            right_width
        );

        let builder = AgendaBuilder::new(&self.config.locale, options.today);
        let event_column = builder.build(source, &Self::agenda_request(options, right_width))?;
        let calendar_column = vertical_month(
            options.today,
            options.first_weekday,
            options.week_numbers,
            MONTH_COUNT,
        );

        let rows = merge_columns(&calendar_column, &event_column, left_width, GUTTER);
        Ok(render_lines(&rows, options.color))
    }

    /// The agenda alone, using the whole terminal width.
    pub fn agenda_only(&self, source: &dyn EventSource, options: &RenderOptions) -> Result<String> {
        let width = Self::terminal_width(options);
        let builder = AgendaBuilder::new(&self.config.locale, options.today);
        let column = builder.build(source, &Self::agenda_request(options, width))?;
        Ok(render_lines(&column, options.color))
    }

    /// Parses `tokens` into an event and stores it.
    ///
    /// Returns what should be printed afterwards according to `print_new`.
    pub fn new_from_string(
        &self,
        source: &mut dyn EventSource,
        tokens: &[String],
        args: &NewEventArgs,
        today: NaiveDate,
    ) -> Result<Option<String>> {
        let calendar = match &args.calendar {
            Some(name) => name.clone(),
            None => source
                .default_calendar_name()
                .map(str::to_string)
                .ok_or(AlmanacError::NoCalendars)?,
        };
        if source.calendar_path(&calendar).is_none() {
            return Err(AlmanacError::UnknownCalendar(calendar));
        }

        let words: Vec<&str> = tokens
            .iter()
            .flat_map(|t| t.split_whitespace())
            .collect();
        let opts = EventOptions {
            locale: &self.config.locale,
            location: args.location.clone(),
            repeat: args.repeat.clone(),
            until: args.until.clone(),
            today,
        };
        let draft = construct_event(&words, &opts)?;
        let event = draft.into_event(&calendar, None);
        let long = event.long(&self.config.locale);

        let path = source.insert(event)?;
        Ok(match self.config.default.print_new {
            PrintNew::None => None,
            PrintNew::Event => Some(long),
            PrintNew::Path => Some(path.display().to_string()),
        })
    }

    /// Each configured format applied to a fixed sample timestamp.
    pub fn print_formats(&self) -> String {
        let sample = sample_datetime();
        self.config
            .locale
            .formats()
            .iter()
            .map(|(name, fmt)| format!("{}: {}", name, sample.format(fmt)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
