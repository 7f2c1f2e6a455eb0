// File: ./src/agenda/builder.rs
//! Builds the agenda column: one bold header per day followed by the day's
//! events, wrapped to the column width.
use crate::agenda::daynames::construct_daynames;
use crate::config::Locale;
use crate::error::{AlmanacError, Result};
use crate::model::{Event, day_bounds, parse_date};
use crate::storage::{EventList, EventSource};
use crate::terminal::{Column, Style, StyledLine, wrap};
use chrono::{Duration, NaiveDate};

pub const DEFAULT_DAYS: u32 = 2;
/// Upper bound for the number of days per start date (about a century).
pub const MAX_DAYS: u32 = 36_525;
pub const NO_EVENTS: &str = "No events";

/// A requested start date, either already resolved or still user text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    Text(String),
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct AgendaRequest {
    /// Start dates. Empty means today.
    pub dates: Vec<DateInput>,
    /// Consecutive days shown per start date. Defaults to [`DEFAULT_DAYS`].
    pub days: Option<u32>,
    /// Replaces the event source query with a fixed list. Exclusive with `days`.
    pub events: Option<Vec<Event>>,
    pub width: usize,
    pub show_all_days: bool,
}

impl Default for AgendaRequest {
    fn default() -> Self {
        Self {
            dates: Vec::new(),
            days: None,
            events: None,
            width: 45,
            show_all_days: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AgendaBuilder<'a> {
    locale: &'a Locale,
    today: NaiveDate,
}

impl<'a> AgendaBuilder<'a> {
    pub fn new(locale: &'a Locale, today: NaiveDate) -> Self {
        Self { locale, today }
    }

    /// Turns the requested dates into concrete dates; empty input means today.
    pub fn resolve_dates(&self, dates: &[DateInput]) -> Result<Vec<NaiveDate>> {
        if dates.is_empty() {
            return Ok(vec![self.today]);
        }
        dates
            .iter()
            .map(|d| match d {
                DateInput::Date(date) => Ok(*date),
                DateInput::Text(text) => parse_date(text, self.locale, self.today),
            })
            .collect()
    }

    /// Every start date expanded to `days` consecutive days, sorted.
    /// Overlapping ranges keep their duplicates. A count of 0 behaves like 1.
    pub fn expand_days(dates: &[NaiveDate], days: u32) -> Result<Vec<NaiveDate>> {
        if days > MAX_DAYS {
            return Err(AlmanacError::InvalidArgument(format!(
                "days must be at most {}, got {}",
                MAX_DAYS, days
            )));
        }
        let span = i64::from(days.max(1));
        let mut daylist = Vec::with_capacity(dates.len() * span as usize);
        for start in dates {
            for offset in 0..span {
                let day = start.checked_add_signed(Duration::days(offset)).ok_or_else(|| {
                    AlmanacError::InvalidArgument(format!(
                        "{} plus {} day(s) is past the last supported date",
                        start, offset
                    ))
                })?;
                daylist.push(day);
            }
        }
        daylist.sort();
        Ok(daylist)
    }

    pub fn build(&self, source: &dyn EventSource, request: &AgendaRequest) -> Result<Column> {
        if request.days.is_some() && request.events.is_some() {
            return Err(AlmanacError::InvalidArgument(
                "days and events are mutually exclusive".to_string(),
            ));
        }

        let override_list = request.events.clone().map(EventList::new);
        let source: &dyn EventSource = match &override_list {
            Some(list) => list,
            None => source,
        };

        let dates = self.resolve_dates(&request.dates)?;
        let daylist = Self::expand_days(&dates, request.days.unwrap_or(DEFAULT_DAYS))?;
        log::debug!(
            "Agenda for {} day(s), width {}",
            daylist.len(),
            request.width
        );

        let mut column = Column::new();
        for entry in construct_daynames(&daylist, self.today, &self.locale.longdateformat) {
            let (start, end) = day_bounds(entry.date);
            let all_day_events = source.allday_events_on(entry.date);
            let mut events = source.timed_events_between(start, end);
            if events.is_empty() && all_day_events.is_empty() && !request.show_all_days {
                continue;
            }

            column.push(StyledLine::bold(entry.label));
            events.sort_by_key(|e| e.start.to_datetime());
            for event in all_day_events.iter().chain(events.iter()) {
                let description = event.compact(entry.date, &self.locale.timeformat);
                for line in wrap(&description, request.width) {
                    column.push(StyledLine::styled(line, Style::colored(event.color)));
                }
            }
        }

        if column.is_empty() {
            column.push(StyledLine::bold(NO_EVENTS));
        }
        Ok(column)
    }
}
