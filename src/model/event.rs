// File: ./src/model/event.rs
use crate::config::Locale;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use crossterm::style::Color;
use std::cmp::Ordering;

// --- DATE TYPES ---

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DateType {
    AllDay(NaiveDate),
    Specific(NaiveDateTime),
}

impl DateType {
    pub fn to_date_naive(&self) -> NaiveDate {
        match self {
            DateType::AllDay(d) => *d,
            DateType::Specific(dt) => dt.date(),
        }
    }

    /// AllDay -> midnight at the start of that date. Specific -> exact time.
    pub fn to_datetime(&self) -> NaiveDateTime {
        match self {
            DateType::AllDay(d) => d.and_time(NaiveTime::MIN),
            DateType::Specific(dt) => *dt,
        }
    }
}

impl PartialOrd for DateType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_datetime().cmp(&other.to_datetime())
    }
}

/// The first instant of `day` and the last representable one (23:59:59.999999).
pub fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(NaiveTime::MIN);
    let last = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    let end = day.and_time(last);
    (start, end)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateType,
    /// Exclusive for all-day events.
    pub end: DateType,
    pub rrule: Option<String>,
    /// Name of the calendar the event belongs to.
    pub calendar: String,
    /// File name inside the calendar directory.
    pub href: String,
    pub color: Option<Color>,
}

impl Event {
    pub fn is_all_day(&self) -> bool {
        matches!(self.start, DateType::AllDay(_))
    }

    pub fn is_recurring(&self) -> bool {
        self.rrule.is_some()
    }

    fn recur_marker(&self) -> &'static str {
        if self.is_recurring() { " ⟳" } else { "" }
    }

    /// True when the event touches `day` (all-day: start <= day < end).
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        match (self.start, self.end) {
            (DateType::AllDay(s), DateType::AllDay(e)) => s <= day && day < e.max(s.succ_opt().unwrap_or(s)),
            _ => {
                let (start, end) = day_bounds(day);
                self.overlaps(start, end)
            }
        }
    }

    /// Overlap test for timed events against the closed interval `[start, end]`.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let ev_start = self.start.to_datetime();
        let ev_end = self.end.to_datetime();
        ev_start <= end && (ev_end > start || ev_start >= start)
    }

    /// One logical line describing the event as seen on `day`.
    pub fn compact(&self, day: NaiveDate, timeformat: &str) -> String {
        match (self.start, self.end) {
            (DateType::AllDay(start), DateType::AllDay(end)) => {
                let next_day = day.succ_opt().unwrap_or(day);
                let range = if start < day && end > next_day {
                    "↔ "
                } else if start < day {
                    "⇥ "
                } else if end > next_day {
                    "↦ "
                } else {
                    ""
                };
                format!("{}{}{}", range, self.summary, self.recur_marker())
            }
            _ => {
                let (day_start, day_end) = day_bounds(day);
                let start = self.start.to_datetime();
                let end = self.end.to_datetime();
                let mut to = "-";
                let start_str = if start < day_start {
                    to = "";
                    "→ ".to_string()
                } else {
                    start.format(timeformat).to_string()
                };
                let end_str = if end > day_end {
                    to = "";
                    " → ".to_string()
                } else {
                    end.format(timeformat).to_string()
                };
                format!(
                    "{}{}{}: {}{}",
                    start_str,
                    to,
                    end_str,
                    self.summary,
                    self.recur_marker()
                )
            }
        }
    }

    /// Multi-line description used after creating an event.
    pub fn long(&self, locale: &Locale) -> String {
        let range = match (self.start, self.end) {
            (DateType::AllDay(start), DateType::AllDay(end)) => {
                let last = end.pred_opt().unwrap_or(end).max(start);
                let start_str = start.format(&locale.longdateformat).to_string();
                if last == start {
                    start_str
                } else {
                    format!("{} - {}", start_str, last.format(&locale.longdateformat))
                }
            }
            _ => {
                let start = self.start.to_datetime();
                let end = self.end.to_datetime();
                let end_fmt = if start.date() == end.date() {
                    &locale.timeformat
                } else {
                    &locale.longdatetimeformat
                };
                format!(
                    "{} - {}",
                    start.format(&locale.longdatetimeformat),
                    end.format(end_fmt)
                )
            }
        };

        let mut out = format!("{}: {}", self.summary, range);
        if let Some(rrule) = &self.rrule {
            out.push_str(&format!("\nRepeat: {}", rrule));
        }
        if let Some(location) = self.location.as_deref().filter(|l| !l.is_empty()) {
            out.push_str(&format!("\nLocation: {}", location));
        }
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("\nDescription: {}", description));
        }
        out
    }
}
