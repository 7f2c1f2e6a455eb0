// File: src/model/adapter.rs
use crate::model::event::{DateType, Event};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use crossterm::style::Color;
use icalendar::{Calendar, CalendarComponent, Component, Property};

/// Parses an RFC 5545 value (`DATE` or `DATE-TIME`) into a local [`DateType`].
/// UTC values are converted to local time; other values are taken as wall-clock time.
fn parse_date_prop(val: &str) -> Option<DateType> {
    let val = val.trim();
    if val.len() == 8 {
        return NaiveDate::parse_from_str(val, "%Y%m%d")
            .ok()
            .map(DateType::AllDay);
    }
    if let Some(utc) = val.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").ok()?;
        let local = Utc.from_utc_datetime(&naive).with_timezone(&Local);
        return Some(DateType::Specific(local.naive_local()));
    }
    NaiveDateTime::parse_from_str(val, "%Y%m%dT%H%M%S")
        .ok()
        .map(DateType::Specific)
}

/// Minimal ISO 8601 duration parser (`P1D`, `PT1H30M`, `P1W`).
fn parse_duration(val: &str) -> Option<Duration> {
    let mut total = Duration::zero();
    let mut num_buf = String::new();
    let mut in_time = false;
    let mut negative = false;
    for c in val.trim().chars() {
        match c {
            '-' => negative = true,
            '+' | 'P' => {}
            'T' => in_time = true,
            c if c.is_ascii_digit() => num_buf.push(c),
            unit => {
                let n: i64 = num_buf.parse().ok()?;
                num_buf.clear();
                let part = match (unit, in_time) {
                    ('W', _) => Duration::try_weeks(n),
                    ('D', _) => Duration::try_days(n),
                    ('H', true) => Duration::try_hours(n),
                    ('M', true) => Duration::try_minutes(n),
                    ('S', true) => Duration::try_seconds(n),
                    _ => None,
                }?;
                total = total.checked_add(&part)?;
            }
        }
    }
    Some(if negative { -total } else { total })
}

fn format_date_prop(key: &str, value: DateType) -> Property {
    match value {
        DateType::AllDay(d) => {
            let mut prop = Property::new(key, d.format("%Y%m%d").to_string());
            prop.add_parameter("VALUE", "DATE");
            prop
        }
        DateType::Specific(dt) => Property::new(key, dt.format("%Y%m%dT%H%M%S").to_string()),
    }
}

impl Event {
    /// Builds an event from a parsed VEVENT. Returns `None` when DTSTART is missing
    /// or unreadable.
    pub fn from_vevent(
        vevent: &icalendar::Event,
        calendar: &str,
        href: &str,
        color: Option<Color>,
    ) -> Option<Self> {
        let props = vevent.properties();
        let start = props.get("DTSTART").and_then(|p| parse_date_prop(p.value()))?;

        let end = props
            .get("DTEND")
            .and_then(|p| parse_date_prop(p.value()))
            .or_else(|| {
                let dur = props.get("DURATION").and_then(|p| parse_duration(p.value()))?;
                match start {
                    DateType::AllDay(d) => d.checked_add_signed(dur).map(DateType::AllDay),
                    DateType::Specific(dt) => dt.checked_add_signed(dur).map(DateType::Specific),
                }
            })
            .unwrap_or(match start {
                DateType::AllDay(d) => DateType::AllDay(d.succ_opt().unwrap_or(d)),
                DateType::Specific(dt) => DateType::Specific(dt),
            });

        let text = |key: &str| {
            vevent
                .property_value(key)
                .map(str::to_string)
                .filter(|s| !s.is_empty())
        };

        Some(Event {
            uid: text("UID").unwrap_or_default(),
            summary: text("SUMMARY").unwrap_or_default(),
            description: text("DESCRIPTION"),
            location: text("LOCATION"),
            start,
            end,
            rrule: text("RRULE"),
            calendar: calendar.to_string(),
            href: href.to_string(),
            color,
        })
    }

    pub fn to_ics(&self) -> String {
        let mut event = icalendar::Event::new();
        event.uid(&self.uid);
        event.summary(&self.summary);
        if let Some(description) = &self.description {
            event.description(description);
        }
        if let Some(location) = &self.location {
            event.add_property("LOCATION", location.as_str());
        }
        event.timestamp(Utc::now());
        event.append_property(format_date_prop("DTSTART", self.start));
        event.append_property(format_date_prop("DTEND", self.end));
        if let Some(rrule) = &self.rrule {
            event.add_property("RRULE", rrule.as_str());
        }

        let mut calendar = Calendar::new();
        calendar.push(event);
        calendar.to_string()
    }
}

/// Extracts every VEVENT of an iCalendar document. Other components are ignored.
pub fn events_from_ics(
    raw_ics: &str,
    calendar: &str,
    href: &str,
    color: Option<Color>,
) -> Result<Vec<Event>, String> {
    if raw_ics.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: Calendar = raw_ics.parse().map_err(|e| format!("Parse: {}", e))?;
    Ok(parsed
        .components
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(e) => Event::from_vevent(e, calendar, href, color),
            _ => None,
        })
        .collect())
}
