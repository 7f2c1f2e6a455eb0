// File: src/model/parser.rs
//! Date parsing and the free-text event description parser used by `new`.
use crate::config::Locale;
use crate::error::{AlmanacError, Result};
use crate::model::event::{DateType, Event};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use crossterm::style::Color;

/// Tries to parse the first tokens of `tokens` with `fmt`, consuming as many
/// tokens as `fmt` has whitespace separated parts. When `with_year` is set the
/// current year is appended to both text and format (for formats like `%d.%m.`).
fn take<T>(
    tokens: &[&str],
    fmt: &str,
    with_year: Option<i32>,
    parse: impl Fn(&str, &str) -> Option<T>,
) -> Option<(T, usize)> {
    let n = fmt.split_whitespace().count().max(1);
    if tokens.len() < n {
        return None;
    }
    let text = tokens[..n].join(" ");
    let value = match with_year {
        Some(year) => parse(&format!("{} {}", text, year), &format!("{} %Y", fmt)),
        None => parse(&text, fmt),
    }?;
    Some((value, n))
}

fn naive_date(text: &str, fmt: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, fmt).ok()
}

fn naive_datetime(text: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, fmt).ok()
}

fn naive_time(text: &str, fmt: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, fmt).ok()
}

fn take_date(tokens: &[&str], locale: &Locale, today: NaiveDate) -> Option<(NaiveDate, usize)> {
    take(tokens, &locale.longdateformat, None, naive_date)
        .or_else(|| take(tokens, &locale.dateformat, Some(today.year()), naive_date))
}

fn take_datetime(
    tokens: &[&str],
    locale: &Locale,
    today: NaiveDate,
) -> Option<(NaiveDateTime, usize)> {
    take(tokens, &locale.longdatetimeformat, None, naive_datetime).or_else(|| {
        take(
            tokens,
            &locale.datetimeformat,
            Some(today.year()),
            naive_datetime,
        )
    })
}

/// Parses a user supplied date with the long format first, then the short one.
/// `today` and `tomorrow` are accepted as keywords.
pub fn parse_date(text: &str, locale: &Locale, today: NaiveDate) -> Result<NaiveDate> {
    let trimmed = text.trim();
    match trimmed.to_lowercase().as_str() {
        "today" => return Ok(today),
        "tomorrow" => {
            return today
                .succ_opt()
                .ok_or_else(|| AlmanacError::InvalidDate(text.to_string()));
        }
        _ => {}
    }
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    match take_date(&tokens, locale, today) {
        Some((date, used)) if used == tokens.len() => Ok(date),
        _ => Err(AlmanacError::InvalidDate(text.to_string())),
    }
}

/// Extra inputs for [`construct_event`] that do not come from the free text.
#[derive(Debug, Clone)]
pub struct EventOptions<'a> {
    pub locale: &'a Locale,
    pub location: Option<String>,
    pub repeat: Option<String>,
    pub until: Option<String>,
    pub today: NaiveDate,
}

/// A parsed event that is not yet bound to a calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateType,
    pub end: DateType,
    pub rrule: Option<String>,
}

impl EventDraft {
    pub fn into_event(self, calendar: &str, color: Option<Color>) -> Event {
        let uid = uuid::Uuid::new_v4().to_string();
        Event {
            href: format!("{}.ics", uid),
            uid,
            summary: self.summary,
            description: self.description,
            location: self.location,
            start: self.start,
            end: self.end,
            rrule: self.rrule,
            calendar: calendar.to_string(),
            color,
        }
    }
}

fn parse_repeat(repeat: &str, until: Option<DateType>) -> Result<String> {
    let freq = match repeat.trim().to_lowercase().as_str() {
        "daily" => "DAILY",
        "weekly" => "WEEKLY",
        "monthly" => "MONTHLY",
        "yearly" => "YEARLY",
        other => {
            return Err(AlmanacError::EventParse(format!(
                "unknown repeat frequency '{}'",
                other
            )));
        }
    };
    let mut rule = format!("FREQ={}", freq);
    match until {
        Some(DateType::AllDay(d)) => rule.push_str(&format!(";UNTIL={}", d.format("%Y%m%d"))),
        Some(DateType::Specific(dt)) => {
            rule.push_str(&format!(";UNTIL={}", dt.format("%Y%m%dT%H%M%S")))
        }
        None => {}
    }
    Ok(rule)
}

/// Builds an event from tokens such as `25.10. 18:00 20:00 Dinner :: at home`.
///
/// Start forms, tried in order: long datetime, datetime, time (today), long
/// date and date (the latter two make an all-day event). An optional end in the
/// same family follows; everything after that is the summary, with `::`
/// separating an optional description.
pub fn construct_event(tokens: &[&str], opts: &EventOptions<'_>) -> Result<EventDraft> {
    let locale = opts.locale;
    let today = opts.today;
    let cannot_parse = || AlmanacError::EventParse(format!("'{}'", tokens.join(" ")));

    let (start, mut rest) = if let Some((dt, n)) = take_datetime(tokens, locale, today) {
        (DateType::Specific(dt), &tokens[n..])
    } else if let Some((t, n)) = take(tokens, &locale.timeformat, None, naive_time) {
        (DateType::Specific(today.and_time(t)), &tokens[n..])
    } else if let Some((d, n)) = take_date(tokens, locale, today) {
        (DateType::AllDay(d), &tokens[n..])
    } else {
        return Err(cannot_parse());
    };

    let out_of_range = || AlmanacError::EventParse(format!("end of '{}' is out of range", tokens.join(" ")));
    let end = match start {
        DateType::AllDay(start_date) => {
            let end = match take_date(rest, locale, today) {
                Some((d, n)) => {
                    rest = &rest[n..];
                    d.max(start_date).succ_opt()
                }
                None => start_date.checked_add_signed(Duration::days(i64::from(
                    locale.default_dayevent_duration.max(1),
                ))),
            };
            DateType::AllDay(end.ok_or_else(out_of_range)?)
        }
        DateType::Specific(start_dt) => {
            let end = if let Some((dt, n)) = take_datetime(rest, locale, today) {
                rest = &rest[n..];
                Some(dt)
            } else if let Some((t, n)) = take(rest, &locale.timeformat, None, naive_time) {
                rest = &rest[n..];
                let end = start_dt.date().and_time(t);
                if end < start_dt {
                    end.checked_add_signed(Duration::days(1))
                } else {
                    Some(end)
                }
            } else {
                start_dt.checked_add_signed(Duration::minutes(i64::from(
                    locale.default_event_duration,
                )))
            };
            DateType::Specific(end.ok_or_else(out_of_range)?)
        }
    };

    let (summary_tokens, description) = match rest.iter().position(|t| *t == "::") {
        Some(idx) => {
            let desc = rest[idx + 1..].join(" ");
            (&rest[..idx], Some(desc).filter(|d| !d.is_empty()))
        }
        None => (rest, None),
    };
    let summary = summary_tokens.join(" ");
    if summary.is_empty() {
        return Err(AlmanacError::EventParse(format!(
            "no summary in '{}'",
            tokens.join(" ")
        )));
    }

    let until = match opts.until.as_deref() {
        Some(text) => {
            let date = parse_date(text, locale, today)?;
            Some(match start {
                DateType::AllDay(_) => DateType::AllDay(date),
                DateType::Specific(_) => {
                    DateType::Specific(date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)))
                }
            })
        }
        None => None,
    };
    let rrule = opts
        .repeat
        .as_deref()
        .map(|r| parse_repeat(r, until))
        .transpose()?;

    Ok(EventDraft {
        summary,
        description,
        location: opts.location.clone().filter(|l| !l.is_empty()),
        start,
        end,
        rrule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2014, 4, 9).unwrap()
    }

    fn opts(locale: &Locale) -> EventOptions<'_> {
        EventOptions {
            locale,
            location: None,
            repeat: None,
            until: None,
            today: today(),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateType {
        DateType::Specific(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap(),
        )
    }

    #[test]
    fn parse_date_long_and_short() {
        let locale = Locale::default();
        assert_eq!(
            parse_date("09.04.2014", &locale, today()).unwrap(),
            NaiveDate::from_ymd_opt(2014, 4, 9).unwrap()
        );
        assert_eq!(
            parse_date("25.12.", &locale, today()).unwrap(),
            NaiveDate::from_ymd_opt(2014, 12, 25).unwrap()
        );
        assert_eq!(
            parse_date("tomorrow", &locale, today()).unwrap(),
            NaiveDate::from_ymd_opt(2014, 4, 10).unwrap()
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        let err = parse_date("32.13.2014", &Locale::default(), today()).unwrap_err();
        assert!(matches!(err, AlmanacError::InvalidDate(_)));
        assert!(parse_date("soon", &Locale::default(), today()).is_err());
    }

    #[test]
    fn time_only_is_today_with_default_duration() {
        let locale = Locale::default();
        let draft = construct_event(&["18:00", "myevent"], &opts(&locale)).unwrap();
        assert_eq!(draft.summary, "myevent");
        assert_eq!(draft.start, at(2014, 4, 9, 18, 0));
        assert_eq!(draft.end, at(2014, 4, 9, 19, 0));
    }

    #[test]
    fn long_datetime_with_end_time() {
        let locale = Locale::default();
        let tokens = ["10.04.2014", "09:30", "10:30", "An", "Event"];
        let draft = construct_event(&tokens, &opts(&locale)).unwrap();
        assert_eq!(draft.start, at(2014, 4, 10, 9, 30));
        assert_eq!(draft.end, at(2014, 4, 10, 10, 30));
        assert_eq!(draft.summary, "An Event");
    }

    #[test]
    fn end_before_start_rolls_to_next_day() {
        let locale = Locale::default();
        let tokens = ["25.10.", "22:00", "02:00", "Party"];
        let draft = construct_event(&tokens, &opts(&locale)).unwrap();
        assert_eq!(draft.start, at(2014, 10, 25, 22, 0));
        assert_eq!(draft.end, at(2014, 10, 26, 2, 0));
    }

    #[test]
    fn all_day_ranges_are_inclusive() {
        let locale = Locale::default();
        let d = |day| DateType::AllDay(NaiveDate::from_ymd_opt(2014, 10, day).unwrap());
        let single = construct_event(&["25.10.", "Holiday"], &opts(&locale)).unwrap();
        assert_eq!((single.start, single.end), (d(25), d(26)));

        let range = construct_event(&["25.10.", "27.10.", "Trip"], &opts(&locale)).unwrap();
        assert_eq!((range.start, range.end), (d(25), d(28)));
    }

    #[test]
    fn description_and_extras() {
        let locale = Locale::default();
        let mut o = opts(&locale);
        o.location = Some("Home".to_string());
        o.repeat = Some("weekly".to_string());
        o.until = Some("30.04.2014".to_string());
        let draft = construct_event(&["18:00", "Dinner", "::", "bring", "wine"], &o).unwrap();
        assert_eq!(draft.summary, "Dinner");
        assert_eq!(draft.description.as_deref(), Some("bring wine"));
        assert_eq!(draft.location.as_deref(), Some("Home"));
        assert_eq!(
            draft.rrule.as_deref(),
            Some("FREQ=WEEKLY;UNTIL=20140430T235959")
        );
    }

    #[test]
    fn unparseable_input_fails() {
        let locale = Locale::default();
        assert!(matches!(
            construct_event(&["whenever", "party"], &opts(&locale)),
            Err(AlmanacError::EventParse(_))
        ));
        assert!(matches!(
            construct_event(&["18:00"], &opts(&locale)),
            Err(AlmanacError::EventParse(_))
        ));
        let mut o = opts(&locale);
        o.repeat = Some("hourly".to_string());
        assert!(construct_event(&["18:00", "x"], &o).is_err());
    }

    #[test]
    fn draft_binds_to_calendar() {
        let locale = Locale::default();
        let draft = construct_event(&["18:00", "x"], &opts(&locale)).unwrap();
        let event = draft.into_event("work", None);
        assert_eq!(event.calendar, "work");
        assert_eq!(event.href, format!("{}.ics", event.uid));
    }

    #[test]
    fn all_day_event_on_last_date_fails_cleanly() {
        let locale = Locale::default();
        let tokens = ["31.12.+262142", "Party"];
        assert!(matches!(
            construct_event(&tokens, &opts(&locale)),
            Err(AlmanacError::EventParse(_))
        ));
    }
}
