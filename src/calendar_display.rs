// File: ./src/calendar_display.rs
//! The vertical month grid shown left of the agenda.
use crate::config::WeekNumbers;
use crate::terminal::{Column, Span, Style, StyledLine};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Months rendered by default.
pub const MONTH_COUNT: usize = 3;

/// Two-letter weekday names starting at `first_weekday`.
pub fn week_header(first_weekday: Weekday) -> Vec<String> {
    let mut day = first_weekday;
    let mut names = Vec::with_capacity(7);
    for _ in 0..7 {
        names.push(day.to_string().chars().take(2).collect());
        day = day.succ();
    }
    names
}

/// The first day of the week containing `date`.
fn week_start(date: NaiveDate, first_weekday: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday() - first_weekday.num_days_from_monday()) % 7;
    date - Duration::days(i64::from(offset))
}

/// Whole weeks covering the given month.
fn month_weeks(year: i32, month: u32, first_weekday: Weekday) -> Vec<[NaiveDate; 7]> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let mut weeks = Vec::new();
    let mut start = week_start(first, first_weekday);
    while (start.month() == month && start.year() == year) || start < first {
        let mut week = [start; 7];
        for (i, slot) in week.iter_mut().enumerate() {
            *slot = start + Duration::days(i as i64);
        }
        weeks.push(week);
        start += Duration::days(7);
    }
    weeks
}

fn render_week(week: &[NaiveDate; 7], today: NaiveDate) -> Vec<Span> {
    let mut spans = Vec::with_capacity(14);
    for (i, day) in week.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let text = format!("{:02}", day.day());
        if *day == today {
            spans.push(Span::styled(text, Style::reversed()));
        } else {
            spans.push(Span::raw(text));
        }
    }
    spans
}

/// Builds `count` months of weeks starting at the month of `today`.
///
/// A week that contains the 1st of a month carries that month's abbreviation in
/// the gutter. Weeks shared by two months are printed once.
pub fn vertical_month(
    today: NaiveDate,
    first_weekday: Weekday,
    week_numbers: WeekNumbers,
    count: usize,
) -> Column {
    let mut column: Column = Vec::new();
    column.push(StyledLine::bold(format!(
        "    {}",
        week_header(first_weekday).join(" ")
    )));

    let (mut year, mut month) = (today.year(), today.month());
    for _ in 0..count {
        for week in month_weeks(year, month, first_weekday) {
            let new_month = week.iter().any(|d| d.day() == 1);
            let gutter = if new_month {
                let name = week[6].format("%b").to_string();
                Span::styled(format!("{:<4}", name), Style::bold())
            } else if week_numbers == WeekNumbers::Left {
                Span::styled(format!(" {:2} ", week[0].iso_week().week()), Style::bold())
            } else {
                Span::raw("    ")
            };

            let mut line = StyledLine::new(vec![gutter]);
            line.spans.extend(render_week(&week, today));
            if week_numbers == WeekNumbers::Right {
                line.push(Span::styled(
                    format!(" {:2}", week[0].iso_week().week()),
                    Style::bold(),
                ));
            }
            if column.last() != Some(&line) {
                column.push(line);
            }
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    column
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn header_rotates_with_first_weekday() {
        assert_eq!(week_header(Weekday::Mon)[0], "Mo");
        let sunday_first = week_header(Weekday::Sun);
        assert_eq!(sunday_first[0], "Su");
        assert_eq!(sunday_first[6], "Sa");
    }

    #[test]
    fn april_2014_grid() {
        let column = vertical_month(date(2014, 4, 9), Weekday::Mon, WeekNumbers::Off, 1);
        let lines: Vec<String> = column.iter().map(StyledLine::plain).collect();
        assert_eq!(lines[0], "    Mo Tu We Th Fr Sa Su");
        assert_eq!(lines[1], "Apr 31 01 02 03 04 05 06");
        assert_eq!(lines[2], "    07 08 09 10 11 12 13");
        assert_eq!(lines.last().unwrap(), "May 28 29 30 01 02 03 04");
        assert!(column.iter().all(|l| l.display_width() <= 25));
    }

    #[test]
    fn today_is_reversed() {
        let column = vertical_month(date(2014, 4, 9), Weekday::Mon, WeekNumbers::Off, 1);
        let reversed: Vec<&Span> = column
            .iter()
            .flat_map(|l| l.spans.iter())
            .filter(|s| s.style.reverse)
            .collect();
        assert_eq!(reversed.len(), 1);
        assert_eq!(reversed[0].text, "09");
    }

    #[test]
    fn shared_weeks_are_not_repeated() {
        let column = vertical_month(date(2014, 4, 9), Weekday::Mon, WeekNumbers::Off, 2);
        let lines: Vec<String> = column.iter().map(StyledLine::plain).collect();
        let may_first = lines.iter().filter(|l| l.starts_with("May 28")).count();
        assert_eq!(may_first, 1);
    }

    #[test]
    fn week_numbers_left_and_right() {
        let left = vertical_month(date(2014, 4, 9), Weekday::Mon, WeekNumbers::Left, 1);
        assert_eq!(left[2].plain(), " 15 07 08 09 10 11 12 13");

        let right = vertical_month(date(2014, 4, 9), Weekday::Mon, WeekNumbers::Right, 1);
        assert_eq!(right[2].plain(), "    07 08 09 10 11 12 13 15");
    }

    #[test]
    fn december_rolls_into_next_year() {
        let column = vertical_month(date(2014, 12, 15), Weekday::Mon, WeekNumbers::Off, 2);
        let lines: Vec<String> = column.iter().map(StyledLine::plain).collect();
        assert!(lines.iter().any(|l| l.starts_with("Jan 29 30 31 01")));
    }
}
