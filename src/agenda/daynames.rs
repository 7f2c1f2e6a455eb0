// File: ./src/agenda/daynames.rs
use chrono::NaiveDate;

pub const TODAY_LABEL: &str = "Today:";
pub const TOMORROW_LABEL: &str = "Tomorrow:";

/// A date paired with the header it is shown under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub label: String,
}

/// Labels `date` relative to `today`: "Today:", "Tomorrow:" or the long date format.
pub fn day_label(date: NaiveDate, today: NaiveDate, longdateformat: &str) -> String {
    if date == today {
        TODAY_LABEL.to_string()
    } else if today.succ_opt() == Some(date) {
        TOMORROW_LABEL.to_string()
    } else {
        date.format(longdateformat).to_string()
    }
}

/// Lazily labels each date, preserving input order. Calling it again on the
/// same dates yields the same entries.
pub fn construct_daynames<'a>(
    dates: &'a [NaiveDate],
    today: NaiveDate,
    longdateformat: &'a str,
) -> impl Iterator<Item = DayEntry> + 'a {
    dates.iter().copied().map(move |date| DayEntry {
        date,
        label: day_label(date, today, longdateformat),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2014, 4, 9).unwrap()
    }

    #[test]
    fn labels_today_and_tomorrow() {
        let dates = vec![today(), today() + Duration::days(1), today() + Duration::days(2)];
        let labels: Vec<String> = construct_daynames(&dates, today(), "%d.%m.%Y")
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, vec!["Today:", "Tomorrow:", "11.04.2014"]);
    }

    #[test]
    fn past_dates_use_long_format() {
        let yesterday = today() - Duration::days(1);
        assert_eq!(day_label(yesterday, today(), "%Y-%m-%d"), "2014-04-08");
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let later = today() + Duration::days(5);
        let dates = vec![later, today(), later];
        let entries: Vec<DayEntry> = construct_daynames(&dates, today(), "%d.%m.%Y").collect();
        assert_eq!(entries.iter().map(|e| e.date).collect::<Vec<_>>(), dates);
        assert_eq!(entries[0], entries[2]);
    }
}
