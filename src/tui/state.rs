// File: ./src/tui/state.rs
// Selection state of the interactive view.
use crate::tui::action::Action;
use chrono::{Duration, Months, NaiveDate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub today: NaiveDate,
    pub selected: NaiveDate,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            selected: today,
            should_quit: false,
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::MoveDays(days) => {
                if let Some(date) = self.selected.checked_add_signed(Duration::days(days)) {
                    self.selected = date;
                }
            }
            Action::MoveMonths(months) => {
                let moved = if months >= 0 {
                    self.selected.checked_add_months(Months::new(months.unsigned_abs()))
                } else {
                    self.selected.checked_sub_months(Months::new(months.unsigned_abs()))
                };
                if let Some(date) = moved {
                    self.selected = date;
                }
            }
            Action::Today => self.selected = self.today,
            Action::Quit => self.should_quit = true,
        }
    }
}
