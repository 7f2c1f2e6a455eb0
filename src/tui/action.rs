// Defines the actions a key press can trigger in the interactive view.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the selection by a number of days (negative goes back).
    MoveDays(i64),
    /// Move the selection by whole months, clamping the day of month.
    MoveMonths(i32),
    Today,
    Quit,
}
