// File: ./src/agenda/mod.rs
pub mod builder;
pub mod daynames;

pub use builder::{AgendaBuilder, AgendaRequest, DEFAULT_DAYS, DateInput, NO_EVENTS};
pub use daynames::{DayEntry, construct_daynames, day_label};
