// File: ./src/model/mod.rs
pub mod adapter;
pub mod event;
pub mod parser;

pub use event::{DateType, Event, day_bounds};
pub use parser::{EventDraft, EventOptions, construct_event, parse_date};
