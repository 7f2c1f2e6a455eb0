// Crate root library declaration and module exports.
pub mod agenda;
pub mod calendar_display;
pub mod cli;
pub mod color;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod model;
pub mod storage;
pub mod terminal;

#[cfg(feature = "tui")]
pub mod tui;
