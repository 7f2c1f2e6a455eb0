// File: ./src/tui/mod.rs
// Entry point and main loop for the interactive view.
pub mod action;
pub mod handlers;
pub mod state;
pub mod view;

use crate::config::Config;
use crate::error::Result;
use crate::storage::EventSource;
use crate::tui::state::AppState;
use crate::tui::view::draw;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, time::Duration};

pub fn run(config: &Config, source: &dyn EventSource) -> Result<()> {
    // --- 1. TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e.into());
        }
    };

    // --- 2. UI LOOP ---
    let today = chrono::Local::now().date_naive();
    let mut app_state = AppState::new(today);
    let result = event_loop(&mut terminal, &mut app_state, config, source);

    // --- 3. CLEANUP ---
    // Runs whether or not the loop failed, so the shell is never left in raw mode.
    let restore_raw = disable_raw_mode();
    let restore_screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let restore_cursor = terminal.show_cursor();
    result?;
    restore_raw?;
    restore_screen?;
    restore_cursor?;
    Ok(())
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app_state: &mut AppState,
    config: &Config,
    source: &dyn EventSource,
) -> Result<()> {
    while !app_state.should_quit {
        terminal.draw(|f| draw(f, app_state, config, source))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && let Some(action) = handlers::handle_key_event(key)
        {
            log::trace!("Action {:?}", action);
            app_state.apply(action);
        }
    }
    Ok(())
}
