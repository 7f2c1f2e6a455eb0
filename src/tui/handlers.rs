// File: ./src/tui/handlers.rs
// Translates key presses into actions.
use crate::tui::action::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_key_event(key: KeyEvent) -> Option<Action> {
    // Filter out KeyRelease events to prevent double input on Windows
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::MoveDays(-1)),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::MoveDays(1)),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveDays(-7)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDays(7)),
        KeyCode::PageUp => Some(Action::MoveMonths(-1)),
        KeyCode::PageDown => Some(Action::MoveMonths(1)),
        KeyCode::Char('t') => Some(Action::Today),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(handle_key_event(press(KeyCode::Char('h'))), Some(Action::MoveDays(-1)));
        assert_eq!(handle_key_event(press(KeyCode::Right)), Some(Action::MoveDays(1)));
        assert_eq!(handle_key_event(press(KeyCode::Char('k'))), Some(Action::MoveDays(-7)));
        assert_eq!(handle_key_event(press(KeyCode::Down)), Some(Action::MoveDays(7)));
        assert_eq!(handle_key_event(press(KeyCode::Char('t'))), Some(Action::Today));
        assert_eq!(handle_key_event(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn quit_keys() {
        assert_eq!(handle_key_event(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(handle_key_event(press(KeyCode::Esc)), Some(Action::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c), Some(Action::Quit));
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(handle_key_event(key), None);
    }
}
