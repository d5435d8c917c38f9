//! Keyboard handling for the TUI.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Ignore key releases (windows terminals report both edges).
    if key.kind == KeyEventKind::Release {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Pause/resume probing
        KeyCode::Char(' ') | KeyCode::Char('p') => app.toggle_pause(),

        // History window (left = narrower, right = wider)
        KeyCode::Left | KeyCode::Char('h') => app.narrow_window(),
        KeyCode::Right | KeyCode::Char('l') => app.widen_window(),

        // Probe cycle
        KeyCode::Char('+') | KeyCode::Char('=') => app.slower_cycle(),
        KeyCode::Char('-') => app.faster_cycle(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HistoryWindow, ProbeCycle};
    use crate::monitor::{Control, Monitor};
    use crate::persist::StateStore;
    use crate::settings::Settings;
    use crossterm::event::KeyModifiers;
    use tempfile::TempDir;
    use tokio::sync::watch;

    fn test_app(dir: &TempDir) -> (App, watch::Receiver<Control>) {
        let monitor = Monitor::new(StateStore::new(dir.path(), "test:1"));
        let (tx, rx) = watch::channel(Control::default());
        let app = App::new("test:1".into(), monitor, tx, Settings::default());
        (app, rx)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_quits() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(&dir);
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn space_toggles_pause_and_publishes() {
        let dir = TempDir::new().unwrap();
        let (mut app, rx) = test_app(&dir);
        handle_key_event(&mut app, press(KeyCode::Char(' ')));
        assert!(app.paused);
        assert!(rx.borrow().paused);
        handle_key_event(&mut app, press(KeyCode::Char(' ')));
        assert!(!app.paused);
        assert!(!rx.borrow().paused);
    }

    #[test]
    fn arrows_cycle_history_window() {
        let dir = TempDir::new().unwrap();
        let (mut app, rx) = test_app(&dir);
        handle_key_event(&mut app, press(KeyCode::Right));
        assert_eq!(app.settings.window, HistoryWindow::Hours3);
        assert_eq!(rx.borrow().settings.window, HistoryWindow::Hours3);
        handle_key_event(&mut app, press(KeyCode::Left));
        assert_eq!(app.settings.window, HistoryWindow::Hours1);
    }

    #[test]
    fn plus_minus_cycle_probe_cadence() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(&dir);
        handle_key_event(&mut app, press(KeyCode::Char('+')));
        assert_eq!(app.settings.cycle, ProbeCycle::Secs10);
        handle_key_event(&mut app, press(KeyCode::Char('-')));
        handle_key_event(&mut app, press(KeyCode::Char('-')));
        assert_eq!(app.settings.cycle, ProbeCycle::Secs1);
    }

    #[test]
    fn any_key_closes_help() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(&dir);
        handle_key_event(&mut app, press(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, press(KeyCode::Char('x')));
        assert!(!app.show_help);
        // The key that closed help must not act on the app.
        assert!(app.running);
    }
}
