// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal front end: key bindings and the event loop.
//!
//! The loop is single-threaded. It draws, waits for a key or for the pending
//! notification deadline, feeds at most one action to the session, and
//! delivers notification clears once their deadline passes.

use std::io::Stdout;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use keyward_config::KeywardConfig;
use keyward_core::{Clipboard, KeywardError};
use keyward_session::{Action, Direction, Mode, Screen, Session};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use crate::clipboard::SystemClipboard;
use crate::render;

/// Longest wait for input when no notification is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

type Term = Terminal<CrosstermBackend<Stdout>>;

fn term_err(e: std::io::Error) -> KeywardError {
    KeywardError::Internal(format!("terminal error: {e}"))
}

/// Translate a key press into an action for the current screen and mode.
pub fn map_key(screen: Screen, mode: Mode, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }

    match screen {
        Screen::Entry | Screen::ChangePassphrase => text_key(key.code),
        Screen::Unlocked => match mode {
            Mode::Navigate => navigate_key(key.code),
            Mode::Search => match key.code {
                KeyCode::Tab => Some(Action::Complete),
                KeyCode::Esc => Some(Action::Confirm),
                code => text_key(code),
            },
            Mode::Edit => match key.code {
                KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
                KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
                code => text_key(code),
            },
        },
    }
}

fn text_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char(c) => Some(Action::Type(c)),
        KeyCode::Backspace => Some(Action::Erase),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Back),
        _ => None,
    }
}

fn navigate_key(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Char('s' | '/') => Action::Search,
        KeyCode::Esc => Action::Back,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Char('h') | KeyCode::Left => Action::Move(Direction::Left),
        KeyCode::Char('l') | KeyCode::Right => Action::Move(Direction::Right),
        KeyCode::Char('k') | KeyCode::Up => Action::Move(Direction::Up),
        KeyCode::Char('j') | KeyCode::Down => Action::Move(Direction::Down),
        KeyCode::Char('e') => Action::Edit,
        KeyCode::Char('n') => Action::New,
        KeyCode::Char('d') => Action::Delete,
        KeyCode::Char('m') => Action::ChangePassphrase,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// How long to wait for input before the next notification clear is due.
fn poll_timeout<C: Clipboard>(session: &Session<C>, now: Instant) -> Duration {
    session
        .pending_clear()
        .map_or(IDLE_POLL, |(_, at)| at.saturating_duration_since(now).min(IDLE_POLL))
}

/// Run the interactive session until the user quits.
pub fn run(config: KeywardConfig) -> Result<(), KeywardError> {
    let mut session = Session::new(config, SystemClipboard::new())?;

    enable_raw_mode().map_err(term_err)?;
    let mut stdout = std::io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(term_err(e));
    }
    let result = Terminal::new(CrosstermBackend::new(stdout))
        .map_err(term_err)
        .and_then(|mut terminal| {
            let outcome = event_loop(&mut terminal, &mut session);
            let restored = restore(&mut terminal);
            outcome.and(restored)
        });

    // The terminal is usable again; close the index even after a failure.
    let closed = session.close();
    result.and(closed)
}

fn event_loop<C: Clipboard>(terminal: &mut Term, session: &mut Session<C>) -> Result<(), KeywardError> {
    loop {
        terminal
            .draw(|frame| render::draw(frame, &session.view()))
            .map_err(term_err)?;
        if session.should_quit() {
            info!("session ended");
            return Ok(());
        }

        if event::poll(poll_timeout(session, Instant::now())).map_err(term_err)? {
            if let Event::Key(key) = event::read().map_err(term_err)? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = map_key(session.screen(), session.mode(), key) {
                        session.handle(action)?;
                    }
                }
            }
        }

        if let Some((generation, at)) = session.pending_clear() {
            if Instant::now() >= at {
                session.clear_notification(generation);
            }
        }
    }
}

fn restore(terminal: &mut Term) -> Result<(), KeywardError> {
    disable_raw_mode().map_err(term_err)?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(term_err)?;
    terminal.show_cursor().map_err(term_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for screen in [Screen::Entry, Screen::Unlocked, Screen::ChangePassphrase] {
            for mode in [Mode::Navigate, Mode::Search, Mode::Edit] {
                assert_eq!(map_key(screen, mode, ctrl_c), Some(Action::Quit));
            }
        }
    }

    #[test]
    fn entry_screen_types_every_character() {
        for c in ['s', 'q', 'd', '/'] {
            assert_eq!(
                map_key(Screen::Entry, Mode::Navigate, key(KeyCode::Char(c))),
                Some(Action::Type(c))
            );
        }
        assert_eq!(
            map_key(Screen::Entry, Mode::Navigate, key(KeyCode::Enter)),
            Some(Action::Confirm)
        );
    }

    #[test]
    fn navigate_bindings() {
        let nav = |code| map_key(Screen::Unlocked, Mode::Navigate, key(code));
        assert_eq!(nav(KeyCode::Char('/')), Some(Action::Search));
        assert_eq!(nav(KeyCode::Char('s')), Some(Action::Search));
        assert_eq!(nav(KeyCode::Char('j')), Some(Action::Move(Direction::Down)));
        assert_eq!(nav(KeyCode::Left), Some(Action::Move(Direction::Left)));
        assert_eq!(nav(KeyCode::Enter), Some(Action::Confirm));
        assert_eq!(nav(KeyCode::Esc), Some(Action::Back));
        assert_eq!(nav(KeyCode::Char('m')), Some(Action::ChangePassphrase));
        assert_eq!(nav(KeyCode::Char('x')), None);
    }

    #[test]
    fn search_bindings() {
        let search = |code| map_key(Screen::Unlocked, Mode::Search, key(code));
        assert_eq!(search(KeyCode::Char('j')), Some(Action::Type('j')));
        assert_eq!(search(KeyCode::Tab), Some(Action::Complete));
        assert_eq!(search(KeyCode::Esc), Some(Action::Confirm));
    }

    #[test]
    fn edit_bindings() {
        let edit = |code| map_key(Screen::Unlocked, Mode::Edit, key(code));
        assert_eq!(edit(KeyCode::Tab), Some(Action::NextField));
        assert_eq!(edit(KeyCode::Down), Some(Action::NextField));
        assert_eq!(edit(KeyCode::Up), Some(Action::PrevField));
        assert_eq!(edit(KeyCode::Esc), Some(Action::Back));
        assert_eq!(edit(KeyCode::Char('n')), Some(Action::Type('n')));
    }

    #[test]
    fn poll_timeout_is_capped() {
        let harness = keyward_test_utils::TestHarness::new().unwrap();
        let session = Session::new(
            harness.config(),
            keyward_test_utils::RecordingClipboard::new(),
        )
        .unwrap();
        assert_eq!(poll_timeout(&session, Instant::now()), IDLE_POLL);
    }
}
