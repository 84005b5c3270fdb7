use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::snake::Direction;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Intent {
    Turn(Direction),
    /// Begin a round from the title or game-over screen.
    Start,
    /// Throw away the current round and begin again.
    Restart,
    Quit,
    Ignore,
}

pub fn intent_for(key: &KeyEvent) -> Intent {
    if key.kind != KeyEventKind::Press {
        return Intent::Ignore;
    }
    if is_ctrl_c(key) {
        return Intent::Quit;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Intent::Turn(Direction::Up),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Intent::Turn(Direction::Left),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Intent::Turn(Direction::Down),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Intent::Turn(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Intent::Start,
        KeyCode::Char('r') | KeyCode::Char('R') => Intent::Restart,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Intent::Quit,
        _ => Intent::Ignore,
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}
