//! Key mapping from terminal events to controls.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Logical inputs the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Rotate,
    Down,
    Restart,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::Left,
        Control::Right,
        Control::Rotate,
        Control::Down,
        Control::Restart,
    ];

    pub(crate) fn slot(self) -> usize {
        match self {
            Control::Left => 0,
            Control::Right => 1,
            Control::Rotate => 2,
            Control::Down => 3,
            Control::Restart => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Control::Left => "left",
            Control::Right => "right",
            Control::Rotate => "up",
            Control::Down => "down",
            Control::Restart => "restart",
        }
    }
}

/// Map a key code to a control.
pub fn map_key(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Control::Left)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Control::Right)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Control::Down)
        }

        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W')
        | KeyCode::Char('x')
        | KeyCode::Char('X')
        | KeyCode::Char(' ') => Some(Control::Rotate),

        KeyCode::Char('r') | KeyCode::Char('R') => Some(Control::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
