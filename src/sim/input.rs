//! Input commands
//!
//! Frontends translate their native key events into a [`Command`]; the world
//! never sees raw key codes.

/// Handset game-key codes for the directional pad
const GAME_KEY_UP: i32 = -91;
const GAME_KEY_DOWN: i32 = -92;
const GAME_KEY_LEFT: i32 = -93;
const GAME_KEY_RIGHT: i32 = -94;

/// A single player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// One heading step counter-clockwise
    TurnLeft,
    /// One heading step clockwise
    TurnRight,
    /// Move along the heading
    Forward,
    /// Move against the heading
    Backward,
    /// End the session
    Quit,
    /// Start over with a fresh player
    Restart,
}

impl Command {
    /// Map a browser `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Command::TurnLeft),
            "ArrowRight" => Some(Command::TurnRight),
            "ArrowUp" => Some(Command::Forward),
            "ArrowDown" => Some(Command::Backward),
            "q" | "Q" => Some(Command::Quit),
            "r" | "R" => Some(Command::Restart),
            _ => None,
        }
    }

    /// Map a handset key code (negative game keys, or a character code)
    pub fn from_game_key(code: i32) -> Option<Self> {
        match code {
            GAME_KEY_LEFT => Some(Command::TurnLeft),
            GAME_KEY_RIGHT => Some(Command::TurnRight),
            GAME_KEY_UP => Some(Command::Forward),
            GAME_KEY_DOWN => Some(Command::Backward),
            c if c == 'Q' as i32 => Some(Command::Quit),
            _ => None,
        }
    }
}
