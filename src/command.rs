//! Commands and input vocabulary shared by every front end.
//!
//! [`Command`] describes every action the switcher can perform.  The GTK
//! window produces commands from key presses via [`Command::from_key_name`];
//! the headless front end parses them from text lines via [`FromStr`].

use std::fmt;
use std::str::FromStr;

/// Direction of keyboard focus movement along the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Signed step this direction applies to a focus index.
    pub fn delta(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Parse a direction string (case-insensitive; accepts "left", "Right", "prev", "next").
fn parse_direction(s: &str) -> Option<Direction> {
    let normalized: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(|c| c.to_lowercase())
        .collect();
    match normalized.as_str() {
        "left" | "prev" | "previous" => Some(Direction::Left),
        "right" | "next" => Some(Direction::Right),
        _ => None,
    }
}

/// Every action the switcher can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move keyboard focus one app to the left or right, wrapping around.
    Focus(Direction),

    /// Activate the app that currently holds keyboard focus.
    Activate,

    /// Activate the row control at the given position (pointer tap).
    ActivateAt(usize),

    /// Open the settings window.
    OpenSettings,

    /// Close the switcher without launching anything.
    Close,
}

impl Command {
    /// Map a GDK key name (as returned by `gdk::Key::name`) to a command.
    ///
    /// Return, KP_Enter and space activate; the arrow keys move focus; `s`
    /// opens settings.  Every other key is ignored.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "Return" | "KP_Enter" | "ISO_Enter" | "space" => Some(Command::Activate),
            "Left" | "KP_Left" => Some(Command::Focus(Direction::Left)),
            "Right" | "KP_Right" => Some(Command::Focus(Direction::Right)),
            "s" | "S" => Some(Command::OpenSettings),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Focus(dir) => write!(f, "focus {}", dir),
            Command::Activate => write!(f, "activate"),
            Command::ActivateAt(idx) => write!(f, "activate {}", idx),
            Command::OpenSettings => write!(f, "settings"),
            Command::Close => write!(f, "close"),
        }
    }
}

/// Error from parsing a [`Command`] out of a text line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised command: {0:?}")]
pub struct CommandParseError(String);

impl FromStr for Command {
    type Err = CommandParseError;

    /// Accepts `left`, `right`, `enter` / `activate`, `activate <n>`,
    /// `s` / `settings` and `close` / `quit`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let head = parts
            .next()
            .ok_or_else(|| CommandParseError(s.to_string()))?
            .to_lowercase();
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(CommandParseError(s.to_string()));
        }

        if let Some(dir) = parse_direction(&head) {
            if arg.is_none() {
                return Ok(Command::Focus(dir));
            }
        }

        match (head.as_str(), arg) {
            ("enter" | "return" | "activate", None) => Ok(Command::Activate),
            ("activate", Some(n)) => n
                .parse()
                .map(Command::ActivateAt)
                .map_err(|_| CommandParseError(s.to_string())),
            ("s" | "settings", None) => Ok(Command::OpenSettings),
            ("close" | "quit", None) => Ok(Command::Close),
            _ => Err(CommandParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_deltas() {
        assert_eq!(Direction::Left.delta(), -1);
        assert_eq!(Direction::Right.delta(), 1);
    }

    #[test]
    fn direction_parse_is_case_insensitive() {
        assert_eq!(parse_direction("LEFT"), Some(Direction::Left));
        assert_eq!(parse_direction(" Right "), Some(Direction::Right));
        assert_eq!(parse_direction("next"), Some(Direction::Right));
        assert_eq!(parse_direction("up"), None);
    }

    #[test]
    fn key_names_map_to_commands() {
        assert_eq!(Command::from_key_name("Return"), Some(Command::Activate));
        assert_eq!(Command::from_key_name("KP_Enter"), Some(Command::Activate));
        assert_eq!(Command::from_key_name("space"), Some(Command::Activate));
        assert_eq!(
            Command::from_key_name("Left"),
            Some(Command::Focus(Direction::Left))
        );
        assert_eq!(
            Command::from_key_name("Right"),
            Some(Command::Focus(Direction::Right))
        );
        assert_eq!(Command::from_key_name("s"), Some(Command::OpenSettings));
        assert_eq!(Command::from_key_name("Tab"), None);
        assert_eq!(Command::from_key_name("Escape"), None);
    }

    #[test]
    fn parse_text_commands() {
        assert_eq!("left".parse(), Ok(Command::Focus(Direction::Left)));
        assert_eq!("Right".parse(), Ok(Command::Focus(Direction::Right)));
        assert_eq!("enter".parse(), Ok(Command::Activate));
        assert_eq!("activate".parse(), Ok(Command::Activate));
        assert_eq!("activate 3".parse(), Ok(Command::ActivateAt(3)));
        assert_eq!("s".parse(), Ok(Command::OpenSettings));
        assert_eq!("close".parse(), Ok(Command::Close));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Command>().is_err());
        assert!("jump".parse::<Command>().is_err());
        assert!("activate x".parse::<Command>().is_err());
        assert!("left 2".parse::<Command>().is_err());
        assert!("activate 1 2".parse::<Command>().is_err());
    }
}
