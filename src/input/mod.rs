// Input translation: navigation keys and cursor shapes for window handles.

pub mod document;

use std::fmt;
use std::str::FromStr;

use winit::keyboard::{Key, NamedKey};
use winit::window::CursorIcon;

/// Keys a focused handle reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    /// Ends an active session.
    Escape,
}

impl NavKey {
    /// Translate a winit logical key. Returns `None` for keys handles ignore.
    pub fn from_winit(key: &Key) -> Option<Self> {
        match key {
            Key::Named(named) => match named {
                NamedKey::ArrowUp => Some(NavKey::ArrowUp),
                NamedKey::ArrowDown => Some(NavKey::ArrowDown),
                NamedKey::ArrowLeft => Some(NavKey::ArrowLeft),
                NamedKey::ArrowRight => Some(NavKey::ArrowRight),
                NamedKey::Home => Some(NavKey::Home),
                NamedKey::End => Some(NavKey::End),
                NamedKey::Escape => Some(NavKey::Escape),
                _ => None,
            },
            _ => None,
        }
    }

    /// DOM `KeyboardEvent.key` name of this key.
    pub fn name(self) -> &'static str {
        match self {
            NavKey::ArrowUp => "ArrowUp",
            NavKey::ArrowDown => "ArrowDown",
            NavKey::ArrowLeft => "ArrowLeft",
            NavKey::ArrowRight => "ArrowRight",
            NavKey::Home => "Home",
            NavKey::End => "End",
            NavKey::Escape => "Escape",
        }
    }
}

impl fmt::Display for NavKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a key name is not a navigation key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported key '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for NavKey {
    type Err = UnknownKey;

    /// Parse a DOM key name, including the legacy IE/Edge spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ArrowUp" | "Up" => Ok(NavKey::ArrowUp),
            "ArrowDown" | "Down" => Ok(NavKey::ArrowDown),
            "ArrowLeft" | "Left" => Ok(NavKey::ArrowLeft),
            "ArrowRight" | "Right" => Ok(NavKey::ArrowRight),
            "Home" => Ok(NavKey::Home),
            "End" => Ok(NavKey::End),
            "Escape" | "Esc" => Ok(NavKey::Escape),
            other => Err(UnknownKey(other.to_string())),
        }
    }
}

/// Cursor shapes shown over window handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorType {
    Default,
    Grab,
    Grabbing,
    NsResize,
    EwResize,
    NwseResize,
    NeswResize,
}

impl From<CursorType> for CursorIcon {
    fn from(cursor: CursorType) -> Self {
        match cursor {
            CursorType::Default => CursorIcon::Default,
            CursorType::Grab => CursorIcon::Grab,
            CursorType::Grabbing => CursorIcon::Grabbing,
            CursorType::NsResize => CursorIcon::NsResize,
            CursorType::EwResize => CursorIcon::EwResize,
            CursorType::NwseResize => CursorIcon::NwseResize,
            CursorType::NeswResize => CursorIcon::NeswResize,
        }
    }
}
