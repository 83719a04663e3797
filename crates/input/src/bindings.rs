use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::action::Action;
use crate::InputError;

/// Physical inputs the game listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
    H,
    C,
    Digit1,
    Digit2,
    Digit3,
    ScrollUp,
    ScrollDown,
}

impl Key {
    pub const ALL: [Key; 17] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
        Key::Space,
        Key::Escape,
        Key::H,
        Key::C,
        Key::Digit1,
        Key::Digit2,
        Key::Digit3,
        Key::ScrollUp,
        Key::ScrollDown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Key::W => "w",
            Key::A => "a",
            Key::S => "s",
            Key::D => "d",
            Key::ArrowUp => "up",
            Key::ArrowDown => "down",
            Key::ArrowLeft => "left",
            Key::ArrowRight => "right",
            Key::Space => "space",
            Key::Escape => "escape",
            Key::H => "h",
            Key::C => "c",
            Key::Digit1 => "1",
            Key::Digit2 => "2",
            Key::Digit3 => "3",
            Key::ScrollUp => "scroll-up",
            Key::ScrollDown => "scroll-down",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "esc" => return Ok(Key::Escape),
            "enter" | "return" => return Ok(Key::Space),
            _ => {}
        }
        Key::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| InputError::UnknownKey(s.to_string()))
    }
}

/// Key-to-action table.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: BTreeMap<Key, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let map = BTreeMap::from([
            (Key::W, Action::MoveUp),
            (Key::A, Action::MoveLeft),
            (Key::S, Action::MoveDown),
            (Key::D, Action::MoveRight),
            (Key::ArrowUp, Action::MoveUp),
            (Key::ArrowLeft, Action::MoveLeft),
            (Key::ArrowDown, Action::MoveDown),
            (Key::ArrowRight, Action::MoveRight),
            (Key::Space, Action::Confirm),
            (Key::Escape, Action::TogglePauseOrQuit),
            (Key::H, Action::EnterSpeedSelect),
            (Key::C, Action::CycleCameraMode),
            (Key::Digit1, Action::SelectSpeed(1)),
            (Key::Digit2, Action::SelectSpeed(2)),
            (Key::Digit3, Action::SelectSpeed(3)),
            (Key::ScrollUp, Action::AdjustSpeed(1)),
            (Key::ScrollDown, Action::AdjustSpeed(-1)),
        ]);
        Self { map }
    }
}

impl KeyBindings {
    pub fn action_for(&self, key: Key) -> Option<Action> {
        self.map.get(&key).copied()
    }

    /// Rebind `key`, returning the action it had before.
    pub fn bind(&mut self, key: Key, action: Action) -> Option<Action> {
        self.map.insert(key, action)
    }

    pub fn unbind(&mut self, key: Key) -> Option<Action> {
        self.map.remove(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, Action)> + '_ {
        self.map.iter().map(|(k, a)| (*k, *a))
    }
}

impl fmt::Display for KeyBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, action) in self.iter() {
            writeln!(f, "{:<12} {:?}", key.name(), action)?;
        }
        Ok(())
    }
}
