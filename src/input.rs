use crate::model::PickerKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt::{Display, Formatter};

/// A key in its canonical string form: a printable rune (`"a"`, `" "`) or a
/// named key with optional modifier prefixes (`"enter"`, `"ctrl+c"`,
/// `"shift+home"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(String);

impl Key {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The printable rune this key carries, if it is exactly one.
    pub fn rune(&self) -> Option<char> {
        let mut chars = self.0.chars();
        let first = chars.next()?;
        if chars.next().is_some() || first.is_control() {
            return None;
        }
        Some(first)
    }

    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }

    pub fn is_any(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.0 == *name)
    }

    pub fn is_space(&self) -> bool {
        self.0 == " " || self.0 == "space"
    }

    pub fn from_event(key: KeyEvent) -> Option<Self> {
        let key_name = match key.code {
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Some(Self(format!("ctrl+{}", c.to_ascii_lowercase())));
                }
                if key.modifiers.contains(KeyModifiers::ALT) {
                    return Some(Self(format!("alt+{c}")));
                }
                return Some(Self(c.to_string()));
            }
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Tab => "tab".to_string(),
            KeyCode::BackTab => return Some(Self("shift+tab".to_string())),
            KeyCode::Backspace => "backspace".to_string(),
            KeyCode::Delete => "delete".to_string(),
            KeyCode::Insert => "insert".to_string(),
            KeyCode::Esc => "esc".to_string(),
            KeyCode::Left => "left".to_string(),
            KeyCode::Right => "right".to_string(),
            KeyCode::Up => "up".to_string(),
            KeyCode::Down => "down".to_string(),
            KeyCode::Home => "home".to_string(),
            KeyCode::End => "end".to_string(),
            KeyCode::PageUp => "pgup".to_string(),
            KeyCode::PageDown => "pgdown".to_string(),
            KeyCode::F(n) => format!("f{n}"),
            _ => return None,
        };

        let mut parts = Vec::new();
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("ctrl".to_string());
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            parts.push("alt".to_string());
        }
        if key.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("shift".to_string());
        }
        parts.push(key_name);
        Some(Self(parts.join("+")))
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Results of effects, delivered back to the host on a later turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Selected {
        kind: PickerKind,
        value: String,
    },
    Picked {
        resource: String,
        visible_ids: Vec<String>,
    },
    LogTick {
        request_id: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(Key),
    Resize { width: u16, height: u16 },
    Msg(Msg),
}

impl Event {
    pub fn key(name: &str) -> Self {
        Self::Key(Key::new(name))
    }

    #[cfg(test)]
    pub fn as_key(&self) -> Option<&Key> {
        match self {
            Self::Key(key) => Some(key),
            _ => None,
        }
    }
}
