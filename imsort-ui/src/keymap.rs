use std::collections::HashMap;

use derive_deref::{Deref, DerefMut};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Everything a key can be bound to in normal mode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Command {
    Quit,
    PreviousImage,
    NextImage,
    SelectPreviousFolder,
    SelectNextFolder,
    MoveToSelected,
    MoveToFolder1,
    MoveToFolder2,
    MoveToFolder3,
    MoveToFolder4,
    MoveToFolder5,
    MoveToFolder6,
    MoveToFolder7,
    MoveToFolder8,
    MoveToFolder9,
    NewFolder,
    Undo,
    Rescan,
}

impl Command {
    /// The shortcut number (1-9) of a `MoveToFolderN` command.
    pub fn folder_shortcut(self) -> Option<usize> {
        use Command::*;

        match self {
            MoveToFolder1 => Some(1),
            MoveToFolder2 => Some(2),
            MoveToFolder3 => Some(3),
            MoveToFolder4 => Some(4),
            MoveToFolder5 => Some(5),
            MoveToFolder6 => Some(6),
            MoveToFolder7 => Some(7),
            MoveToFolder8 => Some(8),
            MoveToFolder9 => Some(9),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyMap(pub HashMap<KeyEvent, Command>);

impl KeyMap {
    /// Builds a key map from `"<Ctrl-z>" => Command` style entries.
    pub fn from_bindings<'a>(
        bindings: impl IntoIterator<Item = (&'a String, &'a Command)>,
    ) -> Result<Self, String> {
        let mut map = HashMap::new();
        for (raw, command) in bindings {
            map.insert(parse_key_event(raw)?, *command);
        }
        Ok(Self(map))
    }

    pub fn command_for(&self, key: &KeyEvent) -> Option<Command> {
        self.get(&normalize(key)).copied()
    }
}

/// Strips everything but code and modifiers so terminal events compare equal
/// to parsed bindings. Shift is implied by an uppercase character.
fn normalize(key: &KeyEvent) -> KeyEvent {
    let mut modifiers = key.modifiers;
    if let KeyCode::Char(c) = key.code
        && c.is_uppercase()
    {
        modifiers.remove(KeyModifiers::SHIFT);
    }
    KeyEvent::new(key.code, modifiers)
}

/// Parses `q`, `G`, `<Up>`, `<Ctrl-z>`, `<Alt-Enter>` and similar strings.
pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    let inner = match raw.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        Some(inner) if !inner.is_empty() => inner,
        _ if raw.chars().count() == 1 => raw,
        _ => return Err(format!("Unable to parse `{raw}`")),
    };

    let (modifiers, rest) = extract_modifiers(inner);
    let code = parse_key_code(rest).ok_or_else(|| format!("Unable to parse `{raw}`"))?;
    Ok(normalize(&KeyEvent::new(code, modifiers)))
}

fn extract_modifiers(raw: &str) -> (KeyModifiers, &str) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        let lower = current.to_ascii_lowercase();
        if lower.starts_with("ctrl-") {
            modifiers.insert(KeyModifiers::CONTROL);
            current = &current[5..];
        } else if lower.starts_with("alt-") {
            modifiers.insert(KeyModifiers::ALT);
            current = &current[4..];
        } else if lower.starts_with("shift-") {
            modifiers.insert(KeyModifiers::SHIFT);
            current = &current[6..];
        } else {
            break;
        }
    }

    (modifiers, current)
}

fn parse_key_code(raw: &str) -> Option<KeyCode> {
    let code = match raw.to_ascii_lowercase().as_str() {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "space" => KeyCode::Char(' '),
        "minus" => KeyCode::Char('-'),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}
