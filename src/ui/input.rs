use crate::bindings::Key;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Where keys come from. `None` means the timeout expired without input -
/// the modal loops treat that as "keep going", the main loop as an idle tick.
pub trait KeySource {
    fn read_key(&mut self, timeout: Duration) -> Result<Option<Key>>;
}

/// The real terminal, via crossterm's poll/read pair.
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn read_key(&mut self, timeout: Duration) -> Result<Option<Key>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Ok(translate(key.code, key.modifiers))
            }
            Event::Resize(_, _) => Ok(Some(Key::Resize)),
            _ => Ok(None),
        }
    }
}

fn translate(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    match code {
        KeyCode::Char(c) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Key::Ctrl(c.to_ascii_lowercase()))
        }
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::F(n) => Some(Key::F(n)),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::BackTab => Some(Key::BackTab),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::PageUp => Some(Key::PageUp),
        KeyCode::PageDown => Some(Key::PageDown),
        KeyCode::Home => Some(Key::Home),
        KeyCode::End => Some(Key::End),
        _ => None,
    }
}

/// Scripted key source for tests: a fixed sequence of keys and simulated
/// timeouts. Running past the end of the script is a test bug and fails
/// loudly instead of looping forever.
#[cfg(test)]
pub struct ScriptedKeys {
    script: std::collections::VecDeque<Option<Key>>,
}

#[cfg(test)]
impl ScriptedKeys {
    pub fn new(script: impl IntoIterator<Item = Option<Key>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Convenience for scripts of plain characters ending with Enter.
    pub fn typed(text: &str, terminator: Key) -> Self {
        let mut script: Vec<Option<Key>> =
            text.chars().map(|c| Some(Key::Char(c))).collect();
        script.push(Some(terminator));
        Self::new(script)
    }
}

#[cfg(test)]
impl KeySource for ScriptedKeys {
    fn read_key(&mut self, _timeout: Duration) -> Result<Option<Key>> {
        self.script
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("scripted key source ran dry"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_control_chars() {
        assert_eq!(
            translate(KeyCode::Char('L'), KeyModifiers::CONTROL),
            Some(Key::Ctrl('l'))
        );
        assert_eq!(
            translate(KeyCode::Char('G'), KeyModifiers::SHIFT),
            Some(Key::Char('G'))
        );
        assert_eq!(translate(KeyCode::BackTab, KeyModifiers::SHIFT), Some(Key::BackTab));
        assert_eq!(translate(KeyCode::CapsLock, KeyModifiers::NONE), None);
    }

    #[test]
    fn test_scripted_keys_run_dry_is_an_error() {
        let mut keys = ScriptedKeys::new([Some(Key::Char('a')), None]);
        assert_eq!(keys.read_key(Duration::ZERO).unwrap(), Some(Key::Char('a')));
        assert_eq!(keys.read_key(Duration::ZERO).unwrap(), None);
        assert!(keys.read_key(Duration::ZERO).is_err());
    }
}
