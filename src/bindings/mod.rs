// Key bindings: an input key (or short chain of keys) mapped to an ordered
// list of actions. The table is built once at startup from compiled-in
// defaults plus the config file, and never changes afterwards.

use crate::actions::{ActionTag, Registry};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Abstract input key. `Resize` is the pseudo-key the input layer reports
/// when the terminal changes size; it never appears in a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Ctrl(char),
    F(u8),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    PageUp,
    PageDown,
    Home,
    End,
    Resize,
}

impl Key {
    /// Parse one key token from a binding spec ("g", "space", "ctrl-l", "f5").
    /// Single characters keep their case ("G" != "g").
    pub fn parse(token: &str) -> Result<Key, BindingsError> {
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(c));
        }
        let bad = || BindingsError::BadKey(token.to_string());
        match token.to_lowercase().as_str() {
            "space" => Ok(Key::Char(' ')),
            "enter" => Ok(Key::Enter),
            "esc" | "escape" => Ok(Key::Esc),
            "tab" => Ok(Key::Tab),
            "backtab" | "shift-tab" => Ok(Key::BackTab),
            "backspace" => Ok(Key::Backspace),
            "up" => Ok(Key::Up),
            "down" => Ok(Key::Down),
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "pageup" | "page-up" => Ok(Key::PageUp),
            "pagedown" | "page-down" => Ok(Key::PageDown),
            "home" => Ok(Key::Home),
            "end" => Ok(Key::End),
            lower => {
                if let Some(rest) = lower.strip_prefix("ctrl-") {
                    let mut chars = rest.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(Key::Ctrl(c)),
                        _ => Err(bad()),
                    }
                } else if let Some(rest) = lower.strip_prefix('f') {
                    match rest.parse::<u8>() {
                        Ok(n @ 1..=12) => Ok(Key::F(n)),
                        _ => Err(bad()),
                    }
                } else {
                    Err(bad())
                }
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => write!(f, "space"),
            Key::Char(c) => write!(f, "{}", c),
            Key::Ctrl(c) => write!(f, "ctrl-{}", c),
            Key::F(n) => write!(f, "f{}", n),
            Key::Up => write!(f, "up"),
            Key::Down => write!(f, "down"),
            Key::Left => write!(f, "left"),
            Key::Right => write!(f, "right"),
            Key::Enter => write!(f, "enter"),
            Key::Esc => write!(f, "esc"),
            Key::Tab => write!(f, "tab"),
            Key::BackTab => write!(f, "backtab"),
            Key::Backspace => write!(f, "backspace"),
            Key::PageUp => write!(f, "pageup"),
            Key::PageDown => write!(f, "pagedown"),
            Key::Home => write!(f, "home"),
            Key::End => write!(f, "end"),
            Key::Resize => write!(f, "<resize>"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingsError {
    #[error("unknown key \"{0}\" in bindings")]
    BadKey(String),
    #[error("unknown action \"{0}\" in bindings")]
    UnknownAction(String),
    #[error("binding for \"{0}\" names no actions")]
    EmptyBinding(String),
}

/// One key chain bound to an ordered action sequence. Whether the binding
/// is a single action is decided here, once, not re-derived at use sites:
/// only single-action bindings may keep a modal loop alive.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<Key>,
    actions: Vec<ActionTag>,
    single: bool,
}

impl Binding {
    pub fn new(keys: Vec<Key>, actions: Vec<ActionTag>) -> Self {
        debug_assert!(!keys.is_empty() && !actions.is_empty());
        let single = actions.len() == 1;
        Self {
            keys,
            actions,
            single,
        }
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn actions(&self) -> &[ActionTag] {
        &self.actions
    }

    pub fn is_single(&self) -> bool {
        self.single
    }

    pub fn keys_display(&self) -> String {
        self.keys
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Outcome of resolving the keys pressed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The keys exactly match this binding.
    Matched(&'a Binding),
    /// The keys are a proper prefix of at least one chain - keep reading.
    Prefix,
    /// Nothing starts with these keys.
    Unbound,
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.actions == other.actions
    }
}
impl Eq for Binding {}

#[derive(Debug)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    /// The compiled-in default key map.
    pub fn with_defaults() -> Self {
        use ActionTag::*;
        let defaults: &[(&str, &[ActionTag])] = &[
            ("q", &[Quit]),
            ("p", &[Pause]),
            ("space", &[Pause]),
            ("s", &[Stop]),
            (">", &[NextSong]),
            ("<", &[PreviousSong]),
            ("backspace", &[ReplaySong]),
            ("f", &[SeekForward]),
            ("right", &[SeekForward]),
            ("b", &[SeekBackward]),
            ("left", &[SeekBackward]),
            ("o", &[JumpToPosition]),
            ("+", &[VolumeUp]),
            ("=", &[VolumeUp]),
            ("-", &[VolumeDown]),
            ("v", &[SetVolume]),
            ("r", &[ToggleRepeat]),
            ("z", &[ToggleRandom]),
            ("x", &[ToggleCrossfade]),
            ("X", &[SetCrossfade]),
            ("k", &[ScrollUp]),
            ("up", &[ScrollUp]),
            ("j", &[ScrollDown]),
            ("down", &[ScrollDown]),
            ("pageup", &[PageUp]),
            ("pagedown", &[PageDown]),
            ("home", &[MoveHome]),
            ("end", &[MoveEnd]),
            ("g g", &[MoveHome]),
            ("G", &[MoveEnd]),
            ("enter", &[PressEnter]),
            ("{", &[ScrollUpArtist]),
            ("}", &[ScrollDownArtist]),
            ("[", &[ScrollUpAlbum]),
            ("]", &[ScrollDownAlbum]),
            ("R", &[ReverseSelection]),
            ("tab", &[NextScreen]),
            ("backtab", &[PreviousScreen]),
            ("1", &[ShowPlaylist]),
            ("2", &[ShowBrowser]),
            ("3", &[ShowLibrary]),
            ("4", &[ShowHelp]),
            ("f1", &[ShowHelp]),
            ("L", &[ToggleScreenLock]),
            ("m", &[MasterScreen]),
            ("M", &[SlaveScreen]),
            ("/", &[FindItemForward]),
            ("?", &[FindItemBackward]),
            (".", &[NextFoundItem]),
            (",", &[PreviousFoundItem]),
            ("w", &[ToggleFindMode]),
            ("F", &[ApplyFilter]),
            (":", &[ExecuteCommand]),
        ];

        let bindings = defaults
            .iter()
            .map(|(spec, actions)| {
                let keys = parse_key_spec(spec).expect("default binding key specs parse");
                Binding::new(keys, actions.to_vec())
            })
            .collect();
        Self { bindings }
    }

    /// Defaults plus the `[bindings]` section of the config file. User
    /// bindings are placed first, so they win first-match resolution.
    pub fn from_config(
        extra: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self, BindingsError> {
        let mut bindings = Vec::new();
        for (spec, action_names) in extra {
            let keys = parse_key_spec(spec)?;
            if action_names.is_empty() {
                return Err(BindingsError::EmptyBinding(spec.clone()));
            }
            let actions = action_names
                .iter()
                .map(|name| {
                    Registry::global()
                        .find(name)
                        .map(|a| a.tag())
                        .ok_or_else(|| BindingsError::UnknownAction(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            bindings.push(Binding::new(keys, actions));
        }
        bindings.extend(Self::with_defaults().bindings);
        Ok(Self { bindings })
    }

    /// Pure lookup of the keys pressed so far. First declared match wins
    /// when several bindings share a chain.
    pub fn resolve(&self, pressed: &[Key]) -> Resolution<'_> {
        if pressed.is_empty() {
            return Resolution::Unbound;
        }
        if let Some(binding) = self.bindings.iter().find(|b| b.keys == pressed) {
            return Resolution::Matched(binding);
        }
        let is_prefix = self
            .bindings
            .iter()
            .any(|b| b.keys.len() > pressed.len() && b.keys.starts_with(pressed));
        if is_prefix {
            Resolution::Prefix
        } else {
            Resolution::Unbound
        }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

fn parse_key_spec(spec: &str) -> Result<Vec<Key>, BindingsError> {
    let keys = spec
        .split_whitespace()
        .map(Key::parse)
        .collect::<Result<Vec<_>, _>>()?;
    if keys.is_empty() {
        return Err(BindingsError::BadKey(spec.to_string()));
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionTag;

    #[test]
    fn test_key_parsing() {
        assert_eq!(Key::parse("g").unwrap(), Key::Char('g'));
        assert_eq!(Key::parse("G").unwrap(), Key::Char('G'));
        assert_eq!(Key::parse("space").unwrap(), Key::Char(' '));
        assert_eq!(Key::parse("ctrl-l").unwrap(), Key::Ctrl('l'));
        assert_eq!(Key::parse("f5").unwrap(), Key::F(5));
        assert_eq!(Key::parse("f").unwrap(), Key::Char('f'));
        assert!(Key::parse("f99").is_err());
        assert!(Key::parse("ctrl-").is_err());
        assert!(Key::parse("gg").is_err());
    }

    #[test]
    fn test_resolution_exact_prefix_unbound() {
        let table = BindingTable::with_defaults();

        match table.resolve(&[Key::Char('q')]) {
            Resolution::Matched(b) => {
                assert_eq!(b.actions(), &[ActionTag::Quit]);
                assert!(b.is_single());
            }
            other => panic!("expected a match, got {:?}", other),
        }

        // "g" starts the "g g" chain but matches nothing by itself
        assert_eq!(table.resolve(&[Key::Char('g')]), Resolution::Prefix);
        match table.resolve(&[Key::Char('g'), Key::Char('g')]) {
            Resolution::Matched(b) => assert_eq!(b.actions(), &[ActionTag::MoveHome]),
            other => panic!("expected a match, got {:?}", other),
        }

        assert_eq!(table.resolve(&[Key::Char('~')]), Resolution::Unbound);
        assert_eq!(table.resolve(&[]), Resolution::Unbound);
    }

    #[test]
    fn test_user_bindings_win_over_defaults() {
        let mut extra = BTreeMap::new();
        extra.insert("q".to_string(), vec!["stop".to_string(), "quit".to_string()]);
        let table = BindingTable::from_config(&extra).unwrap();

        match table.resolve(&[Key::Char('q')]) {
            Resolution::Matched(b) => {
                assert_eq!(b.actions(), &[ActionTag::Stop, ActionTag::Quit]);
                assert!(!b.is_single());
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_config_errors_are_typed() {
        let mut extra = BTreeMap::new();
        extra.insert("q".to_string(), vec!["warp_ten".to_string()]);
        assert_eq!(
            BindingTable::from_config(&extra).unwrap_err(),
            BindingsError::UnknownAction("warp_ten".to_string())
        );

        let mut extra = BTreeMap::new();
        extra.insert("notakey".to_string(), vec!["quit".to_string()]);
        assert_eq!(
            BindingTable::from_config(&extra).unwrap_err(),
            BindingsError::BadKey("notakey".to_string())
        );

        let mut extra = BTreeMap::new();
        extra.insert("q".to_string(), vec![]);
        assert_eq!(
            BindingTable::from_config(&extra).unwrap_err(),
            BindingsError::EmptyBinding("q".to_string())
        );
    }
}
