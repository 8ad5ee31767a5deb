// Screens - the interchangeable panels the command layer drives.
// Capabilities (search, filter, song list access) are explicit trait
// accessors so callers probe support instead of downcasting.

pub mod browser;
pub mod composition;
pub mod help;
pub mod library;
pub mod playlist;

pub use browser::BrowserScreen;
pub use composition::{CompositionError, ScreenComposition};
pub use help::HelpScreen;
pub use library::LibraryScreen;
pub use playlist::PlaylistScreen;

use crate::bindings::BindingTable;
use crate::player::Song;
use ratatui::{layout::Rect, Frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Playlist,
    Browser,
    Library,
    Help,
}

impl ScreenKind {
    /// Display/cycle order for the screen switcher.
    pub const ORDER: [ScreenKind; 4] = [
        ScreenKind::Playlist,
        ScreenKind::Browser,
        ScreenKind::Library,
        ScreenKind::Help,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ScreenKind::Playlist => "Playlist",
            ScreenKind::Browser => "Browser",
            ScreenKind::Library => "Media library",
            ScreenKind::Help => "Help",
        }
    }

    /// Whether this panel may take part in a master/slave split.
    /// Mergeability is a property of the screen type, not of its state.
    pub fn mergeable(self) -> bool {
        !matches!(self, ScreenKind::Help)
    }

    pub fn next(self) -> ScreenKind {
        let i = Self::ORDER.iter().position(|&k| k == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> ScreenKind {
        let i = Self::ORDER.iter().position(|&k| k == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDir {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

/// Screens that can locate text and step through the matches.
pub trait Searchable {
    /// Record the matches for `query`. Returns whether anything matched;
    /// an empty query clears the recorded matches.
    fn search(&mut self, query: &str) -> bool;
    fn next_found(&mut self, wrap: bool);
    fn prev_found(&mut self, wrap: bool);
}

/// Screens whose item list can be narrowed by a filter expression.
pub trait Filterable {
    fn current_filter(&self) -> &str;
    fn apply_filter(&mut self, filter: &str);
}

/// Screens that expose their items as a list of songs.
pub trait SongList {
    fn choice(&self) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn song(&self, index: usize) -> Option<&Song>;
    fn selected(&self, index: usize) -> bool;
    fn set_selected(&mut self, index: usize, selected: bool);
    fn highlight(&mut self, index: usize);
}

pub trait Screen {
    fn kind(&self) -> ScreenKind;

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool);

    fn scroll(&mut self, dir: ScrollDir);

    /// Called when this screen becomes the active one.
    fn on_switch(&mut self) {}

    fn searchable(&mut self) -> Option<&mut dyn Searchable> {
        None
    }

    fn filterable(&mut self) -> Option<&mut dyn Filterable> {
        None
    }

    fn song_list(&mut self) -> Option<&mut dyn SongList> {
        None
    }
}

/// The fixed set of panels, owned in one place so the composition state
/// can refer to them by kind instead of by aliased pointers.
pub struct Screens {
    pub playlist: PlaylistScreen,
    pub browser: BrowserScreen,
    pub library: LibraryScreen,
    pub help: HelpScreen,
}

impl Screens {
    pub fn new(queue: &[Song], library: &[Song], bindings: &BindingTable) -> Self {
        Self {
            playlist: PlaylistScreen::new(queue.to_vec()),
            browser: BrowserScreen::new(library),
            library: LibraryScreen::new(library.to_vec()),
            help: HelpScreen::new(bindings),
        }
    }

    pub fn get_mut(&mut self, kind: ScreenKind) -> &mut dyn Screen {
        match kind {
            ScreenKind::Playlist => &mut self.playlist,
            ScreenKind::Browser => &mut self.browser,
            ScreenKind::Library => &mut self.library,
            ScreenKind::Help => &mut self.help,
        }
    }
}

// ---- shared list mechanics ----

const PAGE: usize = 10;

/// Clamped cursor movement shared by every list screen.
pub(crate) fn step_choice(choice: usize, len: usize, dir: ScrollDir) -> usize {
    if len == 0 {
        return 0;
    }
    let last = len - 1;
    match dir {
        ScrollDir::Up => choice.saturating_sub(1),
        ScrollDir::Down => (choice + 1).min(last),
        ScrollDir::PageUp => choice.saturating_sub(PAGE),
        ScrollDir::PageDown => (choice + PAGE).min(last),
        ScrollDir::Home => 0,
        ScrollDir::End => last,
    }
}

/// Case-insensitive substring search over display lines.
pub(crate) fn match_indices<'a>(
    lines: impl Iterator<Item = &'a str>,
    query: &str,
) -> Vec<usize> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    lines
        .enumerate()
        .filter(|(_, line)| line.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

pub(crate) fn next_match(matches: &[usize], choice: usize, wrap: bool) -> Option<usize> {
    matches
        .iter()
        .copied()
        .find(|&m| m > choice)
        .or_else(|| if wrap { matches.first().copied() } else { None })
}

pub(crate) fn prev_match(matches: &[usize], choice: usize, wrap: bool) -> Option<usize> {
    matches
        .iter()
        .rev()
        .copied()
        .find(|&m| m < choice)
        .or_else(|| if wrap { matches.last().copied() } else { None })
}
