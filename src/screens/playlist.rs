use super::{
    match_indices, next_match, prev_match, step_choice, Filterable, Screen, ScreenKind,
    ScrollDir, Searchable, SongList,
};
use crate::player::Song;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// The play queue view. Supports searching, fuzzy filtering and selection.
pub struct PlaylistScreen {
    songs: Vec<Song>,
    selected: Vec<bool>,
    /// Cursor position within the visible (possibly filtered) list.
    choice: usize,
    filter: String,
    /// Indices into `songs` that survive the current filter.
    visible: Vec<usize>,
    /// Visible-list indices of the current search matches.
    matches: Vec<usize>,
    /// Queue index of the song being played, pushed in before each render.
    pub(crate) now_playing: Option<usize>,
}

impl PlaylistScreen {
    pub fn new(songs: Vec<Song>) -> Self {
        let visible = (0..songs.len()).collect();
        let selected = vec![false; songs.len()];
        Self {
            songs,
            selected,
            choice: 0,
            filter: String::new(),
            visible,
            matches: Vec::new(),
            now_playing: None,
        }
    }

    /// Queue index of the entry under the cursor.
    pub fn chosen_queue_index(&self) -> Option<usize> {
        self.visible.get(self.choice).copied()
    }

    fn visible_lines(&self) -> Vec<String> {
        self.visible
            .iter()
            .map(|&i| self.songs[i].display_line())
            .collect()
    }

    fn clamp_choice(&mut self) {
        if self.visible.is_empty() {
            self.choice = 0;
        } else {
            self.choice = self.choice.min(self.visible.len() - 1);
        }
    }
}

impl Screen for PlaylistScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Playlist
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .visible
            .iter()
            .enumerate()
            .map(|(row, &i)| {
                let song = &self.songs[i];
                let is_current = self.now_playing == Some(i);
                let prefix = if is_current { "♪ " } else { "  " };

                let mut style = Style::default();
                if is_current {
                    style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
                }
                if self.selected[i] {
                    style = style.fg(Color::Magenta);
                }
                if self.matches.contains(&row) {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }

                ListItem::new(format!("{}{}", prefix, song.display_line())).style(style)
            })
            .collect();

        let title = if self.filter.is_empty() {
            "Playlist".to_string()
        } else {
            format!("Playlist (filter: {})", self.filter)
        };
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            )
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("► ");

        let mut state = ListState::default();
        if !self.visible.is_empty() {
            state.select(Some(self.choice));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn scroll(&mut self, dir: ScrollDir) {
        self.choice = step_choice(self.choice, self.visible.len(), dir);
    }

    fn searchable(&mut self) -> Option<&mut dyn Searchable> {
        Some(self)
    }

    fn filterable(&mut self) -> Option<&mut dyn Filterable> {
        Some(self)
    }

    fn song_list(&mut self) -> Option<&mut dyn SongList> {
        Some(self)
    }
}

impl Searchable for PlaylistScreen {
    fn search(&mut self, query: &str) -> bool {
        let lines = self.visible_lines();
        self.matches = match_indices(lines.iter().map(|s| s.as_str()), query);
        !self.matches.is_empty()
    }

    fn next_found(&mut self, wrap: bool) {
        if let Some(m) = next_match(&self.matches, self.choice, wrap) {
            self.choice = m;
        }
    }

    fn prev_found(&mut self, wrap: bool) {
        if let Some(m) = prev_match(&self.matches, self.choice, wrap) {
            self.choice = m;
        }
    }
}

impl Filterable for PlaylistScreen {
    fn current_filter(&self) -> &str {
        &self.filter
    }

    fn apply_filter(&mut self, filter: &str) {
        self.filter = filter.to_string();
        if filter.is_empty() {
            self.visible = (0..self.songs.len()).collect();
        } else {
            let matcher = SkimMatcherV2::default();
            self.visible = self
                .songs
                .iter()
                .enumerate()
                .filter(|(_, song)| {
                    matcher.fuzzy_match(&song.display_line(), filter).is_some()
                })
                .map(|(i, _)| i)
                .collect();
        }
        // the old matches indexed a different visible list
        self.matches.clear();
        self.clamp_choice();
    }
}

impl SongList for PlaylistScreen {
    fn choice(&self) -> usize {
        self.choice
    }

    fn len(&self) -> usize {
        self.visible.len()
    }

    fn song(&self, index: usize) -> Option<&Song> {
        self.visible.get(index).map(|&i| &self.songs[i])
    }

    fn selected(&self, index: usize) -> bool {
        self.visible
            .get(index)
            .map(|&i| self.selected[i])
            .unwrap_or(false)
    }

    fn set_selected(&mut self, index: usize, selected: bool) {
        if let Some(&i) = self.visible.get(index) {
            self.selected[i] = selected;
        }
    }

    fn highlight(&mut self, index: usize) {
        if index < self.visible.len() {
            self.choice = index;
        }
    }
}
