use super::{
    match_indices, next_match, prev_match, step_choice, Screen, ScreenKind, ScrollDir,
    Searchable, SongList,
};
use crate::player::Song;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Database view sorted by artist, album, title - the natural home of the
/// artist/album jump commands.
pub struct LibraryScreen {
    songs: Vec<Song>,
    selected: Vec<bool>,
    choice: usize,
    matches: Vec<usize>,
}

impl LibraryScreen {
    pub fn new(mut songs: Vec<Song>) -> Self {
        songs.sort_by(|a, b| {
            (a.display_artist(), a.display_album(), a.display_title()).cmp(&(
                b.display_artist(),
                b.display_album(),
                b.display_title(),
            ))
        });
        let selected = vec![false; songs.len()];
        Self {
            songs,
            selected,
            choice: 0,
            matches: Vec::new(),
        }
    }

    pub fn chosen_song(&self) -> Option<&Song> {
        self.songs.get(self.choice)
    }
}

impl Screen for LibraryScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Library
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .songs
            .iter()
            .enumerate()
            .map(|(row, song)| {
                let mut style = Style::default();
                if self.selected[row] {
                    style = style.fg(Color::Magenta);
                }
                if self.matches.contains(&row) {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                ListItem::new(song.display_line()).style(style)
            })
            .collect();

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
                    .title("Media library"),
            )
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("► ");

        let mut state = ListState::default();
        if !self.songs.is_empty() {
            state.select(Some(self.choice));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn scroll(&mut self, dir: ScrollDir) {
        self.choice = step_choice(self.choice, self.songs.len(), dir);
    }

    fn searchable(&mut self) -> Option<&mut dyn Searchable> {
        Some(self)
    }

    fn song_list(&mut self) -> Option<&mut dyn SongList> {
        Some(self)
    }
}

impl Searchable for LibraryScreen {
    fn search(&mut self, query: &str) -> bool {
        let lines: Vec<String> = self.songs.iter().map(|s| s.display_line()).collect();
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

impl SongList for LibraryScreen {
    fn choice(&self) -> usize {
        self.choice
    }

    fn len(&self) -> usize {
        self.songs.len()
    }

    fn song(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    fn selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    fn set_selected(&mut self, index: usize, selected: bool) {
        if let Some(slot) = self.selected.get_mut(index) {
            *slot = selected;
        }
    }

    fn highlight(&mut self, index: usize) {
        if index < self.songs.len() {
            self.choice = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn songs() -> Vec<Song> {
        vec![
            Song::new("z.mp3")
                .with_tags("Reel to Reel", "Cassette Summer", "Tape One")
                .with_duration(Duration::from_secs(243)),
            Song::new("a.flac")
                .with_tags("Night Drive", "The Harbor Lights", "Sodium Glow")
                .with_duration(Duration::from_secs(214)),
        ]
    }

    #[test]
    fn test_sorted_by_artist() {
        let screen = LibraryScreen::new(songs());
        assert_eq!(screen.song(0).unwrap().display_artist(), "Cassette Summer");
        assert_eq!(screen.song(1).unwrap().display_artist(), "The Harbor Lights");
    }

    #[test]
    fn test_search_finds_untagged_by_file_name() {
        let mut screen = LibraryScreen::new(vec![
            Song::new("stray/untagged_demo.ogg"),
            Song::new("x.mp3").with_tags("Title", "Artist", "Album"),
        ]);
        assert!(screen.search("untagged"));
    }
}
