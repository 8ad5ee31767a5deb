use super::{
    match_indices, next_match, prev_match, step_choice, Filterable, Screen, ScreenKind,
    ScrollDir, Searchable,
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

/// Flat view of the file paths the service's database knows about.
pub struct BrowserScreen {
    entries: Vec<String>,
    choice: usize,
    filter: String,
    visible: Vec<usize>,
    matches: Vec<usize>,
}

impl BrowserScreen {
    pub fn new(library: &[Song]) -> Self {
        let mut entries: Vec<String> = library.iter().map(|s| s.file.clone()).collect();
        entries.sort();
        let visible = (0..entries.len()).collect();
        Self {
            entries,
            choice: 0,
            filter: String::new(),
            visible,
            matches: Vec::new(),
        }
    }

    pub fn chosen_entry(&self) -> Option<&str> {
        self.visible
            .get(self.choice)
            .map(|&i| self.entries[i].as_str())
    }

    fn clamp_choice(&mut self) {
        if self.visible.is_empty() {
            self.choice = 0;
        } else {
            self.choice = self.choice.min(self.visible.len() - 1);
        }
    }
}

impl Screen for BrowserScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Browser
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .visible
            .iter()
            .enumerate()
            .map(|(row, &i)| {
                let mut style = Style::default();
                if self.matches.contains(&row) {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                ListItem::new(self.entries[i].clone()).style(style)
            })
            .collect();

        let title = if self.filter.is_empty() {
            "Browser".to_string()
        } else {
            format!("Browser (filter: {})", self.filter)
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
}

impl Searchable for BrowserScreen {
    fn search(&mut self, query: &str) -> bool {
        let lines: Vec<&str> = self
            .visible
            .iter()
            .map(|&i| self.entries[i].as_str())
            .collect();
        self.matches = match_indices(lines.into_iter(), query);
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

impl Filterable for BrowserScreen {
    fn current_filter(&self) -> &str {
        &self.filter
    }

    fn apply_filter(&mut self, filter: &str) {
        self.filter = filter.to_string();
        if filter.is_empty() {
            self.visible = (0..self.entries.len()).collect();
        } else {
            let matcher = SkimMatcherV2::default();
            self.visible = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| matcher.fuzzy_match(entry, filter).is_some())
                .map(|(i, _)| i)
                .collect();
        }
        self.matches.clear();
        self.clamp_choice();
    }
}
