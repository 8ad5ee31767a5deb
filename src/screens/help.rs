use super::{
    match_indices, next_match, prev_match, step_choice, Screen, ScreenKind, ScrollDir,
    Searchable,
};
use crate::bindings::BindingTable;
use crate::actions::Registry;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Read-only listing of every key binding. Not mergeable - it would be a
/// strange half of a split - but searchable like any other list.
pub struct HelpScreen {
    lines: Vec<String>,
    choice: usize,
    matches: Vec<usize>,
}

impl HelpScreen {
    pub fn new(bindings: &BindingTable) -> Self {
        let registry = Registry::global();
        let lines = bindings
            .bindings()
            .iter()
            .map(|binding| {
                let actions = binding
                    .actions()
                    .iter()
                    .map(|&tag| registry.get(tag).name())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{:>12}  {}", binding.keys_display(), actions)
            })
            .collect();
        Self {
            lines,
            choice: 0,
            matches: Vec::new(),
        }
    }
}

impl Screen for HelpScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Help
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _focused: bool) {
        let items: Vec<ListItem> = self
            .lines
            .iter()
            .enumerate()
            .map(|(row, line)| {
                let mut style = Style::default();
                if self.matches.contains(&row) {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                ListItem::new(line.clone()).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Help - keys"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        if !self.lines.is_empty() {
            state.select(Some(self.choice));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn scroll(&mut self, dir: ScrollDir) {
        self.choice = step_choice(self.choice, self.lines.len(), dir);
    }

    fn searchable(&mut self) -> Option<&mut dyn Searchable> {
        Some(self)
    }
}

impl Searchable for HelpScreen {
    fn search(&mut self, query: &str) -> bool {
        self.matches = match_indices(self.lines.iter().map(|s| s.as_str()), query);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_binding() {
        let table = BindingTable::with_defaults();
        let screen = HelpScreen::new(&table);
        assert_eq!(screen.lines.len(), table.bindings().len());
    }

    #[test]
    fn test_search_locates_an_action_name() {
        let table = BindingTable::with_defaults();
        let mut screen = HelpScreen::new(&table);
        assert!(screen.search("toggle_screen_lock"));
        screen.next_found(false);
        assert!(screen.lines[screen.choice].contains("toggle_screen_lock"));
    }
}
