// Search, filter and the `:` command prompt.

use super::{Action, ActionTag, Registry};
use crate::statusbar::PromptHook;
use crate::ui::App;
use anyhow::Result;
use tracing::debug;

pub(super) struct FindItemForward;

impl Action for FindItemForward {
    fn tag(&self) -> ActionTag {
        ActionTag::FindItemForward
    }

    fn name(&self) -> &'static str {
        "find_item_forward"
    }

    fn can_run(&self, app: &App) -> bool {
        app.active_supports_search()
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.find_item(false)
    }
}

pub(super) struct FindItemBackward;

impl Action for FindItemBackward {
    fn tag(&self) -> ActionTag {
        ActionTag::FindItemBackward
    }

    fn name(&self) -> &'static str {
        "find_item_backward"
    }

    fn can_run(&self, app: &App) -> bool {
        app.active_supports_search()
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.find_item(true)
    }
}

pub(super) struct NextFoundItem;

impl Action for NextFoundItem {
    fn tag(&self) -> ActionTag {
        ActionTag::NextFoundItem
    }

    fn name(&self) -> &'static str {
        "next_found_item"
    }

    fn can_run(&self, app: &App) -> bool {
        app.active_supports_search()
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let wrap = app.config.ui.wrapped_search;
        if let Some(s) = app.active_screen_mut().searchable() {
            s.next_found(wrap);
        }
        Ok(())
    }
}

pub(super) struct PreviousFoundItem;

impl Action for PreviousFoundItem {
    fn tag(&self) -> ActionTag {
        ActionTag::PreviousFoundItem
    }

    fn name(&self) -> &'static str {
        "previous_found_item"
    }

    fn can_run(&self, app: &App) -> bool {
        app.active_supports_search()
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let wrap = app.config.ui.wrapped_search;
        if let Some(s) = app.active_screen_mut().searchable() {
            s.prev_found(wrap);
        }
        Ok(())
    }
}

pub(super) struct ToggleFindMode;

impl Action for ToggleFindMode {
    fn tag(&self) -> ActionTag {
        ActionTag::ToggleFindMode
    }

    fn name(&self) -> &'static str {
        "toggle_find_mode"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.config.ui.wrapped_search = !app.config.ui.wrapped_search;
        app.statusbar.msg(format!(
            "Search mode: {}",
            if app.config.ui.wrapped_search {
                "Wrapped"
            } else {
                "Normal"
            }
        ));
        Ok(())
    }
}

pub(super) struct ApplyFilter;

impl Action for ApplyFilter {
    fn tag(&self) -> ActionTag {
        ActionTag::ApplyFilter
    }

    fn name(&self) -> &'static str {
        "apply_filter"
    }

    fn can_run(&self, app: &App) -> bool {
        app.active_supports_filter()
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let initial = match app.active_screen_mut().filterable() {
            Some(f) => f.current_filter().to_string(),
            None => return Ok(()),
        };

        match app.read_line("Apply filter: ", &initial, PromptHook::Filter)? {
            None => {
                // cancelled: undo whatever the live hook already applied
                if let Some(f) = app.active_screen_mut().filterable() {
                    f.apply_filter(&initial);
                }
            }
            Some(filter) => {
                // apply the confirmed text even if no keystroke changed it,
                // so an untouched initial value still takes effect
                if let Some(f) = app.active_screen_mut().filterable() {
                    f.apply_filter(&filter);
                }
                if filter.is_empty() {
                    app.statusbar.msg("Filtering disabled");
                } else {
                    app.statusbar.msg(format!("Using filter \"{}\"", filter));
                }
            }
        }
        Ok(())
    }
}

pub(super) struct ExecuteCommand;

impl Action for ExecuteCommand {
    fn tag(&self) -> ActionTag {
        ActionTag::ExecuteCommand
    }

    fn name(&self) -> &'static str {
        "execute_command"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let Some(name) = app.read_line(":", "", PromptHook::Plain)? else {
            return Ok(());
        };
        let name = name.trim().to_string();
        if name.is_empty() {
            return Ok(());
        }
        match Registry::global().find(&name) {
            None => app.statusbar.msg(format!("No command named \"{}\"", name)),
            Some(action) => {
                if action.can_run(app) {
                    debug!("executing {} from the command prompt", action.name());
                    action.run(app)?;
                } else {
                    app.statusbar
                        .msg(format!("Cannot execute \"{}\"", action.name()));
                }
            }
        }
        Ok(())
    }
}
