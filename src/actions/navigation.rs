// List and screen navigation: cursor movement, screen switching, the
// master/slave screen lock and the song-list jump commands.

use super::{Action, ActionTag};
use crate::screens::{ScreenKind, ScrollDir};
use crate::ui::App;
use anyhow::Result;

macro_rules! scroll_action {
    ($name:ident, $tag:ident, $action_name:literal, $dir:expr) => {
        pub(super) struct $name;

        impl Action for $name {
            fn tag(&self) -> ActionTag {
                ActionTag::$tag
            }

            fn name(&self) -> &'static str {
                $action_name
            }

            fn run(&self, app: &mut App) -> Result<()> {
                app.active_screen_mut().scroll($dir);
                Ok(())
            }
        }
    };
}

scroll_action!(ScrollUp, ScrollUp, "scroll_up", ScrollDir::Up);
scroll_action!(ScrollDown, ScrollDown, "scroll_down", ScrollDir::Down);
scroll_action!(PageUp, PageUp, "page_up", ScrollDir::PageUp);
scroll_action!(PageDown, PageDown, "page_down", ScrollDir::PageDown);
scroll_action!(MoveHome, MoveHome, "move_home", ScrollDir::Home);
scroll_action!(MoveEnd, MoveEnd, "move_end", ScrollDir::End);

pub(super) struct PressEnter;

impl Action for PressEnter {
    fn tag(&self) -> ActionTag {
        ActionTag::PressEnter
    }

    fn name(&self) -> &'static str {
        "press_enter"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        match app.composition.active() {
            ScreenKind::Playlist => {
                if let Some(index) = app.screens.playlist.chosen_queue_index() {
                    app.player.play_index(index)?;
                }
            }
            ScreenKind::Library => {
                let file = app.screens.library.chosen_song().map(|s| s.file.clone());
                if let Some(file) = file {
                    let index = app.player.queue().iter().position(|s| s.file == file);
                    match index {
                        Some(index) => app.player.play_index(index)?,
                        None => app.statusbar.msg("Song is not in the play queue"),
                    }
                }
            }
            ScreenKind::Browser => {
                let entry = app.screens.browser.chosen_entry().map(str::to_string);
                if let Some(entry) = entry {
                    let index = app.player.queue().iter().position(|s| s.file == entry);
                    match index {
                        Some(index) => app.player.play_index(index)?,
                        None => app.statusbar.msg("Item is not in the play queue"),
                    }
                }
            }
            ScreenKind::Help => {}
        }
        Ok(())
    }
}

/// Jump direction for the grouped song-list moves.
enum Jump {
    Up,
    Down,
}

/// Move the cursor to where the given tag (artist or album) changes,
/// walking the song list in `direction`.
fn jump_by<F>(app: &mut App, direction: Jump, tag_of: F)
where
    F: Fn(&crate::player::Song) -> String,
{
    let Some(list) = app.active_screen_mut().song_list() else {
        return;
    };
    let mut pos = list.choice();
    let Some(current) = list.song(pos).map(|s| tag_of(s)) else {
        return;
    };
    match direction {
        Jump::Up => {
            while pos > 0 {
                pos -= 1;
                match list.song(pos) {
                    Some(s) if tag_of(s) == current => continue,
                    _ => break,
                }
            }
        }
        Jump::Down => {
            while pos + 1 < list.len() {
                pos += 1;
                match list.song(pos) {
                    Some(s) if tag_of(s) == current => continue,
                    _ => break,
                }
            }
        }
    }
    list.highlight(pos);
}

macro_rules! jump_action {
    ($name:ident, $tag:ident, $action_name:literal, $dir:expr, $field:ident) => {
        pub(super) struct $name;

        impl Action for $name {
            fn tag(&self) -> ActionTag {
                ActionTag::$tag
            }

            fn name(&self) -> &'static str {
                $action_name
            }

            fn can_run(&self, app: &App) -> bool {
                app.active_supports_song_list()
            }

            fn run(&self, app: &mut App) -> Result<()> {
                jump_by(app, $dir, |s| s.$field().to_string());
                Ok(())
            }
        }
    };
}

jump_action!(
    ScrollUpArtist,
    ScrollUpArtist,
    "scroll_up_artist",
    Jump::Up,
    display_artist
);
jump_action!(
    ScrollDownArtist,
    ScrollDownArtist,
    "scroll_down_artist",
    Jump::Down,
    display_artist
);
jump_action!(
    ScrollUpAlbum,
    ScrollUpAlbum,
    "scroll_up_album",
    Jump::Up,
    display_album
);
jump_action!(
    ScrollDownAlbum,
    ScrollDownAlbum,
    "scroll_down_album",
    Jump::Down,
    display_album
);

pub(super) struct ReverseSelection;

impl Action for ReverseSelection {
    fn tag(&self) -> ActionTag {
        ActionTag::ReverseSelection
    }

    fn name(&self) -> &'static str {
        "reverse_selection"
    }

    fn can_run(&self, app: &App) -> bool {
        app.active_supports_song_list()
    }

    fn run(&self, app: &mut App) -> Result<()> {
        if let Some(list) = app.active_screen_mut().song_list() {
            for i in 0..list.len() {
                let selected = list.selected(i);
                list.set_selected(i, !selected);
            }
        }
        app.statusbar.msg("Selection reversed");
        Ok(())
    }
}

pub(super) struct NextScreen;

impl Action for NextScreen {
    fn tag(&self) -> ActionTag {
        ActionTag::NextScreen
    }

    fn name(&self) -> &'static str {
        "next_screen"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let start = app.composition.active();
        let mut kind = start.next();
        // a lock narrows the cycle down to the pair
        while kind != start && !app.composition.can_switch_to(kind) {
            kind = kind.next();
        }
        app.switch_screen(kind)
    }
}

pub(super) struct PreviousScreen;

impl Action for PreviousScreen {
    fn tag(&self) -> ActionTag {
        ActionTag::PreviousScreen
    }

    fn name(&self) -> &'static str {
        "previous_screen"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let start = app.composition.active();
        let mut kind = start.prev();
        while kind != start && !app.composition.can_switch_to(kind) {
            kind = kind.prev();
        }
        app.switch_screen(kind)
    }
}

macro_rules! show_screen_action {
    ($name:ident, $tag:ident, $action_name:literal, $kind:expr) => {
        pub(super) struct $name;

        impl Action for $name {
            fn tag(&self) -> ActionTag {
                ActionTag::$tag
            }

            fn name(&self) -> &'static str {
                $action_name
            }

            fn can_run(&self, app: &App) -> bool {
                app.composition.active() != $kind && app.composition.can_switch_to($kind)
            }

            fn run(&self, app: &mut App) -> Result<()> {
                app.switch_screen($kind)
            }
        }
    };
}

show_screen_action!(ShowPlaylist, ShowPlaylist, "show_playlist", ScreenKind::Playlist);
show_screen_action!(ShowBrowser, ShowBrowser, "show_browser", ScreenKind::Browser);
show_screen_action!(ShowLibrary, ShowLibrary, "show_media_library", ScreenKind::Library);
show_screen_action!(ShowHelp, ShowHelp, "show_help", ScreenKind::Help);

pub(super) struct ToggleScreenLock;

impl Action for ToggleScreenLock {
    fn tag(&self) -> ActionTag {
        ActionTag::ToggleScreenLock
    }

    fn name(&self) -> &'static str {
        "toggle_screen_lock"
    }

    fn can_run(&self, app: &App) -> bool {
        app.composition.is_locked()
            || (app.composition.active().mergeable() && app.lock_slave_candidate().is_some())
    }

    fn run(&self, app: &mut App) -> Result<()> {
        if app.composition.is_locked() {
            app.composition.unlock()?;
            app.statusbar.msg("Screen unlocked");
            return Ok(());
        }

        let master = app.composition.active();
        let Some(slave) = app.lock_slave_candidate() else {
            app.statusbar.msg("No second screen to lock with");
            return Ok(());
        };

        let mut part = app.config.ui.locked_screen_width_part as i64;
        if app.config.ui.ask_for_locked_screen_width_part {
            let initial = part.to_string();
            match app.prompt_number(
                "% of the locked screen's width to be reserved (20-80): ",
                &initial,
            )? {
                Some(n) => part = n,
                None => return Ok(()),
            }
        }
        let part = part.clamp(20, 80) as u8;
        app.config.ui.locked_screen_width_part = part;

        app.composition.lock(master, slave)?;
        app.statusbar
            .msg(format!("Screen locked (with {}% width)", part));
        Ok(())
    }
}

pub(super) struct MasterScreen;

impl Action for MasterScreen {
    fn tag(&self) -> ActionTag {
        ActionTag::MasterScreen
    }

    fn name(&self) -> &'static str {
        "master_screen"
    }

    fn can_run(&self, app: &App) -> bool {
        app.composition
            .locked_pair()
            .map_or(false, |(_, slave)| app.composition.active() == slave)
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.composition.activate_master()?;
        Ok(())
    }
}

pub(super) struct SlaveScreen;

impl Action for SlaveScreen {
    fn tag(&self) -> ActionTag {
        ActionTag::SlaveScreen
    }

    fn name(&self) -> &'static str {
        "slave_screen"
    }

    fn can_run(&self, app: &App) -> bool {
        app.composition
            .locked_pair()
            .map_or(false, |(master, _)| app.composition.active() == master)
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.composition.activate_slave()?;
        Ok(())
    }
}
