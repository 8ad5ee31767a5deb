// The action table: every user-triggerable command, keyed by a stable tag
// and by the name key bindings / the `:` prompt refer to it by.

mod find;
mod navigation;
mod playback;

use crate::ui::App;
use anyhow::Result;
use std::sync::OnceLock;

/// Stable identifier for every command. The registry is indexed by this,
/// so the discriminant order is load-bearing - append, don't reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTag {
    Dummy,
    Quit,
    // playback control
    Pause,
    Stop,
    NextSong,
    PreviousSong,
    ReplaySong,
    SeekForward,
    SeekBackward,
    JumpToPosition,
    VolumeUp,
    VolumeDown,
    SetVolume,
    ToggleRepeat,
    ToggleRandom,
    ToggleCrossfade,
    SetCrossfade,
    // list navigation
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    MoveHome,
    MoveEnd,
    PressEnter,
    ScrollUpArtist,
    ScrollDownArtist,
    ScrollUpAlbum,
    ScrollDownAlbum,
    ReverseSelection,
    // screens
    NextScreen,
    PreviousScreen,
    ShowPlaylist,
    ShowBrowser,
    ShowLibrary,
    ShowHelp,
    ToggleScreenLock,
    MasterScreen,
    SlaveScreen,
    // find / filter
    FindItemForward,
    FindItemBackward,
    NextFoundItem,
    PreviousFoundItem,
    ToggleFindMode,
    ApplyFilter,
    // meta
    ExecuteCommand,
}

impl ActionTag {
    pub const ALL: [ActionTag; 45] = [
        ActionTag::Dummy,
        ActionTag::Quit,
        ActionTag::Pause,
        ActionTag::Stop,
        ActionTag::NextSong,
        ActionTag::PreviousSong,
        ActionTag::ReplaySong,
        ActionTag::SeekForward,
        ActionTag::SeekBackward,
        ActionTag::JumpToPosition,
        ActionTag::VolumeUp,
        ActionTag::VolumeDown,
        ActionTag::SetVolume,
        ActionTag::ToggleRepeat,
        ActionTag::ToggleRandom,
        ActionTag::ToggleCrossfade,
        ActionTag::SetCrossfade,
        ActionTag::ScrollUp,
        ActionTag::ScrollDown,
        ActionTag::PageUp,
        ActionTag::PageDown,
        ActionTag::MoveHome,
        ActionTag::MoveEnd,
        ActionTag::PressEnter,
        ActionTag::ScrollUpArtist,
        ActionTag::ScrollDownArtist,
        ActionTag::ScrollUpAlbum,
        ActionTag::ScrollDownAlbum,
        ActionTag::ReverseSelection,
        ActionTag::NextScreen,
        ActionTag::PreviousScreen,
        ActionTag::ShowPlaylist,
        ActionTag::ShowBrowser,
        ActionTag::ShowLibrary,
        ActionTag::ShowHelp,
        ActionTag::ToggleScreenLock,
        ActionTag::MasterScreen,
        ActionTag::SlaveScreen,
        ActionTag::FindItemForward,
        ActionTag::FindItemBackward,
        ActionTag::NextFoundItem,
        ActionTag::PreviousFoundItem,
        ActionTag::ToggleFindMode,
        ActionTag::ApplyFilter,
        ActionTag::ExecuteCommand,
    ];
}

/// A named, guarded unit of user-triggered behavior.
///
/// `can_run` is a pure precondition against current app state; `run` performs
/// the effect. Implementations are stateless - one boxed instance per tag
/// lives in the registry for the life of the process.
pub trait Action: Send + Sync {
    fn tag(&self) -> ActionTag;

    /// The name bindings and the `:` prompt use.
    fn name(&self) -> &'static str;

    fn can_run(&self, _app: &App) -> bool {
        true
    }

    fn run(&self, app: &mut App) -> Result<()>;
}

pub struct Registry {
    actions: Vec<Box<dyn Action>>,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// The process-wide table, populated on first use.
    pub fn global() -> &'static Registry {
        REGISTRY.get_or_init(Registry::populate)
    }

    fn populate() -> Self {
        let actions: Vec<Box<dyn Action>> = ActionTag::ALL
            .iter()
            .map(|&tag| -> Box<dyn Action> {
                match tag {
                    ActionTag::Dummy => Box::new(Dummy),
                    ActionTag::Quit => Box::new(Quit),
                    ActionTag::Pause => Box::new(playback::Pause),
                    ActionTag::Stop => Box::new(playback::Stop),
                    ActionTag::NextSong => Box::new(playback::NextSong),
                    ActionTag::PreviousSong => Box::new(playback::PreviousSong),
                    ActionTag::ReplaySong => Box::new(playback::ReplaySong),
                    ActionTag::SeekForward => Box::new(playback::SeekForward),
                    ActionTag::SeekBackward => Box::new(playback::SeekBackward),
                    ActionTag::JumpToPosition => Box::new(playback::JumpToPosition),
                    ActionTag::VolumeUp => Box::new(playback::VolumeUp),
                    ActionTag::VolumeDown => Box::new(playback::VolumeDown),
                    ActionTag::SetVolume => Box::new(playback::SetVolume),
                    ActionTag::ToggleRepeat => Box::new(playback::ToggleRepeat),
                    ActionTag::ToggleRandom => Box::new(playback::ToggleRandom),
                    ActionTag::ToggleCrossfade => Box::new(playback::ToggleCrossfade),
                    ActionTag::SetCrossfade => Box::new(playback::SetCrossfade),
                    ActionTag::ScrollUp => Box::new(navigation::ScrollUp),
                    ActionTag::ScrollDown => Box::new(navigation::ScrollDown),
                    ActionTag::PageUp => Box::new(navigation::PageUp),
                    ActionTag::PageDown => Box::new(navigation::PageDown),
                    ActionTag::MoveHome => Box::new(navigation::MoveHome),
                    ActionTag::MoveEnd => Box::new(navigation::MoveEnd),
                    ActionTag::PressEnter => Box::new(navigation::PressEnter),
                    ActionTag::ScrollUpArtist => Box::new(navigation::ScrollUpArtist),
                    ActionTag::ScrollDownArtist => Box::new(navigation::ScrollDownArtist),
                    ActionTag::ScrollUpAlbum => Box::new(navigation::ScrollUpAlbum),
                    ActionTag::ScrollDownAlbum => Box::new(navigation::ScrollDownAlbum),
                    ActionTag::ReverseSelection => Box::new(navigation::ReverseSelection),
                    ActionTag::NextScreen => Box::new(navigation::NextScreen),
                    ActionTag::PreviousScreen => Box::new(navigation::PreviousScreen),
                    ActionTag::ShowPlaylist => Box::new(navigation::ShowPlaylist),
                    ActionTag::ShowBrowser => Box::new(navigation::ShowBrowser),
                    ActionTag::ShowLibrary => Box::new(navigation::ShowLibrary),
                    ActionTag::ShowHelp => Box::new(navigation::ShowHelp),
                    ActionTag::ToggleScreenLock => Box::new(navigation::ToggleScreenLock),
                    ActionTag::MasterScreen => Box::new(navigation::MasterScreen),
                    ActionTag::SlaveScreen => Box::new(navigation::SlaveScreen),
                    ActionTag::FindItemForward => Box::new(find::FindItemForward),
                    ActionTag::FindItemBackward => Box::new(find::FindItemBackward),
                    ActionTag::NextFoundItem => Box::new(find::NextFoundItem),
                    ActionTag::PreviousFoundItem => Box::new(find::PreviousFoundItem),
                    ActionTag::ToggleFindMode => Box::new(find::ToggleFindMode),
                    ActionTag::ApplyFilter => Box::new(find::ApplyFilter),
                    ActionTag::ExecuteCommand => Box::new(find::ExecuteCommand),
                }
            })
            .collect();

        // Population must cover every tag, in discriminant order. Anything
        // else is a defect in this file, not a runtime condition.
        for (slot, action) in actions.iter().enumerate() {
            assert_eq!(
                action.tag() as usize,
                slot,
                "registry slot {} holds action \"{}\"",
                slot,
                action.name()
            );
        }

        Registry { actions }
    }

    /// Lookup by tag. Guaranteed to succeed: `populate` covers every tag.
    pub fn get(&self, tag: ActionTag) -> &dyn Action {
        self.actions[tag as usize].as_ref()
    }

    /// Lookup by name. A miss here is a normal user-facing outcome
    /// (an unknown typed command), not an error.
    pub fn find(&self, name: &str) -> Option<&dyn Action> {
        self.actions
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.as_ref())
    }
}

struct Dummy;

impl Action for Dummy {
    fn tag(&self) -> ActionTag {
        ActionTag::Dummy
    }

    fn name(&self) -> &'static str {
        "dummy"
    }

    fn run(&self, _app: &mut App) -> Result<()> {
        Ok(())
    }
}

struct Quit;

impl Action for Quit {
    fn tag(&self) -> ActionTag {
        ActionTag::Quit
    }

    fn name(&self) -> &'static str {
        "quit"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.should_quit = true;
        Ok(())
    }
}
