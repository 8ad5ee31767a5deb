// Syrinx Library - command core for the terminal playback remote
// Key presses resolve through a binding table into named, guarded actions

pub mod actions;   // action registry + every command
pub mod bindings;  // key abstraction and binding resolution
pub mod config;    // settings and preferences
pub mod player;    // narrow control interface to the playback service
pub mod screens;   // panels, capabilities, screen lock state machine
pub mod statusbar; // the shared input/message line
pub mod ui;        // terminal shell, input source, main loop

// Export the stuff other modules actually use
pub use actions::{Action, ActionTag, Registry};
pub use bindings::{Binding, BindingTable, Key, Resolution};
pub use config::Config;
pub use player::{LocalPlayer, Player, PlayerState, Song};
pub use ui::App;
