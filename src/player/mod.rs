pub mod local;
pub mod song;

pub use local::LocalPlayer;
pub use song::{format_time, Song};

use anyhow::Result;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Stopped,
    Playing,
    Paused,
}

/// The full control surface the command core needs from a playback service.
///
/// This is deliberately narrow: the wire protocol, reconnect handling and
/// database updates all live behind whatever implements this trait. The
/// command layer never sees a socket.
pub trait Player {
    fn state(&self) -> PlayerState;

    /// Elapsed time of the current song. Zero when stopped.
    fn elapsed(&self) -> Duration;

    /// Length of the current song, if the service knows it.
    fn duration(&self) -> Option<Duration>;

    fn seek(&mut self, position: Duration) -> Result<()>;

    fn toggle_pause(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn next(&mut self) -> Result<()>;
    fn previous(&mut self) -> Result<()>;

    /// Volume in percent, 0-100.
    fn volume(&self) -> u8;
    fn set_volume(&mut self, volume: u8) -> Result<()>;

    fn repeat(&self) -> bool;
    fn set_repeat(&mut self, on: bool) -> Result<()>;

    fn random(&self) -> bool;
    fn set_random(&mut self, on: bool) -> Result<()>;

    /// Crossfade length in seconds; 0 means off.
    fn crossfade(&self) -> u32;
    fn set_crossfade(&mut self, seconds: u32) -> Result<()>;

    /// The current play queue.
    fn queue(&self) -> &[Song];

    /// Index into `queue()` of the song being played, if any.
    fn current_index(&self) -> Option<usize>;

    /// Start playing the queue entry at `index`.
    fn play_index(&mut self, index: usize) -> Result<()>;

    /// Everything the service's database knows about.
    fn library(&self) -> &[Song];
}
