use super::{Player, PlayerState, Song};
use anyhow::{bail, Result};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// In-process stand-in for the playback service.
///
/// Used when no daemon is configured, and by tests. It keeps the same
/// observable contract a real connection would: a play queue, a state
/// machine, a wall-clock elapsed counter and clamped volume/seek.
pub struct LocalPlayer {
    queue: Vec<Song>,
    library: Vec<Song>,
    current: Option<usize>,
    state: PlayerState,
    volume: u8,
    repeat: bool,
    random: bool,
    crossfade: u32,
    // elapsed = base + (now - playing_since), the latter only while playing
    base: Duration,
    playing_since: Option<Instant>,
}

impl LocalPlayer {
    pub fn new(queue: Vec<Song>, library: Vec<Song>) -> Self {
        Self {
            queue,
            library,
            current: None,
            state: PlayerState::Stopped,
            volume: 70,
            repeat: false,
            random: false,
            crossfade: 0,
            base: Duration::ZERO,
            playing_since: None,
        }
    }

    /// A small built-in queue so the binary has something to control
    /// out of the box.
    pub fn demo() -> Self {
        let queue = vec![
            Song::new("harbor_lights/night_drive/01.flac")
                .with_tags("Night Drive", "The Harbor Lights", "Sodium Glow")
                .with_duration(Duration::from_secs(214)),
            Song::new("harbor_lights/night_drive/02.flac")
                .with_tags("Mile Markers", "The Harbor Lights", "Sodium Glow")
                .with_duration(Duration::from_secs(187)),
            Song::new("cassette_summer/tape_one/01.mp3")
                .with_tags("Reel to Reel", "Cassette Summer", "Tape One")
                .with_duration(Duration::from_secs(243)),
            Song::new("cassette_summer/tape_one/02.mp3")
                .with_tags("Chrome Bias", "Cassette Summer", "Tape One")
                .with_duration(Duration::from_secs(198)),
        ];
        let mut library = queue.clone();
        library.push(
            Song::new("cassette_summer/tape_two/01.mp3")
                .with_tags("Leader Tape", "Cassette Summer", "Tape Two")
                .with_duration(Duration::from_secs(171)),
        );
        library.push(
            Song::new("stray/untagged_demo.ogg").with_duration(Duration::from_secs(95)),
        );
        Self::new(queue, library)
    }

    fn freeze_elapsed(&mut self) {
        if let Some(since) = self.playing_since.take() {
            self.base += since.elapsed();
        }
    }

    fn current_song(&self) -> Option<&Song> {
        self.current.and_then(|i| self.queue.get(i))
    }
}

impl Player for LocalPlayer {
    fn state(&self) -> PlayerState {
        self.state
    }

    fn elapsed(&self) -> Duration {
        let running = self
            .playing_since
            .map(|since| since.elapsed())
            .unwrap_or_default();
        self.base + running
    }

    fn duration(&self) -> Option<Duration> {
        self.current_song().and_then(|s| s.duration)
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        if self.state == PlayerState::Stopped {
            bail!("not playing");
        }
        let clamped = match self.duration() {
            Some(total) => position.min(total),
            None => position,
        };
        debug!("seek to {:?}", clamped);
        self.base = clamped;
        if self.playing_since.is_some() {
            self.playing_since = Some(Instant::now());
        }
        Ok(())
    }

    fn toggle_pause(&mut self) -> Result<()> {
        match self.state {
            PlayerState::Playing => {
                self.freeze_elapsed();
                self.state = PlayerState::Paused;
            }
            PlayerState::Paused => {
                self.playing_since = Some(Instant::now());
                self.state = PlayerState::Playing;
            }
            PlayerState::Stopped => {
                if self.queue.is_empty() {
                    bail!("play queue is empty");
                }
                self.play_index(self.current.unwrap_or(0))?;
            }
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.state = PlayerState::Stopped;
        self.playing_since = None;
        self.base = Duration::ZERO;
        Ok(())
    }

    fn next(&mut self) -> Result<()> {
        let Some(current) = self.current else {
            return Ok(());
        };
        if current + 1 < self.queue.len() {
            self.play_index(current + 1)?;
        } else if self.repeat {
            self.play_index(0)?;
        } else {
            self.stop()?;
        }
        Ok(())
    }

    fn previous(&mut self) -> Result<()> {
        let Some(current) = self.current else {
            return Ok(());
        };
        if current > 0 {
            self.play_index(current - 1)?;
        } else if self.repeat && !self.queue.is_empty() {
            self.play_index(self.queue.len() - 1)?;
        }
        Ok(())
    }

    fn volume(&self) -> u8 {
        self.volume
    }

    fn set_volume(&mut self, volume: u8) -> Result<()> {
        self.volume = volume.min(100);
        Ok(())
    }

    fn repeat(&self) -> bool {
        self.repeat
    }

    fn set_repeat(&mut self, on: bool) -> Result<()> {
        self.repeat = on;
        Ok(())
    }

    fn random(&self) -> bool {
        self.random
    }

    fn set_random(&mut self, on: bool) -> Result<()> {
        self.random = on;
        Ok(())
    }

    fn crossfade(&self) -> u32 {
        self.crossfade
    }

    fn set_crossfade(&mut self, seconds: u32) -> Result<()> {
        self.crossfade = seconds;
        Ok(())
    }

    fn queue(&self) -> &[Song] {
        &self.queue
    }

    fn current_index(&self) -> Option<usize> {
        self.current
    }

    fn play_index(&mut self, index: usize) -> Result<()> {
        let Some(song) = self.queue.get(index) else {
            bail!("queue index {} out of range", index);
        };
        info!("playing {}", song.display_line());
        self.current = Some(index);
        self.state = PlayerState::Playing;
        self.base = Duration::ZERO;
        self.playing_since = Some(Instant::now());
        Ok(())
    }

    fn library(&self) -> &[Song] {
        &self.library
    }
}
