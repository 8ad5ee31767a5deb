// Playback control actions: transport, seeking, volume, playback modes.

use super::{Action, ActionTag};
use crate::player::PlayerState;
use crate::statusbar::PromptHook;
use crate::ui::App;
use anyhow::Result;
use regex::Regex;
use std::time::Duration;

/// The seek commands only make sense against a playing song whose length
/// the service knows.
fn can_seek(app: &App) -> bool {
    app.player.state() != PlayerState::Stopped
        && app.player.duration().map_or(false, |d| d.as_secs() > 0)
}

pub(super) struct Pause;

impl Action for Pause {
    fn tag(&self) -> ActionTag {
        ActionTag::Pause
    }

    fn name(&self) -> &'static str {
        "pause"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.player.toggle_pause()
    }
}

pub(super) struct Stop;

impl Action for Stop {
    fn tag(&self) -> ActionTag {
        ActionTag::Stop
    }

    fn name(&self) -> &'static str {
        "stop"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.player.stop()
    }
}

pub(super) struct NextSong;

impl Action for NextSong {
    fn tag(&self) -> ActionTag {
        ActionTag::NextSong
    }

    fn name(&self) -> &'static str {
        "next"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.player.next()
    }
}

pub(super) struct PreviousSong;

impl Action for PreviousSong {
    fn tag(&self) -> ActionTag {
        ActionTag::PreviousSong
    }

    fn name(&self) -> &'static str {
        "previous"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.player.previous()
    }
}

pub(super) struct ReplaySong;

impl Action for ReplaySong {
    fn tag(&self) -> ActionTag {
        ActionTag::ReplaySong
    }

    fn name(&self) -> &'static str {
        "replay_song"
    }

    fn can_run(&self, app: &App) -> bool {
        app.player.state() != PlayerState::Stopped
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.player.seek(Duration::ZERO)
    }
}

pub(super) struct SeekForward;

impl Action for SeekForward {
    fn tag(&self) -> ActionTag {
        ActionTag::SeekForward
    }

    fn name(&self) -> &'static str {
        "seek_forward"
    }

    fn can_run(&self, app: &App) -> bool {
        can_seek(app)
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.seek_interactively()
    }
}

pub(super) struct SeekBackward;

impl Action for SeekBackward {
    fn tag(&self) -> ActionTag {
        ActionTag::SeekBackward
    }

    fn name(&self) -> &'static str {
        "seek_backward"
    }

    fn can_run(&self, app: &App) -> bool {
        can_seek(app)
    }

    fn run(&self, app: &mut App) -> Result<()> {
        app.seek_interactively()
    }
}

pub(super) struct JumpToPosition;

impl Action for JumpToPosition {
    fn tag(&self) -> ActionTag {
        ActionTag::JumpToPosition
    }

    fn name(&self) -> &'static str {
        "jump_to_position_in_song"
    }

    fn can_run(&self, app: &App) -> bool {
        can_seek(app)
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let Some(total) = app.player.duration().filter(|d| d.as_secs() > 0) else {
            app.statusbar.msg("Unknown item length");
            return Ok(());
        };
        let Some(text) =
            app.read_line("Position to go (in %/m:ss/seconds(s)): ", "", PromptHook::Plain)?
        else {
            return Ok(());
        };
        match parse_position(&text, total) {
            Some(target) => app.player.seek(target)?,
            None => app
                .statusbar
                .msg("Invalid format ([m]:[ss], [s]s, [%]% accepted)"),
        }
        Ok(())
    }
}

/// Accepts "m:ss", "Ns" and "N%" (bare numbers count as percent), clamped
/// to the song length.
fn parse_position(text: &str, total: Duration) -> Option<Duration> {
    let text = text.trim();
    if let Ok(re) = Regex::new(r"^([0-9]+):([0-9]{2})$") {
        if let Some(caps) = re.captures(text) {
            let mins: u64 = caps[1].parse().ok()?;
            let secs: u64 = caps[2].parse().ok()?;
            if secs >= 60 {
                return None;
            }
            return Some(Duration::from_secs(mins * 60 + secs).min(total));
        }
    }
    if let Ok(re) = Regex::new(r"^([0-9]+)s$") {
        if let Some(caps) = re.captures(text) {
            let secs: u64 = caps[1].parse().ok()?;
            return Some(Duration::from_secs(secs).min(total));
        }
    }
    if let Ok(re) = Regex::new(r"^([0-9]+)%?$") {
        if let Some(caps) = re.captures(text) {
            let percent: u64 = caps[1].parse::<u64>().ok()?.min(100);
            return Some(Duration::from_secs(total.as_secs() * percent / 100));
        }
    }
    None
}

pub(super) struct VolumeUp;

impl Action for VolumeUp {
    fn tag(&self) -> ActionTag {
        ActionTag::VolumeUp
    }

    fn name(&self) -> &'static str {
        "volume_up"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let step = app.config.playback.volume_change_step;
        let volume = app.player.volume().saturating_add(step).min(100);
        app.player.set_volume(volume)
    }
}

pub(super) struct VolumeDown;

impl Action for VolumeDown {
    fn tag(&self) -> ActionTag {
        ActionTag::VolumeDown
    }

    fn name(&self) -> &'static str {
        "volume_down"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let step = app.config.playback.volume_change_step;
        let volume = app.player.volume().saturating_sub(step);
        app.player.set_volume(volume)
    }
}

pub(super) struct SetVolume;

impl Action for SetVolume {
    fn tag(&self) -> ActionTag {
        ActionTag::SetVolume
    }

    fn name(&self) -> &'static str {
        "set_volume"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let Some(n) = app.prompt_number("Set volume to: ", "")? else {
            return Ok(());
        };
        let volume = n.clamp(0, 100) as u8;
        app.player.set_volume(volume)?;
        app.statusbar.msg(format!("Volume set to {}%", volume));
        Ok(())
    }
}

pub(super) struct ToggleRepeat;

impl Action for ToggleRepeat {
    fn tag(&self) -> ActionTag {
        ActionTag::ToggleRepeat
    }

    fn name(&self) -> &'static str {
        "toggle_repeat"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let on = !app.player.repeat();
        app.player.set_repeat(on)?;
        app.statusbar
            .msg(format!("Repeat mode: {}", if on { "on" } else { "off" }));
        Ok(())
    }
}

pub(super) struct ToggleRandom;

impl Action for ToggleRandom {
    fn tag(&self) -> ActionTag {
        ActionTag::ToggleRandom
    }

    fn name(&self) -> &'static str {
        "toggle_random"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let on = !app.player.random();
        app.player.set_random(on)?;
        app.statusbar
            .msg(format!("Random mode: {}", if on { "on" } else { "off" }));
        Ok(())
    }
}

pub(super) struct ToggleCrossfade;

impl Action for ToggleCrossfade {
    fn tag(&self) -> ActionTag {
        ActionTag::ToggleCrossfade
    }

    fn name(&self) -> &'static str {
        "toggle_crossfade"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        if app.player.crossfade() > 0 {
            app.player.set_crossfade(0)?;
            app.statusbar.msg("Crossfade off");
        } else {
            let seconds = app.config.playback.crossfade_time;
            app.player.set_crossfade(seconds)?;
            app.statusbar.msg(format!("Crossfade set to {}s", seconds));
        }
        Ok(())
    }
}

pub(super) struct SetCrossfade;

impl Action for SetCrossfade {
    fn tag(&self) -> ActionTag {
        ActionTag::SetCrossfade
    }

    fn name(&self) -> &'static str {
        "set_crossfade"
    }

    fn run(&self, app: &mut App) -> Result<()> {
        let Some(n) = app.prompt_number("Set crossfade to: ", "")? else {
            return Ok(());
        };
        // crossfade shorter than a second is meaningless, clamp up
        let seconds = n.clamp(1, u32::MAX as i64) as u32;
        app.config.playback.crossfade_time = seconds;
        app.player.set_crossfade(seconds)?;
        app.statusbar.msg(format!("Crossfade set to {}s", seconds));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position_formats() {
        let total = Duration::from_secs(240);
        assert_eq!(
            parse_position("1:30", total),
            Some(Duration::from_secs(90))
        );
        assert_eq!(parse_position("75s", total), Some(Duration::from_secs(75)));
        assert_eq!(
            parse_position("50%", total),
            Some(Duration::from_secs(120))
        );
        assert_eq!(
            parse_position("50", total),
            Some(Duration::from_secs(120))
        );
        // clamped to the song length
        assert_eq!(parse_position("500s", total), Some(total));
        assert_eq!(parse_position("1:75", total), None);
        assert_eq!(parse_position("later", total), None);
        assert_eq!(parse_position("", total), None);
    }
}
