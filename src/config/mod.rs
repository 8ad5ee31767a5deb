// Configuration management for Syrinx
// Handles loading/saving settings, with sensible defaults when config is missing

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub ui: UiConfig,
    /// Extra key bindings: key spec ("f", "ctrl-l", "g g") -> action names.
    /// These take precedence over the built-in defaults.
    #[serde(default)]
    pub bindings: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Base seek step in seconds.
    pub seek_time: u64,
    /// Grow the seek step the longer the scrub loop has been held open.
    pub incremental_seeking: bool,
    pub volume_change_step: u8,
    /// Crossfade length (seconds) applied when crossfade gets toggled on.
    pub crossfade_time: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Wrap around when stepping through search matches.
    pub wrapped_search: bool,
    /// Share of the width the master screen keeps in a locked split (percent).
    pub locked_screen_width_part: u8,
    /// Prompt for the width share every time a screen gets locked.
    pub ask_for_locked_screen_width_part: bool,
    pub status_message_ttl_ms: u64,
    /// Show "-mm:ss" remaining instead of elapsed time while scrubbing.
    pub display_remaining_time: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig {
                seek_time: 5,
                incremental_seeking: true,
                volume_change_step: 2,
                crossfade_time: 5,
            },
            ui: UiConfig {
                wrapped_search: true,
                locked_screen_width_part: 50,
                ask_for_locked_screen_width_part: false,
                status_message_ttl_ms: 5000,
                display_remaining_time: false,
            },
            bindings: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("malformed config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("syrinx");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.playback.seek_time, 5);
        assert!(config.playback.incremental_seeking);
        assert!((20..=80).contains(&config.ui.locked_screen_width_part));
        assert!(config.bindings.is_empty());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.playback.seek_time = 10;
        config
            .bindings
            .insert("ctrl-l".to_string(), vec!["toggle_screen_lock".to_string()]);
        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.playback.seek_time, 10);
        assert_eq!(
            loaded.bindings.get("ctrl-l").unwrap(),
            &vec!["toggle_screen_lock".to_string()]
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "playback = \"nope\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
