use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One entry of the play queue / database, as reported by the playback service.
/// Tags are optional - plenty of files in the wild carry none at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub file: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}

impl Song {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            title: None,
            artist: None,
            album: None,
            duration: None,
        }
    }

    pub fn with_tags(
        mut self,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        self.title = Some(title.into());
        self.artist = Some(artist.into());
        self.album = Some(album.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.file)
    }

    pub fn display_artist(&self) -> &str {
        self.artist.as_deref().unwrap_or("Unknown Artist")
    }

    pub fn display_album(&self) -> &str {
        self.album.as_deref().unwrap_or("Unknown Album")
    }

    /// The one-line form the list screens show.
    pub fn display_line(&self) -> String {
        format!(
            "{} - {} ({})",
            self.display_artist(),
            self.display_title(),
            self.display_album()
        )
    }
}

/// Render a duration as "m:ss" for the progress line and time prompts.
pub fn format_time(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_falls_back_to_file_name() {
        let song = Song::new("stray/untitled.flac");
        assert_eq!(song.display_title(), "stray/untitled.flac");
        assert_eq!(song.display_artist(), "Unknown Artist");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Duration::from_secs(0)), "0:00");
        assert_eq!(format_time(Duration::from_secs(65)), "1:05");
        assert_eq!(format_time(Duration::from_secs(600)), "10:00");
    }
}
