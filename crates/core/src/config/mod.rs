use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{PlayerError, Result, Track};

/// Smallest and largest transform window a browser analysis node accepts.
const MIN_FFT_SIZE: usize = 32;
const MAX_FFT_SIZE: usize = 32_768;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tracks: Vec<TrackConfig>,
    pub player: PlayerConfig,
    pub visualizer: VisualizerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tracks: vec![
                TrackConfig::new("audio.mp3", "music/audio.mp3"),
                TrackConfig::new("audio2.mp3", "music/audio2.mp3"),
                TrackConfig::new("audio3.mp3", "music/audio3.mp3"),
            ],
            player: PlayerConfig::default(),
            visualizer: VisualizerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads a JSON configuration file and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tracks.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }
        if !(0.0..=1.0).contains(&self.player.volume) {
            return Err(PlayerError::InvalidInput(
                "player volume must lie within 0.0..=1.0",
            ));
        }
        self.visualizer.validate()
    }

    pub fn track_list(&self) -> Vec<Track> {
        self.tracks
            .iter()
            .map(|track| Track::new(track.name.clone(), track.source.clone()))
            .collect()
    }
}

/// Entry of the fixed track list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackConfig {
    pub name: String,
    pub source: String,
}

impl TrackConfig {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Initial transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub volume: f32,
    pub auto_advance: bool,
    /// Bind an analysis node and draw the spectrum while playing.
    pub visualization: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            auto_advance: false,
            visualization: true,
        }
    }
}

/// Configuration specific to the spectrum drawing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisualizerConfig {
    pub fft_size: usize,
    pub width: f64,
    pub height: f64,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            fft_size: 256,
            width: 500.0,
            height: 100.0,
        }
    }
}

impl VisualizerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(PlayerError::InvalidInput(
                "fft_size must be a power of two between 32 and 32768",
            ));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(PlayerError::InvalidInput(
                "canvas dimensions must be positive",
            ));
        }
        Ok(())
    }

    /// Number of frequency bins produced by the configured window.
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_widget() {
        let config = AppConfig::default();
        assert_eq!(config.tracks.len(), 3);
        assert_eq!(config.tracks[1].source, "music/audio2.mp3");
        assert_eq!(config.visualizer.bin_count(), 128);
        assert!(!config.player.auto_advance);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = AppConfig::from_json(
            r#"{ "tracks": [{ "name": "solo", "source": "solo.ogg" }],
                 "player": { "auto_advance": true } }"#,
        )
        .unwrap();

        assert_eq!(config.tracks, vec![TrackConfig::new("solo", "solo.ogg")]);
        assert!(config.player.auto_advance);
        assert_eq!(config.player.volume, 1.0);
        assert_eq!(config.visualizer.fft_size, 256);
    }

    #[test]
    fn rejects_invalid_settings() {
        let empty = AppConfig::from_json(r#"{ "tracks": [] }"#).unwrap_err();
        assert!(matches!(empty, PlayerError::EmptyPlaylist));

        let loud = AppConfig::from_json(r#"{ "player": { "volume": 1.5 } }"#).unwrap_err();
        assert!(matches!(loud, PlayerError::InvalidInput(_)));

        let odd = AppConfig::from_json(r#"{ "visualizer": { "fft_size": 300 } }"#).unwrap_err();
        assert!(matches!(odd, PlayerError::InvalidInput(_)));

        let broken = AppConfig::from_json("{").unwrap_err();
        assert!(matches!(broken, PlayerError::Config(_)));
    }
}
