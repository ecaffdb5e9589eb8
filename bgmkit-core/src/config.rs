//! Persisted audio parameters.
//!
//! `AudioParams` is the TOML document the game keeps next to its other
//! settings: the music tables, volumes and the tunable bounce cue.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::sfx::{GlideShape, SfxKind};
use crate::types::song::{reference_chords, reference_melody, Song, SongError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BgmParams {
    pub enabled: bool,
    pub volume: f32,
    /// Seconds per beat
    pub beat_duration: f64,
    pub chords: Vec<Vec<f32>>,
    /// Melody steps in Hz; `0` is a rest
    pub melody: Vec<f32>,
}

impl Default for BgmParams {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.5,
            beat_duration: 0.45,
            chords: reference_chords(),
            melody: reference_melody(),
        }
    }
}

impl BgmParams {
    /// Validate the tables into a playable song
    pub fn song(&self) -> Result<Song, SongError> {
        Song::from_tables(&self.chords, &self.melody)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SfxParams {
    pub enabled: bool,
    pub volume: f32,
    pub bounce_freq_start: f32,
    pub bounce_freq_end: f32,
    /// Seconds
    pub bounce_duration: f64,
}

impl Default for SfxParams {
    fn default() -> Self {
        let bounce = SfxKind::Bounce.default_glide();
        Self {
            enabled: true,
            volume: 1.0,
            bounce_freq_start: bounce.start_hz,
            bounce_freq_end: bounce.end_hz,
            bounce_duration: bounce.length,
        }
    }
}

impl SfxParams {
    /// Shape of `kind` with the configured bounce and volume applied
    pub fn glide_for(&self, kind: SfxKind) -> GlideShape {
        let mut glide = kind.default_glide();
        if kind == SfxKind::Bounce {
            glide.start_hz = self.bounce_freq_start;
            glide.end_hz = self.bounce_freq_end;
            glide.length = self.bounce_duration;
        }
        glide.scaled(self.volume)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioParams {
    pub bgm: BgmParams,
    pub sfx: SfxParams,
}

impl AudioParams {
    /// Read and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let params: AudioParams =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        params.validate()?;
        Ok(params)
    }

    /// Like [`AudioParams::load`], but a missing file yields the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!(target: "bgmkit::config", "no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bgm
            .song()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !(self.bgm.beat_duration.is_finite() && self.bgm.beat_duration > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "beat_duration must be positive, got {}",
                self.bgm.beat_duration
            )));
        }
        let sfx = &self.sfx;
        if !(sfx.bounce_freq_start > 0.0 && sfx.bounce_freq_end > 0.0) {
            return Err(ConfigError::Invalid(
                "bounce frequencies must be positive".to_string(),
            ));
        }
        if !(sfx.bounce_duration.is_finite() && sfx.bounce_duration > 0.0) {
            return Err(ConfigError::Invalid(
                "bounce_duration must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn song(&self) -> Result<Song, SongError> {
        self.bgm.song()
    }
}
