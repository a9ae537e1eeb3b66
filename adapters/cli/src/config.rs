use std::{fs, io, path::Path, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use starfall_core::{Playfield, TICKS_PER_SECOND};
use thiserror::Error;

const DEFAULT_SEED: u64 = 0x5eed_57a2_f011_0001;
const MAX_TICK_RATE: u32 = 240;

/// Session parameters loaded from an optional TOML file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Tuning {
    /// Seed shared by the world and every system.
    pub seed: u64,
    /// Horizontal extent of the playfield.
    pub width: f32,
    /// Vertical extent of the playfield.
    pub height: f32,
    /// Simulation ticks per second of wall time.
    pub tick_rate: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        let playfield = Playfield::default();
        Self {
            seed: DEFAULT_SEED,
            width: playfield.width(),
            height: playfield.height(),
            tick_rate: TICKS_PER_SECOND,
        }
    }
}

impl Tuning {
    /// Reads and validates tuning from the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses and validates tuning from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self, ConfigError> {
        let tuning: Self = toml::from_str(text)?;
        tuning.validate()
    }

    /// Checks that every value can drive a session.
    pub(crate) fn validate(self) -> Result<Self, ConfigError> {
        let valid_extent = |value: f32| value.is_finite() && value > 0.0;
        if !valid_extent(self.width) || !valid_extent(self.height) {
            return Err(ConfigError::InvalidPlayfield {
                width: self.width,
                height: self.height,
            });
        }
        if self.tick_rate == 0 || self.tick_rate > MAX_TICK_RATE {
            return Err(ConfigError::InvalidTickRate(self.tick_rate));
        }
        Ok(self)
    }

    #[must_use]
    pub(crate) fn playfield(&self) -> Playfield {
        Playfield::new(self.width, self.height)
    }

    #[must_use]
    pub(crate) fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

/// Errors raised while loading tuning.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}", .path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid tuning TOML.
    #[error("malformed tuning file")]
    Parse(#[from] toml::de::Error),
    /// The playfield has a non-positive or non-finite extent.
    #[error("playfield must have positive finite extents, got {width}x{height}")]
    InvalidPlayfield {
        /// Rejected width.
        width: f32,
        /// Rejected height.
        height: f32,
    },
    /// The tick rate is zero or unreasonably high.
    #[error("tick rate must be between 1 and 240, got {0}")]
    InvalidTickRate(u32),
}
