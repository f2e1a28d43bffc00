//! Stream configuration handed to the engine before any audio is rendered.

#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::Error, params::TimbreParams, MAX_BLOCK_SIZE};

/// Everything the engine needs to size itself, plus the starting patch.
///
/// ```toml
/// sample_rate = 48000.0
/// max_block_size = 512
/// channels = 2
/// polyphony = 8
///
/// [params]
/// waveform = "square"
/// filter_cutoff_hz = 2400.0
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    pub max_block_size: usize,
    pub channels: usize,
    pub polyphony: usize,
    /// Slots in the note event queue between control and audio threads.
    pub event_capacity: usize,
    pub params: TimbreParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            max_block_size: 512,
            channels: 2,
            polyphony: 8,
            event_capacity: 1024,
            params: TimbreParams::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.sample_rate > 0.0 && self.sample_rate.is_finite()) {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if self.max_block_size == 0 || self.max_block_size > MAX_BLOCK_SIZE {
            return Err(Error::InvalidBlockSize {
                got: self.max_block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        if self.channels == 0 {
            return Err(Error::InvalidChannelCount(self.channels));
        }
        if self.polyphony == 0 {
            return Err(Error::InvalidPolyphony(self.polyphony));
        }
        if self.event_capacity == 0 {
            return Err(Error::InvalidEventCapacity);
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing fields keep their defaults;
    /// parameter values are clamped into range.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(source: &str) -> Result<Self, Error> {
        let mut config: Self = toml::from_str(source)?;
        config.params = config.params.clamped();
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "loaded engine config");
        Ok(config)
    }
}
