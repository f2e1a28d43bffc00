use std::path::PathBuf;

/// Errors from the setup and control surface. The render path never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sample rate must be positive, got {0}")]
    InvalidSampleRate(f32),

    #[error("max block size must be between 1 and {max}, got {got}")]
    InvalidBlockSize { got: usize, max: usize },

    #[error("channel count must be at least 1, got {0}")]
    InvalidChannelCount(usize),

    #[error("polyphony must be at least 1, got {0}")]
    InvalidPolyphony(usize),

    #[error("event queue capacity must be at least 1")]
    InvalidEventCapacity,

    #[error("event queue is full, dropped {0:?}")]
    QueueFull(crate::synth::SynthMessage),

    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "serde")]
    #[error("invalid config")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
