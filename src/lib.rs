pub mod config;
pub mod dsp;
#[cfg(feature = "rtrb")]
pub mod engine; // Realtime entry point and control handle
pub mod error;
pub mod io;
pub mod params; // Shared timbre parameters
pub mod synth; // Voice management and polyphony

pub use config::EngineConfig;
#[cfg(feature = "rtrb")]
pub use engine::{EngineHandle, SynthEngine};
pub use error::{Error, Result};
pub use io::AudioBuffer;
pub use params::{SharedParams, TimbreParams};

pub const MAX_BLOCK_SIZE: usize = 8192;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
