//! Low-level DSP primitives used by the voices.
//!
//! These components are allocation-free and realtime-safe once prepared,
//! making them safe to embed directly inside voice structs. They stay focused
//! on the signal-processing math; note handling lives in `synth`.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Resonant state-variable lowpass.
pub mod filter;
/// Phase-accumulator oscillator.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeStage};
pub use filter::SVFilter;
pub use oscillator::{Oscillator, Waveform};
