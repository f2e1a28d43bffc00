//! Scenario benchmarks.
//!
//! These model actual usage: single voices with different waveforms and a
//! voice pool under full polyphony and stealing pressure.

mod voices;

pub use voices::bench_voices;
