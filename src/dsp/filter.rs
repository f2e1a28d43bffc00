use std::f32::consts::PI;
use std::ops::Range;

use crate::io::AudioBuffer;

/*
State-Variable Lowpass (TPT form)
=================================

A two-pole (12 dB/octave) resonant lowpass built from two trapezoidal
integrators. The "topology-preserving transform" keeps the analog filter's
structure intact when discretising it, which is what lets it sweep quickly
and run at high resonance without blowing up.

Vocabulary
----------

  cutoff      Frequency (Hz) where the response starts rolling off.

  resonance   Q. Boosts frequencies around the cutoff. Q = 1/√2 (~0.707) is
              the flat Butterworth response; larger values give a peak.

  g           Prewarped integrator gain: g = tan(π · cutoff / sample_rate)

  k           Damping, the inverse of Q: k = 1 / Q

  ic1eq/ic2eq The two integrator memories. One pair per channel.


The Per-Sample Math
-------------------

With h = 1 / (1 + g·(g + k)) precomputed:

    v3 = x - ic2eq
    v1 = h · (ic1eq + g · v3)      bandpass
    v2 = ic2eq + g · v1            lowpass  ← output
    ic1eq = 2·v1 - ic1eq
    ic2eq = 2·v2 - ic2eq

Three multiply-adds and no division per sample. Coefficients only change
when cutoff or resonance do, so they are recomputed lazily at the start of
the next `process` call.


Channels
--------

All channels share one coefficient set but keep their own integrators, so a
stereo voice filters left and right independently. The state storage is
allocated once in `prepare`; `process` never allocates.
*/

/// Cutoff can never reach Nyquist: tan(π/2) is unbounded.
const MAX_CUTOFF_RATIO: f32 = 0.49;

#[derive(Debug, Clone, Copy, Default)]
struct ChannelState {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory
}

#[derive(Debug, Clone)]
pub struct SVFilter {
    cutoff_hz: f32,
    resonance: f32,

    sample_rate: f32,
    channels: Vec<ChannelState>,

    // Derived coefficients
    g: f32,
    k: f32,
    h: f32,
    dirty: bool,
}

impl SVFilter {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            resonance: std::f32::consts::FRAC_1_SQRT_2,
            sample_rate: 0.0,
            channels: Vec::new(),
            g: 0.0,
            k: 0.0,
            h: 0.0,
            dirty: true,
        }
    }

    /// Allocate per-channel state and reset it. Setup-time only.
    ///
    /// State is per channel, not per sample, so the block size sizes nothing
    /// and any range length can be processed.
    pub fn prepare(&mut self, sample_rate: f32, _max_block_size: usize, channels: usize) {
        debug_assert!(sample_rate > 0.0);
        self.sample_rate = sample_rate;
        self.channels = vec![ChannelState::default(); channels];
        self.dirty = true;
    }

    pub fn is_prepared(&self) -> bool {
        self.sample_rate > 0.0 && !self.channels.is_empty()
    }

    pub fn reset(&mut self) {
        self.channels.fill(ChannelState::default());
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if cutoff_hz != self.cutoff_hz {
            self.cutoff_hz = cutoff_hz;
            self.dirty = true;
        }
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        if resonance != self.resonance {
            self.resonance = resonance;
            self.dirty = true;
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Filter `range` of every channel in place.
    ///
    /// Does nothing if the filter has not been prepared. Channels beyond the
    /// prepared count are left untouched.
    pub fn process(&mut self, buffer: &mut AudioBuffer, range: Range<usize>) {
        if !self.is_prepared() {
            return;
        }

        if self.dirty {
            self.update_coefficients();
        }

        let (g, h) = (self.g, self.h);
        for (state, channel) in self.channels.iter_mut().zip(buffer.channels_mut()) {
            let Some(samples) = channel.get_mut(range.clone()) else {
                continue;
            };
            for sample in samples.iter_mut() {
                *sample = state.tick(*sample, g, h);
            }
        }
    }

    fn update_coefficients(&mut self) {
        let nyquist_safe = self.sample_rate * MAX_CUTOFF_RATIO;
        let cutoff = self.cutoff_hz.clamp(1.0, nyquist_safe);

        self.g = (PI * cutoff / self.sample_rate).tan();
        self.k = 1.0 / self.resonance.max(f32::EPSILON);
        self.h = 1.0 / (1.0 + self.g * (self.g + self.k));
        self.dirty = false;
    }
}

impl Default for SVFilter {
    fn default() -> Self {
        Self::lowpass(20_000.0)
    }
}

impl ChannelState {
    #[inline]
    fn tick(&mut self, sample: f32, g: f32, h: f32) -> f32 {
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::{Oscillator, Waveform};

    const SAMPLE_RATE: f32 = 48_000.0;

    fn prepared(cutoff: f32, resonance: f32, channels: usize, block: usize) -> SVFilter {
        let mut filter = SVFilter::lowpass(cutoff);
        filter.set_resonance(resonance);
        filter.prepare(SAMPLE_RATE, block, channels);
        filter
    }

    fn sine_buffer(frequency: f32, channels: usize, len: usize) -> AudioBuffer {
        let mut osc = Oscillator::new();
        osc.set_waveform(Waveform::Sine);
        osc.set_sample_rate(SAMPLE_RATE);
        osc.set_frequency(frequency);

        let mut buffer = AudioBuffer::new(channels, len);
        for i in 0..len {
            let s = osc.next_sample();
            for ch in 0..channels {
                buffer.add_sample(ch, i, s);
            }
        }
        buffer
    }

    fn peak_after_transient(samples: &[f32]) -> f32 {
        let skip = samples.len().min(256);
        samples[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut filter = prepared(500.0, 0.707, 1, 2048);
        let mut buffer = AudioBuffer::new(1, 2048);
        buffer.channel_mut(0).fill(1.0);

        filter.process(&mut buffer, 0..2048);

        assert!(buffer.channel(0)[2047] > 0.99);
    }

    #[test]
    fn lowpass_attenuates_high_frequencies() {
        let mut filter = prepared(500.0, 0.707, 1, 1024);
        let mut buffer = sine_buffer(5_000.0, 1, 1024);

        filter.process(&mut buffer, 0..1024);

        // ~12 dB/octave, more than three octaves above cutoff
        let peak = peak_after_transient(buffer.channel(0));
        assert!(peak < 0.05, "expected high freq attenuation, got peak: {peak}");
    }

    #[test]
    fn resonance_boosts_cutoff_region() {
        let cutoff = 1_000.0;

        let mut gentle = prepared(cutoff, 0.5, 1, 2048);
        let mut buffer = sine_buffer(cutoff, 1, 2048);
        gentle.process(&mut buffer, 0..2048);
        let peak_low_res = peak_after_transient(buffer.channel(0));

        let mut sharp = prepared(cutoff, 5.0, 1, 2048);
        let mut buffer = sine_buffer(cutoff, 1, 2048);
        sharp.process(&mut buffer, 0..2048);
        let peak_high_res = peak_after_transient(buffer.channel(0));

        assert!(
            peak_high_res > peak_low_res * 2.0,
            "high resonance should boost signal: high_res={peak_high_res}, low_res={peak_low_res}"
        );
    }

    #[test]
    fn channels_are_filtered_independently() {
        let mut filter = prepared(800.0, 0.707, 2, 256);
        let mut buffer = sine_buffer(440.0, 2, 256);
        // silence the right channel
        buffer.channel_mut(1).fill(0.0);

        filter.process(&mut buffer, 0..256);

        assert!(buffer.channel(0).iter().any(|s| s.abs() > 0.1));
        assert!(buffer.channel(1).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn only_the_requested_range_is_touched() {
        let mut filter = prepared(200.0, 0.707, 1, 64);
        let mut buffer = AudioBuffer::new(1, 128);
        buffer.channel_mut(0).fill(1.0);

        filter.process(&mut buffer, 32..96);

        assert!(buffer.channel(0)[..32].iter().all(|&s| s == 1.0));
        assert!(buffer.channel(0)[96..].iter().all(|&s| s == 1.0));
        assert!(buffer.channel(0)[32] < 0.1);
    }

    #[test]
    fn ranges_longer_than_the_prepared_block_are_filtered() {
        let mut split = prepared(300.0, 2.0, 1, 16);
        let mut whole = prepared(300.0, 2.0, 1, 16);
        let mut a = sine_buffer(700.0, 1, 96);
        let mut b = a.clone();

        for start in (0..96).step_by(16) {
            split.process(&mut a, start..start + 16);
        }
        whole.process(&mut b, 0..96);

        assert_eq!(a, b);
    }

    #[test]
    fn unprepared_filter_is_a_no_op() {
        let mut filter = SVFilter::lowpass(100.0);
        let mut buffer = AudioBuffer::new(1, 16);
        buffer.channel_mut(0).fill(0.5);

        filter.process(&mut buffer, 0..16);

        assert!(buffer.channel(0).iter().all(|&s| s == 0.5));
    }

    #[test]
    fn reset_clears_memory() {
        let mut filter = prepared(1_000.0, 0.707, 1, 64);
        let mut buffer = AudioBuffer::new(1, 64);
        buffer.channel_mut(0).fill(1.0);
        filter.process(&mut buffer, 0..64);

        filter.reset();
        let mut silent = AudioBuffer::new(1, 64);
        filter.process(&mut silent, 0..64);

        assert!(silent.channel(0).iter().all(|&s| s == 0.0));
    }
}
