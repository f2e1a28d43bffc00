//! Timbre parameters shared by every voice.
//!
//! [`TimbreParams`] is the plain snapshot the audio thread works with.
//! [`SharedParams`] is the lock-free store a control thread writes into; the
//! audio thread reads it once per block with one relaxed atomic load per
//! field. A block may see one field of an update before another, but never a
//! half-written float.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU8, Ordering};

use atomic_float::AtomicF32;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::Waveform;

pub const CUTOFF_RANGE: RangeInclusive<f32> = 20.0..=20_000.0;
pub const RESONANCE_RANGE: RangeInclusive<f32> = 0.1..=10.0;
pub const ATTACK_RANGE: RangeInclusive<f32> = 0.001..=2.0;
pub const DECAY_RANGE: RangeInclusive<f32> = 0.001..=2.0;
pub const SUSTAIN_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const RELEASE_RANGE: RangeInclusive<f32> = 0.001..=5.0;
pub const VOLUME_RANGE: RangeInclusive<f32> = 0.0..=1.0;

#[inline]
fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    }
}

/// One consistent set of timbre settings.
///
/// The engine assumes values are inside the documented ranges; use
/// [`TimbreParams::clamped`] or the [`SharedParams`] setters to get there.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimbreParams {
    pub waveform: Waveform,
    /// Lowpass cutoff, 20 Hz to 20 kHz.
    pub filter_cutoff_hz: f32,
    /// Lowpass Q, 0.1 to 10.
    pub filter_resonance: f32,
    /// Seconds, 0.001 to 2.
    pub attack: f32,
    /// Seconds, 0.001 to 2.
    pub decay: f32,
    /// Level, 0 to 1.
    pub sustain: f32,
    /// Seconds, 0.001 to 5.
    pub release: f32,
    /// Linear gain applied to the final mix, 0 to 1.
    pub master_volume: f32,
}

impl Default for TimbreParams {
    fn default() -> Self {
        Self {
            waveform: Waveform::Saw,
            filter_cutoff_hz: 20_000.0,
            filter_resonance: 0.707,
            attack: 0.1,
            decay: 0.1,
            sustain: 1.0,
            release: 0.3,
            master_volume: 0.5,
        }
    }
}

impl TimbreParams {
    /// Copy with every field forced into its documented range.
    pub fn clamped(&self) -> Self {
        Self {
            waveform: self.waveform,
            filter_cutoff_hz: clamp_to(self.filter_cutoff_hz, &CUTOFF_RANGE),
            filter_resonance: clamp_to(self.filter_resonance, &RESONANCE_RANGE),
            attack: clamp_to(self.attack, &ATTACK_RANGE),
            decay: clamp_to(self.decay, &DECAY_RANGE),
            sustain: clamp_to(self.sustain, &SUSTAIN_RANGE),
            release: clamp_to(self.release, &RELEASE_RANGE),
            master_volume: clamp_to(self.master_volume, &VOLUME_RANGE),
        }
    }
}

/// Lock-free parameter store, written by the control thread.
#[derive(Debug)]
pub struct SharedParams {
    waveform: AtomicU8,
    filter_cutoff_hz: AtomicF32,
    filter_resonance: AtomicF32,
    attack: AtomicF32,
    decay: AtomicF32,
    sustain: AtomicF32,
    release: AtomicF32,
    master_volume: AtomicF32,
}

impl SharedParams {
    pub fn new(initial: TimbreParams) -> Self {
        let p = initial.clamped();
        Self {
            waveform: AtomicU8::new(p.waveform.index() as u8),
            filter_cutoff_hz: AtomicF32::new(p.filter_cutoff_hz),
            filter_resonance: AtomicF32::new(p.filter_resonance),
            attack: AtomicF32::new(p.attack),
            decay: AtomicF32::new(p.decay),
            sustain: AtomicF32::new(p.sustain),
            release: AtomicF32::new(p.release),
            master_volume: AtomicF32::new(p.master_volume),
        }
    }

    /// Read every field once. Realtime-safe.
    #[inline]
    pub fn snapshot(&self) -> TimbreParams {
        TimbreParams {
            waveform: Waveform::from_index(self.waveform.load(Ordering::Relaxed) as i32),
            filter_cutoff_hz: self.filter_cutoff_hz.load(Ordering::Relaxed),
            filter_resonance: self.filter_resonance.load(Ordering::Relaxed),
            attack: self.attack.load(Ordering::Relaxed),
            decay: self.decay.load(Ordering::Relaxed),
            sustain: self.sustain.load(Ordering::Relaxed),
            release: self.release.load(Ordering::Relaxed),
            master_volume: self.master_volume.load(Ordering::Relaxed),
        }
    }

    /// Overwrite every field, clamped. Readers may observe the update
    /// field by field.
    pub fn store(&self, params: TimbreParams) {
        let p = params.clamped();
        self.set_waveform(p.waveform);
        self.set_filter_cutoff(p.filter_cutoff_hz);
        self.set_filter_resonance(p.filter_resonance);
        self.set_adsr(p.attack, p.decay, p.sustain, p.release);
        self.set_master_volume(p.master_volume);
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.waveform.store(waveform.index() as u8, Ordering::Relaxed);
    }

    pub fn set_filter_cutoff(&self, hz: f32) {
        self.filter_cutoff_hz
            .store(clamp_to(hz, &CUTOFF_RANGE), Ordering::Relaxed);
    }

    pub fn set_filter_resonance(&self, q: f32) {
        self.filter_resonance
            .store(clamp_to(q, &RESONANCE_RANGE), Ordering::Relaxed);
    }

    pub fn set_adsr(&self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack.store(clamp_to(attack, &ATTACK_RANGE), Ordering::Relaxed);
        self.decay.store(clamp_to(decay, &DECAY_RANGE), Ordering::Relaxed);
        self.sustain.store(clamp_to(sustain, &SUSTAIN_RANGE), Ordering::Relaxed);
        self.release.store(clamp_to(release, &RELEASE_RANGE), Ordering::Relaxed);
    }

    pub fn set_master_volume(&self, volume: f32) {
        self.master_volume
            .store(clamp_to(volume, &VOLUME_RANGE), Ordering::Relaxed);
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new(TimbreParams::default())
    }
}
