/*
ADSR Envelope Implementation
============================

This module implements a linear ADSR envelope generator - the gain contour
every voice multiplies its oscillator by.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0). This multiplies
              the audio signal to control its amplitude over time.

  stage       Which phase of the envelope we're in: Idle, Attack, Decay,
              Sustain, or Release. A state machine governs transitions.

  gate        The note on/off signal. Gate high (note_on) triggers Attack.
              Gate low (note_off) triggers Release from wherever we are.

  step        How much `level` changes per sample. Derived from the stage
              duration and sample rate, cached until either changes.


The Shape: Linear Ramps
-----------------------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release
         (A)   (D)      (S)      (R)


The Math: Time to Step
----------------------

    step = distance / (time_seconds * sample_rate)

  Attack   distance 1.0            (0 → 1 over attack seconds)
  Decay    distance 1.0 - sustain  (1 → S over decay seconds)
  Release  distance = level at note_off, spread over round(release * sr)
           samples so the ramp lands on exactly 0.0

A stage of zero seconds gets an infinite step and completes on the very
sample it starts.


The State Machine
-----------------

    ┌──────┐  note_on   ┌────────┐  level=1   ┌───────┐  level=S  ┌─────────┐
    │ Idle │ ─────────→ │ Attack │ ─────────→ │ Decay │ ────────→ │ Sustain │
    └──────┘            └────────┘            └───────┘           └─────────┘
        ↑                    │ note_off           │ note_off           │ note_off
        │                    ↓                    ↓                    ↓
        │  level=0      ┌─────────────────────────────────────────────────┐
        └────────────── │                    Release                      │
                        └─────────────────────────────────────────────────┘
                              │ note_on
                              └──────────→ Attack (from the current level)

Key behaviors:

  - note_off triggers Release from ANY active stage, starting at the CURRENT
    level. This prevents clicks when releasing during attack.
  - note_on does NOT reset the level. A note retriggered while releasing
    ramps up from wherever it is (legato retrigger), again avoiding a click.
  - Attack skips Decay entirely when there is nothing to decay
    (sustain = 1.0 or decay = 0).
*/

use crate::MIN_TIME;

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,    // Gate low, envelope inactive, level = 0
    Attack,  // Gate high, ramping up to 1.0
    Decay,   // Reached peak, ramping down to sustain level
    Sustain, // Holding at sustain level while gate is high
    Release, // Gate went low, ramping down to 0
}

#[derive(Debug, Clone)]
pub struct Envelope {
    // ADSR parameters
    attack_time: f32,   // seconds to ramp 0 → 1
    decay_time: f32,    // seconds to ramp 1 → sustain
    sustain_level: f32, // level to hold (0.0 - 1.0)
    release_time: f32,  // seconds to ramp current → 0
    sample_rate: f32,

    // Cached per-sample steps, refreshed by set_parameters / set_sample_rate
    attack_step: f32,
    decay_step: f32,

    // Runtime state
    stage: EnvelopeStage,
    level: f32,

    // Release bookkeeping (snapshotted at note_off)
    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    pub fn new() -> Self {
        Self::adsr(0.1, 0.1, 1.0, 0.1)
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let mut env = Self {
            attack_time: 0.0,
            decay_time: 0.0,
            sustain_level: 1.0,
            release_time: 0.0,
            sample_rate: 44_100.0,

            attack_step: 0.0,
            decay_step: 0.0,

            stage: EnvelopeStage::Idle,
            level: 0.0,

            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        };
        env.set_parameters(attack, decay, sustain, release);
        env
    }

    /// Change the stage durations and sustain level.
    ///
    /// Only future step computations are affected; the current level is left
    /// alone and a release already in progress keeps its ramp.
    pub fn set_parameters(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack_time = attack.max(0.0);
        self.decay_time = decay.max(0.0);
        self.sustain_level = sustain.clamp(0.0, 1.0);
        self.release_time = release.max(0.0);
        self.recalculate_steps();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        debug_assert!(sample_rate > 0.0);
        self.sample_rate = sample_rate;
        self.recalculate_steps();
    }

    /// Gate high: enter Attack from the current level.
    pub fn note_on(&mut self) {
        self.stage = EnvelopeStage::Attack;
        self.release_elapsed_samples = 0;
    }

    /// Gate low: start the release phase from the current level.
    pub fn note_off(&mut self) {
        if self.stage == EnvelopeStage::Idle {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples = if self.release_time < MIN_TIME {
            1
        } else {
            (self.release_time * self.sample_rate).round().max(1.0) as u32
        };
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeStage::Release;
    }

    /// Advance the envelope by one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => {
                self.level += self.attack_step;

                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = if self.has_decay() {
                        EnvelopeStage::Decay
                    } else {
                        EnvelopeStage::Sustain
                    };
                }
            }

            EnvelopeStage::Decay => {
                self.level -= self.decay_step;

                if self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeStage::Release => {
                // level = start * (1 - elapsed/total), landing on 0 exactly
                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                } else {
                    let progress = self.release_elapsed_samples as f32
                        / self.release_total_samples as f32;
                    self.level = (self.release_start_level * (1.0 - progress)).max(0.0);
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// Reset to idle state.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.release_start_level = 0.0;
        self.release_elapsed_samples = 0;
    }

    /// Get the current envelope level (0.0 to 1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn sustain_level(&self) -> f32 {
        self.sustain_level
    }

    fn has_decay(&self) -> bool {
        self.sustain_level < 1.0 && self.decay_time >= MIN_TIME
    }

    fn recalculate_steps(&mut self) {
        self.attack_step = step(1.0, self.attack_time, self.sample_rate);
        self.decay_step = step(1.0 - self.sustain_level, self.decay_time, self.sample_rate);
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn step(distance: f32, seconds: f32, sample_rate: f32) -> f32 {
    if seconds < MIN_TIME {
        f32::INFINITY
    } else {
        distance / (seconds * sample_rate)
    }
}
