use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase Accumulator Oscillator
============================

Every periodic waveform here is a function of a single number: the PHASE,
which tracks how far through the current cycle we are.

Vocabulary
----------

  phase       Position inside one cycle, always in [0.0, 1.0). 0.0 is the
              start of the period, 0.5 is halfway through.

  increment   How far the phase moves per sample:

                  increment = frequency / sample_rate

              At 440 Hz and 44.1 kHz that is ~0.00998, so one cycle takes
              ~100.2 samples.

  wrap        When phase reaches 1.0 we subtract 1.0 to start the next cycle.


The Loop
--------

    sample = shape(phase)
    phase += increment
    if phase >= 1.0 { phase -= 1.0 }

Wrapping by subtraction (instead of `%`) is only correct while the increment
stays below 1.0, i.e. frequency < sample_rate. Above that the phase would need
to wrap more than once per sample. Callers keep frequencies well inside the
audible range, so this is a precondition rather than a runtime check.


The Shapes
----------

  Sine     sin(2π · phase)

           1 ┤  ╭─╮
           0 ┼─╯───╰─╮───
          -1 ┤       ╰─╯

  Saw      2 · phase - 1   (rises from -1 to just below +1, then drops)

           1 ┤   ╱│  ╱│
           0 ┼──╱─┼─╱─┼──
          -1 ┤ ╱  │╱  │

  Square   +1 while phase < 0.5, -1 otherwise (50% duty cycle)

           1 ┤──┐  ┌──┐
          -1 ┤  └──┘  └──


Aliasing
--------

These are NAIVE shapes: the saw and square jump instantaneously, which
contains energy above Nyquist that folds back as aliasing. Band-limited
variants (PolyBLEP, wavetables) fix that at extra cost. This engine accepts
the aliasing; the per-voice lowpass tames most of it in practice.
*/

/// Waveform shapes the oscillator can produce.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    #[default]
    Saw,
    Square,
}

impl Waveform {
    /// Map a parameter index to a waveform.
    ///
    /// 0 = sine, 1 = saw, 2 = square. Unknown indices fall back to saw.
    pub fn from_index(index: i32) -> Self {
        match index {
            0 => Waveform::Sine,
            1 => Waveform::Saw,
            2 => Waveform::Square,
            _ => Waveform::Saw,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Waveform::Sine => 0,
            Waveform::Saw => 1,
            Waveform::Square => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    frequency: f32,
    sample_rate: f32,
    phase: f32,
    increment: f32,
}

impl Oscillator {
    pub fn new() -> Self {
        let mut osc = Self {
            waveform: Waveform::default(),
            frequency: 440.0,
            sample_rate: 44_100.0,
            phase: 0.0,
            increment: 0.0,
        };
        osc.update_increment();
        osc
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Set the oscillator pitch. Must be > 0 and below the sample rate.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.update_increment();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    /// Restart the cycle from phase 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Produce the sample at the current phase, then advance.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let sample = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            Waveform::Saw => 2.0 * self.phase - 1.0,
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };

        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }

    /// Fill `out` with consecutive samples.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    fn update_increment(&mut self) {
        debug_assert!(self.sample_rate > 0.0, "sample rate must be positive");
        debug_assert!(
            self.frequency > 0.0 && self.frequency < self.sample_rate,
            "frequency must lie in (0, sample_rate)"
        );
        self.increment = self.frequency / self.sample_rate;
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn osc(waveform: Waveform, frequency: f32, sample_rate: f32) -> Oscillator {
        let mut osc = Oscillator::new();
        osc.set_waveform(waveform);
        osc.set_sample_rate(sample_rate);
        osc.set_frequency(frequency);
        osc
    }

    /// Average distance between rising wraps of a saw, in samples.
    fn measured_period(frequency: f32, sample_rate: f32, samples: usize) -> f32 {
        let mut osc = osc(Waveform::Saw, frequency, sample_rate);
        let mut prev = osc.next_sample();
        let mut wraps = Vec::new();
        for i in 1..samples {
            let s = osc.next_sample();
            if s < prev {
                wraps.push(i);
            }
            prev = s;
        }
        let first = wraps[0];
        let last = *wraps.last().unwrap();
        (last - first) as f32 / (wraps.len() - 1) as f32
    }

    #[test]
    fn period_matches_frequency() {
        for &(frequency, sample_rate) in &[
            (440.0, 44_100.0),
            (100.0, 48_000.0),
            (1_000.0, 96_000.0),
            (5_000.0, 44_100.0),
        ] {
            let period = measured_period(frequency, sample_rate, 20_000);
            let expected = sample_rate / frequency;
            assert!(
                (period - expected).abs() <= 1.0,
                "f={frequency} sr={sample_rate}: expected {expected}, got {period}"
            );
        }
    }

    #[test]
    fn sine_matches_phase() {
        let mut osc = osc(Waveform::Sine, 440.0, 48_000.0);
        for _ in 0..64 {
            let phase = osc.phase();
            let sample = osc.next_sample();
            assert_eq!(sample, (TAU * phase).sin());
        }
    }

    #[test]
    fn saw_rises_across_one_period() {
        // increment of exactly 1/128
        let mut osc = osc(Waveform::Saw, 375.0, 48_000.0);
        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer);

        assert_eq!(buffer[0], -1.0);
        assert!(buffer.windows(2).all(|w| w[1] > w[0]));
        assert!(buffer[127] < 1.0);
        assert_eq!(osc.next_sample(), -1.0, "saw should wrap after a period");
    }

    #[test]
    fn square_is_high_then_low() {
        let mut osc = osc(Waveform::Square, 375.0, 48_000.0);
        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer);

        assert!(buffer[..64].iter().all(|&s| s == 1.0));
        assert!(buffer[64..].iter().all(|&s| s == -1.0));
    }

    #[test]
    fn reset_restarts_cycle() {
        let mut osc = osc(Waveform::Sine, 440.0, 44_100.0);
        for _ in 0..37 {
            osc.next_sample();
        }
        osc.reset();
        assert_eq!(osc.phase(), 0.0);
        assert_eq!(osc.next_sample(), 0.0);
    }

    #[test]
    fn unknown_index_falls_back_to_saw() {
        assert_eq!(Waveform::from_index(0), Waveform::Sine);
        assert_eq!(Waveform::from_index(2), Waveform::Square);
        assert_eq!(Waveform::from_index(7), Waveform::Saw);
        assert_eq!(Waveform::from_index(-1), Waveform::Saw);
    }
}
