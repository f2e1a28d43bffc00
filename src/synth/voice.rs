use crate::{
    dsp::{
        envelope::{Envelope, EnvelopeStage},
        filter::SVFilter,
        oscillator::{Oscillator, Waveform},
    },
    io::{converter::midi_note_to_freq, AudioBuffer},
    params::TimbreParams,
};

/// One note's worth of signal path: oscillator → envelope → lowpass.
///
/// Voices are built once and reused in place for every note they play.
/// Each voice renders into its own scratch buffer and filters it before the
/// result is added to the shared output, so one voice's filter never sees
/// another voice's signal.
pub struct Voice {
    oscillator: Oscillator,
    envelope: Envelope,
    filter: SVFilter,
    scratch: AudioBuffer,
    sample_rate: f32,

    note: Option<u8>,
    velocity: f32,
    started_at: u64,
    prepared: bool,
}

impl Voice {
    pub fn new() -> Self {
        Self {
            oscillator: Oscillator::new(),
            envelope: Envelope::new(),
            filter: SVFilter::default(),
            scratch: AudioBuffer::default(),
            sample_rate: 44_100.0,
            note: None,
            velocity: 0.0,
            started_at: 0,
            prepared: false,
        }
    }

    /// Size internal state for the stream. Allocates; never call while rendering.
    pub fn prepare_to_play(&mut self, sample_rate: f32, max_block_size: usize, channels: usize) {
        self.sample_rate = sample_rate;
        self.oscillator.set_sample_rate(sample_rate);
        self.envelope.set_sample_rate(sample_rate);

        self.filter.prepare(sample_rate, max_block_size, channels);
        self.filter.reset();

        self.scratch = AudioBuffer::new(channels, max_block_size);
        self.prepared = true;
    }

    /// Begin playing `note`. `started_at` orders voices for stealing.
    ///
    /// Velocity is stored but does not yet scale amplitude or timbre.
    /// Pitches above Nyquist are held at Nyquist so the phase wraps at most
    /// once per sample.
    pub fn start_note(&mut self, note: u8, velocity: f32, started_at: u64) {
        let frequency = midi_note_to_freq(note).min(self.sample_rate * 0.5);
        self.oscillator.set_frequency(frequency);
        self.oscillator.reset();
        self.envelope.note_on();

        self.note = Some(note);
        self.velocity = velocity;
        self.started_at = started_at;
    }

    /// Release the note. Without tail-off the voice is freed immediately.
    pub fn stop_note(&mut self, _velocity: f32, allow_tail_off: bool) {
        self.envelope.note_off();

        if !allow_tail_off || !self.envelope.is_active() {
            self.clear_note();
        }
    }

    /// Free the voice, dropping whatever it was playing.
    pub fn clear_note(&mut self) {
        self.note = None;
        self.velocity = 0.0;
        self.envelope.reset();
    }

    /// Add `num_samples` frames of this voice into `out`, starting at `start`.
    pub fn render_block(&mut self, out: &mut AudioBuffer, start: usize, num_samples: usize) {
        if !self.prepared || self.note.is_none() {
            return;
        }

        let num_samples = num_samples
            .min(self.scratch.num_samples())
            .min(out.num_samples().saturating_sub(start));
        if num_samples == 0 {
            return;
        }

        self.scratch.clear_range(0, num_samples);
        let channels = self.scratch.num_channels();

        for i in 0..num_samples {
            let sample = self.oscillator.next_sample() * self.envelope.next_sample();
            for ch in 0..channels {
                self.scratch.add_sample(ch, i, sample);
            }

            if !self.envelope.is_active() {
                self.clear_note();
                break;
            }
        }

        // The whole range is filtered even after an early stop, so the
        // filter's own ring-down lands in the zeros after the last note sample.
        self.filter.process(&mut self.scratch, 0..num_samples);
        out.add_from(&self.scratch, start, num_samples);
    }

    pub fn update_oscillator(&mut self, waveform_index: i32) {
        self.oscillator.set_waveform(Waveform::from_index(waveform_index));
    }

    pub fn update_filter(&mut self, cutoff: f32, resonance: f32) {
        self.filter.set_cutoff(cutoff);
        self.filter.set_resonance(resonance);
    }

    pub fn update_adsr(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.envelope.set_parameters(attack, decay, sustain, release);
    }

    /// Push a whole parameter snapshot into the voice.
    pub fn apply(&mut self, params: &TimbreParams) {
        self.oscillator.set_waveform(params.waveform);
        self.update_filter(params.filter_cutoff_hz, params.filter_resonance);
        self.update_adsr(params.attack, params.decay, params.sustain, params.release);
    }

    /// True while a note is assigned (including its release tail).
    pub fn is_active(&self) -> bool {
        self.note.is_some()
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn note(&self) -> Option<u8> {
        self.note
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    pub fn envelope_stage(&self) -> EnvelopeStage {
        self.envelope.stage()
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn waveform(&self) -> Waveform {
        self.oscillator.waveform()
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}
