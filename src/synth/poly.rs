use crate::{
    dsp::envelope::EnvelopeStage,
    io::AudioBuffer,
    params::TimbreParams,
    synth::{
        message::{NoteEvent, SynthMessage},
        voice::Voice,
    },
};

/*
Voice Allocation
================

The pool owns a fixed number of voices, created once. A note-on picks a
voice in this order:

  1. RETRIGGER  a voice already holding the same note number is reused, so
                a note never sounds twice.
  2. FREE       the first voice with no note assigned.
  3. STEAL      every voice is busy. Choose the quietest one to cut:

                  - releasing voices first, lowest envelope level wins
                  - otherwise any voice, lowest envelope level wins
                  - equal levels: the oldest note-on loses its voice

                The stolen voice is cleared and restarted on the new note
                immediately (no crossfade).

Every block the pool:

  - pushes the shared parameter snapshot into every voice
  - applies queued note events (all at the start of the block)
  - lets every voice add its filtered output into the destination buffer
  - scales the finished buffer by the master volume
*/

pub struct VoicePool {
    voices: Vec<Voice>,
    max_block_size: usize,
    note_counter: u64,
}

impl VoicePool {
    pub fn new(polyphony: usize) -> Self {
        let voices = (0..polyphony.max(1)).map(|_| Voice::new()).collect();

        Self {
            voices,
            max_block_size: 0,
            note_counter: 0,
        }
    }

    /// Prepare every voice for the stream. Allocates; call before rendering.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize, channels: usize) {
        for voice in &mut self.voices {
            voice.prepare_to_play(sample_rate, max_block_size, channels);
        }
        self.max_block_size = max_block_size;

        tracing::debug!(
            voices = self.voices.len(),
            sample_rate,
            max_block_size,
            channels,
            "voice pool prepared"
        );
    }

    /// Render one block: parameters, then events, then voices, then gain.
    ///
    /// `out` must already hold silence (or whatever the caller wants mixed
    /// under the synth); voices only ever add into it.
    pub fn render_block<I>(&mut self, params: &TimbreParams, events: I, out: &mut AudioBuffer)
    where
        I: IntoIterator<Item = NoteEvent>,
    {
        self.apply_params(params);

        for event in events {
            self.handle(event.message);
        }

        if self.max_block_size > 0 {
            let total = out.num_samples();
            let mut start = 0;
            while start < total {
                let len = (total - start).min(self.max_block_size);
                for voice in &mut self.voices {
                    voice.render_block(out, start, len);
                }
                start += len;
            }
        }

        out.apply_gain(params.master_volume);
    }

    pub fn apply_params(&mut self, params: &TimbreParams) {
        for voice in &mut self.voices {
            voice.apply(params);
        }
    }

    pub fn handle(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
            SynthMessage::NoteOff { note, velocity } => self.note_off(note, velocity, true),
            SynthMessage::AllNotesOff => self.all_notes_off(true),
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: f32) {
        let timestamp = self.note_counter;
        self.note_counter += 1;

        if let Some(idx) = self.find_voice(note) {
            self.voices[idx].start_note(note, velocity, timestamp);
            return;
        }

        let idx = match self.voices.iter().position(|v| !v.is_active()) {
            Some(idx) => idx,
            None => {
                let idx = self.steal_candidate();
                self.voices[idx].clear_note();
                idx
            }
        };
        self.voices[idx].start_note(note, velocity, timestamp);
    }

    pub fn note_off(&mut self, note: u8, velocity: f32, allow_tail_off: bool) {
        if let Some(idx) = self.find_voice(note) {
            self.voices[idx].stop_note(velocity, allow_tail_off);
        }
    }

    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.stop_note(0.0, allow_tail_off);
        }
    }

    /// Number of voices with a note assigned.
    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn polyphony(&self) -> usize {
        self.voices.len()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    fn find_voice(&self, note: u8) -> Option<usize> {
        self.voices.iter().position(|v| v.note() == Some(note))
    }

    fn steal_candidate(&self) -> usize {
        let quietest = |releasing_only: bool| {
            self.voices
                .iter()
                .enumerate()
                .filter(|(_, v)| !releasing_only || v.envelope_stage() == EnvelopeStage::Release)
                .min_by(|(_, a), (_, b)| {
                    a.envelope_level()
                        .total_cmp(&b.envelope_level())
                        .then(a.started_at().cmp(&b.started_at()))
                })
                .map(|(idx, _)| idx)
        };

        quietest(true).or_else(|| quietest(false)).unwrap_or(0)
    }
}
