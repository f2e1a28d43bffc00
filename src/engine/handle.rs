use std::sync::Arc;

use rtrb::Producer;

use crate::{
    error::Error,
    io::{converter::midi_to_synth, midi::MidiEvent},
    params::SharedParams,
    synth::{NoteEvent, SynthMessage},
};

/// Control-thread side of the engine: sends notes, owns nothing realtime.
pub struct EngineHandle {
    tx: Producer<NoteEvent>,
    params: Arc<SharedParams>,
}

impl EngineHandle {
    pub(super) fn new(tx: Producer<NoteEvent>, params: Arc<SharedParams>) -> Self {
        Self { tx, params }
    }

    pub fn note_on(&mut self, note: u8, velocity: f32) -> Result<(), Error> {
        self.send(NoteEvent::note_on(note.min(127), velocity.clamp(0.0, 1.0)))
    }

    pub fn note_off(&mut self, note: u8, velocity: f32) -> Result<(), Error> {
        self.send(NoteEvent::note_off(note.min(127), velocity.clamp(0.0, 1.0)))
    }

    pub fn all_notes_off(&mut self) -> Result<(), Error> {
        self.send(NoteEvent::new(0, SynthMessage::AllNotesOff))
    }

    /// Queue a raw MIDI message. Anything other than note on/off is ignored.
    pub fn send_midi(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let message = MidiEvent::from_bytes(bytes).and_then(midi_to_synth);
        match message {
            Some(message) => self.send(NoteEvent::new(0, message)),
            None => Ok(()),
        }
    }

    pub fn send(&mut self, event: NoteEvent) -> Result<(), Error> {
        if let Err(rtrb::PushError::Full(event)) = self.tx.push(event) {
            tracing::warn!(?event, "note event queue full");
            return Err(Error::QueueFull(event.message));
        }
        Ok(())
    }

    pub fn params(&self) -> &Arc<SharedParams> {
        &self.params
    }
}
