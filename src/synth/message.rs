#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// A note message. Velocities are normalised to 0.0..=1.0.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: f32 },
    NoteOff { note: u8, velocity: f32 },
    AllNotesOff,
}

/// A message tagged with its frame offset inside the block it arrived for.
///
/// The voice pool applies every event at the start of the block, so the
/// offset is carried for hosts that want it but does not move the note.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NoteEvent {
    pub offset: usize,
    pub message: SynthMessage,
}

impl NoteEvent {
    pub fn new(offset: usize, message: SynthMessage) -> Self {
        Self { offset, message }
    }

    pub fn note_on(note: u8, velocity: f32) -> Self {
        Self::new(0, SynthMessage::NoteOn { note, velocity })
    }

    pub fn note_off(note: u8, velocity: f32) -> Self {
        Self::new(0, SynthMessage::NoteOff { note, velocity })
    }
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<NoteEvent>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<NoteEvent> {
    fn pop(&mut self) -> Option<NoteEvent> {
        Consumer::pop(self).ok()
    }
}
