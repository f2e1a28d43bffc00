use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

/// Map a decoded MIDI message onto the engine's note messages.
///
/// Notes on every channel are accepted. A note-on with velocity 0 is a
/// note-off, as MIDI allows.
pub fn midi_to_synth(midi: MidiEvent) -> Option<SynthMessage> {
    match midi {
        MidiEvent::NoteOn { key, velocity: 0, .. } => Some(SynthMessage::NoteOff {
            note: key,
            velocity: 0.0,
        }),
        MidiEvent::NoteOn { key, velocity, .. } => Some(SynthMessage::NoteOn {
            note: key,
            velocity: velocity_to_unit(velocity),
        }),
        MidiEvent::NoteOff { key, velocity, .. } => Some(SynthMessage::NoteOff {
            note: key,
            velocity: velocity_to_unit(velocity),
        }),
    }
}

/// 12-TET with A4 (MIDI 69) at 440 Hz.
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

#[inline]
pub fn velocity_to_unit(velocity: u8) -> f32 {
    velocity.min(127) as f32 / 127.0
}
