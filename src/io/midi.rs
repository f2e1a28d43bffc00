/// Note messages decoded from raw bytes. Other channel messages are not
/// decoded; the engine only plays notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
}

impl MidiEvent {
    /// Decode one MIDI message (status byte first, no running status).
    ///
    /// Returns `None` for anything but note on/off, for truncated input, and
    /// for data bytes with the high bit set.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status < 0x80 || data.iter().take(2).any(|&b| b > 0x7f) {
            return None;
        }

        let channel = status & 0x0f;
        match status & 0xf0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: *data.first()?,
                velocity: *data.get(1)?,
            }),
            0x90 => Some(MidiEvent::NoteOn {
                channel,
                key: *data.first()?,
                velocity: *data.get(1)?,
            }),
            _ => None,
        }
    }
}
