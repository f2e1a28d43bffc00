// Purpose: Voice management, polyphony, note handling
// This layer sits above the DSP primitives and manages multiple voices

pub mod message;
pub mod poly;
pub mod voice;

pub use message::{MessageReceiver, NoteEvent, SynthMessage};
pub use poly::VoicePool;
pub use voice::Voice;
