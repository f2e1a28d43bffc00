// Purpose - external interfaces, format conversions

mod buffer;
pub mod converter;
pub mod midi;

pub use buffer::AudioBuffer;
