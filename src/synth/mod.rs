// Voice management and polyphony.
// A voice is one note's signal chain; the pool owns a fixed set of them and
// routes note events with sample-accurate timing.

pub mod message;
pub mod params;
pub mod pool;
pub mod voice;

pub use message::{ControlMessage, MessageReceiver, Note, NoteEvent, SynthMessage};
pub use params::SynthParams;
pub use pool::VoicePool;
pub use voice::{Voice, VoiceState};
