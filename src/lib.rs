pub mod config;
pub mod dsp;
#[cfg(feature = "rtrb")]
pub mod engine; // Host-facing processor, control handle, on-screen keyboard
pub mod error;
pub mod io;
pub mod synth; // Voice management and polyphony

pub use config::SynthConfig;
#[cfg(feature = "rtrb")]
pub use engine::{Synth, SynthHandle};
pub use error::SynthError;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
