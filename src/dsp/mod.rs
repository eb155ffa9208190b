//! Low-level DSP primitives used by every voice.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They stay focused on the
//! signal-processing math; note lifecycle and mixing live in `synth`.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// State-variable filter with low, band and high-pass responses.
pub mod filter;
/// Phase-accumulator oscillator with four waveforms.
pub mod oscillator;

pub use envelope::{AdsrParams, Envelope, EnvelopeState, Retrigger};
pub use filter::{FilterKind, FilterSettings, SVFilter};
pub use oscillator::{Oscillator, Waveform};

/// Clamp `value` into `[min, max]`, substituting `fallback` for NaN.
#[inline]
pub(crate) fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
