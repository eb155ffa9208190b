use thiserror::Error;

/// Errors raised while building the synth or feeding it from the control side.
///
/// Nothing on the render path returns an error; out-of-range values there are
/// clamped instead.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SynthError {
    #[error("voice pool needs at least one voice")]
    NoVoices,

    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    #[error("channel count must be at least one")]
    NoChannels,

    #[error("message queue is full")]
    QueueFull,
}
