use rtrb::Producer;

use crate::{
    dsp::{AdsrParams, FilterKind, Waveform},
    engine::keyboard::KeyboardMessage,
    error::SynthError,
    synth::{message::ControlMessage, params::FilterSettings},
};

/// Control-thread side of a [`crate::Synth`].
///
/// Every call pushes onto a lock-free queue that the synth drains at the
/// start of its next block. Nothing here blocks; a full queue is reported as
/// [`SynthError::QueueFull`] and the message is dropped.
pub struct SynthHandle {
    controls: Producer<ControlMessage>,
    keys: Producer<KeyboardMessage>,
}

impl SynthHandle {
    pub(crate) fn new(controls: Producer<ControlMessage>, keys: Producer<KeyboardMessage>) -> Self {
        Self { controls, keys }
    }

    pub fn set_adsr(
        &mut self,
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    ) -> Result<(), SynthError> {
        let adsr = AdsrParams::new(attack, decay, sustain, release);
        self.send(ControlMessage::SetAdsr(adsr))
    }

    /// 0 = sine, 1 = square, 2 = saw, 3 = triangle; out-of-range indices clamp.
    pub fn set_waveform(&mut self, index: i32) -> Result<(), SynthError> {
        self.send(ControlMessage::SetWaveform(Waveform::from_index(index)))
    }

    /// Linear gain.
    pub fn set_gain(&mut self, gain: f32) -> Result<(), SynthError> {
        self.send(ControlMessage::SetGain(gain))
    }

    pub fn set_filter(
        &mut self,
        kind: FilterKind,
        cutoff_hz: f32,
        resonance: f32,
    ) -> Result<(), SynthError> {
        let settings = FilterSettings::new(kind, cutoff_hz, resonance);
        self.send(ControlMessage::SetFilter(settings))
    }

    /// A velocity of zero releases the key.
    pub fn key_down(&mut self, note: u8, velocity: f32) -> Result<(), SynthError> {
        self.press(KeyboardMessage::KeyDown { note, velocity })
    }

    pub fn key_up(&mut self, note: u8) -> Result<(), SynthError> {
        self.press(KeyboardMessage::KeyUp { note })
    }

    pub fn all_notes_off(&mut self) -> Result<(), SynthError> {
        self.press(KeyboardMessage::AllKeysUp)
    }

    pub fn send(&mut self, message: ControlMessage) -> Result<(), SynthError> {
        self.controls.push(message).map_err(|_| {
            tracing::warn!(?message, "control queue full, dropping message");
            SynthError::QueueFull
        })
    }

    fn press(&mut self, message: KeyboardMessage) -> Result<(), SynthError> {
        self.keys.push(message).map_err(|_| {
            tracing::warn!(?message, "keyboard queue full, dropping key");
            SynthError::QueueFull
        })
    }
}
