#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::Retrigger, error::SynthError, synth::SynthParams, MAX_BLOCK_SIZE};

/// Construction-time settings for [`crate::Synth`] and [`crate::synth::VoicePool`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    pub sample_rate: f32,
    pub voices: usize,
    pub channels: usize,
    /// Largest block the host will ask for. Sizes scratch space only.
    pub max_block_size: usize,
    pub retrigger: Retrigger,
    pub control_queue_size: usize,
    pub keyboard_queue_size: usize,
    pub params: SynthParams,
}

impl SynthConfig {
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.voices == 0 {
            return Err(SynthError::NoVoices);
        }
        if !is_valid_sample_rate(self.sample_rate) {
            return Err(SynthError::InvalidSampleRate(self.sample_rate));
        }
        if self.channels == 0 {
            return Err(SynthError::NoChannels);
        }
        Ok(())
    }

    pub fn with_voices(mut self, voices: usize) -> Self {
        self.voices = voices;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_params(mut self, params: SynthParams) -> Self {
        self.params = params;
        self
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            voices: 8,
            channels: 2,
            max_block_size: MAX_BLOCK_SIZE,
            retrigger: Retrigger::FromCurrent,
            control_queue_size: 64,
            keyboard_queue_size: 64,
            params: SynthParams::default(),
        }
    }
}

pub(crate) fn is_valid_sample_rate(sample_rate: f32) -> bool {
    sample_rate.is_finite() && sample_rate > 0.0
}
