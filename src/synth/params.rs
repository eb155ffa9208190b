//! Control parameters shared by every voice.
//!
//! The pool owns one [`SynthParams`] snapshot. Setters update the snapshot;
//! each voice copies it at the start of every rendered block, so a change
//! reaches sounding notes and idle voices alike within one block.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::clamp_or;
pub use crate::dsp::{AdsrParams, FilterKind, FilterSettings, Waveform};

/// Upper bound for the linear output gain (about +6 dB).
pub const MAX_GAIN: f32 = 2.0;

/// Clamp a linear gain into `[0, MAX_GAIN]`; NaN becomes silence.
pub fn clamp_gain(gain: f32) -> f32 {
    clamp_or(gain, 0.0, MAX_GAIN, 0.0)
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    pub adsr: AdsrParams,
    pub waveform: Waveform,
    /// Linear amplitude multiplier applied after the envelope.
    pub gain: f32,
    pub filter: FilterSettings,
}

impl SynthParams {
    pub fn clamped(self) -> Self {
        Self {
            adsr: self.adsr.clamped(),
            waveform: self.waveform,
            gain: clamp_gain(self.gain),
            filter: self.filter.clamped(),
        }
    }
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            adsr: AdsrParams::default(),
            waveform: Waveform::Sine,
            gain: 0.5,
            filter: FilterSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_is_clamped() {
        assert_eq!(clamp_gain(-1.0), 0.0);
        assert_eq!(clamp_gain(0.25), 0.25);
        assert_eq!(clamp_gain(100.0), MAX_GAIN);
        assert_eq!(clamp_gain(f32::NAN), 0.0);
    }

    #[test]
    fn clamped_sanitizes_every_field() {
        let params = SynthParams {
            adsr: AdsrParams {
                attack: -1.0,
                decay: 0.1,
                sustain: 4.0,
                release: 0.2,
            },
            waveform: Waveform::Saw,
            gain: 9.0,
            filter: FilterSettings {
                kind: FilterKind::HighPass,
                cutoff_hz: 0.0,
                resonance: -3.0,
            },
        }
        .clamped();

        assert_eq!(params.adsr.attack, 0.0);
        assert_eq!(params.adsr.sustain, 1.0);
        assert_eq!(params.gain, MAX_GAIN);
        assert!(params.filter.cutoff_hz > 0.0);
        assert_eq!(params.filter.resonance, 0.0);
        assert_eq!(params.waveform, Waveform::Saw);
    }
}
