#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::clamp_or, MIN_TIME};

/*
ADSR Envelope Implementation
============================

A linear ADSR envelope generator. One instance lives inside every voice and
multiplies the oscillator output to shape its amplitude over time.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0).

  stage       Which phase of the envelope we're in: Idle, Attack, Decay,
              Sustain, or Release.

  gate        The note on/off signal. Gate high (note_on) triggers Attack.
              Gate low (note_off) triggers Release from wherever we are.

  step        How much `level` changes per sample, derived from the stage
              duration and the sample rate.


The Shape: Linear Ramps
-----------------------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

Every segment is a straight line, so the level is monotonic within a segment
and the output is fully deterministic.


Steps Per Stage
---------------

    attack   +1 / (attack · sr)                  until level = 1
    decay    -(1 - sustain) / (decay · sr)       until level = sustain
    release  -start / (release · sr)             until level = 0

`start` is the level at the moment of note_off, so releasing mid-attack
ramps down from wherever the attack had reached instead of jumping.


Live Parameters
---------------

Steps are recomputed every sample from the current parameters. Turning the
release knob while a note is releasing changes the slope of the remaining
ramp immediately. Turning sustain while sustaining moves the held level.


Retrigger
---------

A note_on while the envelope is still sounding either ramps up from the
current level (`Retrigger::FromCurrent`, no click) or restarts from silence
(`Retrigger::FromZero`, a hard restart that makes repeated notes distinct).
*/

/// ADSR shape. Times are in seconds, sustain is a level in [0, 1].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

// Ramps snap to their target once within this distance of it.
const LEVEL_EPSILON: f32 = 1e-6;

/// Longest accepted stage time.
pub const MAX_STAGE_SECONDS: f32 = 30.0;

impl AdsrParams {
    /// Build a parameter set, clamping each value into its valid range.
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
        .clamped()
    }

    /// Negative or non-finite times become zero (one-sample stages), times
    /// above `MAX_STAGE_SECONDS` are capped, sustain is clamped to [0, 1].
    pub fn clamped(self) -> Self {
        Self {
            attack: clamp_or(self.attack, 0.0, MAX_STAGE_SECONDS, 0.0),
            decay: clamp_or(self.decay, 0.0, MAX_STAGE_SECONDS, 0.0),
            sustain: clamp_or(self.sustain, 0.0, 1.0, 1.0),
            release: clamp_or(self.release, 0.0, MAX_STAGE_SECONDS, 0.0),
        }
    }
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
        }
    }
}

/// What a note_on does to a still-sounding envelope.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retrigger {
    /// Attack ramps up from the current level.
    #[default]
    FromCurrent,
    /// Level snaps to zero before the attack starts.
    FromZero,
}

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Gate low, envelope inactive, level = 0
    Attack,  // Gate just went high, ramping up to 1.0
    Decay,   // Reached peak, ramping down to sustain level
    Sustain, // Holding at sustain level while gate is high
    Release, // Gate went low, ramping down to 0
}

#[derive(Debug, Clone)]
pub struct Envelope {
    params: AdsrParams,
    retrigger: Retrigger,

    stage: EnvelopeState,
    level: f32,

    // level when note_off arrived; release slope is measured from here
    release_start_level: f32,
}

impl Envelope {
    pub fn new(params: AdsrParams) -> Self {
        Self {
            params: params.clamped(),
            retrigger: Retrigger::default(),
            stage: EnvelopeState::Idle,
            level: 0.0,
            release_start_level: 0.0,
        }
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self::new(AdsrParams::new(attack, decay, sustain, release))
    }

    pub fn with_retrigger(mut self, retrigger: Retrigger) -> Self {
        self.retrigger = retrigger;
        self
    }

    /// Gate high: enter Attack from any stage.
    pub fn note_on(&mut self) {
        if self.retrigger == Retrigger::FromZero {
            self.level = 0.0;
        }
        self.release_start_level = 0.0;
        self.stage = EnvelopeState::Attack;
    }

    /// Gate low: start the release phase from the current level.
    pub fn note_off(&mut self) {
        if matches!(self.stage, EnvelopeState::Idle | EnvelopeState::Release) {
            return;
        }

        self.release_start_level = self.level;
        self.stage = EnvelopeState::Release;
    }

    /// Advance the envelope by one sample and return the new level.
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let params = &self.params;

        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.level += 1.0 / stage_samples(params.attack, sample_rate);

                if self.level >= 1.0 - LEVEL_EPSILON {
                    self.level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                let target = params.sustain;
                self.level -= (1.0 - target) / stage_samples(params.decay, sample_rate);

                if self.level <= target + LEVEL_EPSILON {
                    self.level = target;
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                self.level = params.sustain;
            }

            EnvelopeState::Release => {
                let step = self.release_start_level / stage_samples(params.release, sample_rate);
                self.level -= step;

                // Half a step absorbs float drift so the ramp ends on the
                // sample the release time predicts.
                if self.level <= step * 0.5 {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(sample_rate);
        }
    }

    /// Replace the ADSR shape. Takes effect on the next sample.
    pub fn set_params(&mut self, params: AdsrParams) {
        self.params = params.clamped();
    }

    pub fn params(&self) -> AdsrParams {
        self.params
    }

    pub fn set_retrigger(&mut self, retrigger: Retrigger) {
        self.retrigger = retrigger;
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    /// Reset to idle state.
    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.release_start_level = 0.0;
    }

    /// Get the current envelope level (0.0 to 1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Get the current envelope stage
    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new(AdsrParams::default())
    }
}

#[inline]
fn stage_samples(seconds: f32, sample_rate: f32) -> f32 {
    (seconds.max(MIN_TIME) * sample_rate).max(1.0)
}
