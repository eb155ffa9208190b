use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillator
============================

The oscillator keeps a single number, `phase`, in [0, 1). Each sample it
emits the waveform value at the current phase and then advances:

    phase += frequency / sample_rate
    phase  = phase mod 1

One full trip from 0 to 1 is one period, so a 441 Hz tone at 44.1 kHz
repeats every 100 samples.

Waveforms (all in [-1, 1]):

    sine      sin(2π·phase)
    square    +1 for phase < 0.5, -1 otherwise
    saw       2·phase - 1
    triangle  1 - 4·|phase - 0.5|     (-1 at 0, +1 at 0.5, back to -1)

      sine         square        saw         triangle
     ╭─╮          ┌──┐          ╱│  ╱│         ╱╲
    ─╯ ╰─╮       ─┘  └──┐      ╱ │ ╱ │       ╱    ╲
         ╰─╯           └──    ╱  │╱  │     ╱        ╲

The waveforms are naive (not band-limited). Saw and square alias at high
pitches; the per-voice filter after the oscillator tames most of it.
*/

/// Waveform selector. Indices match the control surface: 0..=3.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Saw,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Saw,
        Waveform::Triangle,
    ];

    /// Map a control-surface index to a waveform, clamping out-of-range
    /// indices to the nearest valid one.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.clamp(0, 3) as usize]
    }

    pub fn index(self) -> i32 {
        match self {
            Waveform::Sine => 0,
            Waveform::Square => 1,
            Waveform::Saw => 2,
            Waveform::Triangle => 3,
        }
    }

    /// Waveform value at `phase` in [0, 1).
    #[inline]
    pub fn sample_at(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    phase: f32,
    waveform: Waveform,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            phase: 0.0,
            waveform,
        }
    }

    /// Emit one sample and advance the phase.
    ///
    /// Non-positive or non-finite frequencies produce silence and leave the
    /// phase untouched. Frequencies above Nyquist are clamped to it.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        if !(frequency > 0.0) || !frequency.is_finite() || !(sample_rate > 0.0) {
            return 0.0;
        }

        let frequency = frequency.min(sample_rate * 0.5);
        let out = self.waveform.sample_at(self.phase);

        self.phase += frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        out
    }

    /// Fill `buffer` with consecutive samples at a fixed frequency.
    pub fn render(&mut self, buffer: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(Waveform::default())
    }
}
