use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::clamp_or;

/*
State-Variable Filter (SVF)
===========================

Topology-preserving transform (TPT) SVF. Two trapezoidal integrators share
state, and one pass through the recurrence yields all three responses at once:

    g  = tan(π · cutoff / sample_rate)      prewarped integrator gain
    k  = 2 - 2 · resonance                  damping (2 = no peak)
    h  = 1 / (1 + g · (g + k))

    v3 = x - ic2eq
    v1 = h · (ic1eq + g · v3)               band-pass
    v2 = ic2eq + g · v1                     low-pass
    hp = x - k · v1 - v2                    high-pass

    ic1eq = 2 · v1 - ic1eq
    ic2eq = 2 · v2 - ic2eq

| kind      | passes          | rejects         |
| --------- | --------------- | --------------- |
| low-pass  | below cutoff    | above cutoff    |
| band-pass | around cutoff   | both sides      |
| high-pass | above cutoff    | below cutoff    |

Stability: resonance is capped at MAX_RESONANCE so k never reaches 0 (the
self-oscillation point), and cutoff is kept below Nyquist where tan() blows up.

Switching kinds: the integrators are shared by every response, so a kind
change never touches them. The output still jumps if we switch from, say,
the low-pass tap to the high-pass tap instantly, because the two taps carry
different signals. A short linear crossfade from the old tap to the new one
removes that click.
*/

/// Lowest accepted cutoff.
pub const MIN_CUTOFF_HZ: f32 = 10.0;
/// Highest cutoff as a fraction of the sample rate (just under Nyquist).
pub const MAX_CUTOFF_RATIO: f32 = 0.49;
/// Resonance ceiling; keeps damping positive so the filter cannot run away.
pub const MAX_RESONANCE: f32 = 0.98;
/// Length of the crossfade between responses after a kind change.
pub const KIND_CROSSFADE_SAMPLES: u32 = 128;

// Integrator state below this is flushed to zero.
const DENORMAL_THRESHOLD: f32 = 1e-20;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    #[default]
    LowPass,
    BandPass,
    HighPass,
}

impl FilterKind {
    pub const ALL: [FilterKind; 3] = [
        FilterKind::LowPass,
        FilterKind::BandPass,
        FilterKind::HighPass,
    ];

    /// Map a control-surface index to a kind, clamping out-of-range indices.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.clamp(0, 2) as usize]
    }
}

/// Filter controls broadcast to every voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    pub kind: FilterKind,
    pub cutoff_hz: f32,
    pub resonance: f32,
}

impl FilterSettings {
    pub fn new(kind: FilterKind, cutoff_hz: f32, resonance: f32) -> Self {
        Self {
            kind,
            cutoff_hz,
            resonance,
        }
        .clamped()
    }

    /// Clamp to sample-rate independent bounds. The Nyquist bound is applied
    /// per sample by the filter itself.
    pub fn clamped(self) -> Self {
        Self {
            kind: self.kind,
            cutoff_hz: clamp_or(self.cutoff_hz, MIN_CUTOFF_HZ, f32::MAX, 20_000.0),
            resonance: clamp_or(self.resonance, 0.0, 1.0, 0.0),
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            kind: FilterKind::LowPass,
            cutoff_hz: 20_000.0,
            resonance: 0.0,
        }
    }
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

impl FilterOutputs {
    #[inline]
    fn select(&self, kind: FilterKind) -> f32 {
        match kind {
            FilterKind::LowPass => self.lowpass,
            FilterKind::BandPass => self.bandpass,
            FilterKind::HighPass => self.highpass,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    kind: FilterKind,
    fade_from: FilterKind,
    fade_remaining: u32,

    // g depends on cutoff and sample rate only; recomputed when either moves
    cached_cutoff: f32,
    cached_sample_rate: f32,
    g: f32,
}

impl SVFilter {
    pub fn new(kind: FilterKind) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            kind,
            fade_from: kind,
            fade_remaining: 0,
            cached_cutoff: 0.0,
            cached_sample_rate: 0.0,
            g: 0.0,
        }
    }

    #[inline]
    fn compute_g(&mut self, cutoff_hz: f32, sample_rate: f32) -> f32 {
        if cutoff_hz != self.cached_cutoff || sample_rate != self.cached_sample_rate {
            self.cached_cutoff = cutoff_hz;
            self.cached_sample_rate = sample_rate;
            self.g = (PI * cutoff_hz / sample_rate).tan();
        }
        self.g
    }

    /// One step of the SVF recurrence, producing every response.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = flush_denormal(2.0 * v1 - self.ic1eq);
        self.ic2eq = flush_denormal(2.0 * v2 - self.ic2eq);

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    /// Filter one sample.
    ///
    /// `cutoff_hz` is clamped to `[MIN_CUTOFF_HZ, 0.49 · sample_rate]` and
    /// `resonance` to `[0, MAX_RESONANCE]`. A change of `kind` keeps the
    /// integrator state and crossfades into the new response.
    #[inline]
    pub fn process(
        &mut self,
        input: f32,
        kind: FilterKind,
        cutoff_hz: f32,
        resonance: f32,
        sample_rate: f32,
    ) -> f32 {
        if !(sample_rate > 0.0) {
            return input;
        }

        if kind != self.kind {
            self.fade_from = self.kind;
            self.kind = kind;
            self.fade_remaining = KIND_CROSSFADE_SAMPLES;
        }

        let cutoff = clamp_or(
            cutoff_hz,
            MIN_CUTOFF_HZ.min(sample_rate * MAX_CUTOFF_RATIO),
            sample_rate * MAX_CUTOFF_RATIO,
            sample_rate * MAX_CUTOFF_RATIO,
        );
        let resonance = clamp_or(resonance, 0.0, MAX_RESONANCE, 0.0);

        let g = self.compute_g(cutoff, sample_rate);
        let k = 2.0 - 2.0 * resonance;
        let outputs = self.next_sample(input, k, g);

        let target = outputs.select(self.kind);
        if self.fade_remaining == 0 {
            return target;
        }

        let t = 1.0 - self.fade_remaining as f32 / KIND_CROSSFADE_SAMPLES as f32;
        self.fade_remaining -= 1;
        outputs.select(self.fade_from) * (1.0 - t) + target * t
    }

    /// Filter a block in place with fixed settings.
    pub fn render(&mut self, buffer: &mut [f32], settings: &FilterSettings, sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.process(
                *sample,
                settings.kind,
                settings.cutoff_hz,
                settings.resonance,
                sample_rate,
            );
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Integrator registers `(ic1eq, ic2eq)`.
    pub fn state(&self) -> (f32, f32) {
        (self.ic1eq, self.ic2eq)
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
        self.fade_remaining = 0;
        self.fade_from = self.kind;
    }
}

impl Default for SVFilter {
    fn default() -> Self {
        Self::new(FilterKind::default())
    }
}

#[inline]
fn flush_denormal(x: f32) -> f32 {
    if x.abs() < DENORMAL_THRESHOLD {
        0.0
    } else {
        x
    }
}
