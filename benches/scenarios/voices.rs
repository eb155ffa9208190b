//! Benchmarks for a single voice chain: oscillator → envelope → filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use subsynth::{
    dsp::{AdsrParams, FilterKind, FilterSettings, Retrigger, Waveform},
    io::AudioBuffer,
    synth::{Note, SynthParams, Voice},
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn voice(waveform: Waveform, filter: FilterSettings) -> Voice {
    let params = SynthParams {
        adsr: AdsrParams::new(0.01, 0.1, 0.7, 0.2),
        waveform,
        gain: 0.5,
        filter,
    };
    let mut voice = Voice::new(SAMPLE_RATE, &params, Retrigger::FromCurrent);
    voice.start_note(Note::new(45, 1.0), 1); // A2, typical bass note
    voice
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = AudioBuffer::new(2, size);

        // lead-style: saw through an open-ish low-pass
        let lead_filter = FilterSettings::new(FilterKind::LowPass, 2_500.0, 0.2);
        let mut lead = voice(Waveform::Saw, lead_filter);
        group.bench_with_input(BenchmarkId::new("lead", size), &size, |b, _| {
            b.iter(|| {
                lead.render_next_block(black_box(&mut buffer), 0, size);
            })
        });

        // bass-style: square, low cutoff, more resonance
        let bass_filter = FilterSettings::new(FilterKind::LowPass, 500.0, 0.8);
        let mut bass = voice(Waveform::Square, bass_filter);
        group.bench_with_input(BenchmarkId::new("bass", size), &size, |b, _| {
            b.iter(|| {
                bass.render_next_block(black_box(&mut buffer), 0, size);
            })
        });

        // Sine has the transcendental cost per sample
        let pad_filter = FilterSettings::new(FilterKind::BandPass, 1_500.0, 0.5);
        let mut pad = voice(Waveform::Sine, pad_filter);
        group.bench_with_input(BenchmarkId::new("sine_bandpass", size), &size, |b, _| {
            b.iter(|| {
                pad.render_next_block(black_box(&mut buffer), 0, size);
            })
        });
    }

    group.finish();
}
