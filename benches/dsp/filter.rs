//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use subsynth::dsp::{FilterKind, FilterSettings, SVFilter};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for (name, kind) in [
            ("lowpass", FilterKind::LowPass),
            ("bandpass", FilterKind::BandPass),
            ("highpass", FilterKind::HighPass),
        ] {
            let settings = FilterSettings::new(kind, 1_000.0, 0.5);
            let mut filter = SVFilter::new(kind);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), black_box(&settings), SAMPLE_RATE);
                })
            });
        }

        // Cutoff moving every sample: coefficient recompute on each call
        let mut filter = SVFilter::new(FilterKind::LowPass);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass_sweep", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let cutoff = 200.0 + 10.0 * i as f32;
                    *sample = filter.process(
                        black_box(input[i]),
                        FilterKind::LowPass,
                        cutoff,
                        0.7,
                        SAMPLE_RATE,
                    );
                }
            })
        });
    }

    group.finish();
}
