//! Benchmarks for full voice pools.
//!
//! These model a host calling the synth once per block: all voices busy,
//! many events split the block, and the idle case that should cost nothing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use subsynth::{
    dsp::{AdsrParams, Retrigger, Waveform},
    io::AudioBuffer,
    synth::{NoteEvent, SynthParams, VoicePool},
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

const VOICE_COUNTS: &[usize] = &[8, 16, 32];

fn pool(voices: usize) -> VoicePool {
    let params = SynthParams {
        adsr: AdsrParams::new(0.01, 0.1, 0.7, 0.3),
        waveform: Waveform::Saw,
        ..SynthParams::default()
    };
    VoicePool::new(voices, SAMPLE_RATE, params, Retrigger::FromCurrent).unwrap()
}

pub fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/pool");

    for &size in BLOCK_SIZES {
        let mut buffer = AudioBuffer::new(2, size);

        for &voices in VOICE_COUNTS {
            // Every voice held
            let mut full = pool(voices);
            let chord: Vec<NoteEvent> = (0..voices)
                .map(|i| NoteEvent::note_on(0, 36 + i as u8 * 2, 0.8))
                .collect();
            full.render_next_block(&mut buffer, &chord, size);

            group.bench_with_input(
                BenchmarkId::new(format!("all_voices_{voices}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.clear(size);
                        full.render_next_block(black_box(&mut buffer), &[], size);
                    })
                },
            );
        }

        // Idle pool: free voices return immediately
        let mut idle = pool(32);
        group.bench_with_input(BenchmarkId::new("idle_32", size), &size, |b, _| {
            b.iter(|| {
                idle.render_next_block(black_box(&mut buffer), &[], size);
            })
        });

        // One event every 8 samples, cycling notes so voices keep getting stolen
        let mut busy = pool(8);
        let mut next_note = 0u8;
        group.bench_with_input(BenchmarkId::new("event_storm_8", size), &size, |b, _| {
            b.iter(|| {
                let events: Vec<NoteEvent> = (0..size / 8)
                    .map(|i| {
                        next_note = (next_note + 7) % 48;
                        NoteEvent::note_on(i * 8, 36 + next_note, 0.8)
                    })
                    .collect();
                buffer.clear(size);
                busy.render_next_block(black_box(&mut buffer), black_box(&events), size);
            })
        });
    }

    group.finish();
}
