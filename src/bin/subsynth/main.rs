//! subsynth - plays a short chord progression through the default output device
//!
//! Run with: cargo run
//! Set RUST_LOG=debug for more detail.

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing_subscriber::EnvFilter;

use subsynth::{dsp::FilterKind, io::converter::db_to_gain, Synth, SynthConfig};

// Am - F - C - G, voiced around middle C
const PROGRESSION: [[u8; 4]; 4] = [
    [57, 60, 64, 69],
    [53, 57, 60, 65],
    [48, 55, 60, 64],
    [55, 59, 62, 67],
];
const CHORD_LENGTH: Duration = Duration::from_millis(1_200);
const GAP: Duration = Duration::from_millis(150);
const SWEEP_STEPS: u32 = 24;

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    // `log` records from dependencies go through this bridge; the subscriber
    // below is built with `finish()` so it does not install a second one.
    tracing_log::LogTracer::init().wrap_err("failed to install log bridge")?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("failed to install tracing subscriber")?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    tracing::info!(sample_rate, channels, "audio device ready");

    let synth_config = SynthConfig {
        sample_rate,
        channels,
        ..SynthConfig::default()
    };
    let (mut synth, mut handle) = Synth::new(synth_config).wrap_err("failed to build synth")?;
    synth.prepare(sample_rate);

    // The synth moves into the callback; everything else talks to it
    // through the handle.
    let mut buffer = synth.output_buffer();
    let block = synth.max_block_size();

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(block);
                    synth.process_block(&mut buffer, &[], frames);

                    let out = &mut data[frames_written * channels..];
                    buffer.write_interleaved(out, frames);
                    frames_written += frames;
                }
            },
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;

    handle.set_waveform(2)?;
    handle.set_adsr(0.02, 0.3, 0.6, 0.4)?;
    handle.set_gain(db_to_gain(-16.0))?;

    for (bar, chord) in PROGRESSION.iter().cycle().take(PROGRESSION.len() * 2).enumerate() {
        tracing::info!(bar, ?chord, "chord");

        for &note in chord {
            handle.key_down(note, 0.8)?;
        }

        // Open the low-pass over the length of the chord
        for step in 0..SWEEP_STEPS {
            let t = step as f32 / SWEEP_STEPS as f32;
            let cutoff = 300.0 * 20.0f32.powf(t);
            handle.set_filter(FilterKind::LowPass, cutoff, 0.6)?;
            thread::sleep(CHORD_LENGTH / SWEEP_STEPS);
        }

        for &note in chord {
            handle.key_up(note)?;
        }
        thread::sleep(GAP);
    }

    handle.all_notes_off()?;
    thread::sleep(Duration::from_millis(600));
    tracing::info!("done");

    Ok(())
}
