//! Frequency-domain checks: pitch accuracy, harmonic content and filter
//! response, measured with an FFT.

use rustfft::{num_complex::Complex, FftPlanner};
use subsynth::dsp::{FilterKind, FilterSettings, Oscillator, SVFilter, Waveform};

const SAMPLE_RATE: f32 = 48_000.0;
// 10 Hz per bin; 750 Hz is exactly 64 samples per period
const FFT_SIZE: usize = 4_800;

fn magnitudes(signal: &[f32]) -> Vec<f32> {
    let mut buffer: Vec<Complex<f32>> = signal.iter().map(|&s| Complex::new(s, 0.0)).collect();
    let fft = FftPlanner::<f32>::new().plan_fft_forward(buffer.len());
    fft.process(&mut buffer);
    buffer[..buffer.len() / 2].iter().map(|c| c.norm()).collect()
}

fn peak_bin(spectrum: &[f32]) -> usize {
    spectrum
        .iter()
        .enumerate()
        .skip(1)
        .fold((0, 0.0f32), |best, (bin, &m)| if m > best.1 { (bin, m) } else { best })
        .0
}

fn tone(waveform: Waveform, frequency: f32) -> Vec<f32> {
    let mut osc = Oscillator::new(waveform);
    let mut out = vec![0.0; FFT_SIZE];
    osc.render(&mut out, frequency, SAMPLE_RATE);
    out
}

#[test]
fn every_waveform_peaks_at_its_fundamental() {
    for waveform in Waveform::ALL {
        let spectrum = magnitudes(&tone(waveform, 750.0));
        assert_eq!(peak_bin(&spectrum), 75, "{waveform:?}");
    }
}

#[test]
fn a4_lands_on_440_hz() {
    let a4 = subsynth::io::converter::midi_note_to_freq(69);
    let spectrum = magnitudes(&tone(Waveform::Sine, a4));
    assert_eq!(peak_bin(&spectrum), 44);
}

#[test]
fn symmetric_waveforms_have_only_odd_harmonics() {
    for waveform in [Waveform::Square, Waveform::Triangle] {
        let spectrum = magnitudes(&tone(waveform, 750.0));
        let fundamental = spectrum[75];

        assert!(spectrum[225] > fundamental * 0.05, "{waveform:?} third harmonic");
        assert!(spectrum[150] < fundamental * 0.001, "{waveform:?} second harmonic");
        assert!(spectrum[300] < fundamental * 0.001, "{waveform:?} fourth harmonic");
    }
}

#[test]
fn saw_has_every_harmonic() {
    let spectrum = magnitudes(&tone(Waveform::Saw, 750.0));
    let fundamental = spectrum[75];

    for harmonic in 2..6 {
        let expected = fundamental / harmonic as f32;
        let actual = spectrum[75 * harmonic];
        assert!(
            (actual - expected).abs() < expected * 0.1,
            "harmonic {harmonic}: expected about {expected}, got {actual}"
        );
    }
}

#[test]
fn lowpass_keeps_the_low_tone_and_cuts_the_high_one() {
    let low = tone(Waveform::Sine, 500.0);
    let high = tone(Waveform::Sine, 8_000.0);
    let mut mixed: Vec<f32> = low.iter().zip(&high).map(|(a, b)| a + b).collect();

    let settings = FilterSettings::new(FilterKind::LowPass, 1_000.0, 0.0);
    SVFilter::new(FilterKind::LowPass).render(&mut mixed, &settings, SAMPLE_RATE);

    let spectrum = magnitudes(&mixed);
    assert!(spectrum[800] < spectrum[50] * 0.05);
}

#[test]
fn highpass_keeps_the_high_tone_and_cuts_the_low_one() {
    let low = tone(Waveform::Sine, 200.0);
    let high = tone(Waveform::Sine, 8_000.0);
    let mut mixed: Vec<f32> = low.iter().zip(&high).map(|(a, b)| a + b).collect();

    let settings = FilterSettings::new(FilterKind::HighPass, 2_000.0, 0.0);
    SVFilter::new(FilterKind::HighPass).render(&mut mixed, &settings, SAMPLE_RATE);

    let spectrum = magnitudes(&mixed);
    assert!(spectrum[20] < spectrum[800] * 0.05);
}
