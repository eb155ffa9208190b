use crate::{
    dsp::{Envelope, EnvelopeState, Oscillator, Retrigger, SVFilter},
    io::AudioBuffer,
    synth::{
        message::Note,
        params::{clamp_gain, AdsrParams, FilterSettings, SynthParams, Waveform},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Key held, envelope in attack/decay/sustain
    Releasing, // Key released, envelope in release phase
}

/// One note-rendering pipeline: oscillator → envelope × gain → filter.
///
/// Voices are created once by the pool and reused for every note. A voice is
/// sounding (`Active` or `Releasing`) until its envelope returns to idle.
#[derive(Debug, Clone)]
pub struct Voice {
    note: Option<Note>,
    frequency: f32,
    state: VoiceState,
    age: u64,
    sample_rate: f32,

    oscillator: Oscillator,
    envelope: Envelope,
    filter: SVFilter,

    gain: f32,
    filter_settings: FilterSettings,
}

impl Voice {
    pub fn new(sample_rate: f32, params: &SynthParams, retrigger: Retrigger) -> Self {
        let params = params.clamped();

        Self {
            note: None,
            frequency: 0.0,
            state: VoiceState::Free,
            age: 0,
            sample_rate,
            oscillator: Oscillator::new(params.waveform),
            envelope: Envelope::new(params.adsr).with_retrigger(retrigger),
            filter: SVFilter::new(params.filter.kind),
            gain: params.gain,
            filter_settings: params.filter,
        }
    }

    /// Claim this voice for `note`. Returns `false` without touching anything
    /// if the voice is still sounding; use [`Voice::steal`] to reassign it.
    pub fn start_note(&mut self, note: Note, age: u64) -> bool {
        if !self.is_free() {
            return false;
        }

        // A free voice is silent, so starting from clean DSP state is inaudible
        self.oscillator.reset();
        self.filter.reset();
        self.assign(note, age);
        true
    }

    /// Reassign a sounding voice to a new note. Oscillator and filter keep
    /// running and the envelope retriggers from its current level (or from
    /// zero, per the retrigger mode).
    pub fn steal(&mut self, note: Note, age: u64) {
        self.assign(note, age);
    }

    fn assign(&mut self, note: Note, age: u64) {
        self.frequency = note.frequency();
        self.note = Some(note);
        self.age = age;
        self.state = VoiceState::Active;
        self.envelope.note_on();
    }

    /// Key released: the envelope enters release and the voice keeps
    /// rendering its tail until the envelope is idle.
    pub fn stop_note(&mut self) {
        if self.state != VoiceState::Active {
            return;
        }

        self.state = VoiceState::Releasing;
        self.envelope.note_off();

        if !self.envelope.is_active() {
            self.free();
        }
    }

    /// Silence immediately, without a release tail.
    pub fn kill(&mut self) {
        self.envelope.reset();
        self.filter.reset();
        self.free();
    }

    /// Add `num_samples` of this voice into every channel of `buffer`,
    /// starting at `start_sample`.
    ///
    /// A free voice returns immediately: it writes nothing and advances no
    /// state. A voice whose release finishes mid-range frees itself and
    /// stops there.
    pub fn render_next_block(
        &mut self,
        buffer: &mut AudioBuffer,
        start_sample: usize,
        num_samples: usize,
    ) {
        if self.is_free() {
            return;
        }

        let end = start_sample
            .saturating_add(num_samples)
            .min(buffer.num_samples());
        let velocity = self.note.map_or(0.0, |n| n.velocity);
        let settings = self.filter_settings;

        for index in start_sample..end {
            let raw = self.oscillator.next_sample(self.frequency, self.sample_rate);
            let level = self.envelope.next_sample(self.sample_rate);
            let shaped = raw * level * velocity * self.gain;
            let out = self.filter.process(
                shaped,
                settings.kind,
                settings.cutoff_hz,
                settings.resonance,
                self.sample_rate,
            );

            for channel in buffer.channels_mut() {
                channel[index] += out;
            }

            if !self.envelope.is_active() {
                self.free();
                break;
            }
        }
    }

    /// Copy the pool's parameter snapshot into this voice.
    pub fn apply_params(&mut self, params: &SynthParams) {
        self.set_adsr(params.adsr);
        self.set_waveform(params.waveform);
        self.set_gain(params.gain);
        self.set_filter(params.filter);
    }

    pub fn set_adsr(&mut self, adsr: AdsrParams) {
        self.envelope.set_params(adsr);
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.oscillator.set_waveform(waveform);
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = clamp_gain(gain);
    }

    pub fn set_filter(&mut self, settings: FilterSettings) {
        self.filter_settings = settings.clamped();
    }

    pub fn set_retrigger(&mut self, retrigger: Retrigger) {
        self.envelope.set_retrigger(retrigger);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    fn free(&mut self) {
        self.state = VoiceState::Free;
        self.note = None;
        self.frequency = 0.0;
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    /// True while the note's key is held.
    pub fn is_key_down(&self) -> bool {
        self.state == VoiceState::Active
    }

    pub fn note(&self) -> Option<Note> {
        self.note
    }

    pub fn pitch(&self) -> Option<u8> {
        self.note.map(|n| n.pitch)
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    pub fn oscillator_phase(&self) -> f32 {
        self.oscillator.phase()
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn filter_settings(&self) -> FilterSettings {
        self.filter_settings
    }
}
