use crate::{
    config::is_valid_sample_rate,
    dsp::Retrigger,
    error::SynthError,
    io::AudioBuffer,
    synth::{
        message::{ControlMessage, Note, NoteEvent, SynthMessage},
        params::{AdsrParams, FilterSettings, SynthParams, Waveform},
        voice::{Voice, VoiceState},
    },
    SynthConfig,
};

/// Capacity of the queue behind [`VoicePool::note_on`] and friends.
pub const MAX_PENDING_EVENTS: usize = 256;

/*
Voice Allocation
================

Every note-on draws a fresh age from a per-pool counter, so two notes never
share an age and "oldest" is always well defined.

A note-on picks its voice in this order:

  1. a voice already sounding the same pitch (held or releasing) is
     retriggered, so one pitch never occupies two voices
  2. the first free voice, by index
  3. steal: the oldest voice in release, since it is already fading
  4. steal: the oldest voice overall

A note is never dropped.


Sample-Accurate Events
======================

Events carry an offset into the block. Rendering walks the events in offset
order and renders the span between consecutive offsets before applying each
event:

    offsets:      0        30             75          128
    block:        |--------|--------------|-----------|
    render:       [ 0..30 ] note-on@30 [ 30..75 ] note-off@75 [ 75..128 ]

Events at or past the end of the block are applied after the whole block has
rendered. An event whose offset is behind the render position is applied at
the current position.
*/

pub struct VoicePool {
    voices: Vec<Voice>,
    params: SynthParams,
    pending: Vec<NoteEvent>,
    sample_rate: f32,
    note_counter: u64,
    stolen: u64,
}

impl VoicePool {
    pub fn new(
        voice_count: usize,
        sample_rate: f32,
        params: SynthParams,
        retrigger: Retrigger,
    ) -> Result<Self, SynthError> {
        if voice_count == 0 {
            return Err(SynthError::NoVoices);
        }
        if !is_valid_sample_rate(sample_rate) {
            return Err(SynthError::InvalidSampleRate(sample_rate));
        }

        let params = params.clamped();
        let voices = (0..voice_count)
            .map(|_| Voice::new(sample_rate, &params, retrigger))
            .collect();

        Ok(Self {
            voices,
            params,
            pending: Vec::with_capacity(MAX_PENDING_EVENTS),
            sample_rate,
            note_counter: 0,
            stolen: 0,
        })
    }

    pub fn from_config(config: &SynthConfig) -> Result<Self, SynthError> {
        Self::new(
            config.voices,
            config.sample_rate,
            config.params,
            config.retrigger,
        )
    }

    /// Schedule a note-on at `sample_offset` within the next rendered block.
    pub fn note_on(&mut self, note: u8, velocity: f32, sample_offset: usize) {
        self.schedule(NoteEvent::note_on(sample_offset, note, velocity));
    }

    /// Schedule a note-off at `sample_offset` within the next rendered block.
    pub fn note_off(&mut self, note: u8, sample_offset: usize) {
        self.schedule(NoteEvent::note_off(sample_offset, note));
    }

    pub fn all_notes_off(&mut self, sample_offset: usize) {
        self.schedule(NoteEvent::all_notes_off(sample_offset));
    }

    fn schedule(&mut self, event: NoteEvent) {
        if self.pending.len() == self.pending.capacity() {
            self.handle_event(event.message);
            return;
        }

        // keep offset order; equal offsets stay in arrival order
        let index = self
            .pending
            .partition_point(|queued| queued.offset <= event.offset);
        self.pending.insert(index, event);
    }

    /// Apply a note message right now.
    ///
    /// Pitches above 127 clamp to 127 for note-on and note-off alike, and a
    /// note-on with zero (or negative) velocity releases the note.
    pub fn handle_event(&mut self, message: SynthMessage) {
        match message.normalized() {
            SynthMessage::NoteOn { note, velocity } => self.start_note(Note::new(note, velocity)),
            SynthMessage::NoteOff { note } => self.stop_note(note),
            SynthMessage::AllNotesOff => {
                for voice in &mut self.voices {
                    voice.stop_note();
                }
            }
        }
    }

    fn start_note(&mut self, note: Note) {
        self.note_counter += 1;
        let age = self.note_counter;

        if let Some(voice) = self
            .voices
            .iter_mut()
            .find(|v| v.pitch() == Some(note.pitch))
        {
            voice.steal(note, age);
            return;
        }

        if let Some(voice) = self.voices.iter_mut().find(|v| v.is_free()) {
            voice.start_note(note, age);
            return;
        }

        if let Some(index) = self.steal_index() {
            self.stolen += 1;
            self.voices[index].steal(note, age);
        }
    }

    fn steal_index(&self) -> Option<usize> {
        let oldest_releasing = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == VoiceState::Releasing)
            .min_by_key(|(_, v)| v.age());

        oldest_releasing
            .or_else(|| self.voices.iter().enumerate().min_by_key(|(_, v)| v.age()))
            .map(|(index, _)| index)
    }

    fn stop_note(&mut self, pitch: u8) {
        if let Some(voice) = self
            .voices
            .iter_mut()
            .find(|v| v.is_key_down() && v.pitch() == Some(pitch))
        {
            voice.stop_note();
        }
    }

    /// Render `num_samples` into `buffer`, adding on top of its contents.
    ///
    /// `events` must be ordered by offset; they are merged with anything
    /// queued through [`VoicePool::note_on`] since the last block.
    pub fn render_next_block(
        &mut self,
        buffer: &mut AudioBuffer,
        events: &[NoteEvent],
        num_samples: usize,
    ) {
        let num_samples = num_samples.min(buffer.num_samples());

        for voice in &mut self.voices {
            voice.apply_params(&self.params);
        }

        let mut cursor = 0;
        let mut next_pending = 0;
        let mut next_event = 0;

        loop {
            let event = match (self.pending.get(next_pending), events.get(next_event)) {
                (Some(queued), Some(incoming)) if queued.offset <= incoming.offset => {
                    next_pending += 1;
                    *queued
                }
                (_, Some(incoming)) => {
                    next_event += 1;
                    *incoming
                }
                (Some(queued), None) => {
                    next_pending += 1;
                    *queued
                }
                (None, None) => break,
            };

            let at = event.offset.clamp(cursor, num_samples);
            if at > cursor {
                self.render_range(buffer, cursor, at - cursor);
                cursor = at;
            }

            self.handle_event(event.message);
        }

        if cursor < num_samples {
            self.render_range(buffer, cursor, num_samples - cursor);
        }

        self.pending.clear();
    }

    fn render_range(&mut self, buffer: &mut AudioBuffer, start: usize, len: usize) {
        for voice in &mut self.voices {
            voice.render_next_block(buffer, start, len);
        }
    }

    /// Silence every voice and drop queued events.
    pub fn kill_all(&mut self) {
        for voice in &mut self.voices {
            voice.kill();
        }
        self.pending.clear();
    }

    pub fn apply_control(&mut self, message: ControlMessage) {
        match message {
            ControlMessage::SetAdsr(adsr) => self.set_adsr(adsr),
            ControlMessage::SetWaveform(waveform) => self.set_waveform(waveform),
            ControlMessage::SetGain(gain) => self.set_gain(gain),
            ControlMessage::SetFilter(settings) => self.set_filter(settings),
        }
    }

    pub fn set_adsr(&mut self, adsr: AdsrParams) {
        self.params.adsr = adsr.clamped();
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.params.waveform = waveform;
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.params = SynthParams { gain, ..self.params }.clamped();
    }

    pub fn set_filter(&mut self, settings: FilterSettings) {
        self.params.filter = settings.clamped();
    }

    pub fn set_params(&mut self, params: SynthParams) {
        self.params = params.clamped();
    }

    pub fn set_retrigger(&mut self, retrigger: Retrigger) {
        for voice in &mut self.voices {
            voice.set_retrigger(retrigger);
        }
    }

    /// Ignores non-positive or non-finite rates.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !is_valid_sample_rate(sample_rate) {
            return;
        }
        self.sample_rate = sample_rate;
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
    }

    pub fn params(&self) -> SynthParams {
        self.params
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn is_note_playing(&self, pitch: u8) -> bool {
        self.voices.iter().any(|v| v.pitch() == Some(pitch))
    }

    /// Number of note-ons that had to take a sounding voice.
    pub fn stolen_count(&self) -> u64 {
        self.stolen
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
