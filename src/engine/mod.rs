//! Host-facing processor.
//!
//! [`Synth`] is what an audio callback owns: it wraps the voice pool, drains
//! the control queues at the top of every block and renders. Its partner
//! [`SynthHandle`] lives on the control side and only ever pushes messages.
//!
//! ```ignore
//! let (mut synth, mut handle) = Synth::new(SynthConfig::default())?;
//! handle.key_down(60, 0.8)?;
//!
//! let mut buffer = synth.output_buffer();
//! synth.process_block(&mut buffer, &[], 256);
//! ```

pub mod handle;
pub mod keyboard;

use rtrb::{Consumer, RingBuffer};

use crate::{
    config::is_valid_sample_rate,
    error::SynthError,
    io::AudioBuffer,
    synth::{
        message::{ControlMessage, MessageReceiver, NoteEvent, SynthMessage},
        pool::VoicePool,
    },
    SynthConfig,
};

pub use self::{
    handle::SynthHandle,
    keyboard::{KeyboardMessage, KeyboardState},
};

pub struct Synth {
    pool: VoicePool,
    keyboard: KeyboardState,
    controls: Consumer<ControlMessage>,
    keys: Consumer<KeyboardMessage>,
    channels: usize,
    max_block_size: usize,
}

impl Synth {
    pub fn new(config: SynthConfig) -> Result<(Self, SynthHandle), SynthError> {
        config.validate()?;

        let pool = VoicePool::from_config(&config)?;
        let (control_tx, control_rx) = RingBuffer::new(config.control_queue_size.max(1));
        let (key_tx, key_rx) = RingBuffer::new(config.keyboard_queue_size.max(1));

        tracing::info!(
            voices = config.voices,
            sample_rate = config.sample_rate,
            channels = config.channels,
            "synth created"
        );

        let synth = Self {
            pool,
            keyboard: KeyboardState::new(),
            controls: control_rx,
            keys: key_rx,
            channels: config.channels,
            max_block_size: config.max_block_size.max(1),
        };

        Ok((synth, SynthHandle::new(control_tx, key_tx)))
    }

    /// Called before playback starts or when the device rate changes.
    pub fn prepare(&mut self, sample_rate: f32) {
        if !is_valid_sample_rate(sample_rate) {
            tracing::warn!(sample_rate, "ignoring invalid sample rate");
            return;
        }

        tracing::info!(sample_rate, "preparing synth");
        self.pool.set_sample_rate(sample_rate);
    }

    /// Silence everything. Used when playback stops.
    pub fn reset(&mut self) {
        tracing::debug!("resetting synth");
        self.pool.kill_all();
        self.keyboard.reset();
    }

    /// Render `num_samples` into the start of `buffer`, replacing its
    /// contents. `events` must be ordered by offset.
    pub fn process_block(
        &mut self,
        buffer: &mut AudioBuffer,
        events: &[NoteEvent],
        num_samples: usize,
    ) {
        if num_samples == 0 {
            return;
        }

        buffer.clear(num_samples);

        while let Some(message) = MessageReceiver::pop(&mut self.controls) {
            self.pool.apply_control(message);
        }

        while let Some(key) = MessageReceiver::pop(&mut self.keys) {
            match self.keyboard.apply(key) {
                SynthMessage::NoteOn { note, velocity } => self.pool.note_on(note, velocity, 0),
                SynthMessage::NoteOff { note } => self.pool.note_off(note, 0),
                SynthMessage::AllNotesOff => self.pool.all_notes_off(0),
            }
        }

        for event in events {
            self.keyboard.record(&event.message);
        }

        self.pool.render_next_block(buffer, events, num_samples);
    }

    /// A buffer sized for this synth's channel count and largest block.
    pub fn output_buffer(&self) -> AudioBuffer {
        AudioBuffer::new(self.channels, self.max_block_size)
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    pub fn num_channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> f32 {
        self.pool.sample_rate()
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut VoicePool {
        &mut self.pool
    }
}
